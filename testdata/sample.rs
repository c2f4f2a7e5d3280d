// Fixture for the output format tests.

pub fn parse_port(input: &str) -> Option<u16> {
    // TODO
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

pub fn first_even(values: &[u32]) -> Option<u32> {
    for v in values {
        if v % 2 == 0 {
            return Some(*v);
            println!("found {}", v);
        }
    }
    None
}
