//! Input files and the exclusion predicate.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// Bytes sniffed for NUL when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 8000;

/// Default exclusion patterns: build output, editor backups.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["**/bin/**", "**/*.~*", "**/*.bak*"];

/// A source file handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    display: String,
    text: Option<String>,
}

impl InputFile {
    /// A file on disk, shown relative to `base` when possible.
    pub fn on_disk(path: impl Into<PathBuf>, base: &Path) -> Self {
        let path = path.into();
        let display = path
            .strip_prefix(base)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        Self {
            path,
            display,
            text: None,
        }
    }

    /// A file whose contents are already in memory.
    pub fn in_memory(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            display: name,
            text: Some(text.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name used in reports.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// Extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Text of the file. Invalid UTF-8 is replaced rather than rejected.
    pub fn contents(&self) -> anyhow::Result<Cow<'_, str>> {
        if let Some(text) = &self.text {
            return Ok(Cow::Borrowed(text));
        }
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn size(&self) -> Option<u64> {
        match &self.text {
            Some(text) => Some(text.len() as u64),
            None => std::fs::metadata(&self.path).ok().map(|m| m.len()),
        }
    }

    fn head(&self) -> Option<Vec<u8>> {
        match &self.text {
            Some(text) => Some(text.as_bytes().iter().take(BINARY_SNIFF_LEN).copied().collect()),
            None => {
                let mut buf = Vec::with_capacity(BINARY_SNIFF_LEN);
                File::open(&self.path)
                    .ok()?
                    .take(BINARY_SNIFF_LEN as u64)
                    .read_to_end(&mut buf)
                    .ok()?;
                Some(buf)
            }
        }
    }
}

/// Decides whether a file is left out of the analysis.
///
/// Must be pure: it is called exactly once per file, before parsing.
pub trait FileFilter: Send + Sync {
    fn should_skip(&self, file: &InputFile) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&InputFile) -> bool + Send + Sync,
{
    fn should_skip(&self, file: &InputFile) -> bool {
        self(file)
    }
}

/// Skips nothing.
pub struct IncludeAll;

impl FileFilter for IncludeAll {
    fn should_skip(&self, _file: &InputFile) -> bool {
        false
    }
}

/// Glob exclusions, a size limit and binary detection.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    exclusions: GlobSet,
    max_file_size: Option<u64>,
}

impl ExclusionFilter {
    /// Build from glob patterns. `**` matches across directories.
    pub fn new<S: AsRef<str>>(patterns: &[S], max_file_size: Option<u64>) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        Ok(Self {
            exclusions: builder.build()?,
            max_file_size,
        })
    }

    fn is_excluded(&self, file: &InputFile) -> bool {
        self.exclusions.is_match(file.display_name()) || self.exclusions.is_match(file.path())
    }

    fn is_too_large(&self, file: &InputFile) -> bool {
        match (self.max_file_size, file.size()) {
            (Some(max), Some(size)) => size > max,
            _ => false,
        }
    }
}

impl FileFilter for ExclusionFilter {
    fn should_skip(&self, file: &InputFile) -> bool {
        self.is_excluded(file) || self.is_too_large(file) || is_binary(file)
    }
}

/// A NUL byte near the start of a file marks it as binary. Unreadable files
/// are not considered binary; reading them fails later, inside the pipeline.
fn is_binary(file: &InputFile) -> bool {
    file.head().is_some_and(|head| head.contains(&0))
}

/// Collect files under `root` whose extension is in `suffixes`.
///
/// Hidden directories are not descended into. A regular file given as
/// `root` is returned as is. The result is sorted for deterministic runs.
pub fn discover_files(root: &Path, suffixes: &[String]) -> anyhow::Result<Vec<InputFile>> {
    if root.is_file() {
        let base = root.parent().unwrap_or(root);
        return Ok(vec![InputFile::on_disk(root, base)]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let hidden = e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.');
            !(e.file_type().is_dir() && hidden)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry.path().extension().and_then(|e| e.to_str()).unwrap_or("");
        if suffixes.iter().any(|s| s.trim_start_matches('.') == ext) {
            files.push(InputFile::on_disk(entry.path(), root));
        }
    }

    files.sort_by(|a, b| a.display_name().cmp(b.display_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_exclusions() {
        let filter = ExclusionFilter::new(DEFAULT_EXCLUSIONS, None).unwrap();
        assert!(filter.should_skip(&InputFile::in_memory("app/bin/out.rs", "x")));
        assert!(filter.should_skip(&InputFile::in_memory("src/main.~rs", "x")));
        assert!(filter.should_skip(&InputFile::in_memory("src/main.bak1", "x")));
        assert!(!filter.should_skip(&InputFile::in_memory("src/binary.rs", "x")));
    }

    #[test]
    fn test_size_and_binary() {
        let filter = ExclusionFilter::new(&[] as &[&str], Some(4)).unwrap();
        assert!(filter.should_skip(&InputFile::in_memory("a.rs", "12345")));
        assert!(filter.should_skip(&InputFile::in_memory("a.rs", "a\0b")));
        assert!(!filter.should_skip(&InputFile::in_memory("a.rs", "1234")));
    }

    #[test]
    fn test_closure_filter() {
        let filter = |f: &InputFile| f.extension() == Some("py");
        assert!(filter.should_skip(&InputFile::in_memory("a.py", "")));
        assert!(!filter.should_skip(&InputFile::in_memory("a.rs", "")));
    }

    #[test]
    fn test_discover_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::create_dir_all(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join("src/b.rs"), "").unwrap();
        std::fs::write(temp.path().join("a.rs"), "").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::write(temp.path().join(".git/c.rs"), "").unwrap();

        let files = discover_files(temp.path(), &["rs".to_string()]).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["a.rs", "src/b.rs"]);
    }
}
