//! Tree-sitter backed implementation of [`SourceParser`].
//!
//! The concrete tree-sitter tree is translated into a [`SyntaxTree`], with
//! every node tagged through the language's [`LanguageSpec`]. Tree-sitter
//! never refuses input; instead it inserts ERROR and MISSING nodes. The
//! first of those, in source order, is reported as the file's [`ParseError`].

use tree_sitter::{Language, Parser as TsParser};

use super::{Node, NodeCategory, ParseError, SourceParser, Span, SyntaxTree};

/// Node-kind tables describing one grammar.
pub struct LanguageSpec {
    /// Language name (e.g., "python", "go")
    pub id: &'static str,
    /// File extensions without the dot
    pub extensions: &'static [&'static str],
    /// Returns the tree-sitter language
    pub language: fn() -> Language,
    pub functions: &'static [&'static str],
    pub blocks: &'static [&'static str],
    pub branches: &'static [&'static str],
    pub loops: &'static [&'static str],
    pub catches: &'static [&'static str],
    pub exits: &'static [&'static str],
    /// Operator tokens (anonymous nodes) that short-circuit
    pub logical_operators: &'static [&'static str],
    pub comments: &'static [&'static str],
    pub strings: &'static [&'static str],
    pub numbers: &'static [&'static str],
    pub identifiers: &'static [&'static str],
    /// Node kinds whose first identifier child is the declared name
    pub declarations: &'static [&'static str],
}

impl LanguageSpec {
    /// Map a grammar node kind to its category.
    pub fn categorize(&self, kind: &str, named: bool) -> NodeCategory {
        let tables: [(&[&str], NodeCategory); 11] = [
            (self.functions, NodeCategory::Function),
            (self.blocks, NodeCategory::Block),
            (self.branches, NodeCategory::Branch),
            (self.loops, NodeCategory::Loop),
            (self.catches, NodeCategory::Catch),
            (self.exits, NodeCategory::Exit),
            (self.logical_operators, NodeCategory::LogicalOperator),
            (self.comments, NodeCategory::Comment),
            (self.strings, NodeCategory::StringLiteral),
            (self.numbers, NodeCategory::NumberLiteral),
            (self.identifiers, NodeCategory::Identifier),
        ];

        for (kinds, category) in tables {
            if kinds.contains(&kind) {
                // Operators are anonymous tokens; a named node with the same
                // kind string is something else entirely.
                if category == NodeCategory::LogicalOperator && named {
                    continue;
                }
                return category;
            }
        }

        if !named && !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
            return NodeCategory::Keyword;
        }
        NodeCategory::Other
    }
}

/// Tree-sitter based parser for one language.
pub struct TreeSitterParser {
    spec: &'static LanguageSpec,
    language: Language,
}

impl TreeSitterParser {
    /// Create a new tree-sitter parser for the given language tables.
    pub fn new(spec: &'static LanguageSpec) -> Self {
        Self {
            spec,
            language: (spec.language)(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> Result<TsParser, ParseError> {
        let mut parser = TsParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::new(1, format!("incompatible grammar: {}", e)))?;
        Ok(parser)
    }

    /// Translate the concrete tree bottom-up with a cursor, so that deeply
    /// nested input never grows the call stack.
    fn convert(&self, root: tree_sitter::Node) -> Node {
        let mut cursor = root.walk();
        // Children collected so far for each node still being built.
        let mut open: Vec<Vec<Node>> = Vec::new();

        loop {
            let node = cursor.node();
            let category = self.spec.categorize(node.kind(), node.is_named());

            // Doc-comment markers are children of the comment; keep it a leaf
            if category != NodeCategory::Comment && cursor.goto_first_child() {
                open.push(Vec::new());
                continue;
            }

            let mut done = self.build(node, category, Vec::new());
            loop {
                let Some(siblings) = open.last_mut() else {
                    return done;
                };
                siblings.push(done);
                if cursor.goto_next_sibling() {
                    break;
                }
                cursor.goto_parent();
                let parent = cursor.node();
                let children = open.pop().unwrap_or_default();
                done = self.build(
                    parent,
                    self.spec.categorize(parent.kind(), parent.is_named()),
                    children,
                );
            }
        }
    }

    fn build(&self, node: tree_sitter::Node, category: NodeCategory, mut children: Vec<Node>) -> Node {
        let start = node.start_position();
        let end = node.end_position();
        let span = Span {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_offset: start.column,
            end_line: end.row + 1,
            end_offset: end.column,
        };

        if self.spec.declarations.contains(&node.kind()) {
            if let Some(name) = children
                .iter_mut()
                .find(|c| c.category == NodeCategory::Identifier)
            {
                name.category = NodeCategory::DeclarationName;
            }
        }

        Node {
            kind: node.kind().to_string(),
            category,
            span,
            named: node.is_named(),
            children,
        }
    }
}

/// Locate the first ERROR or MISSING node in source order.
fn first_syntax_error(root: tree_sitter::Node, source: &str) -> Option<ParseError> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            return Some(ParseError::new(
                node.start_position().row + 1,
                format!("missing '{}'", node.kind()),
            ));
        }
        if node.is_error() {
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
            return Some(ParseError::new(
                node.start_position().row + 1,
                format!("unexpected '{}'", snippet.trim()),
            ));
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

impl SourceParser for TreeSitterParser {
    fn language_id(&self) -> &'static str {
        self.spec.id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.spec.extensions
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new(1, "failed to parse source"))?;

        let root = tree.root_node();
        if let Some(err) = first_syntax_error(root, source) {
            return Err(err);
        }

        Ok(SyntaxTree::new(self.convert(root), source))
    }
}
