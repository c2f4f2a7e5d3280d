//! Language-neutral syntax tree handed to checks.
//!
//! Grammar adapters translate their concrete trees into this shape and tag
//! every node with a [`NodeCategory`], so rules and visitors can be written
//! once and run against any supported language.

use std::fmt;

/// Source location span with byte offsets and line/offset positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start offset within the start line (0-indexed, bytes).
    pub start_offset: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End offset within the end line (0-indexed, exclusive).
    pub end_offset: usize,
}

impl Span {
    /// Create a span covering `start_offset..end_offset` of a single line.
    pub fn on_line(line: usize, start_offset: usize, end_offset: usize, start_byte: usize) -> Self {
        Self {
            start_byte,
            end_byte: start_byte + (end_offset - start_offset),
            start_line: line,
            start_offset,
            end_line: line,
            end_offset,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        let (start, end) = (
            if (self.start_line, self.start_offset) <= (other.start_line, other.start_offset) {
                self
            } else {
                other
            },
            if (self.end_line, self.end_offset) >= (other.end_line, other.end_offset) {
                self
            } else {
                other
            },
        );
        Span {
            start_byte: start.start_byte,
            end_byte: end.end_byte,
            start_line: start.start_line,
            start_offset: start.start_offset,
            end_line: end.end_line,
            end_offset: end.end_offset,
        }
    }

    /// Number of lines the span touches.
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_offset)
    }
}

/// Coarse role of a node, assigned by the grammar adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeCategory {
    /// Function, method, closure or lambda.
    Function,
    /// Statement list (`{ ... }`, indented suite).
    Block,
    /// Conditional branch: if / else-if / case arm / ternary.
    Branch,
    /// for / while / loop.
    Loop,
    /// catch / except / rescue clause.
    Catch,
    /// `&&`, `||`, `and`, `or`.
    LogicalOperator,
    /// return / break / continue / throw / raise.
    Exit,
    Comment,
    StringLiteral,
    NumberLiteral,
    Keyword,
    Identifier,
    /// Name being introduced by a declaration (function name, binding).
    DeclarationName,
    #[default]
    Other,
}

impl NodeCategory {
    /// Whether this node counts as a decision point for cyclomatic complexity.
    pub fn is_decision_point(&self) -> bool {
        matches!(
            self,
            NodeCategory::Branch
                | NodeCategory::Loop
                | NodeCategory::Catch
                | NodeCategory::LogicalOperator
        )
    }

    /// Whether this node increases structural nesting.
    pub fn is_nesting(&self) -> bool {
        matches!(
            self,
            NodeCategory::Branch | NodeCategory::Loop | NodeCategory::Catch
        )
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Grammar-specific node kind (e.g. `if_statement`).
    pub kind: String,
    pub category: NodeCategory,
    pub span: Span,
    /// False for anonymous tokens such as punctuation.
    pub named: bool,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a named leaf node.
    pub fn new(kind: impl Into<String>, category: NodeCategory, span: Span) -> Self {
        Self {
            kind: kind.into(),
            category,
            span,
            named: true,
            children: Vec::new(),
        }
    }

    /// Attach children. The span is not recomputed.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Mark the node as an anonymous token.
    pub fn anonymous(mut self) -> Self {
        self.named = false;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Named children only.
    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|c| c.named)
    }

    /// Pre-order traversal of this node and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Flatten first so dropping a deep tree does not recurse.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed source file: the root node plus the text it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: Node,
    source: String,
}

impl SyntaxTree {
    pub fn new(root: Node, source: impl Into<String>) -> Self {
        Self {
            root,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text covered by a node. Empty when the span does not fall on
    /// character boundaries of the source.
    pub fn text(&self, node: &Node) -> &str {
        self.source
            .get(node.span.start_byte..node.span.end_byte)
            .unwrap_or("")
    }

    /// Number of lines in the source (a trailing newline does not open a new line).
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    /// Highest line number a location may refer to. A trailing newline
    /// opens one more, empty, line.
    pub fn last_line(&self) -> usize {
        self.source.split('\n').count()
    }

    /// Pre-order traversal over the whole tree.
    pub fn walk(&self) -> Descendants<'_> {
        self.root.descendants()
    }

    /// All nodes of the given category, in source order.
    pub fn nodes_of(&self, category: NodeCategory) -> impl Iterator<Item = &Node> {
        self.walk().filter(move |n| n.category == category)
    }
}
