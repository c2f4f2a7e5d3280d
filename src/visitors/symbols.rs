//! Symbol table: declarations and the identifiers that refer to them.
//!
//! Resolution is by name within the file. A reference binds to the closest
//! preceding declaration of that name, or to the first one when it precedes
//! them all.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::{AnalysisContext, NodeCategory};
use crate::pipeline::ReportSink;

use super::{AuxiliaryVisitor, TextRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub declaration: TextRange,
    pub references: Vec<TextRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    pub symbols: Vec<Symbol>,
}

pub struct SymbolHighlighter;

impl SymbolHighlighter {
    pub fn symbol_table(ctx: &AnalysisContext) -> SymbolTable {
        let mut symbols: Vec<Symbol> = Vec::new();
        // name -> (declaration byte, index into symbols), in source order
        let mut by_name: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();

        for node in ctx.tree().nodes_of(NodeCategory::DeclarationName) {
            let name = ctx.text(node);
            by_name
                .entry(name)
                .or_default()
                .push((node.span.start_byte, symbols.len()));
            symbols.push(Symbol {
                name: name.to_string(),
                declaration: TextRange::from(&node.span),
                references: Vec::new(),
            });
        }

        for node in ctx.tree().nodes_of(NodeCategory::Identifier) {
            let Some(candidates) = by_name.get(ctx.text(node)) else {
                continue;
            };
            let at = node.span.start_byte;
            let target = candidates
                .iter()
                .rev()
                .find(|(byte, _)| *byte <= at)
                .or_else(|| candidates.first());
            if let Some(&(_, idx)) = target {
                symbols[idx].references.push(TextRange::from(&node.span));
            }
        }

        SymbolTable { symbols }
    }
}

impl AuxiliaryVisitor for SymbolHighlighter {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        let table = Self::symbol_table(ctx);
        if !table.symbols.is_empty() {
            sink.save_symbol_table(ctx.file(), table);
        }
        Ok(())
    }
}
