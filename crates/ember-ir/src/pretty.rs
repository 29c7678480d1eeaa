//! Pretty printing for the IR.
//!
//! Each operation is annotated with its memory effects as declared in the
//! registry, which makes dumps useful when checking a dialect's
//! declarations:
//!
//! ```text
//! %2 = mem.load %0  // read(%0) @ <Default>
//! scf.for %0, %1 {  // recursive
//! func.call @callee  // unknown effects
//! ```

use std::fmt::Write;

use crate::ir::{Block, Function, Op, Region};
use ember_effects::{EffectOpInterface, EffectRegistry, MemoryEffect};

/// Pretty print a function with memory-effect annotations
pub fn pretty_print_function(func: &Function, registry: &EffectRegistry) -> String {
    let mut out = String::new();
    let mut printer = PrettyPrinter::new(&mut out, registry);
    printer.print_function(func);
    out
}

/// Pretty print a single operation and everything nested in it
pub fn pretty_print_op(op: &Op, registry: &EffectRegistry) -> String {
    let mut out = String::new();
    let mut printer = PrettyPrinter::new(&mut out, registry);
    printer.print_op(op);
    out
}

struct PrettyPrinter<'a> {
    out: &'a mut String,
    registry: &'a EffectRegistry,
    indent: usize,
}

impl<'a> PrettyPrinter<'a> {
    fn new(out: &'a mut String, registry: &'a EffectRegistry) -> Self {
        Self {
            out,
            registry,
            indent: 0,
        }
    }

    fn indent(&mut self) {
        self.indent += 2;
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(2);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push(' ');
        }
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn print_function(&mut self, func: &Function) {
        let params: Vec<String> = func.params.iter().map(|p| p.to_string()).collect();
        self.writeln(&format!("func @{}({}) {{", func.name, params.join(", ")));
        self.print_region(&func.body);
        self.writeln("}");
    }

    fn print_region(&mut self, region: &Region) {
        self.indent();
        let labelled = region.blocks.len() > 1;
        for (index, block) in region.blocks.iter().enumerate() {
            self.print_block(index, block, labelled);
        }
        self.dedent();
    }

    fn print_block(&mut self, index: usize, block: &Block, labelled: bool) {
        if labelled || !block.args.is_empty() {
            let args: Vec<String> = block.args.iter().map(|a| a.to_string()).collect();
            if args.is_empty() {
                self.writeln(&format!("^bb{}:", index));
            } else {
                self.writeln(&format!("^bb{}({}):", index, args.join(", ")));
            }
        }
        for op in &block.ops {
            self.print_op(op);
        }
    }

    fn print_op(&mut self, op: &Op) {
        let mut line = String::new();
        if !op.results().is_empty() {
            let results: Vec<String> = op.results().iter().map(|r| r.to_string()).collect();
            let _ = write!(line, "{} = ", results.join(", "));
        }
        line.push_str(op.name());
        if !op.operands().is_empty() {
            let operands: Vec<String> = op.operands().iter().map(|o| o.to_string()).collect();
            let _ = write!(line, " {}", operands.join(", "));
        }
        if let Some(symbol) = op.symbol() {
            let _ = write!(line, " {}", symbol);
        }
        if !op.regions().is_empty() {
            line.push_str(" {");
        }
        if let Some(annotation) = self.annotation(op) {
            let _ = write!(line, "  // {}", annotation);
        }
        self.writeln(&line);

        for (index, region) in op.regions().iter().enumerate() {
            if index > 0 {
                self.writeln("} {");
            }
            self.print_region(region);
        }
        if !op.regions().is_empty() {
            self.writeln("}");
        }
    }

    /// The memory-effect comment for `op`, or `None` if it has no effects.
    ///
    /// Declared effects come first; `recursive` is appended when the op
    /// also carries the marker.
    fn annotation(&self, op: &Op) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        let recursive = self.registry.has_recursive_effects::<MemoryEffect>(op);
        match self.registry.interface::<MemoryEffect>(op) {
            Some(interface) => parts.extend(interface.effects().iter().map(|e| e.to_string())),
            None if recursive => {}
            None => return Some("unknown effects".to_string()),
        }
        if recursive {
            parts.push("recursive".to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
