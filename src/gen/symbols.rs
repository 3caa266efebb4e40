// This module implements the symbol registration pass: one map_symbol statement
// per instruction binding the foreign-call bridge's stub symbol into the
// backend's resolvable-symbol table, so a dynamically assembled execution unit
// can patch calls to the stubs at link time. The names come from the same
// stub_symbol rule the bridge generator uses, so the two sets cannot diverge.

//! Symbol registration generator.
//!
//! Fragment: `symbol_map`.

use crate::error::GenResult;
use crate::gen::{stub_symbol, Fragments, Generator};
use crate::spec::Catalogue;

pub struct SymbolsGen {
    prefix: &'static str,
}

impl SymbolsGen {
    pub fn new(prefix: &'static str) -> Self {
        SymbolsGen { prefix }
    }
}

impl Generator for SymbolsGen {
    fn name(&self) -> &'static str {
        "symbols"
    }

    fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments> {
        let lines: Vec<String> = catalogue
            .insts()
            .iter()
            .map(|inst| format!("    map_symbol({})", stub_symbol(self.prefix, inst)))
            .collect();
        let mut fragments = Fragments::new();
        fragments.insert("symbol_map".to_string(), lines.join("\n"));
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Instruction, TypeExpr};

    #[test]
    fn test_one_registration_per_instruction() {
        let catalogue = Catalogue::new(vec![
            Instruction::new("Add", vec![], TypeExpr::Fixed("Type::Void"), vec![]),
            Instruction::new("AddPtr", vec![], TypeExpr::Fixed("Type::Ptr"), vec![]),
        ]);
        let fragments = SymbolsGen::new("trace").run(&catalogue).unwrap();
        let map = &fragments["symbol_map"];
        assert_eq!(map.matches("map_symbol(").count(), 2);
        assert!(map.contains("map_symbol(trace_build_add)"));
        assert!(map.contains("map_symbol(trace_build_add_ptr)"));
    }
}
