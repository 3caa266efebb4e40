// This module is the hub for the generation passes that project the instruction
// catalogue into named text fragments. It defines the Generator trait every pass
// implements (a pre-flight check plus a run that returns fragments), the
// Fragments map type (BTreeMap so output is deterministic regardless of insertion
// order), and the shared stub-symbol naming rule used by the foreign-call bridge,
// the backend replay layer, and the symbol registrar, which therefore cannot
// diverge between them.

//! Generation passes and their shared contracts.

pub mod capi;
pub mod layout;
pub mod replay;
pub mod symbols;

use crate::error::GenResult;
use crate::spec::{Catalogue, Instruction};
use std::collections::BTreeMap;

/// Named fragment output of one generator run.
pub type Fragments = BTreeMap<String, String>;

/// One generation pass over the catalogue.
///
/// Generators never communicate with each other: all sharing happens
/// through the read-only catalogue and the configuration bound at
/// construction time.
pub trait Generator {
    /// Name used for logging and fragment collision reports.
    fn name(&self) -> &'static str;

    /// Pre-flight validation run by the pipeline before any generator
    /// emits text; substitution-table completeness is checked here.
    fn check(&self, _catalogue: &Catalogue) -> GenResult<()> {
        Ok(())
    }

    /// Project the catalogue into named fragments.
    fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments>;
}

/// Foreign-call stub symbol for one instruction: `{prefix}_{builder_name}`.
///
/// The single naming rule shared by the bridge stubs, the backend callable
/// table, and the symbol registrar.
pub fn stub_symbol(prefix: &str, inst: &Instruction) -> String {
    format!("{prefix}_{}", inst.builder_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Instruction, TypeExpr};

    #[test]
    fn test_stub_symbol() {
        let inst = Instruction::new("AddPtrConst", vec![], TypeExpr::Fixed("Type::Ptr"), vec![]);
        assert_eq!(stub_symbol("trace", &inst), "trace_build_add_ptr_const");
    }
}
