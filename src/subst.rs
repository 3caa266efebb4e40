// This module provides the per-projection type-substitution tables that map
// abstract type tokens to concrete low-level type names: one table per projection
// (native arena layer, foreign-call layer, backend layer). Tables are explicit,
// injected configuration objects handed to generators at construction time and
// validated for completeness against the catalogue before generation starts, so a
// missing token is reported up front with the offending instruction and argument
// instead of surfacing mid-generation.

//! Per-projection type-substitution tables.

use crate::error::{GenError, GenResult};
use crate::spec::{Argument, Catalogue, Instruction, TypeToken};
use std::collections::BTreeMap;

/// Mapping from type token to the concrete type spelling used by one
/// projection. Lookup keys are the tokens reachable from the catalogue's
/// arguments, including `TypeToken::Value`.
#[derive(Debug, Clone)]
pub struct SubstTable {
    name: &'static str,
    map: BTreeMap<TypeToken, &'static str>,
}

impl SubstTable {
    pub fn new(
        name: &'static str,
        entries: impl IntoIterator<Item = (TypeToken, &'static str)>,
    ) -> Self {
        SubstTable {
            name,
            map: entries.into_iter().collect(),
        }
    }

    /// Table name used in error reports ("native", "capi", "backend").
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn lookup(&self, token: &TypeToken) -> Option<&'static str> {
        self.map.get(token).copied()
    }

    /// Resolve one argument's token, reporting the instruction and
    /// argument on a miss.
    pub fn resolve(&self, inst: &Instruction, arg: &Argument) -> GenResult<&'static str> {
        self.lookup(&arg.token).ok_or_else(|| GenError::UnresolvedToken {
            token: arg.token.to_string(),
            table: self.name,
            instruction: inst.name.to_string(),
            argument: arg.name.to_string(),
        })
    }

    /// Check that every token reachable from the catalogue resolves.
    /// Run before generation so no partial output is ever emitted.
    pub fn validate_for(&self, catalogue: &Catalogue) -> GenResult<()> {
        for inst in catalogue.insts() {
            for arg in &inst.args {
                self.resolve(inst, arg)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Instruction, TypeExpr};

    fn table() -> SubstTable {
        SubstTable::new(
            "capi",
            [
                (TypeToken::Value, "void*"),
                (TypeToken::Scalar("u64"), "uint64_t"),
            ],
        )
    }

    #[test]
    fn test_lookup() {
        let table = table();
        assert_eq!(table.lookup(&TypeToken::Value), Some("void*"));
        assert_eq!(table.lookup(&TypeToken::Scalar("u64")), Some("uint64_t"));
        assert_eq!(table.lookup(&TypeToken::Scalar("type")), None);
    }

    #[test]
    fn test_validate_for_complete_catalogue() {
        let catalogue = Catalogue::new(vec![Instruction::new(
            "AddPtrConst",
            vec![Argument::value("ptr"), Argument::scalar("offset", "u64")],
            TypeExpr::Fixed("Type::Ptr"),
            vec![],
        )]);
        assert!(table().validate_for(&catalogue).is_ok());
    }

    #[test]
    fn test_validate_for_reports_missing_token_with_context() {
        let catalogue = Catalogue::new(vec![Instruction::new(
            "Const",
            vec![
                Argument::scalar("type", "type"),
                Argument::scalar("value", "u64"),
            ],
            TypeExpr::Scalar("type"),
            vec![],
        )]);
        let err = table().validate_for(&catalogue).unwrap_err();
        assert_eq!(
            err,
            GenError::UnresolvedToken {
                token: "type".to_string(),
                table: "capi",
                instruction: "Const".to_string(),
                argument: "type".to_string(),
            }
        );
    }
}
