// This module defines the instruction specification model for tracegen: the
// canonical, backend-agnostic description of every trace-JIT instruction that all
// generation passes project from. TypeToken classifies operands as value
// references (uniform arena-pointer slots) or named scalar kinds; TypeExpr is the
// small formula language for result types and predicate operands; Predicate
// encodes the validity checks that become constructor assertions; Instruction and
// Catalogue carry the ordered instruction set together with the derived naming
// rules (class name, snake-case builder name) and the authoritative
// value-slot count. Catalogue::validate rejects every specification defect
// (duplicate names, symbol collisions, dangling argument references) before any
// generator runs.

//! Trace-JIT instruction catalogue model.
//!
//! The catalogue is built once from static configuration, handed read-only
//! to the pipeline, and never mutated by a generator. Declaration order is
//! significant everywhere: it fixes constructor parameter order, trailing
//! slot layout, and the order of generated dispatch arms.

use crate::error::{GenError, GenResult};
use std::collections::HashMap;
use std::fmt;

/// Opaque, comparable identifier for an argument's type classification.
///
/// Used as the key into the per-projection substitution tables. `Value`
/// marks a reference to another instruction's result; `Scalar` names a
/// fixed-size configuration kind (an integer width, a flag bitset, a
/// block reference).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeToken {
    Value,
    Scalar(&'static str),
}

impl TypeToken {
    pub fn is_value(&self) -> bool {
        matches!(self, TypeToken::Value)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeToken::Value => write!(f, "value"),
            TypeToken::Scalar(kind) => write!(f, "{kind}"),
        }
    }
}

/// Accessor emission policy for one argument.
///
/// `Always` forces the accessor to be emitted verbatim. `Derived` lets the
/// layout generator omit an accessor that would only shadow an
/// identically-valued base accessor (a scalar argument that is itself the
/// declared result type). The policy never affects slot counting or
/// marshalling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetterPolicy {
    Derived,
    Always,
}

/// One formal parameter of an instruction.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: &'static str,
    pub token: TypeToken,
    pub getter: GetterPolicy,
}

impl Argument {
    /// A value-reference operand stored in a trailing slot.
    pub fn value(name: &'static str) -> Self {
        Argument {
            name,
            token: TypeToken::Value,
            getter: GetterPolicy::Derived,
        }
    }

    /// A value-reference operand whose accessor is always emitted.
    pub fn value_always(name: &'static str) -> Self {
        Argument {
            name,
            token: TypeToken::Value,
            getter: GetterPolicy::Always,
        }
    }

    /// A scalar operand of the named kind, stored as a plain field.
    pub fn scalar(name: &'static str, kind: &'static str) -> Self {
        Argument {
            name,
            token: TypeToken::Scalar(kind),
            getter: GetterPolicy::Derived,
        }
    }

    pub fn is_value(&self) -> bool {
        self.token.is_value()
    }
}

/// Formula over an instruction's own fields yielding a type.
///
/// `Fixed` is a literal type constant in the generated language,
/// `OfArg` is the result type of a value argument, and `Scalar` reads a
/// scalar argument that itself carries a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Fixed(&'static str),
    OfArg(&'static str),
    Scalar(&'static str),
}

impl TypeExpr {
    /// Emit as an expression over constructor parameters, validating that
    /// any referenced argument exists and has the right classification.
    pub fn emit(&self, inst: &Instruction) -> GenResult<String> {
        match self {
            TypeExpr::Fixed(lit) => Ok((*lit).to_string()),
            TypeExpr::OfArg(name) => {
                let arg = inst.arg(name)?;
                if !arg.is_value() {
                    return Err(GenError::NotAValue {
                        instruction: inst.name.to_string(),
                        argument: (*name).to_string(),
                    });
                }
                Ok(format!("{name}->type()"))
            }
            TypeExpr::Scalar(name) => {
                let arg = inst.arg(name)?;
                if arg.is_value() {
                    return Err(GenError::NotAScalar {
                        instruction: inst.name.to_string(),
                        argument: (*name).to_string(),
                    });
                }
                Ok((*name).to_string())
            }
        }
    }
}

/// One validity predicate, emitted as a single constructor assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(TypeExpr, TypeExpr),
    IsInt(TypeExpr),
    IsIntOrBool(TypeExpr),
}

impl Predicate {
    pub fn emit(&self, inst: &Instruction) -> GenResult<String> {
        match self {
            Predicate::Eq(a, b) => Ok(format!("{} == {}", a.emit(inst)?, b.emit(inst)?)),
            Predicate::IsInt(a) => Ok(format!("is_int({})", a.emit(inst)?)),
            Predicate::IsIntOrBool(a) => Ok(format!("is_int_or_bool({})", a.emit(inst)?)),
        }
    }
}

/// One variant of the instruction set.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub name: &'static str,
    pub args: Vec<Argument>,
    pub result: TypeExpr,
    pub predicates: Vec<Predicate>,
    /// Base class override; `None` uses the catalogue-wide default.
    pub base: Option<&'static str>,
}

impl Instruction {
    pub fn new(
        name: &'static str,
        args: Vec<Argument>,
        result: TypeExpr,
        predicates: Vec<Predicate>,
    ) -> Self {
        Instruction {
            name,
            args,
            result,
            predicates,
            base: None,
        }
    }

    pub fn with_base(mut self, base: &'static str) -> Self {
        self.base = Some(base);
        self
    }

    /// Generated class name, e.g. `AddPtrInst`.
    pub fn class_name(&self) -> String {
        format!("{}Inst", self.name)
    }

    /// Canonical snake-case spelling, e.g. `add_ptr`.
    pub fn snake_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 4);
        for (i, ch) in self.name.chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if i != 0 {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Builder method name, e.g. `build_add_ptr`. The foreign-call symbol
    /// is derived from this, so it must be unique across the catalogue.
    pub fn builder_name(&self) -> String {
        format!("build_{}", self.snake_name())
    }

    /// Number of trailing value-reference slots. This is the single
    /// authoritative count; every generator derives slot and operand
    /// numbers from it rather than recomputing classification.
    pub fn value_slots(&self) -> usize {
        self.args.iter().filter(|a| a.is_value()).count()
    }

    pub fn value_args(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| a.is_value())
    }

    pub fn scalar_args(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| !a.is_value())
    }

    /// Name of the scalar argument the result type reads, if any.
    pub fn result_scalar(&self) -> Option<&'static str> {
        match self.result {
            TypeExpr::Scalar(name) => Some(name),
            _ => None,
        }
    }

    fn arg(&self, name: &str) -> GenResult<&Argument> {
        self.args
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| GenError::UnknownArgument {
                instruction: self.name.to_string(),
                argument: name.to_string(),
            })
    }

    fn validate(&self) -> GenResult<()> {
        for (i, arg) in self.args.iter().enumerate() {
            if self.args[..i].iter().any(|a| a.name == arg.name) {
                return Err(GenError::DuplicateArgument {
                    instruction: self.name.to_string(),
                    argument: arg.name.to_string(),
                });
            }
        }
        self.result.emit(self)?;
        for pred in &self.predicates {
            pred.emit(self)?;
        }
        Ok(())
    }
}

/// The full ordered instruction set.
///
/// Declaration order becomes storage layout order, constructor parameter
/// order, and dispatch arm order; no generator may reorder it.
#[derive(Debug, Clone)]
pub struct Catalogue {
    insts: Vec<Instruction>,
    inst_base: &'static str,
}

impl Catalogue {
    pub fn new(insts: Vec<Instruction>) -> Self {
        Catalogue {
            insts,
            inst_base: "Inst",
        }
    }

    /// Override the catalogue-wide default base class.
    pub fn with_base(mut self, inst_base: &'static str) -> Self {
        self.inst_base = inst_base;
        self
    }

    pub fn insts(&self) -> &[Instruction] {
        &self.insts
    }

    /// Base class of one instruction, honoring its override.
    pub fn base_of(&self, inst: &Instruction) -> &'static str {
        inst.base.unwrap_or(self.inst_base)
    }

    /// Reject every specification defect before generation starts.
    pub fn validate(&self) -> GenResult<()> {
        let mut symbols: HashMap<String, &'static str> = HashMap::new();
        for inst in &self.insts {
            if let Some(&first) = symbols.get(&inst.builder_name()) {
                if first == inst.name {
                    return Err(GenError::DuplicateInstruction {
                        name: inst.name.to_string(),
                    });
                }
                return Err(GenError::SymbolCollision {
                    first: first.to_string(),
                    second: inst.name.to_string(),
                    symbol: inst.builder_name(),
                });
            }
            symbols.insert(inst.builder_name(), inst.name);
            inst.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_name() {
        let cases = [
            ("Add", "add"),
            ("AddPtrConst", "add_ptr_const"),
            ("ResizeU", "resize_u"),
            ("ModS", "mod_s"),
            ("LtU", "lt_u"),
            ("Exit", "exit"),
        ];
        for (name, expected) in cases {
            let inst = Instruction::new(name, vec![], TypeExpr::Fixed("Type::Void"), vec![]);
            assert_eq!(inst.snake_name(), expected);
            assert_eq!(inst.builder_name(), format!("build_{expected}"));
        }
    }

    #[test]
    fn test_class_name() {
        let inst = Instruction::new("AddPtr", vec![], TypeExpr::Fixed("Type::Ptr"), vec![]);
        assert_eq!(inst.class_name(), "AddPtrInst");
    }

    #[test]
    fn test_value_slot_counting() {
        let none = Instruction::new("Exit", vec![], TypeExpr::Fixed("Type::Void"), vec![]);
        assert_eq!(none.value_slots(), 0);

        let one = Instruction::new(
            "Freeze",
            vec![Argument::value("a")],
            TypeExpr::OfArg("a"),
            vec![],
        );
        assert_eq!(one.value_slots(), 1);

        let mixed = Instruction::new(
            "Load",
            vec![
                Argument::value_always("ptr"),
                Argument::scalar("type", "type"),
                Argument::scalar("offset", "u64"),
            ],
            TypeExpr::Scalar("type"),
            vec![],
        );
        assert_eq!(mixed.value_slots(), 1);

        let three = Instruction::new(
            "Select",
            vec![
                Argument::value_always("cond"),
                Argument::value("a"),
                Argument::value("b"),
            ],
            TypeExpr::OfArg("a"),
            vec![],
        );
        assert_eq!(three.value_slots(), 3);
    }

    #[test]
    fn test_always_getter_still_counts_as_slot() {
        // A value argument marked Always must count toward the slot
        // computation exactly like a derived one.
        let inst = Instruction::new(
            "Store",
            vec![Argument::value_always("ptr"), Argument::value("value")],
            TypeExpr::Fixed("Type::Void"),
            vec![],
        );
        assert_eq!(inst.value_slots(), 2);
    }

    #[test]
    fn test_type_expr_emission() {
        let inst = Instruction::new(
            "ResizeU",
            vec![Argument::value("a"), Argument::scalar("type", "type")],
            TypeExpr::Scalar("type"),
            vec![],
        );
        assert_eq!(TypeExpr::OfArg("a").emit(&inst).unwrap(), "a->type()");
        assert_eq!(TypeExpr::Scalar("type").emit(&inst).unwrap(), "type");
        assert_eq!(
            TypeExpr::Fixed("Type::Bool").emit(&inst).unwrap(),
            "Type::Bool"
        );
    }

    #[test]
    fn test_type_expr_rejects_unknown_argument() {
        let inst = Instruction::new(
            "Freeze",
            vec![Argument::value("a")],
            TypeExpr::OfArg("a"),
            vec![],
        );
        let err = TypeExpr::OfArg("missing").emit(&inst).unwrap_err();
        assert_eq!(
            err,
            GenError::UnknownArgument {
                instruction: "Freeze".to_string(),
                argument: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_type_expr_rejects_wrong_classification() {
        let inst = Instruction::new(
            "Const",
            vec![
                Argument::scalar("type", "type"),
                Argument::scalar("value", "u64"),
            ],
            TypeExpr::Scalar("type"),
            vec![],
        );
        assert!(matches!(
            TypeExpr::OfArg("value").emit(&inst),
            Err(GenError::NotAValue { .. })
        ));

        let inst = Instruction::new(
            "Freeze",
            vec![Argument::value("a")],
            TypeExpr::OfArg("a"),
            vec![],
        );
        assert!(matches!(
            TypeExpr::Scalar("a").emit(&inst),
            Err(GenError::NotAScalar { .. })
        ));
    }

    #[test]
    fn test_predicate_emission() {
        let inst = Instruction::new(
            "Add",
            vec![Argument::value("a"), Argument::value("b")],
            TypeExpr::OfArg("a"),
            vec![],
        );
        let eq = Predicate::Eq(TypeExpr::OfArg("a"), TypeExpr::OfArg("b"));
        assert_eq!(eq.emit(&inst).unwrap(), "a->type() == b->type()");

        let is_int = Predicate::IsInt(TypeExpr::OfArg("a"));
        assert_eq!(is_int.emit(&inst).unwrap(), "is_int(a->type())");

        let int_or_bool = Predicate::IsIntOrBool(TypeExpr::OfArg("b"));
        assert_eq!(int_or_bool.emit(&inst).unwrap(), "is_int_or_bool(b->type())");
    }

    #[test]
    fn test_catalogue_rejects_duplicate_instruction() {
        let catalogue = Catalogue::new(vec![
            Instruction::new("Add", vec![], TypeExpr::Fixed("Type::Void"), vec![]),
            Instruction::new("Add", vec![], TypeExpr::Fixed("Type::Void"), vec![]),
        ]);
        assert_eq!(
            catalogue.validate().unwrap_err(),
            GenError::DuplicateInstruction {
                name: "Add".to_string()
            }
        );
    }

    #[test]
    fn test_catalogue_rejects_symbol_collision() {
        // Distinct canonical names that snake-case to the same builder
        // symbol must be caught before generation.
        let catalogue = Catalogue::new(vec![
            Instruction::new("AddPtr", vec![], TypeExpr::Fixed("Type::Ptr"), vec![]),
            Instruction::new("addPtr", vec![], TypeExpr::Fixed("Type::Ptr"), vec![]),
        ]);
        assert_eq!(
            catalogue.validate().unwrap_err(),
            GenError::SymbolCollision {
                first: "AddPtr".to_string(),
                second: "addPtr".to_string(),
                symbol: "build_add_ptr".to_string(),
            }
        );
    }

    #[test]
    fn test_catalogue_rejects_duplicate_argument() {
        let catalogue = Catalogue::new(vec![Instruction::new(
            "Add",
            vec![Argument::value("a"), Argument::value("a")],
            TypeExpr::OfArg("a"),
            vec![],
        )]);
        assert!(matches!(
            catalogue.validate(),
            Err(GenError::DuplicateArgument { .. })
        ));
    }

    #[test]
    fn test_catalogue_rejects_dangling_predicate() {
        let catalogue = Catalogue::new(vec![Instruction::new(
            "Add",
            vec![Argument::value("a"), Argument::value("b")],
            TypeExpr::OfArg("a"),
            vec![Predicate::Eq(TypeExpr::OfArg("a"), TypeExpr::OfArg("c"))],
        )]);
        assert!(matches!(
            catalogue.validate(),
            Err(GenError::UnknownArgument { .. })
        ));
    }

    #[test]
    fn test_base_override() {
        let plain = Instruction::new("Add", vec![], TypeExpr::Fixed("Type::Void"), vec![]);
        let guarded = Instruction::new("Guard", vec![], TypeExpr::Fixed("Type::Void"), vec![])
            .with_base("GuardInst");
        let catalogue = Catalogue::new(vec![plain, guarded]);
        assert_eq!(catalogue.base_of(&catalogue.insts()[0]), "Inst");
        assert_eq!(catalogue.base_of(&catalogue.insts()[1]), "GuardInst");
    }
}
