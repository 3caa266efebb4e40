// This module is configuration, not generator logic: the shipped trace IR
// instruction catalogue (constants, inputs/outputs, memory, arithmetic,
// comparisons, control flow) together with the three substitution tables that
// project its type tokens into the native arena layer, the extern "C" wire
// layer, and the LLVM backend layer, plus the two ready-made pipelines the CLI
// driver runs against the shipped templates.

//! The trace IR instruction catalogue and its projections.

use crate::gen::capi::CapiGen;
use crate::gen::layout::LayoutGen;
use crate::gen::replay::ReplayGen;
use crate::gen::symbols::SymbolsGen;
use crate::pipeline::Pipeline;
use crate::spec::{Argument, Catalogue, Instruction, Predicate, TypeExpr, TypeToken};
use crate::subst::SubstTable;

/// Prefix shared by the bridge stubs and the symbol registrations.
pub const PREFIX: &str = "trace";

/// Two-operand arithmetic: both operands share a type, result follows it.
fn binop(name: &'static str, extra: Predicate) -> Instruction {
    Instruction::new(
        name,
        vec![Argument::value("a"), Argument::value("b")],
        TypeExpr::OfArg("a"),
        vec![
            Predicate::Eq(TypeExpr::OfArg("a"), TypeExpr::OfArg("b")),
            extra,
        ],
    )
}

/// Two-operand comparison producing a Bool.
fn cmp(name: &'static str, extra: Option<Predicate>) -> Instruction {
    let mut predicates = vec![Predicate::Eq(TypeExpr::OfArg("a"), TypeExpr::OfArg("b"))];
    predicates.extend(extra);
    Instruction::new(
        name,
        vec![Argument::value("a"), Argument::value("b")],
        TypeExpr::Fixed("Type::Bool"),
        predicates,
    )
}

/// The full trace IR instruction set, in dispatch order.
pub fn catalogue() -> Catalogue {
    let is_int = |name| Predicate::IsInt(TypeExpr::OfArg(name));
    let int_or_bool = |name| Predicate::IsIntOrBool(TypeExpr::OfArg(name));

    Catalogue::new(vec![
        Instruction::new(
            "Const",
            vec![
                Argument::scalar("type", "type"),
                Argument::scalar("value", "u64"),
            ],
            TypeExpr::Scalar("type"),
            vec![],
        ),
        Instruction::new(
            "Freeze",
            vec![Argument::value("a")],
            TypeExpr::OfArg("a"),
            vec![],
        ),
        Instruction::new(
            "Input",
            vec![
                Argument::scalar("id", "size"),
                Argument::scalar("type", "type"),
                Argument::scalar("flags", "input_flags"),
            ],
            TypeExpr::Scalar("type"),
            vec![],
        ),
        Instruction::new(
            "Output",
            vec![Argument::value("value"), Argument::scalar("id", "size")],
            TypeExpr::Fixed("Type::Void"),
            vec![],
        ),
        Instruction::new(
            "Select",
            vec![
                Argument::value_always("cond"),
                Argument::value("a"),
                Argument::value("b"),
            ],
            TypeExpr::OfArg("a"),
            vec![
                Predicate::Eq(TypeExpr::OfArg("cond"), TypeExpr::Fixed("Type::Bool")),
                Predicate::Eq(TypeExpr::OfArg("a"), TypeExpr::OfArg("b")),
            ],
        ),
        Instruction::new(
            "ResizeU",
            vec![Argument::value("a"), Argument::scalar("type", "type")],
            TypeExpr::Scalar("type"),
            vec![
                Predicate::IsIntOrBool(TypeExpr::OfArg("a")),
                Predicate::IsIntOrBool(TypeExpr::Scalar("type")),
            ],
        ),
        Instruction::new(
            "Load",
            vec![
                Argument::value_always("ptr"),
                Argument::scalar("type", "type"),
                Argument::scalar("flags", "load_flags"),
                Argument::scalar("aliasing", "aliasing"),
                Argument::scalar("offset", "u64"),
            ],
            TypeExpr::Scalar("type"),
            vec![Predicate::Eq(
                TypeExpr::OfArg("ptr"),
                TypeExpr::Fixed("Type::Ptr"),
            )],
        ),
        Instruction::new(
            "Store",
            vec![
                Argument::value_always("ptr"),
                Argument::value_always("value"),
                Argument::scalar("aliasing", "aliasing"),
                Argument::scalar("offset", "u64"),
            ],
            TypeExpr::Fixed("Type::Void"),
            vec![Predicate::Eq(
                TypeExpr::OfArg("ptr"),
                TypeExpr::Fixed("Type::Ptr"),
            )],
        ),
        Instruction::new(
            "AddPtr",
            vec![
                Argument::value_always("ptr"),
                Argument::value_always("offset"),
            ],
            TypeExpr::Fixed("Type::Ptr"),
            vec![
                Predicate::Eq(TypeExpr::OfArg("ptr"), TypeExpr::Fixed("Type::Ptr")),
                Predicate::Eq(TypeExpr::OfArg("offset"), TypeExpr::Fixed("Type::Int64")),
            ],
        ),
        Instruction::new(
            "AddPtrConst",
            vec![
                Argument::value_always("ptr"),
                Argument::scalar("offset", "u64"),
            ],
            TypeExpr::Fixed("Type::Ptr"),
            vec![Predicate::Eq(
                TypeExpr::OfArg("ptr"),
                TypeExpr::Fixed("Type::Ptr"),
            )],
        ),
        binop("Add", is_int("a")),
        binop("Sub", is_int("a")),
        binop("Mul", is_int("a")),
        binop("ModS", is_int("a")),
        binop("ModU", is_int("a")),
        binop("And", int_or_bool("a")),
        binop("Or", int_or_bool("a")),
        binop("Xor", int_or_bool("a")),
        binop("ShrU", is_int("a")),
        binop("ShrS", is_int("a")),
        binop("Shl", is_int("a")),
        cmp("Eq", None),
        cmp("LtU", Some(is_int("a"))),
        cmp("LtS", Some(is_int("a"))),
        Instruction::new(
            "Branch",
            vec![
                Argument::value_always("cond"),
                Argument::scalar("true_block", "block"),
                Argument::scalar("false_block", "block"),
            ],
            TypeExpr::Fixed("Type::Void"),
            vec![Predicate::Eq(
                TypeExpr::OfArg("cond"),
                TypeExpr::Fixed("Type::Bool"),
            )],
        ),
        Instruction::new(
            "Jump",
            vec![Argument::scalar("block", "block")],
            TypeExpr::Fixed("Type::Void"),
            vec![],
        ),
        Instruction::new("Exit", vec![], TypeExpr::Fixed("Type::Void"), vec![]),
    ])
}

/// Native arena-layer type spellings.
pub fn native_substitutions() -> SubstTable {
    SubstTable::new(
        "native",
        [
            (TypeToken::Value, "Value*"),
            (TypeToken::Scalar("size"), "size_t"),
            (TypeToken::Scalar("u64"), "uint64_t"),
            (TypeToken::Scalar("type"), "Type"),
            (TypeToken::Scalar("load_flags"), "LoadFlags"),
            (TypeToken::Scalar("input_flags"), "InputFlags"),
            (TypeToken::Scalar("block"), "Block*"),
            (TypeToken::Scalar("aliasing"), "AliasingGroup"),
        ],
    )
}

/// Foreign-call wire spellings; value references are opaque pointers.
pub fn capi_substitutions() -> SubstTable {
    SubstTable::new(
        "capi",
        [
            (TypeToken::Value, "void*"),
            (TypeToken::Scalar("size"), "uint64_t"),
            (TypeToken::Scalar("u64"), "uint64_t"),
            (TypeToken::Scalar("type"), "uint32_t"),
            (TypeToken::Scalar("load_flags"), "uint32_t"),
            (TypeToken::Scalar("input_flags"), "uint32_t"),
            (TypeToken::Scalar("block"), "void*"),
            (TypeToken::Scalar("aliasing"), "uint32_t"),
        ],
    )
}

/// LLVM backend spellings consumed by the replay layer.
pub fn backend_substitutions() -> SubstTable {
    SubstTable::new(
        "backend",
        [
            (TypeToken::Value, "llvm::PointerType::get(context, 0)"),
            (TypeToken::Scalar("size"), "llvm::Type::getInt64Ty(context)"),
            (TypeToken::Scalar("u64"), "llvm::Type::getInt64Ty(context)"),
            (TypeToken::Scalar("type"), "llvm::Type::getInt32Ty(context)"),
            (
                TypeToken::Scalar("load_flags"),
                "llvm::Type::getInt32Ty(context)",
            ),
            (
                TypeToken::Scalar("input_flags"),
                "llvm::Type::getInt32Ty(context)",
            ),
            // Block references cross the bridge as integer handles so the
            // replay constants are well-formed.
            (TypeToken::Scalar("block"), "llvm::Type::getInt64Ty(context)"),
            (
                TypeToken::Scalar("aliasing"),
                "llvm::Type::getInt32Ty(context)",
            ),
        ],
    )
}

/// Pipeline for the arena/bridge header (`trace_ir.hpp`).
pub fn frontend_pipeline() -> Pipeline {
    Pipeline::new(vec![
        Box::new(LayoutGen::new(native_substitutions())),
        Box::new(CapiGen::new(
            PREFIX,
            "Builder",
            capi_substitutions(),
            native_substitutions(),
        )),
    ])
}

/// Pipeline for the backend replay header (`trace_ir_backend.hpp`).
pub fn backend_pipeline() -> Pipeline {
    Pipeline::new(vec![
        Box::new(ReplayGen::new(PREFIX, "TraceApi", backend_substitutions())),
        Box::new(SymbolsGen::new(PREFIX)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_valid() {
        catalogue().validate().unwrap();
    }

    #[test]
    fn test_catalogue_shape() {
        let catalogue = catalogue();
        assert_eq!(catalogue.insts().len(), 27);
        // Declaration order is the dispatch order; spot-check the ends.
        assert_eq!(catalogue.insts()[0].name, "Const");
        assert_eq!(catalogue.insts()[26].name, "Exit");
    }

    #[test]
    fn test_tables_cover_every_token() {
        let catalogue = catalogue();
        native_substitutions().validate_for(&catalogue).unwrap();
        capi_substitutions().validate_for(&catalogue).unwrap();
        backend_substitutions().validate_for(&catalogue).unwrap();
    }

    #[test]
    fn test_both_pipelines_run() {
        let catalogue = catalogue();
        let frontend = frontend_pipeline().run(&catalogue).unwrap();
        assert!(frontend.contains_key("inst_kinds"));
        assert!(frontend.contains_key("inst_decls"));
        assert!(frontend.contains_key("builder_methods"));
        assert!(frontend.contains_key("capi_stubs"));

        let backend = backend_pipeline().run(&catalogue).unwrap();
        assert!(backend.contains_key("backend_decls"));
        assert!(backend.contains_key("backend_inits"));
        assert!(backend.contains_key("replay_dispatch"));
        assert!(backend.contains_key("symbol_map"));
    }
}
