// This module implements the layout and constructor generation pass. For every
// instruction it emits the closed InstKind tag enum, a final class with scalar
// fields, a constructor that binds value references into trailing Span storage by
// declaration index and asserts each validity predicate in order, accessors per
// getter policy, and the Builder method that computes the arena allocation size
// as sizeof(class) plus one pointer-sized slot per value-reference argument. The
// size formula here is the single authoritative place the slot count is turned
// into bytes; every other pass derives operand counts from the same
// classification rule on the model.

//! Layout & constructor generator.
//!
//! Fragments: `inst_kinds`, `inst_decls`, `builder_methods`.

use crate::error::GenResult;
use crate::gen::{Fragments, Generator};
use crate::spec::{Catalogue, GetterPolicy, Instruction};
use crate::subst::SubstTable;

pub struct LayoutGen {
    native: SubstTable,
}

impl LayoutGen {
    pub fn new(native: SubstTable) -> Self {
        LayoutGen { native }
    }

    /// Formal parameter list in declaration order, typed for the native
    /// arena layer.
    fn formal_args(&self, inst: &Instruction) -> GenResult<String> {
        let mut params = Vec::with_capacity(inst.args.len());
        for arg in &inst.args {
            let ty = self.native.resolve(inst, arg)?;
            params.push(format_param(ty, arg.name));
        }
        Ok(params.join(", "))
    }

    fn emit_kinds(&self, catalogue: &Catalogue) -> String {
        let mut out = String::from("  enum class InstKind : uint32_t {\n");
        for inst in catalogue.insts() {
            out.push_str(&format!("    {},\n", inst.name));
        }
        out.push_str("  };");
        out
    }

    fn emit_class(&self, catalogue: &Catalogue, inst: &Instruction) -> GenResult<String> {
        let class = inst.class_name();
        let base = catalogue.base_of(inst);
        let mut out = format!("  class {class} final : public {base} {{\n");

        let scalars: Vec<_> = inst.scalar_args().collect();
        if !scalars.is_empty() {
            out.push_str("  private:\n");
            for arg in &scalars {
                let ty = self.native.resolve(inst, arg)?;
                out.push_str(&format!("    {};\n", format_param(ty, &format!("_{}", arg.name))));
            }
        }
        out.push_str("  public:\n");

        // Constructor: base init carries the kind tag, the result type
        // expression, and the trailing slot view; value arguments bind by
        // declaration index, scalars land in their fields, predicates
        // become assertions evaluated after all fields are set.
        let mut trailing = format!("Span<Value*>::trailing(this, {})", inst.value_slots());
        for (slot, arg) in inst.value_args().enumerate() {
            trailing.push_str(&format!(".with({slot}, {})", arg.name));
        }
        let mut init_list = vec![format!(
            "{base}(InstKind::{}, {}, {trailing})",
            inst.name,
            inst.result.emit(inst)?
        )];
        for arg in &scalars {
            init_list.push(format!("_{0}({0})", arg.name));
        }

        out.push_str(&format!("    {class}({}):\n", self.formal_args(inst)?));
        out.push_str(&format!("        {}", init_list.join(",\n        ")));
        if inst.predicates.is_empty() {
            out.push_str(" {}\n");
        } else {
            out.push_str(" {\n");
            for pred in &inst.predicates {
                out.push_str(&format!("      assert({});\n", pred.emit(inst)?));
            }
            out.push_str("    }\n");
        }

        let accessors = self.emit_accessors(inst)?;
        if !accessors.is_empty() {
            out.push('\n');
            out.push_str(&accessors);
        }
        out.push_str("  };");
        Ok(out)
    }

    fn emit_accessors(&self, inst: &Instruction) -> GenResult<String> {
        let mut out = String::new();
        let mut slot = 0;
        for arg in &inst.args {
            if arg.is_value() {
                out.push_str(&format!(
                    "    Value* {}() const {{ return arg({slot}); }}\n",
                    arg.name
                ));
                slot += 1;
            } else {
                // A derived accessor for the scalar the result type reads
                // would only shadow the base type() accessor with the same
                // value, so it is omitted unless forced.
                if arg.getter == GetterPolicy::Derived && inst.result_scalar() == Some(arg.name) {
                    continue;
                }
                let ty = self.native.resolve(inst, arg)?;
                out.push_str(&format!(
                    "    {ty} {0}() const {{ return _{0}; }}\n",
                    arg.name
                ));
            }
        }
        Ok(out)
    }

    fn emit_builder(&self, inst: &Instruction) -> GenResult<String> {
        let class = inst.class_name();
        let ctor_args: Vec<&str> = inst.args.iter().map(|a| a.name).collect();
        let lines = [
            format!(
                "    {class}* {}({}) {{",
                inst.builder_name(),
                self.formal_args(inst)?
            ),
            "      void* slot = _section->allocator().alloc(".to_string(),
            format!(
                "          sizeof({class}) + sizeof(Value*) * {}, alignof({class}));",
                inst.value_slots()
            ),
            format!("      {class}* inst = new (slot) {class}({});", ctor_args.join(", ")),
            "      insert(inst);".to_string(),
            "      return inst;".to_string(),
            "    }".to_string(),
        ];
        Ok(lines.join("\n"))
    }
}

impl Generator for LayoutGen {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn check(&self, catalogue: &Catalogue) -> GenResult<()> {
        self.native.validate_for(catalogue)
    }

    fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments> {
        let mut decls = Vec::with_capacity(catalogue.insts().len());
        let mut builders = Vec::with_capacity(catalogue.insts().len());
        for inst in catalogue.insts() {
            decls.push(self.emit_class(catalogue, inst)?);
            builders.push(self.emit_builder(inst)?);
        }

        let mut fragments = Fragments::new();
        fragments.insert("inst_kinds".to_string(), self.emit_kinds(catalogue));
        fragments.insert("inst_decls".to_string(), decls.join("\n\n"));
        fragments.insert("builder_methods".to_string(), builders.join("\n\n"));
        Ok(fragments)
    }
}

/// Format one `type name` parameter pair.
fn format_param(ty: &str, name: &str) -> String {
    format!("{ty} {name}")
}
