// This module implements the backend replay pass. It emits the backend-side
// callable table (one llvm::FunctionCallee per instruction, bound by
// getOrInsertFunction to exactly the foreign-call bridge's symbol) and the
// replay_inst dispatcher that maps a recorded instruction to the matching backend
// call. Dispatch switches on the closed InstKind tag, so every arm is selected by
// runtime type identity rather than order-sensitive downcast chains; the
// fall-through past the switch is a defensive fatal assertion. Each arm rebuilds
// the call operand list in declaration order: trace-builder handle first, value
// references passed through as already-produced backend handles, scalars
// converted to backend constants via the backend substitution table.

//! Backend replay generator.
//!
//! Fragments: `backend_decls`, `backend_inits`, `replay_dispatch`.

use crate::error::GenResult;
use crate::gen::{stub_symbol, Fragments, Generator};
use crate::spec::{Catalogue, Instruction};
use crate::subst::SubstTable;

/// Backend spelling of an opaque handle (trace builder, value reference).
const HANDLE_TYPE: &str = "llvm::PointerType::get(context, 0)";

pub struct ReplayGen {
    prefix: &'static str,
    api_type: &'static str,
    backend: SubstTable,
}

impl ReplayGen {
    pub fn new(prefix: &'static str, api_type: &'static str, backend: SubstTable) -> Self {
        ReplayGen {
            prefix,
            api_type,
            backend,
        }
    }

    fn emit_decls(&self, catalogue: &Catalogue) -> String {
        let mut out = Vec::with_capacity(catalogue.insts().len());
        for inst in catalogue.insts() {
            out.push(format!("    llvm::FunctionCallee {};", inst.builder_name()));
        }
        out.join("\n")
    }

    fn emit_init(&self, inst: &Instruction) -> GenResult<String> {
        let mut param_types = vec![HANDLE_TYPE.to_string()];
        for arg in &inst.args {
            param_types.push(self.backend.resolve(inst, arg)?.to_string());
        }
        let lines = [
            format!("      {} = module->getOrInsertFunction(", inst.builder_name()),
            format!("        \"{}\",", stub_symbol(self.prefix, inst)),
            "        llvm::FunctionType::get(".to_string(),
            format!("          {HANDLE_TYPE},"),
            format!(
                "          std::vector<llvm::Type*>({{ {} }}),",
                param_types.join(", ")
            ),
            "          false".to_string(),
            "        )".to_string(),
            "      );".to_string(),
        ];
        Ok(lines.join("\n"))
    }

    fn emit_arm(&self, inst: &Instruction) -> GenResult<String> {
        let class = inst.class_name();
        let mut out = format!("      case InstKind::{}: {{\n", inst.name);
        if inst.scalar_args().next().is_some() {
            out.push_str(&format!(
                "        {class}* i = static_cast<{class}*>(inst);\n"
            ));
        }
        // The caller hands over one backend handle per value reference.
        out.push_str(&format!(
            "        assert(args.size() == {});\n",
            inst.value_slots()
        ));
        out.push_str("        std::vector<llvm::Value*> call_args;\n");
        out.push_str(&format!(
            "        call_args.reserve({});\n",
            inst.args.len() + 1
        ));
        out.push_str("        call_args.push_back(trace_builder);\n");

        // Operands in declaration order: value references pass through,
        // scalars become backend constants.
        let mut slot = 0;
        for arg in &inst.args {
            if arg.is_value() {
                out.push_str(&format!(
                    "        call_args.push_back(args[{slot}]); // {}\n",
                    arg.name
                ));
                slot += 1;
            } else {
                let ty = self.backend.resolve(inst, arg)?;
                out.push_str(&format!(
                    "        call_args.push_back(llvm::ConstantInt::get({ty}, (uint64_t) i->{}(), false));\n",
                    arg.name
                ));
            }
        }

        out.push_str(&format!(
            "        assert(call_args.size() == {});\n",
            inst.args.len() + 1
        ));
        out.push_str(&format!(
            "        return builder.CreateCall(api.{}, call_args);\n",
            inst.builder_name()
        ));
        out.push_str("      }");
        Ok(out)
    }

    fn emit_dispatch(&self, catalogue: &Catalogue) -> GenResult<String> {
        let api = self.api_type;
        let mut out = String::from("  inline llvm::Value* replay_inst(llvm::IRBuilder<>& builder,\n");
        out.push_str(&format!("                                  {api}& api,\n"));
        out.push_str("                                  Inst* inst,\n");
        out.push_str("                                  llvm::Value* trace_builder,\n");
        out.push_str("                                  std::vector<llvm::Value*> args) {\n");
        out.push_str(
            "    llvm::LLVMContext& context = builder.GetInsertBlock()->getModule()->getContext();\n",
        );
        out.push_str("    (void) context;\n");
        out.push_str("    switch (inst->kind()) {\n");
        for inst in catalogue.insts() {
            out.push_str(&self.emit_arm(inst)?);
            out.push('\n');
        }
        out.push_str("    }\n");
        // The kind enum is closed; this is unreachable unless the recorded
        // pointer is corrupted.
        out.push_str("    assert(false && \"Unknown instruction\");\n");
        out.push_str("    return nullptr;\n");
        out.push_str("  }");
        Ok(out)
    }
}

impl Generator for ReplayGen {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn check(&self, catalogue: &Catalogue) -> GenResult<()> {
        self.backend.validate_for(catalogue)
    }

    fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments> {
        let mut inits = Vec::with_capacity(catalogue.insts().len());
        for inst in catalogue.insts() {
            inits.push(self.emit_init(inst)?);
        }

        let mut fragments = Fragments::new();
        fragments.insert("backend_decls".to_string(), self.emit_decls(catalogue));
        fragments.insert("backend_inits".to_string(), inits.join("\n"));
        fragments.insert(
            "replay_dispatch".to_string(),
            self.emit_dispatch(catalogue)?,
        );
        Ok(fragments)
    }
}
