// This module implements the native builder bridge pass: the extern "C" stub
// table that lets generated code drive the native trace builder. Each instruction
// gets exactly one stub, named by the shared prefix + builder-name rule, whose
// signature is an opaque builder handle followed by one parameter per declared
// argument typed from the foreign-call substitution table (value references are
// always opaque pointers). The stub body casts parameters back to their native
// arena-layer types where the two spellings differ and forwards to the matching
// Builder method.

//! Native builder bridge generator.
//!
//! Fragment: `capi_stubs`.

use crate::error::GenResult;
use crate::gen::{stub_symbol, Fragments, Generator};
use crate::spec::{Catalogue, Instruction};
use crate::subst::SubstTable;

pub struct CapiGen {
    prefix: &'static str,
    builder_type: &'static str,
    capi: SubstTable,
    native: SubstTable,
}

impl CapiGen {
    pub fn new(
        prefix: &'static str,
        builder_type: &'static str,
        capi: SubstTable,
        native: SubstTable,
    ) -> Self {
        CapiGen {
            prefix,
            builder_type,
            capi,
            native,
        }
    }

    fn emit_stub(&self, inst: &Instruction) -> GenResult<String> {
        let mut params = vec!["void* builder_ptr".to_string()];
        let mut operands = Vec::with_capacity(inst.args.len());
        for arg in &inst.args {
            let wire = self.capi.resolve(inst, arg)?;
            let native = self.native.resolve(inst, arg)?;
            params.push(format!("{wire} {}", arg.name));
            if wire == native {
                operands.push(arg.name.to_string());
            } else {
                operands.push(format!("({native}) {}", arg.name));
            }
        }

        let mut out = format!(
            "    void* {}({}) {{\n",
            stub_symbol(self.prefix, inst),
            params.join(", ")
        );
        out.push_str(&format!(
            "      {0}& builder = *({0}*) builder_ptr;\n",
            self.builder_type
        ));
        out.push_str(&format!(
            "      return (void*) builder.{}({});\n",
            inst.builder_name(),
            operands.join(", ")
        ));
        out.push_str("    }");
        Ok(out)
    }
}

impl Generator for CapiGen {
    fn name(&self) -> &'static str {
        "capi"
    }

    fn check(&self, catalogue: &Catalogue) -> GenResult<()> {
        self.capi.validate_for(catalogue)?;
        self.native.validate_for(catalogue)
    }

    fn run(&self, catalogue: &Catalogue) -> GenResult<Fragments> {
        let mut stubs = Vec::with_capacity(catalogue.insts().len());
        for inst in catalogue.insts() {
            stubs.push(self.emit_stub(inst)?);
        }
        let body = stubs.join("\n\n");
        let mut fragments = Fragments::new();
        fragments.insert(
            "capi_stubs".to_string(),
            format!("  extern \"C\" {{\n{body}\n  }}"),
        );
        Ok(fragments)
    }
}
