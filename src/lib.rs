//! tracegen - Trace-JIT instruction catalogue generator.
//!
//! tracegen projects one declarative catalogue of trace-based JIT
//! instructions into three mutually consistent C++ header projections:
//! arena-allocated instruction classes with trailing value-slot storage,
//! an `extern "C"` bridge from generated code into the native trace
//! builder, and a backend replay layer (callable table, dispatcher, and
//! the symbol registrations that make the bridge stubs resolvable inside
//! the backend's JIT linker).
//!
//! # Primary Usage
//!
//! ```
//! use tracegen::{template, trace_ir};
//!
//! let catalogue = trace_ir::catalogue();
//! let fragments = trace_ir::frontend_pipeline().run(&catalogue)?;
//! let header = template::render("${inst_decls}", &fragments)?;
//! # assert!(header.contains("class ConstInst"));
//! # Ok::<(), tracegen::GenError>(())
//! ```
//!
//! # Architecture
//!
//! - [`spec`] - Instruction catalogue model (the single source of truth)
//! - [`subst`] - Per-projection type-substitution tables
//! - [`gen`] - Generation passes (layout, bridge, replay, symbols)
//! - [`pipeline`] - Ordered pass invocation and fragment aggregation
//! - [`template`] - The `${name}` fragment rendering contract
//! - [`trace_ir`] - The shipped catalogue and pipelines (configuration)

pub mod error;
pub mod gen;
pub mod pipeline;
pub mod spec;
pub mod subst;
pub mod template;
pub mod trace_ir;

pub use error::{GenError, GenResult};
pub use gen::{stub_symbol, Fragments, Generator};
pub use pipeline::Pipeline;
pub use spec::{Argument, Catalogue, GetterPolicy, Instruction, Predicate, TypeExpr, TypeToken};
pub use subst::SubstTable;
