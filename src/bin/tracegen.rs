//! Header generation driver.
//!
//! Builds the shipped trace IR catalogue, runs the frontend and backend
//! pipelines, and renders both header templates. The surrounding build
//! system is expected to fail the build on any generation error.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracegen::{template, trace_ir};

#[derive(Parser)]
#[command(
    name = "tracegen",
    about = "Render the trace IR headers from the instruction catalogue"
)]
struct Args {
    /// Directory containing the header templates.
    #[arg(long, default_value = "templates")]
    templates: PathBuf,

    /// Directory the generated headers are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let catalogue = trace_ir::catalogue();
    let jobs = [
        (
            "trace_ir.tmpl.hpp",
            "trace_ir.hpp",
            trace_ir::frontend_pipeline(),
        ),
        (
            "trace_ir_backend.tmpl.hpp",
            "trace_ir_backend.hpp",
            trace_ir::backend_pipeline(),
        ),
    ];

    for (template_name, output_name, pipeline) in jobs {
        let template_text = fs::read_to_string(args.templates.join(template_name))?;
        let fragments = pipeline.run(&catalogue)?;
        let header = template::render(&template_text, &fragments)?;
        let output_path = args.out_dir.join(output_name);
        fs::write(&output_path, header)?;
        log::info!("wrote {}", output_path.display());
    }
    Ok(())
}
