//! CLI logic for the forcelink plan inspector.
//!
//! The CLI reads a graph file, plans a layout over it and writes the plan:
//! which nodes an engine would simulate, the deduplicated links, pending pin
//! changes and the nodes and edges left out.

pub mod error;
pub mod error_adapter;
pub mod graph_file;

mod args;
mod config;

pub use args::Args;
pub use error::CliError;

use std::fs;

use log::info;

use forcelink::{
    graph::{GraphBuilder, PetgraphBuilder},
    plan::LayoutPlan,
};

use graph_file::GraphFile;

/// Run the forcelink CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Graph file parsing errors
/// - Invalid graphs
/// - Plan serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Planning layout"
    );

    let layout_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let graph_file = GraphFile::parse(&source)
        .map_err(|err| CliError::graph_file(&args.input, &source, &err))?;
    let collection = graph_file.to_collection()?;

    let plan = LayoutPlan::from_host(&collection, &layout_config);
    let graph = PetgraphBuilder.build(&plan)?;
    info!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        excluded = plan.excluded().len(),
        budget = plan.budget();
        "Layout planned"
    );

    let rendered = render_plan(&plan)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Plan written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Serializes a plan as TOML
///
/// # Errors
///
/// Returns [`CliError::Output`] if serialization fails.
pub fn render_plan(plan: &LayoutPlan) -> Result<String, CliError> {
    toml::to_string(plan).map_err(|err| CliError::Output(err.to_string()))
}
