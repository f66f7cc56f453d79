//! `ponzu build` — Vendor content and addons, then compile the server.

use clap::Args;
use ponzu_common::config::PonzuConfig;
use ponzu_toolchain::pipeline::Pipeline;
use ponzu_toolchain::process::SystemRunner;

use crate::output::{self, ConsoleReporter};

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path of the compiled binary, relative to the project directory.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if vendoring or compilation fails.
pub fn execute(args: BuildArgs, config: PonzuConfig) -> anyhow::Result<()> {
    let config = match args.output {
        Some(output) => config.with_output_name(output),
        None => config,
    };
    tracing::info!(project = %config.project_dir.display(), "building project");
    output::print_header();

    let runner = SystemRunner::new();
    let report = Pipeline::build(&config, &runner)
        .with_reporter(&ConsoleReporter)
        .run()?;

    tracing::debug!(files = report.merge.files_copied, "vendored files");
    output::print_artifact("Built", &config.project_dir.join(&config.output_name));
    Ok(())
}
