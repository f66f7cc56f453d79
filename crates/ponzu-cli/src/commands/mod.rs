//! CLI command definitions and dispatch.

pub mod build;
pub mod docker;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ponzu_common::config::PonzuConfig;

/// ponzu — build and package a project server.
#[derive(Parser, Debug)]
#[command(name = "ponzu", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Go command used to compile the project on the host (e.g. go1.8rc1).
    #[arg(long, global = true)]
    pub gocmd: Option<String>,

    /// Workspace root that importable packages live under (`<root>/src/...`).
    #[arg(long, global = true, env = "GOPATH")]
    pub workspace_root: Option<OsString>,

    /// Project directory to operate on (defaults to the current directory).
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Vendor content and addons, then compile the server binary.
    Build(build::BuildArgs),
    /// Build the server for a container and package it into an image.
    Docker(docker::DockerArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if configuration loading or the pipeline fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Build(args) => build::execute(args, config),
        Command::Docker(args) => docker::execute(args, &config),
    }
}

/// Layers CLI flags over the project configuration.
fn load_config(cli: &Cli) -> anyhow::Result<PonzuConfig> {
    let project_dir = match &cli.project_dir {
        Some(dir) => std::path::absolute(dir)?,
        None => std::env::current_dir()?,
    };

    let mut config = PonzuConfig::load(project_dir, cli.workspace_root.as_deref())?;
    if let Some(gocmd) = &cli.gocmd {
        config = config.with_toolchain(gocmd);
    }
    tracing::debug!(project = %config.project_dir.display(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn docker_tags_accept_repeats_and_commas() {
        let cli = Cli::try_parse_from(["ponzu", "docker", "-t", "a", "--tag", "b,c"])
            .expect("parse");
        let Command::Docker(args) = cli.command else {
            panic!("expected docker subcommand");
        };
        assert_eq!(args.tags, ["a", "b", "c"]);
        assert!(args.depcmd.is_none());
    }

    #[test]
    fn gocmd_is_global() {
        let cli = Cli::try_parse_from(["ponzu", "build", "--gocmd", "go1.8rc1"]).expect("parse");
        assert_eq!(cli.gocmd.as_deref(), Some("go1.8rc1"));
    }
}
