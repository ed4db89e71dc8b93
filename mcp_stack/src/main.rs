//! `mcp-stack` entry-point: resolve configuration, compose the stack and
//! write its manifest.

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcp_stack::cli::{CommandLine, Commands};
use mcp_stack::config::ConfigResolver;
use mcp_stack::env::ProcessEnv;
use mcp_stack::{ManifestSynthesizer, StackApp, StackError};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = CommandLine::parse();
    run(cli).map_err(color_eyre::eyre::Report::from)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn run(cli: CommandLine) -> Result<(), StackError> {
    let env = ProcessEnv;
    let resolver = ConfigResolver::new(&env)
        .with_config_path(cli.config_path)
        .with_search_dir(".");
    match cli.command {
        Commands::Synth(command) => {
            let synthesizer = ManifestSynthesizer::new(command.out_dir);
            StackApp::new(resolver, &env, synthesizer).run(&command.overrides.to_overrides())
        }
        Commands::Plan(args) => {
            let unit = StackApp::new(resolver, &env, ManifestSynthesizer::default())
                .plan(&args.to_overrides())?;
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &unit).map_err(io::Error::from)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}
