//! Circumflex - configuration resolver and asset bundler.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use circumflex::asset::AssetRegistry;
use circumflex::cli::{self, Cli, Commands, init::InitMode};
use circumflex::config::Environment;
use circumflex::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let env = Environment::capture();

    match &cli.command {
        Commands::Init { name, domain } => {
            let (root, mode) = match name {
                Some(name) => (name.clone(), InitMode::NewDir),
                None => (PathBuf::from("."), InitMode::CurrentDir),
            };
            cli::init::new_project(&root, mode, domain)
        }
        Commands::Build { minify } => {
            let conf = cli::load_config(&cli, &env)?;
            cli::build::build_assets(&conf, *minify).map(|_| ())
        }
        Commands::Config { key, env: list_env } => {
            let conf = cli::load_config(&cli, &env)?;
            if *list_env {
                print!("{}", cli::config::render_env_bindings(&conf));
            } else {
                println!("{}", cli::config::render_config(&conf, key.as_deref())?);
            }
            Ok(())
        }
        Commands::Bundle { name } => {
            let conf = cli::load_config(&cli, &env)?;
            let registry = AssetRegistry::open(&conf);
            println!("{}", cli::bundle::render_bundle(&registry, name)?);
            Ok(())
        }
    }
}
