//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Circumflex configuration and asset bundling CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: nearest circumflex.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new project from template
    #[command(visible_alias = "i")]
    Init {
        /// Project directory name/path (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,

        /// Production domain substituted into the template
        #[arg(short, long, default_value = "example.com")]
        domain: String,
    },

    /// Compile asset bundles into public/generated
    #[command(visible_alias = "b")]
    Build {
        /// Minify generated bundles regardless of `assets.minify`
        #[arg(short, long)]
        minify: bool,
    },

    /// Print the resolved configuration as JSON
    #[command(visible_alias = "c")]
    Config {
        /// Dotted key to print instead of the whole tree
        key: Option<String>,

        /// List environment variables consulted for each key
        #[arg(short, long)]
        env: bool,
    },

    /// Print the markup emitted for a bundle
    Bundle {
        /// Bundle name
        name: String,
    },
}
