//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

use boxbuild::util::shell::ColorChoice;

/// boxbuild - build machine-image templates with reproducible metadata
#[derive(Parser)]
#[command(name = "boxbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build templates and write box metadata
    Build(BuildArgs),

    /// Validate templates and rewrite them to canonical form
    Normalize(NormalizeArgs),

    /// List templates under the current directory
    List(ListArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Print the builder commands and metadata without building
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Run the builder in debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Ask what to do when a build step fails
    #[arg(short, long)]
    pub ask: bool,

    /// Only run these builds (comma separated)
    #[arg(short, long, value_name = "BUILDS")]
    pub only: Option<String>,

    /// Run all builds except these (comma separated)
    #[arg(short, long, value_name = "BUILDS")]
    pub except: Option<String>,

    /// Mirror to download installation media from
    #[arg(short, long)]
    pub mirror: Option<String>,

    /// Use this version instead of deriving one
    #[arg(short = 'v', long = "version", value_name = "VERSION")]
    pub override_version: Option<String>,

    /// Templates to build, e.g. `debian/debian-12-amd64`
    #[arg(required = true, value_name = "TEMPLATE")]
    pub templates: Vec<String>,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// Export PACKER_LOG=1 to the builder
    #[arg(short, long)]
    pub debug: bool,

    /// Templates to normalize
    #[arg(required = true, value_name = "TEMPLATE")]
    pub templates: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list templates starting with these paths
    #[arg(value_name = "TEMPLATE")]
    pub templates: Vec<String>,
}
