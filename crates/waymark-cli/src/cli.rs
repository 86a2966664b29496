use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use waymark_core::RenderMode;

/// Waymark - friendly URLs for hierarchical content trees
#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Resolve and generate friendly URLs for a content tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Content tree file (YAML)
    #[arg(long, global = true)]
    pub tree: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the friendly spelling of each argument
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Resolve a request path to a content node
    Resolve {
        #[arg(long)]
        site: String,
        /// URL path as requested, e.g. /products/red-widget/
        path: String,
    },
    /// Generate the friendly URL of a content node
    Url(UrlArgs),
    /// Run the redirect policy for one request
    Request(RequestArgs),
}

#[derive(Args)]
pub struct UrlArgs {
    /// Site the link is rendered on
    #[arg(long)]
    pub site: String,

    /// Render for an https request
    #[arg(long)]
    pub secure: bool,

    /// Always include scheme and host
    #[arg(long)]
    pub absolute: bool,

    /// Use display names instead of node names
    #[arg(long)]
    pub display_names: bool,

    /// Full tree path of the node
    pub node: String,
}

#[derive(Args)]
pub struct RequestArgs {
    #[arg(long)]
    pub site: String,

    #[arg(long, default_value = "GET")]
    pub method: String,

    #[arg(long)]
    pub secure: bool,

    /// Query string, without the leading '?'
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
    pub mode: ModeArg,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// URL path as requested
    pub path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Normal,
    Edit,
    Preview,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => RenderMode::Normal,
            ModeArg::Edit => RenderMode::Edit,
            ModeArg::Preview => RenderMode::Preview,
        }
    }
}
