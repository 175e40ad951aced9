use std::path::PathBuf;

use clap::{ArgEnum, Parser};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ArgEnum)]
pub enum OutputFormat {
    /// RFC 6902 patch document
    Patch,
    /// Reversible op tree
    Ops,
}

/// Compares two JSON documents and prints the difference.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct DiffConfig {
    /// Shape document describing both inputs; any JSON value when omitted
    #[clap(long)]
    pub shape: Option<PathBuf>,
    #[clap(long, arg_enum, default_value = "patch")]
    pub output: OutputFormat,
    /// Print the change from `to` back to `from`
    #[clap(long)]
    pub reverse: bool,
    pub from: PathBuf,
    pub to: PathBuf,
}

impl DiffConfig {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
