//! Template subcommand.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the template subcommand
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Comment written at the top of the file
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,
}
