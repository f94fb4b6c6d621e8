//! Subcommands that read an existing properties file.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Properties file to decode
    pub file: PathBuf,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the normalize subcommand
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Properties file to rewrite
    pub file: PathBuf,

    /// Output file path (default: rewrite FILE in place)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl NormalizeArgs {
    pub fn target(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.file)
    }
}

/// Arguments for the set subcommand
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Properties file to update
    pub file: PathBuf,

    /// Field identifier
    pub field: String,

    /// New value, written the way a default value is (lists split on whitespace)
    pub value: String,

    /// Output file path (default: rewrite FILE in place)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SetArgs {
    pub fn target(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.file)
    }
}
