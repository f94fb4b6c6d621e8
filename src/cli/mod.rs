//! CLI command definitions for schemacfg.
//!
//! Every subcommand works on one schema taken from a YAML declaration
//! document and one properties file.

pub mod edit;
pub mod template;

use clap::{Parser, Subcommand};
use edit::{CheckArgs, NormalizeArgs, SetArgs};
use std::path::PathBuf;
use template::TemplateArgs;

/// Default declaration document, looked up in the working directory.
pub const DEFAULT_DECLARATIONS: &str = "schemas.yaml";

/// Declarative configuration schemas over properties files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML document declaring the schemas
    #[arg(short, long, global = true, default_value = DEFAULT_DECLARATIONS)]
    pub declarations: PathBuf,

    /// Schema to use (default: the document's root schema)
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    /// Key prefix to use instead of the schema's own
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// Settings file replacing the project and user settings files
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the default properties file of a schema
    Template(TemplateArgs),

    /// Decode a properties file and print it as JSON
    Check(CheckArgs),

    /// Decode and re-encode a properties file with comments and layout
    Normalize(NormalizeArgs),

    /// Replace the value of one field in a properties file
    Set(SetArgs),
}
