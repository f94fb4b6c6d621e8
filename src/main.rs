//! schemacfg command-line tool
//!
//! Writes, checks and edits properties files against schemas declared in a
//! YAML document.

use anyhow::{Context, Result};
use clap::Parser;
use schemacfg::cli::edit::{CheckArgs, NormalizeArgs, SetArgs};
use schemacfg::cli::template::TemplateArgs;
use schemacfg::cli::{Cli, Command};
use schemacfg::declare::{Declarations, ParserRegistry};
use schemacfg::logging::{LogLevel, LogLevelFilter, LogTarget, Logger, init_subscriber};
use schemacfg::settings::{Settings, SettingsLoader};
use schemacfg::{ConfigFactory, PropertiesStore};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = SettingsLoader::load(cli.settings.as_deref())?;
    let settings = loader.settings().clone();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        settings.log_level
    };
    init_subscriber(&LogTarget::parse(&cli.log), level)?;
    for (tier, file) in loader.applied() {
        match file {
            Some(file) => debug!(%tier, file = %file.display(), "settings tier applied"),
            None => debug!(%tier, "settings tier applied"),
        }
    }

    let logger = Logger::new()
        .with_name("schemacfg")
        .with_level_filter(Arc::new(LogLevelFilter::new(level)));
    let factory = open_factory(&cli, &settings, &logger)?;

    match cli.command {
        Command::Template(args) => run_template(&factory, &settings, args),
        Command::Check(args) => run_check(&factory, args),
        Command::Normalize(args) => run_normalize(&factory, &settings, args),
        Command::Set(args) => run_set(&factory, args),
    }
}

/// Factory for the selected schema, with the command-line or settings prefix applied.
fn open_factory(cli: &Cli, settings: &Settings, logger: &Logger) -> Result<ConfigFactory> {
    let mut declarations = Declarations::load(&cli.declarations, ParserRegistry::with_builtins())
        .with_context(|| format!("loading {}", cli.declarations.display()))?
        .with_logger(logger.clone());
    let root = declarations.root_name(cli.root.as_deref())?.to_string();
    let factory = declarations
        .factory(&root)
        .with_context(|| format!("resolving schema {}", root))?
        .with_logger(logger.clone());
    match cli.prefix.as_deref().or(settings.prefix.as_deref()) {
        Some(prefix) => Ok(factory.with_prefix(prefix)),
        None => Ok(factory),
    }
}

fn run_template(factory: &ConfigFactory, settings: &Settings, args: TemplateArgs) -> Result<()> {
    let template = factory.get_template()?;
    let mut layout = settings.layout();
    layout.set_header_comment(args.header);
    let store = factory.to_store_with_layout(&template, layout)?;
    match args.output {
        Some(path) => {
            store.write_to(&path)?;
            eprintln!("Wrote template to {}", path.display());
        }
        None => {
            std::io::stdout().write_all(store.to_text().as_bytes())?;
        }
    }
    Ok(())
}

fn run_check(factory: &ConfigFactory, args: CheckArgs) -> Result<()> {
    let store = read_store(&args.file)?;
    let instance = factory
        .from_store(&store)
        .with_context(|| format!("decoding {}", args.file.display()))?;
    let json = if args.compact {
        serde_json::to_string(&instance.to_json())?
    } else {
        serde_json::to_string_pretty(&instance.to_json())?
    };
    println!("{}", json);
    Ok(())
}

fn run_normalize(factory: &ConfigFactory, settings: &Settings, args: NormalizeArgs) -> Result<()> {
    let store = read_store(&args.file)?;
    let instance = factory
        .from_store(&store)
        .with_context(|| format!("decoding {}", args.file.display()))?;
    let mut layout = settings.layout();
    layout.set_header_comment(store.layout().header_comment().map(str::to_string));
    let normalized = factory.to_store_with_layout(&instance, layout)?;
    normalized.write_to(args.target())?;
    eprintln!("Normalized {} keys into {}", normalized.len(), args.target().display());
    Ok(())
}

fn run_set(factory: &ConfigFactory, args: SetArgs) -> Result<()> {
    let store = read_store(&args.file)?;
    let value = factory.parse_field_text(&args.field, &args.value)?;
    let updated = factory.with_field_in_store(&store, &args.field, value)?;
    updated.write_to(args.target())?;
    eprintln!("Set {} in {}", args.field, args.target().display());
    Ok(())
}

fn read_store(path: &Path) -> Result<PropertiesStore> {
    PropertiesStore::read_from(path).with_context(|| format!("reading {}", path.display()))
}
