//! `annoscope`: resolves annotations against a JSON declaration catalog.
//!
//! **Usage:**
//! ```text
//! annoscope [--json] <catalog.json> resolve --kind <K> --subject <T>
//! annoscope [--json] <catalog.json> slots --kind <K> --subject <T> [--policy first|unique]
//! annoscope [--json] <catalog.json> inspect
//! annoscope [--json] <catalog.json> check
//! ```
//!
//! Exits non-zero when a resolution fails or the catalog does not validate.
//! Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use annoscope::serializer::json;
use annoscope::{
    resolve, resolve_slots_with, validate, Catalog, MatchPolicy, ResolveError, Severity,
    SlotResult, TupleShape,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Resolve slot-level annotations from a declaration catalog.
#[derive(Parser)]
#[command(
    name = "annoscope",
    version,
    about = "Resolve slot-level annotations from a declaration catalog"
)]
struct Args {
    /// Path to the catalog JSON file.
    catalog: PathBuf,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the instance of a kind attached to a type declaration.
    Resolve {
        /// Requested annotation kind.
        #[arg(long)]
        kind: String,
        /// Subject type.
        #[arg(long)]
        subject: String,
    },
    /// Resolve a kind against every field or variant of a type.
    Slots {
        /// Requested annotation kind.
        #[arg(long)]
        kind: String,
        /// Subject type.
        #[arg(long)]
        subject: String,
        /// How a site carrying several conforming instances is handled.
        #[arg(long, value_enum, default_value_t = Policy::First)]
        policy: Policy,
    },
    /// Summarize the kinds and types in the catalog.
    Inspect,
    /// Validate the catalog.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// The first conforming instance in declaration order wins.
    First,
    /// Several conforming instances on one site are an error.
    Unique,
}

impl From<Policy> for MatchPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::First => MatchPolicy::FirstDeclared,
            Policy::Unique => MatchPolicy::RejectAmbiguous,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();

    let catalog = load(&args.catalog)?;
    let ok = match args.command {
        Command::Resolve { kind, subject } => run_resolve(&catalog, &kind, &subject, args.json)?,
        Command::Slots {
            kind,
            subject,
            policy,
        } => run_slots(&catalog, &kind, &subject, policy.into(), args.json)?,
        Command::Inspect => run_inspect(&catalog, args.json)?,
        Command::Check => run_check(&catalog, args.json)?,
    };

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn load(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&text)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        kinds = catalog.kind_count(),
        types = catalog.type_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Reports a resolution failure; always returns `false`.
fn report_error(err: &ResolveError, as_json: bool) -> Result<bool> {
    if as_json {
        print_json(&json::error_to_json(err))?;
    } else {
        eprintln!("error[{}]: {err}", err.code());
    }
    Ok(false)
}

fn run_resolve(catalog: &Catalog, kind: &str, subject: &str, as_json: bool) -> Result<bool> {
    match resolve(catalog, kind, subject) {
        Ok(annotation) if as_json => {
            print_json(&json::annotation_to_json(annotation))?;
            Ok(true)
        }
        Ok(annotation) => {
            println!("{subject}: {} {}", annotation.kind, annotation.value);
            Ok(true)
        }
        Err(err) => report_error(&err, as_json),
    }
}

fn run_slots(
    catalog: &Catalog,
    kind: &str,
    subject: &str,
    policy: MatchPolicy,
    as_json: bool,
) -> Result<bool> {
    let tuple = match resolve_slots_with(catalog, kind, subject, policy) {
        Ok(tuple) => tuple,
        Err(err) => return report_error(&err, as_json),
    };
    if as_json {
        print_json(&json::tuple_to_json(&tuple))?;
        return Ok(true);
    }

    let shape = match tuple.shape() {
        TupleShape::Product => "product",
        TupleShape::Sum => "sum",
    };
    println!(
        "{} on {} ({shape}, {} slots, {} present)",
        tuple.kind(),
        tuple.subject(),
        tuple.arity(),
        tuple.present_positions().len()
    );
    for (index, entry) in tuple.entries().iter().enumerate() {
        match &entry.result {
            SlotResult::Present(annotation) => {
                println!("  [{index}] {}: {} {}", entry.label, annotation.kind, annotation.value);
            }
            SlotResult::Absent => println!("  [{index}] {}: -", entry.label),
        }
    }
    Ok(true)
}

fn run_inspect(catalog: &Catalog, as_json: bool) -> Result<bool> {
    let summary = json::catalog_summary(catalog);
    if as_json {
        print_json(&summary)?;
        return Ok(true);
    }

    println!(
        "Catalog: {} kinds, {} types",
        catalog.kind_count(),
        catalog.type_count()
    );
    println!();
    println!("Kinds:");
    for kind in &catalog.kinds {
        let marker = if kind.is_abstract { " (abstract)" } else { "" };
        if kind.extends.is_empty() {
            println!("  {}{marker}", kind.id);
        } else {
            println!("  {}{marker} : {}", kind.id, kind.extends.join(", "));
        }
    }
    println!();
    println!("Types:");
    let types = summary["types"].as_array().cloned().unwrap_or_default();
    for entry in &types {
        let id = entry["id"].as_str().unwrap_or_default();
        let shape = entry["shape"].as_str().unwrap_or_default();
        let members = entry["slots"]
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "?".to_string());
        match shape {
            "opaque" => println!("  {id}: opaque"),
            _ => println!("  {id}: {shape} ({members})"),
        }
    }
    Ok(true)
}

fn run_check(catalog: &Catalog, as_json: bool) -> Result<bool> {
    let report = validate(catalog);
    if as_json {
        print_json(&json::report_to_json(&report))?;
        return Ok(report.all_passed());
    }

    for check in &report.results {
        let status = match check.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{status}] {}: {}", check.validator, check.message);
        for detail in &check.details {
            println!("       {detail}");
        }
    }
    println!();
    let failed = report.failure_count();
    let warned = report.warning_count();
    println!(
        "Summary: {} passed, {warned} warnings, {failed} failed",
        report.results.len() - failed - warned
    );
    if failed > 0 {
        eprintln!("Check FAILED: {failed} check(s) did not pass.");
    }
    Ok(report.all_passed())
}
