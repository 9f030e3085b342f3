//! The outer CLI parts of the `hwy-ingest` binary: argument parsing,
//! logging setup, and a terminal summary of what the ingest core found.
//! Everything load-bearing lives in the `hwy-ingest` library crate; this
//! binary is a thin collaborator over it.

#![forbid(unsafe_code)]

mod args;

use args::Cli;
use colored::Colorize;
use hwy_ingest::{run_ingest, IngestConfig, QuadtreeConfig};
use hwy_ingest_types::Finding;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args = match Cli::from_args() {
        Ok(a) => a,
        Err(e) => e.exit(),
    };
    debug!("args = {:?}", args);

    if let Some(userlist) = &args.userlist {
        info!("traveler list provided ({}), not processed by this core", userlist);
    }
    if let Some(path) = &args.userlistfilepath {
        info!("traveler list directory provided ({}), not processed by this core", path.display());
    }

    let config = IngestConfig {
        highway_data_path: args.highwaydatapath,
        systems_file: args.systems_file,
        num_threads: args.num_threads,
        split_region: args.split_region,
    };

    let ctx = match run_ingest(config, QuadtreeConfig::default()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match args.format.as_str() {
        "json" => print_summary_json(&ctx),
        "text" => print_summary_text(&ctx),
        other => {
            warn!("unrecognized --format {:?}, falling back to text", other);
            print_summary_text(&ctx);
        }
    }
    ExitCode::SUCCESS
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    systems: usize,
    errors: &'a [String],
    findings: &'a [Finding],
    orphaned_wpt_files: Vec<String>,
}

fn print_summary_json(ctx: &hwy_ingest::IngestContext) {
    let errors = ctx.error_list.snapshot();
    let findings = ctx.datacheck.snapshot();
    let orphaned = ctx
        .orphaned_wpt_files()
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    let summary = SummaryJson {
        systems: ctx.systems.len(),
        errors: &errors,
        findings: &findings,
        orphaned_wpt_files: orphaned,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("could not serialize summary: {}", e),
    }
}

fn print_summary_text(ctx: &hwy_ingest::IngestContext) {
    let errors = ctx.error_list.snapshot();
    let findings = ctx.datacheck.snapshot();
    let orphaned = ctx.orphaned_wpt_files();

    println!(
        "{} {} system(s) ingested",
        "ok:".green().bold(),
        ctx.systems.len()
    );

    if errors.is_empty() {
        println!("{} no config errors", "ok:".green().bold());
    } else {
        println!("{} {} config error(s)", "warn:".yellow().bold(), errors.len());
        for e in &errors {
            println!("  {}", e);
        }
    }

    println!("{} {} datacheck finding(s)", "info:".cyan().bold(), findings.len());

    if !orphaned.is_empty() {
        println!(
            "{} {} orphaned .wpt file(s) never read by any route",
            "warn:".yellow().bold(),
            orphaned.len()
        );
        for path in &orphaned {
            println!("  {}", path.display());
        }
    }
}
