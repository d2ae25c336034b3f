mod chart;
mod classify;
mod cli;
mod commands;
mod extract;
mod fetch;
mod model;
mod naming;
mod select;
mod util;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::plot::{self, PlotOptions};
use crate::model::PlotReport;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let interactive = cli.url.is_none();

    let result = run(cli);
    if let Err(err) = &result {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
    }

    let code = exit_code(interactive, &result);
    if code != 0 {
        std::process::exit(code);
    }
}

fn exit_code(interactive: bool, result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) if interactive => 0,
        Err(_) => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = PlotOptions {
        output_dir: cli.output_dir,
        width: cli.width,
        height: cli.height,
        title: cli.title,
        min_numeric_ratio: cli.min_numeric_ratio,
    };

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let report = plot::run(&url, &options)?;
    if cli.json {
        write_json_report(&report)
    } else {
        println!("Chart saved to: {}", report.output_path);
        Ok(())
    }
}

fn prompt_for_url() -> Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "Please enter Wikipedia URL: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;

    Ok(line.trim().to_string())
}

fn write_json_report(report: &PlotReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize plot report json")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
