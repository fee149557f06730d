//! Entry point. Wires CLI -> Config -> FileAggregator.

mod aggregator;
mod cli;
mod config;
mod error;
mod exitcode;
mod types;
mod walker;
mod writer;

use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

use crate::aggregator::FileAggregator;
use crate::cli::Cli;
use crate::config::Configuration;
use crate::types::PlannedFile;

fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(exitcode::for_error(&e));
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let cfg = Configuration::resolve(&root, cli.config.as_deref(), cli.overrides())
        .context("load configuration")?;

    let aggregator = FileAggregator::new(&cfg);
    if cli.list {
        let planned = aggregator.plan().context("list source files")?;
        return print_listing(io::stdout().lock(), &planned).context("write listing");
    }

    let summary = aggregator
        .run()
        .with_context(|| format!("combine sources into {}", cfg.output_path().display()))?;
    println!(
        "Wrote {} ({} blocks, {} bytes)",
        summary.output.display(),
        summary.blocks,
        summary.bytes
    );
    for path in &summary.skipped {
        println!("Skipped {}", path.display());
    }
    Ok(())
}

/// One header per line. A reader that goes away early (`| head`) ends the
/// listing quietly.
fn print_listing(mut out: impl Write, planned: &[PlannedFile]) -> io::Result<()> {
    let res = planned.iter().try_for_each(|p| {
        debug!("{} -> {}", p.header, p.path.display());
        writeln!(out, "{}", p.header)
    });
    match res.and_then(|()| out.flush()) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn planned(headers: &[&str]) -> Vec<PlannedFile> {
        headers
            .iter()
            .map(|h| PlannedFile {
                path: PathBuf::from(h),
                header: h.to_string(),
            })
            .collect()
    }

    #[test]
    fn listing_prints_one_header_per_line() {
        let mut buf = Vec::new();
        print_listing(&mut buf, &planned(&["server.js", "public/a.js"])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "server.js\npublic/a.js\n");
    }

    #[test]
    fn closed_pipe_ends_listing_without_error() {
        assert!(print_listing(ClosedPipe, &planned(&["a.js", "b.js"])).is_ok());
    }
}
