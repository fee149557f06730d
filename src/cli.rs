//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::config::ConfigLayer;
use crate::types::ReadErrorPolicy;

/// Concatenate an entry file and the matching files of selected directories
/// into one text file, each prefixed with a `===== <path> =====` header.
#[derive(Parser, Debug)]
#[command(name = "combine-sources")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Process root; headers are relative to it (default: cwd)
    #[arg(short = 'C', long, env = "COMBINE_ROOT", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Output file, overwritten on every run [default: combined.txt]
    #[arg(short, long, env = "COMBINE_OUTPUT", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Entry file included first when present [default: server.js]
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "no_entry")]
    pub entry: Option<PathBuf>,

    /// Do not include an entry file
    #[arg(long)]
    pub no_entry: bool,

    /// Directory to scan recursively; repeat to add more [default: public, views]
    #[arg(short = 'd', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Scan no directories; only the entry file is combined
    #[arg(long, conflicts_with = "include_dirs")]
    pub no_include_dirs: bool,

    /// File name suffix to include, e.g. ".js"; repeat to add more [default: .js, .ejs]
    #[arg(short = 'x', long = "ext", value_name = "SUFFIX")]
    pub extensions: Vec<String>,

    /// Directory name pruned at any depth; repeat to add more [default: node_modules]
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// Prune no directories
    #[arg(long, conflicts_with = "exclude_dirs")]
    pub no_exclude: bool,

    /// YAML config file (default: ./combine.yaml, then the user config dir)
    #[arg(short, long, env = "COMBINE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Sort directory entries by name for reproducible output
    #[arg(long)]
    pub sort: bool,

    /// Warn about unreadable or non-UTF-8 files and leave them out instead of failing
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Print the files that would be combined and exit without writing
    #[arg(long)]
    pub list: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flags that were actually given, as the top configuration layer.
    pub fn overrides(&self) -> ConfigLayer {
        let entry_file = if self.no_entry {
            Some(None)
        } else {
            self.entry.clone().map(Some)
        };

        ConfigLayer {
            output: self.output.clone(),
            entry_file,
            include_dirs: cleared_or(self.no_include_dirs, &self.include_dirs),
            include_extensions: non_empty(&self.extensions),
            exclude_dirs: cleared_or(self.no_exclude, &self.exclude_dirs),
            sort: self.sort.then_some(true),
            on_read_error: self.skip_unreadable.then_some(ReadErrorPolicy::Skip),
        }
    }
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

fn cleared_or<T: Clone>(cleared: bool, items: &[T]) -> Option<Vec<T>> {
    if cleared {
        Some(Vec::new())
    } else {
        non_empty(items)
    }
}
