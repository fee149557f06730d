//! Combine the entry file and the matching files of each include directory
//! into one text artifact.

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::AggregationError;
use crate::types::{PlannedFile, ReadErrorPolicy, RunSummary};
use crate::walker::{self, FileFilter};
use crate::writer::BlockWriter;

pub struct FileAggregator<'a> {
    config: &'a Configuration,
    filter: FileFilter,
}

impl<'a> FileAggregator<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            filter: config.filter(),
        }
    }

    /// Overwrite the output with one block per collected file.
    ///
    /// The output is flushed on success and closed on drop otherwise; a failed
    /// run leaves whatever blocks were already written.
    pub fn run(&self) -> Result<RunSummary, AggregationError> {
        let out_path = self.config.output_path();
        info!(
            "Combining sources under {} into {}",
            self.config.root.display(),
            out_path.display()
        );

        let mut out = BlockWriter::new(BufWriter::new(create_output(&out_path)?));
        let mut skipped = Vec::new();
        let write_err = |source: io::Error| AggregationError::Write {
            path: out_path.clone(),
            source,
        };

        self.for_each_source(&mut |path, header| {
            let content = match read_text(path) {
                Ok(c) => c,
                Err(e) if e.is_input_failure() && self.skips_unreadable() => {
                    warn!("Skipping {}: {}", path.display(), error_chain(&e));
                    skipped.push(path.to_path_buf());
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            debug!("Block {}: {} ({} bytes)", out.blocks() + 1, header, content.len());
            out.write_block(header, &content).map_err(write_err)
        })?;

        let (blocks, bytes) = out.finish().map_err(write_err)?;
        info!(
            "Wrote {} blocks ({} bytes) to {}",
            blocks,
            bytes,
            out_path.display()
        );
        if !skipped.is_empty() {
            warn!("{} unreadable files were left out", skipped.len());
        }

        Ok(RunSummary {
            output: out_path,
            blocks,
            bytes,
            skipped,
        })
    }

    /// The files `run` would combine, in order, without reading or writing
    /// anything.
    pub fn plan(&self) -> Result<Vec<PlannedFile>, AggregationError> {
        let mut planned = Vec::new();
        self.for_each_source(&mut |path, header| {
            planned.push(PlannedFile {
                path: path.to_path_buf(),
                header: header.to_string(),
            });
            Ok(())
        })?;
        Ok(planned)
    }

    fn skips_unreadable(&self) -> bool {
        self.config.on_read_error == ReadErrorPolicy::Skip
    }

    /// Visit the entry file (when present) and then every matching file of
    /// the include directories, passing each path with its header label.
    fn for_each_source(
        &self,
        visit: &mut dyn FnMut(&Path, &str) -> Result<(), AggregationError>,
    ) -> Result<(), AggregationError> {
        if let (Some(label), Some(path)) = (&self.config.entry_file, self.config.entry_path()) {
            if path.is_file() {
                visit(&path, &label.display().to_string())?;
            } else {
                debug!("No entry file at {}", path.display());
            }
        }

        for dir in &self.config.include_dirs {
            let dir_path = self.config.root.join(dir);
            if !dir_path.is_dir() {
                debug!("Include directory {} not found, skipping", dir_path.display());
                continue;
            }
            walker::walk(&dir_path, &self.filter, self.config.sort, &mut |file| {
                visit(file, &self.header_for(file))
            })?;
        }
        Ok(())
    }

    /// Header label: the path relative to the process root.
    fn header_for(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.config.root)
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }
}

fn create_output(path: &Path) -> Result<File, AggregationError> {
    let create_err = |source| AggregationError::CreateOutput {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(create_err)?;
        }
    }
    File::create(path).map_err(create_err)
}

fn read_text(path: &Path) -> Result<String, AggregationError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::InvalidData => AggregationError::Decode {
            path: path.to_path_buf(),
        },
        _ => AggregationError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        msg.push_str(": ");
        msg.push_str(&e.to_string());
        cur = e.source();
    }
    msg
}
