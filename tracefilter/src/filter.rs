use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use common::diag::Diagnostics;
use common::exit;

use crate::trace::{extract_opcodes, render};

use clap_stdin::{FileOrStdin, StdinError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("unable to read {}: {source}", .path.display())]
    InputNotFound { path: PathBuf, source: io::Error },

    #[error("unable to read trace: {0}")]
    Input(#[from] StdinError),

    #[error("unable to write {}: {source}", .path.display())]
    OutputWrite { path: PathBuf, source: io::Error },
}

impl TraceError {
    pub fn exit_code(&self) -> u8 {
        match self {
            TraceError::InputNotFound { .. } | TraceError::Input(_) => exit::INPUT_NOT_FOUND,
            TraceError::OutputWrite { .. } => exit::OUTPUT_WRITE_ERROR,
        }
    }
}

pub fn read_trace(path: &Path) -> Result<String, TraceError> {
    fs::read_to_string(path).map_err(|source| TraceError::InputNotFound {
        path: path.to_owned(),
        source,
    })
}

pub fn write_opcodes(path: &Path, opcodes: &[&str]) -> Result<(), TraceError> {
    fs::write(path, render(opcodes)).map_err(|source| TraceError::OutputWrite {
        path: path.to_owned(),
        source,
    })
}

/// Writes the opcodes of `text` to `output`, one per line. Returns how many
/// were written.
pub fn filter_text(text: &str, output: &Path, diag: &mut impl Diagnostics) -> Result<usize, TraceError> {
    let opcodes = extract_opcodes(text, diag);
    write_opcodes(output, &opcodes)?;
    diag.info(&format!("Wrote {} opcodes to {}", opcodes.len(), output.display()));
    Ok(opcodes.len())
}

pub fn filter_trace(input: &Path, output: &Path, diag: &mut impl Diagnostics) -> Result<usize, TraceError> {
    filter_text(&read_trace(input)?, output, diag)
}

// Same as `filter_trace`, for a trace that may come from stdin.
pub fn filter_input(input: FileOrStdin, output: &Path, diag: &mut impl Diagnostics) -> Result<usize, TraceError> {
    filter_text(&input.contents()?, output, diag)
}
