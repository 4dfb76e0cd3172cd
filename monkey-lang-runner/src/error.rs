use std::path::PathBuf;

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not read {path}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("line editor failed: {0}")]
    Editor(#[from] ReadlineError),
}
