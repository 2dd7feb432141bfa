use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort index construction.
///
/// Malformed corpus lines are not errors: the builder skips them and logs a
/// warning.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The document source could not be opened. No index is produced.
    #[error("cannot open document source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from an already opened source failed part way through.
    #[error("failed reading document source: {0}")]
    Read(#[from] io::Error),

    /// A stop-word file given to the tokenizer could not be read.
    #[error("cannot read stop-word file {path}: {source}")]
    StopWords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why no snippet could be cut from a document body.
///
/// Callers treat every variant the same way and substitute a placeholder
/// description.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetNotFound {
    #[error("body or term is empty")]
    EmptyInput,
    #[error("term does not occur in body")]
    TermAbsent,
    #[error("extraction window is empty")]
    DegenerateWindow,
}
