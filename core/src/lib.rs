//! In-memory full-text search over a line-delimited document corpus.
//!
//! Build an [`IndexStore`] once with [`IndexBuilder`], share it read-only, and
//! answer queries with [`QueryProcessor`].

pub mod builder;
pub mod error;
pub mod index;
pub mod searcher;
pub mod snippet;
pub mod tokenizer;

pub use builder::{BuildReport, BuiltIndex, IndexBuilder};
pub use error::{IndexError, SnippetNotFound};
pub use index::{
    DocId, DocumentRecord, IndexHandle, IndexStore, PostingEntry, PostingsList, BODY_WEIGHT,
    TITLE_WEIGHT,
};
pub use searcher::{QueryAggregate, QueryProcessor, ResultRecord};
pub use tokenizer::{StandardTokenizer, Tokenizer};
