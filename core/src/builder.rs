use crate::error::IndexError;
use crate::index::{IndexStore, PostingEntry, BODY_WEIGHT, TITLE_WEIGHT};
use crate::tokenizer::Tokenizer;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Separates title, body and url on a corpus line.
pub const FIELD_DELIMITER: char = '\x03';
/// Log progress after this many indexed documents.
pub const PROGRESS_EVERY: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Well-formed lines turned into documents.
    pub indexed: usize,
    /// Malformed lines that were skipped.
    pub skipped: usize,
}

#[derive(Debug)]
pub struct BuiltIndex {
    pub store: IndexStore,
    pub report: BuildReport,
}

#[derive(Default)]
struct TermCounts {
    title: u32,
    body: u32,
}

/// Builds an [`IndexStore`] from a line-delimited corpus.
///
/// Each line holds `title`, `body` and `url` joined by [`FIELD_DELIMITER`].
/// Building consumes the builder, so a store is populated exactly once.
pub struct IndexBuilder<'t, T: Tokenizer + ?Sized> {
    tokenizer: &'t T,
    store: IndexStore,
    report: BuildReport,
}

impl<'t, T: Tokenizer + ?Sized> IndexBuilder<'t, T> {
    pub fn new(tokenizer: &'t T) -> Self {
        Self { tokenizer, store: IndexStore::new(), report: BuildReport::default() }
    }

    /// Build from the corpus file at `path`.
    pub fn build<P: AsRef<Path>>(self, path: P) -> Result<BuiltIndex, IndexError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| IndexError::SourceUnreadable { path: path.to_path_buf(), source })?;
        tracing::info!(path = %path.display(), "building index");
        self.build_from_reader(BufReader::new(file))
    }

    pub fn build_from_reader<R: BufRead>(mut self, mut reader: R) -> Result<BuiltIndex, IndexError> {
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            match std::str::from_utf8(&buf) {
                Ok(line) => self.add_line(line_no, line),
                Err(_) => {
                    tracing::warn!(line_no, "skipping line that is not valid UTF-8");
                    self.report.skipped += 1;
                }
            }
        }
        tracing::info!(
            documents = self.report.indexed,
            skipped = self.report.skipped,
            terms = self.store.term_count(),
            "index build complete"
        );
        Ok(BuiltIndex { store: self.store, report: self.report })
    }

    fn add_line(&mut self, line_no: usize, line: &str) {
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let [title, body, url] = fields.as_slice() else {
            tracing::warn!(line_no, fields = fields.len(), "skipping malformed line");
            self.report.skipped += 1;
            return;
        };
        let Some(doc_id) = self.store.push_document(title.to_string(), body.to_string(), url.to_string()) else {
            tracing::warn!(line_no, "doc id space exhausted, skipping document");
            self.report.skipped += 1;
            return;
        };

        // Fresh per document so counts never carry over.
        let mut counts: HashMap<String, TermCounts> = HashMap::new();
        for term in self.tokenizer.segment(title) {
            counts.entry(term).or_default().title += 1;
        }
        for term in self.tokenizer.segment(body) {
            counts.entry(term).or_default().body += 1;
        }
        for (term, c) in counts {
            let weight = c.title.saturating_mul(TITLE_WEIGHT).saturating_add(c.body.saturating_mul(BODY_WEIGHT));
            self.store.push_posting(PostingEntry { doc_id, term, weight });
        }

        self.report.indexed += 1;
        if self.report.indexed % PROGRESS_EVERY == 0 {
            tracing::info!(documents = self.report.indexed, "indexing progress");
        }
    }
}
