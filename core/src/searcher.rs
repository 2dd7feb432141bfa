use crate::index::{DocId, IndexStore};
use crate::snippet;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NO_RESULTS_TITLE: &str = "back to root";
pub const NO_RESULTS_DESC: &str = "No valid content found!";
pub const NO_RESULTS_URL: &str = "https://www.boost.org/";
/// Description used when no snippet can be cut from a matched document.
pub const NO_DESCRIPTION: &str = "No description available";

/// Per-document accumulation of postings for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAggregate {
    pub doc_id: DocId,
    /// Sum of posting weights; wide enough that repeated query terms cannot
    /// overflow it.
    pub weight: u64,
    /// Query terms that hit this document, in lookup order.
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub url: String,
}

impl ResultRecord {
    /// Placeholder returned when a query matches nothing.
    pub fn no_results() -> Self {
        Self {
            title: NO_RESULTS_TITLE.to_string(),
            description: NO_RESULTS_DESC.to_string(),
            url: NO_RESULTS_URL.to_string(),
        }
    }

    pub fn is_no_results(&self) -> bool {
        *self == Self::no_results()
    }
}

/// Answers keyword queries against a built [`IndexStore`].
///
/// Holds only shared references; any number of processors may search the
/// same store concurrently.
pub struct QueryProcessor<'a, T: Tokenizer + ?Sized> {
    index: &'a IndexStore,
    tokenizer: &'a T,
}

impl<'a, T: Tokenizer + ?Sized> QueryProcessor<'a, T> {
    /// `tokenizer` must be configured the same way as the one the index was
    /// built with.
    pub fn new(index: &'a IndexStore, tokenizer: &'a T) -> Self {
        Self { index, tokenizer }
    }

    /// Matching documents, highest weight first; equal weights in ascending
    /// doc id order.
    pub fn rank(&self, query: &str) -> Vec<QueryAggregate> {
        let mut by_doc: HashMap<DocId, QueryAggregate> = HashMap::new();
        for term in self.tokenizer.segment(query) {
            let Some(postings) = self.index.postings(&term) else {
                tracing::debug!(%term, "term not in index");
                continue;
            };
            for posting in postings {
                let agg = by_doc.entry(posting.doc_id).or_insert_with(|| QueryAggregate {
                    doc_id: posting.doc_id,
                    weight: 0,
                    matched_terms: Vec::new(),
                });
                agg.weight = agg.weight.saturating_add(u64::from(posting.weight));
                agg.matched_terms.push(posting.term.clone());
            }
        }

        let mut ranked: Vec<QueryAggregate> = by_doc.into_values().collect();
        ranked.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.doc_id.cmp(&b.doc_id)));
        ranked
    }

    /// Ranked result records for `query`.
    ///
    /// Never empty: a query that matches nothing yields the single
    /// [`ResultRecord::no_results`] placeholder.
    pub fn search(&self, query: &str) -> Vec<ResultRecord> {
        let ranked = self.rank(query);
        if ranked.is_empty() {
            return vec![ResultRecord::no_results()];
        }

        let mut results = Vec::with_capacity(ranked.len());
        for agg in &ranked {
            let Some(doc) = self.index.document(agg.doc_id) else {
                tracing::warn!(doc_id = agg.doc_id, "posting refers to missing document");
                continue;
            };
            let description = agg
                .matched_terms
                .first()
                .and_then(|term| snippet::extract(&doc.body, term).ok())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());
            results.push(ResultRecord { title: doc.title.clone(), description, url: doc.url.clone() });
        }
        results
    }
}
