use crate::error::IndexError;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<String> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().map(|w| w.to_string()).collect()
    };
}

/// Turns raw text into normalized search terms.
///
/// The same tokenizer must be used to build an index and to query it,
/// otherwise query terms will not line up with indexed terms.
pub trait Tokenizer: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// NFKC normalization, lowercasing, stop-word removal and optional English
/// stemming.
#[derive(Debug, Clone, Default)]
pub struct StandardTokenizer {
    stem: bool,
    stop_words: Option<HashSet<String>>, // None = built-in English list
}

impl StandardTokenizer {
    pub fn new() -> Self { Self::default() }

    /// Reduce terms to their English stem.
    ///
    /// Snippets are located by matching the term against the raw body, so
    /// stemmed terms that are not a prefix of the surface form fall back to
    /// the placeholder description.
    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }

    /// Replace the built-in stop-word list with one word per line from `path`.
    pub fn with_stop_words_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| IndexError::StopWords { path: path.to_path_buf(), source })?;
        let words: HashSet<String> = text
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        tracing::info!(path = %path.display(), count = words.len(), "loaded stop words");
        self.stop_words = Some(words);
        Ok(self)
    }

    fn is_stopword(&self, token: &str) -> bool {
        match &self.stop_words {
            Some(words) => words.contains(token),
            None => STOPWORDS.contains(token),
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        RE.find_iter(&normalized)
            .map(|mat| mat.as_str())
            .filter(|token| !self.is_stopword(token))
            .map(|token| if self.stem { STEMMER.stem(token).into_owned() } else { token.to_string() })
            .collect()
    }
}
