//! Collaborators the analyzer reads from.
//!
//! The analyzer never talks to a search backend itself: it asks a
//! [`DocumentSource`] for token streams and titles, and optionally a
//! [`TermVectorSource`] for corpus-wide document frequencies.
//! [`memory::MemoryCorpus`] implements both over documents held in memory.

pub mod corpus;
pub mod memory;
pub mod normalize;

use indexmap::{IndexMap, IndexSet};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{analyzer::config::Stemming, error::Result};

/// Named set of document identifiers to analyze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub entries: Vec<String>,
}

impl Dataset {
    pub fn new<T: AsRef<str>>(name: &str, entries: &[T]) -> Self {
        Dataset {
            name: name.to_string(),
            entries: entries.iter().map(|e| e.as_ref().to_string()).collect(),
        }
    }

    /// Entries with duplicates removed, in order of first occurrence
    pub fn unique_entries(&self) -> IndexSet<&str> {
        let unique: IndexSet<&str> = self.entries.iter().map(String::as_str).collect();
        if unique.len() != self.entries.len() {
            warn!(
                "dataset '{}' lists {} duplicate entries, analyzing each document once",
                self.name,
                self.entries.len() - unique.len()
            );
        }
        unique
    }

    /// Number of distinct documents
    pub fn num_documents(&self) -> usize {
        self.entries.iter().collect::<IndexSet<_>>().len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-term statistics from the corpus term vector of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// number of corpus documents containing the term.
    /// sources are known to report bogus zero or negative values
    pub document_frequency: i64,
}

/// Term vector of one document: term -> corpus statistics
pub type TermVector = IndexMap<String, TermStats>;

/// Resolves documents into normalized token streams
pub trait DocumentSource: Send + Sync {
    /// Token stream of a document, normalized and grouped into n-grams
    ///
    /// # Arguments
    /// * `document_id` - identifier from the dataset
    /// * `ngrams` - n-gram size, 1 for single words
    /// * `stemming` - normalization mode
    fn fetch_tokens(&self, document_id: &str, ngrams: usize, stemming: Stemming) -> Result<Vec<String>>;

    /// Title of a document, if it has one
    fn fetch_document_title(&self, document_id: &str) -> Result<Option<String>>;
}

/// Corpus-wide document frequency lookups
pub trait TermVectorSource: Send + Sync {
    /// Term vector of a document, with corpus document frequencies
    fn fetch_corpus_term_vector(&self, document_id: &str) -> Result<TermVector>;

    /// Number of documents in the whole corpus
    fn corpus_size(&self) -> Result<u64>;
}

/// Advisory progress callback: (completed, total, message)
pub type Progress<'a> = &'a (dyn Fn(usize, usize, &str) + Sync);
