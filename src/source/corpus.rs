use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// keep document count and per-term document frequencies for a corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    /// number of documents in the corpus
    doc_num: u64,
    /// term -> number of documents containing it
    term_counts: IndexMap<Box<str>, u64>,
}

impl CorpusStats {
    /// Create a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document's terms to the corpus
    /// each distinct term is counted once, however often it repeats
    pub fn add_document<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        let distinct: IndexSet<&str> = terms.iter().map(|t| t.as_ref()).collect();
        for term in distinct {
            *self.term_counts.entry(term.into()).or_insert(0) += 1;
        }
    }

    /// Remove a previously added document's terms from the corpus
    pub fn remove_document<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num = self.doc_num.saturating_sub(1);
        let distinct: IndexSet<&str> = terms.iter().map(|t| t.as_ref()).collect();
        for term in distinct {
            if let Some(count) = self.term_counts.get_mut(term) {
                if *count > 1 {
                    *count -= 1;
                } else {
                    self.term_counts.shift_remove(term);
                }
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the document frequency of a term, 0 if unknown
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_term_once_per_document() {
        let mut corpus = CorpusStats::new();
        corpus.add_document(&["rust", "fast", "rust"]);
        corpus.add_document(&["rust", "safe"]);

        assert_eq!(corpus.doc_num(), 2);
        assert_eq!(corpus.term_count("rust"), 2);
        assert_eq!(corpus.term_count("fast"), 1);
        assert_eq!(corpus.term_count("missing"), 0);
    }

    #[test]
    fn remove_document_drops_unused_terms() {
        let mut corpus = CorpusStats::new();
        corpus.add_document(&["rust", "fast"]);
        corpus.add_document(&["rust", "safe"]);
        corpus.remove_document(&["rust", "fast", "fast"]);

        assert_eq!(corpus.doc_num(), 1);
        assert_eq!(corpus.term_count("rust"), 1);
        assert_eq!(corpus.term_count("fast"), 0);
        assert_eq!(corpus.term_count("safe"), 1);
    }
}
