use std::{fs, path::Path};

use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    analyzer::config::Stemming,
    error::{AnalysisError, Result},
    source::{
        corpus::CorpusStats,
        normalize::{self, Normalizer},
        DocumentSource, TermStats, TermVector, TermVectorSource,
    },
};

#[derive(Debug, Clone)]
struct MemoryDocument {
    title: Option<String>,
    /// lowercased surface words, in text order
    words: Vec<String>,
}

/// Document and term-vector source over documents held in memory
///
/// Every stored document is part of the corpus used for document
/// frequencies, whether or not a dataset selects it.
#[derive(Clone, Default)]
pub struct MemoryCorpus {
    documents: IndexMap<String, MemoryDocument>,
    corpus: CorpusStats,
    lemmatizer: Option<Normalizer>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the lemmatizer used for `Stemming::Lemma`
    pub fn with_lemmatizer(mut self, lemmatizer: Normalizer) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    /// Add a document, replacing any previous document with the same id
    pub fn add_document(&mut self, id: &str, title: Option<&str>, text: &str) -> &mut Self {
        self.remove_document(id);
        let words = normalize::words(text);
        self.corpus.add_document(&words);
        self.documents.insert(
            id.to_string(),
            MemoryDocument {
                title: title.map(str::to_string),
                words,
            },
        );
        self
    }

    pub fn remove_document(&mut self, id: &str) {
        if let Some(doc) = self.documents.shift_remove(id) {
            self.corpus.remove_document(&doc.words);
        }
    }

    pub fn contains_document(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Document ids in insertion order
    pub fn document_ids(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Load every `.txt` file of a directory (not recursive)
    ///
    /// The file stem is the document id and the first non-empty line is the
    /// title. Files are added in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut corpus = MemoryCorpus::new();
        corpus.add_dir(dir, "")?;
        Ok(corpus)
    }

    /// Add every `.txt` file of a directory, ids prefixed with `id_prefix`
    ///
    /// # Returns
    /// * `Vec<String>` - ids of the added documents, in file-name order
    pub fn add_dir<P: AsRef<Path>>(&mut self, dir: P, id_prefix: &str) -> Result<Vec<String>> {
        let mut files: Vec<_> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        let mut ids = Vec::with_capacity(files.len());
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!("skipping file with non UTF-8 name: {}", path.display());
                continue;
            };
            let id = format!("{id_prefix}{stem}");
            let content = fs::read_to_string(&path)?;
            let title = content.lines().map(str::trim).find(|l| !l.is_empty());
            self.add_document(&id, title, &content);
            ids.push(id);
        }
        info!("loaded {} documents from {}", ids.len(), dir.as_ref().display());
        Ok(ids)
    }

    fn get(&self, id: &str) -> Result<&MemoryDocument> {
        self.documents
            .get(id)
            .ok_or_else(|| AnalysisError::UnknownDocument(id.to_string()))
    }
}

impl DocumentSource for MemoryCorpus {
    fn fetch_tokens(&self, document_id: &str, ngrams: usize, stemming: Stemming) -> Result<Vec<String>> {
        let doc = self.get(document_id)?;
        let normalizer = stemming.normalizer(self.lemmatizer.as_ref());
        let words = doc.words.iter().map(|w| normalizer(w)).collect();
        Ok(normalize::ngrams(words, ngrams))
    }

    fn fetch_document_title(&self, document_id: &str) -> Result<Option<String>> {
        Ok(self.get(document_id)?.title.clone())
    }
}

impl TermVectorSource for MemoryCorpus {
    fn fetch_corpus_term_vector(&self, document_id: &str) -> Result<TermVector> {
        let doc = self.get(document_id)?;
        let mut vector = TermVector::new();
        for word in &doc.words {
            if !vector.contains_key(word) {
                let document_frequency = self.corpus.term_count(word) as i64;
                vector.insert(word.clone(), TermStats { document_frequency });
            }
        }
        Ok(vector)
    }

    fn corpus_size(&self) -> Result<u64> {
        Ok(self.corpus.doc_num())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn corpus() -> MemoryCorpus {
        let mut corpus = MemoryCorpus::new();
        corpus
            .add_document("d1", Some("First"), "The cats sat. The cats ran.")
            .add_document("d2", None, "A cat sat");
        corpus
    }

    #[test]
    fn fetch_tokens_plain_and_ngrams() {
        let corpus = corpus();
        assert_eq!(
            corpus.fetch_tokens("d1", 1, Stemming::None).unwrap(),
            vec!["the", "cats", "sat", "the", "cats", "ran"]
        );
        assert_eq!(
            corpus.fetch_tokens("d2", 2, Stemming::None).unwrap(),
            vec!["a cat", "cat sat"]
        );
    }

    #[test]
    fn fetch_tokens_stemmed() {
        let corpus = corpus();
        assert_eq!(
            corpus.fetch_tokens("d1", 1, Stemming::Stem).unwrap(),
            vec!["the", "cat", "sat", "the", "cat", "ran"]
        );
    }

    #[test]
    fn fetch_tokens_with_injected_lemmatizer() {
        let corpus = corpus().with_lemmatizer(Arc::new(|w: &str| w.trim_end_matches('s').to_string()));
        assert_eq!(corpus.fetch_tokens("d2", 1, Stemming::Lemma).unwrap(), vec!["a", "cat", "sat"]);
        assert_eq!(corpus.fetch_tokens("d1", 1, Stemming::Lemma).unwrap()[1], "cat");
    }

    #[test]
    fn unknown_document_is_an_error() {
        let corpus = corpus();
        assert!(matches!(
            corpus.fetch_tokens("nope", 1, Stemming::None),
            Err(AnalysisError::UnknownDocument(id)) if id == "nope"
        ));
        assert!(corpus.fetch_document_title("nope").is_err());
        assert!(corpus.fetch_corpus_term_vector("nope").is_err());
    }

    #[test]
    fn titles() {
        let corpus = corpus();
        assert_eq!(corpus.fetch_document_title("d1").unwrap().as_deref(), Some("First"));
        assert_eq!(corpus.fetch_document_title("d2").unwrap(), None);
    }

    #[test]
    fn term_vectors_report_corpus_df() {
        let corpus = corpus();
        let vector = corpus.fetch_corpus_term_vector("d1").unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(vector["sat"].document_frequency, 2);
        assert_eq!(vector["cats"].document_frequency, 1);
        assert_eq!(corpus.corpus_size().unwrap(), 2);
    }

    #[test]
    fn loads_text_files_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "Second Title\nsome words").unwrap();
        fs::write(dir.path().join("a.txt"), "\n  First Title  \nmore words").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let corpus = MemoryCorpus::from_dir(dir.path()).unwrap();
        assert_eq!(corpus.document_ids(), vec!["a", "b"]);
        assert_eq!(corpus.fetch_document_title("a").unwrap().as_deref(), Some("First Title"));
        assert_eq!(
            corpus.fetch_tokens("b", 1, Stemming::None).unwrap(),
            vec!["second", "title", "some", "words"]
        );

        let mut corpus = MemoryCorpus::new();
        let ids = corpus.add_dir(dir.path(), "x/").unwrap();
        assert_eq!(ids, vec!["x/a", "x/b"]);
        assert!(MemoryCorpus::from_dir(dir.path().join("missing")).is_err());
    }

    #[test]
    fn replacing_a_document_updates_the_corpus() {
        let mut corpus = corpus();
        corpus.add_document("d2", None, "dogs ran");
        assert_eq!(corpus.doc_num(), 2);
        assert_eq!(corpus.fetch_corpus_term_vector("d1").unwrap()["sat"].document_frequency, 1);
        assert_eq!(corpus.fetch_corpus_term_vector("d1").unwrap()["ran"].document_frequency, 2);
        assert_eq!(corpus.document_ids(), vec!["d1", "d2"]);
    }

    #[test]
    fn removing_a_document_forgets_it() {
        let mut corpus = corpus();
        assert!(corpus.contains_document("d2"));
        corpus.remove_document("d2");
        assert!(!corpus.contains_document("d2"));
        assert_eq!(corpus.doc_num(), 1);
        assert_eq!(corpus.fetch_corpus_term_vector("d1").unwrap()["sat"].document_frequency, 1);
        assert!(corpus.fetch_tokens("d2", 1, Stemming::None).is_err());
    }
}
