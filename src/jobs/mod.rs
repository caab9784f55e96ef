//! Analysis jobs built on [`WordFrequencyAnalyzer`].
//!
//! Each job runs one or more analyzers with its own parameterization and
//! turns the result into a CSV report or a serializable value.

pub mod collocation;
pub mod craig_zeta;
pub mod word_frequency;

use crate::{
    analyzer::{config::AnalyzerConfig, WordFrequencyAnalyzer},
    error::Result,
    source::{Dataset, DocumentSource, Progress, TermVectorSource},
};

/// Collaborators shared by every job
#[derive(Clone, Copy)]
pub struct JobContext<'a> {
    pub documents: &'a dyn DocumentSource,
    pub term_vectors: Option<&'a dyn TermVectorSource>,
    pub progress: Option<Progress<'a>>,
}

impl<'a> JobContext<'a> {
    pub fn new(documents: &'a dyn DocumentSource) -> Self {
        JobContext {
            documents,
            term_vectors: None,
            progress: None,
        }
    }

    pub fn with_term_vectors(mut self, term_vectors: &'a dyn TermVectorSource) -> Self {
        self.term_vectors = Some(term_vectors);
        self
    }

    pub fn with_progress(mut self, progress: Progress<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run an analyzer over `dataset` with this context's collaborators
    pub fn analyze(&self, dataset: &Dataset, config: &AnalyzerConfig) -> Result<WordFrequencyAnalyzer> {
        let mut builder = WordFrequencyAnalyzer::builder(dataset, self.documents);
        if let Some(term_vectors) = self.term_vectors {
            builder = builder.term_vectors(term_vectors);
        }
        if let Some(progress) = self.progress {
            builder = builder.progress(progress);
        }
        builder.analyze(config)
    }
}
