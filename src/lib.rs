/// This crate is a Word Frequency Analysis Engine for document datasets.
pub mod analyzer;
pub mod error;
pub mod jobs;
pub mod source;
pub mod utils;

/// Word Frequency Analyzer
/// The top-level struct of this crate. It takes a dataset (a named list of
/// document ids), splits the documents' token streams into blocks and
/// computes frequency statistics over them.
///
/// Internally, it holds:
/// - Term frequency and document frequency of every token in the dataset
/// - Corpus document frequency of every dataset word (single words only)
/// - The selected word list
/// - Per-block counts of word-list tokens, and per-block type/token stats
///
/// All of it is computed in one pass by `AnalyzerBuilder::analyze` and is
/// read-only afterwards.
///
/// Block splitting supports:
/// - a fixed number of blocks, with the remainder spread over the first blocks
/// - a fixed block size, with a policy for the leftover tokens (`LastBlock`)
/// - splitting across the whole dataset or within each document
pub use analyzer::{AnalyzerBuilder, WordFrequencyAnalyzer};

/// Analyzer options
/// `AnalyzerConfig` is what callers supply; every out-of-range value is
/// clamped by `normalize` into `Settings`.
pub use analyzer::config::{AnalyzerConfig, LastBlock, Settings, Stemming, StopList};

/// Block structures
/// - `Block`: word -> count for the word-list tokens of one block
/// - `BlockStats`: display name, types and tokens of one block
pub use analyzer::block::{Block, BlockStats};

/// Token Frequency structure
/// A struct for analyzing/managing token occurrence frequency within a token
/// stream. It manages:
/// - The count of occurrences of each token
/// - The total number of tokens
pub use analyzer::frequency::{FrequencyTables, TokenFrequency};

/// Error type of every fallible operation of this crate
pub use error::{AnalysisError, Result};

/// Collaborator traits and the in-memory corpus
/// The analyzer reads token streams and titles from a `DocumentSource`, and
/// corpus document frequencies from a `TermVectorSource`.
/// `MemoryCorpus` implements both over documents held in memory.
pub use source::{memory::MemoryCorpus, Dataset, DocumentSource, TermStats, TermVector, TermVectorSource};
