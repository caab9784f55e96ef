pub mod block;
pub mod config;
pub mod frequency;
pub mod plan;
pub mod vocabulary;

use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use indexmap::IndexMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    analyzer::{
        block::{should_close, should_truncate, Block, BlockCursor, BlockStats, OpenBlock},
        config::{AnalyzerConfig, BlockSizing, LastBlock, Settings},
        frequency::{FrequencyAggregator, FrequencyTables},
        plan::BlockPlan,
        vocabulary::VocabularySelector,
    },
    error::Result,
    source::{Dataset, DocumentSource, Progress, TermVector, TermVectorSource},
};

/// Placeholder used in block names for documents without a title
pub const UNTITLED: &str = "Untitled";

/// Word frequency analysis of one dataset
///
/// Built in one synchronous pass by [`AnalyzerBuilder::analyze`]:
/// - fetch every document's token stream (once, upfront)
/// - compute dataset tf/df and, for single words, corpus df
/// - select the word list
/// - cut the token streams into blocks and count word-list tokens per block
///
/// Everything is read-only afterwards.
///
/// # Examples
/// ```
/// use word_frequency_analyzer::{AnalyzerConfig, Dataset, MemoryCorpus, WordFrequencyAnalyzer};
///
/// let mut corpus = MemoryCorpus::new();
/// corpus.add_document("doc1", Some("First"), "the cat sat on the mat");
/// let dataset = Dataset::new("cats", &["doc1"]);
///
/// let analyzer = WordFrequencyAnalyzer::builder(&dataset, &corpus)
///     .analyze(&AnalyzerConfig::default())
///     .unwrap();
/// assert_eq!(analyzer.word_list()[0], "the");
/// assert_eq!(analyzer.num_dataset_tokens(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct WordFrequencyAnalyzer {
    settings: Settings,
    tables: FrequencyTables,
    word_list: Vec<String>,
    blocks: Vec<Block>,
    block_stats: Vec<BlockStats>,
}

/// Serializable view of a finished analysis
#[derive(Serialize, Debug)]
pub struct AnalysisSummary<'a> {
    pub settings: &'a Settings,
    pub word_list: &'a [String],
    pub blocks: &'a [Block],
    pub block_stats: &'a [BlockStats],
    #[serde(flatten)]
    pub tables: &'a FrequencyTables,
}

impl WordFrequencyAnalyzer {
    /// Start building an analysis of `dataset`, reading documents from `documents`
    pub fn builder<'a>(dataset: &'a Dataset, documents: &'a dyn DocumentSource) -> AnalyzerBuilder<'a> {
        AnalyzerBuilder {
            dataset,
            documents,
            term_vectors: None,
            progress: None,
        }
    }

    /// Blocks, in stream order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block summaries, parallel to [`Self::blocks`]
    pub fn block_stats(&self) -> &[BlockStats] {
        &self.block_stats
    }

    /// Analyzed words (or n-grams), in output order
    pub fn word_list(&self) -> &[String] {
        &self.word_list
    }

    pub fn tf_in_dataset(&self) -> &IndexMap<String, u64> {
        &self.tables.tf_in_dataset
    }

    pub fn df_in_dataset(&self) -> &IndexMap<String, u64> {
        &self.tables.df_in_dataset
    }

    /// Empty in n-gram mode or when no term-vector source was given
    pub fn df_in_corpus(&self) -> &IndexMap<String, u64> {
        &self.tables.df_in_corpus
    }

    /// Number of tokens in the dataset (n-grams in n-gram mode)
    pub fn num_dataset_tokens(&self) -> u64 {
        self.tables.num_dataset_tokens
    }

    /// Number of distinct tokens in the dataset
    pub fn num_dataset_types(&self) -> usize {
        self.tables.num_dataset_types
    }

    pub fn tables(&self) -> &FrequencyTables {
        &self.tables
    }

    /// Settings the analysis ran with, after normalization
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn summary(&self) -> AnalysisSummary<'_> {
        AnalysisSummary {
            settings: &self.settings,
            word_list: &self.word_list,
            blocks: &self.blocks,
            block_stats: &self.block_stats,
            tables: &self.tables,
        }
    }
}

/// Inputs of one analysis run
pub struct AnalyzerBuilder<'a> {
    dataset: &'a Dataset,
    documents: &'a dyn DocumentSource,
    term_vectors: Option<&'a dyn TermVectorSource>,
    progress: Option<Progress<'a>>,
}

/// One entry of the word cache
struct CachedDocument {
    title: Option<String>,
    tokens: Vec<String>,
    term_vector: Option<TermVector>,
}

impl<'a> AnalyzerBuilder<'a> {
    /// Source of corpus document frequencies
    pub fn term_vectors(mut self, term_vectors: &'a dyn TermVectorSource) -> Self {
        self.term_vectors = Some(term_vectors);
        self
    }

    /// Advisory progress callback
    pub fn progress(mut self, progress: Progress<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run the analysis
    ///
    /// # Errors
    /// * `AnalysisError::Config` - invalid option combination, raised before
    ///   any document is fetched
    /// * errors of the document or term-vector source, unchanged
    pub fn analyze(self, config: &AnalyzerConfig) -> Result<WordFrequencyAnalyzer> {
        let settings = config.normalize()?;
        info!(
            "analyzing dataset '{}' ({} entries): {:?}, ngrams={}, split_across={}",
            self.dataset.name,
            self.dataset.len(),
            settings.sizing,
            settings.ngrams,
            settings.split_across
        );

        let cache = self.fetch(&settings)?;

        let mut aggregator = match self.term_vectors {
            Some(_) if settings.ngrams == 1 => {
                FrequencyAggregator::with_corpus_stats(settings.stemming.term_vector_normalizer())
            }
            _ => FrequencyAggregator::new(),
        };
        for doc in &cache {
            aggregator.add_document(&doc.tokens);
            if let Some(vector) = &doc.term_vector {
                aggregator.add_term_vector(vector);
            }
        }
        let tables = aggregator.finish();

        let word_list = VocabularySelector::new(&settings).select(&tables);
        debug!(
            "{} types, {} tokens, {} words selected",
            tables.num_dataset_types,
            tables.num_dataset_tokens,
            word_list.len()
        );

        let mut pass = BlockPass::new(&settings, &word_list);
        let total = cache.len();
        if settings.split_across {
            pass.begin_unit(tables.num_dataset_tokens as usize);
        }
        for (i, doc) in cache.iter().enumerate() {
            let label = if settings.split_across {
                self.dataset.name.as_str()
            } else {
                pass.begin_unit(doc.tokens.len());
                doc.title.as_deref().unwrap_or(UNTITLED)
            };
            pass.consume(&doc.tokens, label);
            if !settings.split_across {
                pass.flush(label);
            }
            if let Some(progress) = self.progress {
                progress(i + 1, total, "computing blocks");
            }
        }
        if settings.split_across {
            pass.flush(&self.dataset.name);
        }
        let (blocks, block_stats) = pass.finish();
        info!("dataset '{}' split into {} blocks", self.dataset.name, blocks.len());

        Ok(WordFrequencyAnalyzer {
            settings,
            tables,
            word_list,
            blocks,
            block_stats,
        })
    }

    /// Build the word cache, fanning out over documents
    fn fetch(&self, settings: &Settings) -> Result<Vec<CachedDocument>> {
        let entries: Vec<&str> = self.dataset.unique_entries().into_iter().collect();
        let total = entries.len();
        let done = AtomicUsize::new(0);
        let documents = self.documents;
        let term_vectors = self.term_vectors.filter(|_| settings.ngrams == 1);
        let progress = self.progress;

        entries
            .par_iter()
            .map(|&id| {
                let tokens = documents.fetch_tokens(id, settings.ngrams, settings.stemming)?;
                let title = if settings.split_across {
                    None
                } else {
                    documents.fetch_document_title(id)?
                };
                let term_vector = match term_vectors {
                    Some(source) => Some(source.fetch_corpus_term_vector(id)?),
                    None => None,
                };
                let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(progress) = progress {
                    progress(completed, total, "fetching documents");
                }
                Ok(CachedDocument { title, tokens, term_vector })
            })
            .collect()
    }
}

/// The block-splitting state machine
///
/// Accumulating → (threshold reached) → closing → accumulating, once per
/// unit of segmentation, until the last document is consumed.
struct BlockPass<'s> {
    sizing: BlockSizing,
    last_block: Option<LastBlock>,
    vocabulary: HashSet<&'s str>,
    plan: BlockPlan,
    cursor: BlockCursor,
    open: OpenBlock,
    blocks: Vec<Block>,
    block_stats: Vec<BlockStats>,
    dataset_scope: bool,
}

impl<'s> BlockPass<'s> {
    fn new(settings: &Settings, word_list: &'s [String]) -> Self {
        let plan = BlockPlan::compute(0, &settings.sizing);
        BlockPass {
            sizing: settings.sizing,
            last_block: settings.last_block(),
            vocabulary: word_list.iter().map(String::as_str).collect(),
            plan,
            cursor: BlockCursor::start(&plan),
            open: OpenBlock::new(),
            blocks: Vec::new(),
            block_stats: Vec::new(),
            dataset_scope: settings.split_across,
        }
    }

    /// Plan a new unit of `num_tokens` tokens and restart the block index
    fn begin_unit(&mut self, num_tokens: usize) {
        self.plan = BlockPlan::compute(num_tokens, &self.sizing);
        self.cursor = BlockCursor::start(&self.plan);
    }

    /// Feed a document's tokens into the current unit
    fn consume(&mut self, tokens: &[String], label: &str) {
        for token in tokens {
            if should_truncate(&self.cursor, &self.plan, self.last_block) {
                break;
            }
            self.open.record(token, self.vocabulary.contains(token.as_str()));
            self.cursor.block_tokens += 1;

            if should_close(&self.cursor, &self.plan, self.last_block) {
                self.cursor.remainder_owed = self.cursor.remainder_owed.saturating_sub(1);
                self.close_block(label);
            }
        }
    }

    /// Close the open block if anything is in it
    fn flush(&mut self, label: &str) {
        if self.cursor.block_tokens != 0 {
            self.close_block(label);
        }
    }

    fn close_block(&mut self, label: &str) {
        self.cursor.block_index += 1;
        let name = self.block_name(label);
        let (block, stats) = self.open.close(name, self.cursor.block_tokens);
        self.cursor.block_tokens = 0;
        self.blocks.push(block);
        self.block_stats.push(stats);
    }

    /// Display name of the block just closed (1-based)
    fn block_name(&self, label: &str) -> String {
        let num = self.cursor.block_index;
        let scope = if self.dataset_scope {
            format!("within dataset '{label}'")
        } else {
            format!("within '{label}'")
        };
        match self.sizing {
            BlockSizing::ByCount(_) => format!("Block #{num}/{} ({scope})", self.plan.num_blocks),
            BlockSizing::BySize { block_size, .. } => format!("Block #{num} of {block_size} words ({scope})"),
        }
    }

    fn finish(self) -> (Vec<Block>, Vec<BlockStats>) {
        (self.blocks, self.block_stats)
    }
}
