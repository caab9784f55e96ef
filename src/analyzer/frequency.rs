use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::source::{normalize::Normalizer, TermVector};

///  TokenFrequency 構造体
/// occurrence counts of the tokens of one stream, in first-seen order
///
/// # Examples
/// ```
/// use word_frequency_analyzer::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_tokens(&["the", "cat", "the"]);
///
/// let counts: Vec<(&str, u64)> = token_freq.iter().collect();
/// assert_eq!(counts, vec![("the", 2), ("cat", 1)]);
/// ```
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    token_count: IndexMap<String, u64>,
}

/// Tokenの追加
impl TokenFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// tokenを追加する
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        match self.token_count.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_count.insert(token.to_string(), 1);
            }
        }
        self
    }

    /// 複数のtokenを追加する
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// TokenFrequencyの情報を取得するための実装
impl TokenFrequency {
    /// (token, count) in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}

/// Dataset-wide frequency tables
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FrequencyTables {
    /// token -> occurrences in the dataset
    pub tf_in_dataset: IndexMap<String, u64>,
    /// token -> number of dataset documents containing it
    pub df_in_dataset: IndexMap<String, u64>,
    /// word -> number of corpus documents containing it.
    /// empty in n-gram mode or without a term-vector source
    pub df_in_corpus: IndexMap<String, u64>,
    pub num_dataset_types: usize,
    pub num_dataset_tokens: u64,
}

impl FrequencyTables {
    /// Tokens sorted by descending dataset tf, ties in first-seen order
    pub fn sorted_by_tf(&self) -> Vec<&str> {
        let mut pairs: Vec<(&str, u64)> = self.tf_in_dataset
            .iter()
            .map(|(token, &tf)| (token.as_str(), tf))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs.into_iter().map(|(token, _)| token).collect()
    }
}

/// Builds [`FrequencyTables`] from one scan over the dataset
pub struct FrequencyAggregator {
    tables: FrequencyTables,
    corpus_normalizer: Option<Normalizer>,
    bogus_df_values: usize,
}

impl FrequencyAggregator {
    /// Aggregator without corpus statistics
    pub fn new() -> Self {
        FrequencyAggregator {
            tables: FrequencyTables::default(),
            corpus_normalizer: None,
            bogus_df_values: 0,
        }
    }

    /// Aggregator that also records corpus document frequencies
    ///
    /// # Arguments
    /// * `normalizer` - applied to term-vector words so they match dataset tokens
    pub fn with_corpus_stats(normalizer: Normalizer) -> Self {
        FrequencyAggregator {
            corpus_normalizer: Some(normalizer),
            ..Self::new()
        }
    }

    /// Count one document's token stream
    pub fn add_document<T>(&mut self, tokens: &[T])
    where
        T: AsRef<str>,
    {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(tokens);
        for (token, count) in freq.iter() {
            match self.tables.tf_in_dataset.get_mut(token) {
                Some(tf) => *tf += count,
                None => {
                    self.tables.tf_in_dataset.insert(token.to_string(), count);
                }
            }
            *self.tables.df_in_dataset.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    /// Record corpus document frequencies from one document's term vector
    ///
    /// The first positive df seen for a word wins. Sources report zero or
    /// negative df for some words; those values are skipped.
    pub fn add_term_vector(&mut self, vector: &TermVector) {
        let Some(normalizer) = &self.corpus_normalizer else {
            return;
        };
        for (word, stats) in vector {
            if stats.document_frequency <= 0 {
                self.bogus_df_values += 1;
                continue;
            }
            let word = normalizer(word);
            if !self.tables.df_in_corpus.contains_key(&word) {
                self.tables.df_in_corpus.insert(word, stats.document_frequency as u64);
            }
        }
    }

    /// Finish the scan and compute the derived counts
    pub fn finish(mut self) -> FrequencyTables {
        if self.bogus_df_values > 0 {
            debug!("skipped {} non-positive corpus df values", self.bogus_df_values);
        }
        let tf = &self.tables.tf_in_dataset;
        self.tables.df_in_corpus.retain(|word, _| tf.contains_key(word));
        self.tables.num_dataset_types = self.tables.tf_in_dataset.len();
        self.tables.num_dataset_tokens = self.tables.tf_in_dataset.values().sum();
        self.tables
    }
}

impl Default for FrequencyAggregator {
    fn default() -> Self {
        Self::new()
    }
}
