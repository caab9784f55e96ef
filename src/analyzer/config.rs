//! Analyzer options and their normalization.
//!
//! `AnalyzerConfig` is the raw option set as a caller (or a JSON job
//! document) supplies it. Out-of-range values never fail; they are clamped
//! by [`AnalyzerConfig::normalize`] into a validated [`Settings`]:
//!
//! | option | fallback |
//! |---|---|
//! | `num_blocks < 0`, `block_size < 0` | treated as 0 |
//! | `num_blocks > 0 && block_size > 0` | `block_size` ignored, count mode wins |
//! | `num_blocks <= 0 && block_size <= 0` | `num_blocks = 1` |
//! | `ngrams < 1` | 1 |
//! | `num_words < 0` | 0 (unbounded) |
//! | unknown `stemming` | `none` |
//! | unknown `last_block` | `big_last` |
//! | blank word list entries | dropped, an empty list becomes `None` |
//! | stop list without words | `None` |
//!
//! The only hard failure is a stop list combined with `ngrams > 1`.

use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AnalysisError, Result};

/// What happens to the leftover tokens when splitting by block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LastBlock {
    /// fold the leftovers into the last block
    #[default]
    BigLast,
    /// leftovers form their own, smaller block
    SmallLast,
    /// drop the leftovers
    TruncateLast,
    /// keep only the first block of every unit
    TruncateAll,
}

impl FromStr for LastBlock {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "big_last" => Ok(LastBlock::BigLast),
            "small_last" => Ok(LastBlock::SmallLast),
            "truncate_last" => Ok(LastBlock::TruncateLast),
            "truncate_all" => Ok(LastBlock::TruncateAll),
            other => Err(AnalysisError::Config(format!("unknown last_block value `{other}`"))),
        }
    }
}

impl LastBlock {
    #[inline]
    pub fn truncates(self) -> bool {
        matches!(self, LastBlock::TruncateLast | LastBlock::TruncateAll)
    }
}

/// Token normalization applied by the document source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stemming {
    #[default]
    None,
    /// Porter stemming
    Stem,
    /// Lemmatization through an injected lemmatizer
    Lemma,
}

impl FromStr for Stemming {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "none" => Ok(Stemming::None),
            "stem" => Ok(Stemming::Stem),
            "lemma" => Ok(Stemming::Lemma),
            other => Err(AnalysisError::Config(format!("unknown stemming value `{other}`"))),
        }
    }
}

impl fmt::Display for Stemming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stemming::None => write!(f, "none"),
            Stemming::Stem => write!(f, "stem"),
            Stemming::Lemma => write!(f, "lemma"),
        }
    }
}

/// A list of common words to exclude from analysis, for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopList {
    pub language: String,
    pub words: Vec<String>,
}

impl StopList {
    pub fn new<T: AsRef<str>>(language: &str, words: &[T]) -> Self {
        StopList {
            language: language.to_string(),
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }

    /// Build a stop list from its stored form, a whitespace-separated string
    pub fn parse(language: &str, list: &str) -> Self {
        StopList {
            language: language.to_string(),
            words: list.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Split a user-supplied word list on whitespace and commas
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw analyzer options, as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// split into this many equally sized blocks
    pub num_blocks: i64,
    /// split into blocks of this many tokens
    pub block_size: i64,
    /// treat the whole dataset as one token stream
    pub split_across: bool,
    /// n-gram size, 1 for single words
    pub ngrams: i64,
    /// keep only this many words, 0 for all of them
    pub num_words: i64,
    #[serde(deserialize_with = "lenient")]
    pub stemming: Stemming,
    #[serde(deserialize_with = "lenient")]
    pub last_block: LastBlock,
    #[serde(deserialize_with = "word_list")]
    pub inclusion_list: Option<Vec<String>>,
    #[serde(deserialize_with = "word_list")]
    pub exclusion_list: Option<Vec<String>>,
    pub stop_list: Option<StopList>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_blocks: 0,
            block_size: 0,
            split_across: true,
            ngrams: 1,
            num_words: 0,
            stemming: Stemming::None,
            last_block: LastBlock::BigLast,
            inclusion_list: None,
            exclusion_list: None,
            stop_list: None,
        }
    }
}

/// Primary sizing mode, exactly one of the two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockSizing {
    ByCount(usize),
    BySize { block_size: usize, last_block: LastBlock },
}

/// Validated analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub sizing: BlockSizing,
    pub split_across: bool,
    pub ngrams: usize,
    pub num_words: usize,
    pub stemming: Stemming,
    pub inclusion_list: Option<Vec<String>>,
    pub exclusion_list: Option<Vec<String>>,
    pub stop_list: Option<StopList>,
}

impl Settings {
    /// The last-block policy, absent in count mode
    #[inline]
    pub fn last_block(&self) -> Option<LastBlock> {
        match self.sizing {
            BlockSizing::ByCount(_) => None,
            BlockSizing::BySize { last_block, .. } => Some(last_block),
        }
    }
}

impl AnalyzerConfig {
    /// Clamp every option into range and check the option combination
    ///
    /// # Returns
    /// * `Settings` - validated settings
    ///
    /// # Errors
    /// * `AnalysisError::Config` - a stop list was combined with n-grams
    pub fn normalize(&self) -> Result<Settings> {
        let mut num_blocks = self.num_blocks.max(0) as usize;
        let block_size = self.block_size.max(0) as usize;
        if num_blocks > 0 && block_size > 0 {
            warn!("both num_blocks ({num_blocks}) and block_size ({block_size}) set, using num_blocks");
        }
        if num_blocks == 0 && block_size == 0 {
            num_blocks = 1;
        }
        let sizing = if num_blocks > 0 {
            BlockSizing::ByCount(num_blocks)
        } else {
            BlockSizing::BySize { block_size, last_block: self.last_block }
        };

        if self.ngrams < 1 {
            warn!("ngrams = {} is out of range, using 1", self.ngrams);
        }
        let ngrams = self.ngrams.max(1) as usize;

        let stop_list = self.stop_list.clone().and_then(|list| {
            let words: Vec<String> = list.words.iter()
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
            (!words.is_empty()).then_some(StopList { language: list.language, words })
        });
        if stop_list.is_some() && ngrams != 1 {
            return Err(AnalysisError::Config("cannot set both ngrams > 1 and stop_list".to_string()));
        }

        Ok(Settings {
            sizing,
            split_across: self.split_across,
            ngrams,
            num_words: self.num_words.max(0) as usize,
            stemming: self.stemming,
            inclusion_list: clean_list(self.inclusion_list.as_deref()),
            exclusion_list: clean_list(self.exclusion_list.as_deref()),
            stop_list,
        })
    }
}

fn clean_list(list: Option<&[String]>) -> Option<Vec<String>> {
    let words: Vec<String> = list?
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    (!words.is_empty()).then_some(words)
}

/// Parse an enum option from a string, falling back to its default
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn!("unrecognized option value `{s}`, using default");
            T::default()
        }),
        None => T::default(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordListInput {
    Text(String),
    Words(Vec<String>),
}

/// Word lists arrive either as a JSON array or as one comma/space separated string
fn word_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WordListInput>::deserialize(deserializer)? {
        Some(WordListInput::Text(text)) => Some(parse_word_list(&text)),
        Some(WordListInput::Words(words)) => Some(words),
        None => None,
    })
}
