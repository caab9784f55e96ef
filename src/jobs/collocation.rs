use std::{fmt, io::Write, str::FromStr};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    analyzer::{config::AnalyzerConfig, WordFrequencyAnalyzer},
    error::{AnalysisError, Result},
    jobs::JobContext,
    source::Dataset,
    utils::{
        export::{csv_safe_cell, report_writer},
        math::xlogy,
    },
};

/// Significance test used to score word pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "mi")]
    MutualInformation,
    #[serde(rename = "t")]
    TTest,
    #[serde(rename = "likelihood")]
    LogLikelihood,
}

impl FromStr for Algorithm {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "mi" => Ok(Algorithm::MutualInformation),
            "t" => Ok(Algorithm::TTest),
            "likelihood" => Ok(Algorithm::LogLikelihood),
            other => Err(AnalysisError::Config(format!("unknown collocation test `{other}`"))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::MutualInformation => write!(f, "Mutual information"),
            Algorithm::TTest => write!(f, "T-test"),
            Algorithm::LogLikelihood => write!(f, "Log-likelihood"),
        }
    }
}

impl Algorithm {
    /// Header of the score column
    pub fn column(self) -> &'static str {
        match self {
            Algorithm::MutualInformation => "Mutual information score",
            Algorithm::TTest => "t statistic",
            Algorithm::LogLikelihood => "Log-likelihood ratio",
        }
    }

    /// Score one pair
    ///
    /// # Arguments
    /// * `f_a` - occurrences of the first word
    /// * `f_b` - occurrences of the second word
    /// * `f_ab` - occurrences of the pair
    /// * `n` - number of word tokens
    ///
    /// # Returns
    /// * `f64` - the score, 0.0 when it is not finite
    pub fn score(self, f_a: f64, f_b: f64, f_ab: f64, n: f64) -> f64 {
        let score = match self {
            Algorithm::MutualInformation => (n * f_ab / (f_a * f_b)).log2(),
            Algorithm::TTest => (f_ab - f_a * f_b / n) / f_ab.sqrt(),
            Algorithm::LogLikelihood => log_likelihood_ratio(f_a, f_b, f_ab, n),
        };
        if score.is_finite() {
            score
        } else {
            0.0
        }
    }
}

/// Binomial log-likelihood of `k` successes in `n` trials at probability `x`
#[inline]
fn binomial_log_likelihood(k: f64, n: f64, x: f64) -> f64 {
    xlogy(k, x) + xlogy(n - k, 1.0 - x)
}

/// Dunning's `-2 log λ`
fn log_likelihood_ratio(f_a: f64, f_b: f64, f_ab: f64, n: f64) -> f64 {
    let p = f_b / n;
    let p1 = f_ab / f_a;
    let p2 = (f_b - f_ab) / (n - f_a);

    let log_lambda = binomial_log_likelihood(f_ab, f_a, p)
        + binomial_log_likelihood(f_b - f_ab, n - f_a, p)
        - binomial_log_likelihood(f_ab, f_a, p1)
        - binomial_log_likelihood(f_b - f_ab, n - f_a, p2);
    -2.0 * log_lambda
}

/// Collocation options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollocationConfig {
    pub algorithm: Algorithm,
    /// number of pairs to report
    pub num_pairs: usize,
    /// only report pairs containing this word
    pub focal_word: Option<String>,
}

impl Default for CollocationConfig {
    fn default() -> Self {
        CollocationConfig {
            algorithm: Algorithm::MutualInformation,
            num_pairs: 50,
            focal_word: None,
        }
    }
}

/// Scored word pairs, best first
pub type Collocations = Vec<(String, f64)>;

/// Find the most significant word pairs of `dataset`
pub fn run(context: &JobContext<'_>, dataset: &Dataset, config: &CollocationConfig) -> Result<Collocations> {
    let words = context.analyze(
        dataset,
        &AnalyzerConfig {
            num_blocks: 1,
            split_across: true,
            ..Default::default()
        },
    )?;
    let bigrams = context.analyze(
        dataset,
        &AnalyzerConfig {
            num_blocks: 1,
            split_across: true,
            ngrams: 2,
            inclusion_list: config.focal_word.as_ref().map(|w| vec![w.to_lowercase()]),
            ..Default::default()
        },
    )?;

    let pairs = score_pairs(&words, &bigrams, config);
    info!(
        "collocations for '{}' ({}): {} of {} pairs kept",
        dataset.name,
        config.algorithm,
        pairs.len(),
        bigrams.word_list().len()
    );
    Ok(pairs)
}

/// Score every bigram of `bigrams` against the word counts of `words`
pub fn score_pairs(
    words: &WordFrequencyAnalyzer,
    bigrams: &WordFrequencyAnalyzer,
    config: &CollocationConfig,
) -> Collocations {
    let n = words.num_dataset_tokens() as f64;
    let tf = |word: &str| words.tf_in_dataset().get(word).copied().unwrap_or(0) as f64;

    let mut pairs: Collocations = bigrams
        .word_list()
        .iter()
        .filter_map(|gram| {
            let (a, b) = gram.split_once(' ')?;
            let f_ab = bigrams.tf_in_dataset().get(gram).copied().unwrap_or(0) as f64;
            Some((gram.clone(), config.algorithm.score(tf(a), tf(b), f_ab, n)))
        })
        .collect();

    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(config.num_pairs);
    pairs
}

/// Write scored pairs as a CSV report
pub fn write_report<W: Write>(dataset: &Dataset, algorithm: Algorithm, pairs: &[(String, f64)], out: W) -> Result<()> {
    let mut wtr = report_writer(out);
    wtr.write_record([csv_safe_cell(format!("Collocation analysis for \"{}\"", dataset.name))])?;
    wtr.write_record([format!("Significance test: {algorithm}")])?;
    wtr.write_record([""])?;
    wtr.write_record(["Word pair", algorithm.column()])?;
    for (pair, score) in pairs {
        wtr.write_record([csv_safe_cell(pair.clone()), score.to_string()])?;
    }
    wtr.write_record([""])?;
    wtr.flush()?;
    Ok(())
}
