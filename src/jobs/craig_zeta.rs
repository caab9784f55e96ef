use std::collections::HashSet;

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    analyzer::{
        block::Block,
        config::{AnalyzerConfig, LastBlock},
        WordFrequencyAnalyzer,
    },
    error::Result,
    jobs::JobContext,
    source::Dataset,
    utils::math::ratio,
};

/// Craig Zeta options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraigZetaConfig {
    /// tokens per block
    pub block_size: i64,
    /// maximum number of marker (and anti-marker) words
    pub max_markers: usize,
}

impl Default for CraigZetaConfig {
    fn default() -> Self {
        CraigZetaConfig {
            block_size: 500,
            max_markers: 1000,
        }
    }
}

/// One block plotted against the marker lists
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GraphPoint {
    /// `"{dataset}: {n}"`, 1-based
    pub label: String,
    /// fraction of the block's distinct words that are marker words
    pub marker_fraction: f64,
    /// fraction of the block's distinct words that are anti-marker words
    pub anti_marker_fraction: f64,
}

/// Result of a Craig Zeta comparison
#[derive(Serialize, Debug, Clone)]
pub struct CraigZetaResult {
    pub name_1: String,
    pub name_2: String,
    /// words typical of the first dataset, most typical first
    pub marker_words: Vec<String>,
    /// words typical of the second dataset, most typical (lowest zeta) first
    pub anti_marker_words: Vec<String>,
    pub graph_points: Vec<GraphPoint>,
    /// word -> zeta score, in ranking order
    pub zeta_scores: IndexMap<String, f64>,
}

/// Compare two datasets with Craig's Zeta
///
/// Both datasets are cut into `block_size` blocks across document
/// boundaries, leftovers folded into the last block.
pub fn run(
    context: &JobContext<'_>,
    dataset_1: &Dataset,
    dataset_2: &Dataset,
    config: &CraigZetaConfig,
) -> Result<CraigZetaResult> {
    let analyzer_config = AnalyzerConfig {
        block_size: config.block_size,
        split_across: true,
        last_block: LastBlock::BigLast,
        ..Default::default()
    };
    let analyzer_1 = context.analyze(dataset_1, &analyzer_config)?;
    let analyzer_2 = context.analyze(dataset_2, &analyzer_config)?;

    let result = compare(
        (dataset_1.name.as_str(), &analyzer_1),
        (dataset_2.name.as_str(), &analyzer_2),
        config.max_markers,
    );
    info!(
        "craig zeta '{}' vs '{}': {} scored words, {} markers",
        result.name_1,
        result.name_2,
        result.zeta_scores.len(),
        result.marker_words.len()
    );
    Ok(result)
}

/// Score the words of two finished analyses
///
/// Words present in every block of both analyses carry no signal and are
/// dropped. Zeta is the fraction of first-dataset blocks containing the
/// word plus the fraction of second-dataset blocks not containing it.
///
/// Scores are ranked in one descending order: markers are the highest
/// scores, anti-markers the lowest scores, lowest first.
pub fn compare(
    (name_1, analyzer_1): (&str, &WordFrequencyAnalyzer),
    (name_2, analyzer_2): (&str, &WordFrequencyAnalyzer),
    max_markers: usize,
) -> CraigZetaResult {
    let blocks_1 = analyzer_1.blocks();
    let blocks_2 = analyzer_2.blocks();

    let mut block_counts: IndexMap<&str, usize> = IndexMap::new();
    for block in blocks_1.iter().chain(blocks_2) {
        for word in block.keys() {
            *block_counts.entry(word.as_str()).or_insert(0) += 1;
        }
    }
    let max_count = blocks_1.len() + blocks_2.len();
    block_counts.retain(|_, count| *count != max_count);

    let contains = |blocks: &[Block], word: &str| blocks.iter().filter(|b| b.contains_key(word)).count();
    let scored: Vec<(&str, f64)> = block_counts
        .keys()
        .map(|&word| {
            let a_frac = ratio(contains(blocks_1, word), blocks_1.len());
            let not_b_frac = ratio(blocks_2.len() - contains(blocks_2, word), blocks_2.len());
            (word, a_frac + not_b_frac)
        })
        .collect();

    // from 2 (only in the first dataset) down to 0 (only in the second)
    let mut ranked = scored;
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let size = if ranked.len() < 2 * max_markers {
        ranked.len() / 2
    } else {
        max_markers
    };
    let marker_words: Vec<String> = ranked.iter().take(size).map(|(w, _)| w.to_string()).collect();
    let anti_marker_words: Vec<String> = ranked.iter().rev().take(size).map(|(w, _)| w.to_string()).collect();

    let markers: HashSet<&str> = marker_words.iter().map(String::as_str).collect();
    let anti_markers: HashSet<&str> = anti_marker_words.iter().map(String::as_str).collect();
    let fraction = |block: &Block, words: &HashSet<&str>| {
        ratio(block.keys().filter(|w| words.contains(w.as_str())).count(), block.len())
    };
    let mut graph_points = Vec::with_capacity(max_count);
    for (name, blocks) in [(name_1, blocks_1), (name_2, blocks_2)] {
        for (i, block) in blocks.iter().enumerate() {
            graph_points.push(GraphPoint {
                label: format!("{name}: {}", i + 1),
                marker_fraction: fraction(block, &markers),
                anti_marker_fraction: fraction(block, &anti_markers),
            });
        }
    }

    CraigZetaResult {
        name_1: name_1.to_string(),
        name_2: name_2.to_string(),
        marker_words,
        anti_marker_words,
        graph_points,
        zeta_scores: ranked.into_iter().map(|(w, z)| (w.to_string(), z)).collect(),
    }
}
