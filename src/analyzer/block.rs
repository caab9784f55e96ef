use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::analyzer::{config::LastBlock, plan::BlockPlan};

/// Counts of word-list tokens within one block
pub type Block = IndexMap<String, u64>;

/// Summary of one block
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockStats {
    /// display name
    pub name: String,
    /// distinct tokens seen, including tokens outside the word list
    pub types: usize,
    /// tokens seen, including tokens outside the word list
    pub tokens: u64,
}

impl BlockStats {
    /// types / tokens, 0.0 for an empty block
    #[inline]
    pub fn type_token_ratio(&self) -> f64 {
        if self.tokens == 0 {
            return 0.0;
        }
        self.types as f64 / self.tokens as f64
    }
}

/// Running position within the current unit of segmentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockCursor {
    /// blocks closed so far in this unit
    pub block_index: usize,
    /// tokens consumed by the open block
    pub block_tokens: usize,
    /// leading blocks still owed one extra token
    pub remainder_owed: usize,
}

impl BlockCursor {
    /// Cursor at the start of a unit planned by `plan`
    pub fn start(plan: &BlockPlan) -> Self {
        BlockCursor {
            block_index: 0,
            block_tokens: 0,
            remainder_owed: plan.remainder_blocks,
        }
    }
}

/// Should the rest of the unit be skipped before consuming the next token
///
/// Only the truncating policies stop early, once the planned number of blocks
/// has been closed.
#[inline]
pub fn should_truncate(cursor: &BlockCursor, plan: &BlockPlan, last_block: Option<LastBlock>) -> bool {
    last_block.is_some_and(LastBlock::truncates) && cursor.block_index == plan.num_blocks
}

/// Should the open block be closed after the token just consumed
///
/// The threshold is `block_size`, or `block_size + 1` while remainder blocks
/// are still owed. Under `big_last` the final planned block never closes
/// early; it absorbs the rest of the unit.
#[inline]
pub fn should_close(cursor: &BlockCursor, plan: &BlockPlan, last_block: Option<LastBlock>) -> bool {
    if last_block == Some(LastBlock::BigLast) && plan.is_final_block(cursor.block_index) {
        return false;
    }
    let threshold = if cursor.remainder_owed > 0 {
        plan.block_size + 1
    } else {
        plan.block_size
    };
    cursor.block_tokens >= threshold
}

/// Block being filled
#[derive(Debug, Default)]
pub struct OpenBlock {
    counts: Block,
    types: HashSet<String>,
}

impl OpenBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one token; only word-list tokens are counted in the block itself
    #[inline]
    pub fn record(&mut self, token: &str, in_word_list: bool) {
        if in_word_list {
            *self.counts.entry(token.to_string()).or_insert(0) += 1;
        }
        if !self.types.contains(token) {
            self.types.insert(token.to_string());
        }
    }

    /// Snapshot the block and reset for the next one
    pub fn close(&mut self, name: String, tokens: usize) -> (Block, BlockStats) {
        let stats = BlockStats {
            name,
            types: self.types.len(),
            tokens: tokens as u64,
        };
        self.types.clear();
        (std::mem::take(&mut self.counts), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::config::BlockSizing;

    fn plan_by_size(num_tokens: usize, block_size: usize, last_block: LastBlock) -> BlockPlan {
        BlockPlan::compute(num_tokens, &BlockSizing::BySize { block_size, last_block })
    }

    /// Drive the close decision over `num_tokens` tokens and return the block sizes
    fn simulate(num_tokens: usize, plan: BlockPlan, last_block: Option<LastBlock>) -> Vec<usize> {
        let mut cursor = BlockCursor::start(&plan);
        let mut sizes = Vec::new();
        for _ in 0..num_tokens {
            if should_truncate(&cursor, &plan, last_block) {
                break;
            }
            cursor.block_tokens += 1;
            if should_close(&cursor, &plan, last_block) {
                cursor.remainder_owed = cursor.remainder_owed.saturating_sub(1);
                sizes.push(cursor.block_tokens);
                cursor.block_tokens = 0;
                cursor.block_index += 1;
            }
        }
        if cursor.block_tokens > 0 {
            sizes.push(cursor.block_tokens);
        }
        sizes
    }

    #[test]
    fn remainder_is_spread_over_leading_blocks() {
        let plan = BlockPlan::compute(103, &BlockSizing::ByCount(10));
        let sizes = simulate(103, plan, None);
        assert_eq!(sizes, vec![11, 11, 11, 10, 10, 10, 10, 10, 10, 10]);
    }

    #[test]
    fn threshold_includes_remainder_credit() {
        let plan = BlockPlan { block_size: 10, num_blocks: 10, remainder_blocks: 3 };
        let cursor = BlockCursor { block_index: 0, block_tokens: 10, remainder_owed: 1 };
        assert!(!should_close(&cursor, &plan, None));
        let cursor = BlockCursor { block_tokens: 11, ..cursor };
        assert!(should_close(&cursor, &plan, None));
        let cursor = BlockCursor { block_tokens: 10, remainder_owed: 0, ..cursor };
        assert!(should_close(&cursor, &plan, None));
    }

    #[test]
    fn big_last_never_closes_the_final_block() {
        let plan = plan_by_size(1050, 500, LastBlock::BigLast);
        let cursor = BlockCursor { block_index: 1, block_tokens: 549, remainder_owed: 0 };
        assert!(!should_close(&cursor, &plan, Some(LastBlock::BigLast)));
        assert_eq!(simulate(1050, plan, Some(LastBlock::BigLast)), vec![500, 550]);
    }

    #[test]
    fn small_last_makes_a_short_block() {
        let plan = plan_by_size(1050, 500, LastBlock::SmallLast);
        assert_eq!(simulate(1050, plan, Some(LastBlock::SmallLast)), vec![500, 500, 50]);
    }

    #[test]
    fn truncate_last_drops_leftovers() {
        let plan = plan_by_size(1050, 500, LastBlock::TruncateLast);
        let cursor = BlockCursor { block_index: 2, block_tokens: 0, remainder_owed: 0 };
        assert!(should_truncate(&cursor, &plan, Some(LastBlock::TruncateLast)));
        assert!(!should_truncate(&cursor, &plan, Some(LastBlock::BigLast)));
        assert!(!should_truncate(&cursor, &plan, None));
        assert_eq!(simulate(1050, plan, Some(LastBlock::TruncateLast)), vec![500, 500]);
    }

    #[test]
    fn truncate_all_keeps_one_block() {
        let plan = plan_by_size(1050, 500, LastBlock::TruncateAll);
        assert_eq!(simulate(1050, plan, Some(LastBlock::TruncateAll)), vec![500]);
    }

    #[test]
    fn short_unit_under_big_last_is_one_block() {
        let plan = plan_by_size(40, 500, LastBlock::BigLast);
        assert_eq!(simulate(40, plan, Some(LastBlock::BigLast)), vec![40]);
    }

    #[test]
    fn short_unit_under_truncate_last_is_dropped() {
        let plan = plan_by_size(40, 500, LastBlock::TruncateLast);
        assert!(simulate(40, plan, Some(LastBlock::TruncateLast)).is_empty());
    }

    #[test]
    fn open_block_counts_word_list_tokens_and_all_types() {
        let mut block = OpenBlock::new();
        block.record("a", true);
        block.record("b", false);
        block.record("a", true);
        block.record("c", false);
        let (counts, stats) = block.close("Block #1".to_string(), 4);
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), None);
        assert_eq!(stats, BlockStats { name: "Block #1".to_string(), types: 3, tokens: 4 });
        assert!((stats.type_token_ratio() - 0.75).abs() < 1e-12);

        let (counts, stats) = block.close("Block #2".to_string(), 0);
        assert!(counts.is_empty());
        assert_eq!(stats.types, 0);
        assert_eq!(stats.type_token_ratio(), 0.0);
    }
}
