use serde::Serialize;

use crate::analyzer::config::{BlockSizing, LastBlock};

/// Block layout for one unit of segmentation (the whole dataset, or one document)
///
/// Whichever of `block_size` / `num_blocks` was chosen by the user is the
/// primary value; the other one is derived from the token count of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockPlan {
    /// tokens per block (before remainder credits)
    pub block_size: usize,
    /// number of blocks the unit is planned to be cut into
    pub num_blocks: usize,
    /// number of leading blocks that receive one extra token
    pub remainder_blocks: usize,
}

impl BlockPlan {
    /// Compute the plan for a unit of `num_tokens` tokens
    ///
    /// # Arguments
    /// * `num_tokens` - token count of the unit
    /// * `sizing` - primary sizing mode
    ///
    /// # Returns
    /// * `BlockPlan` - consistent (block_size, num_blocks, remainder) triple
    pub fn compute(num_tokens: usize, sizing: &BlockSizing) -> Self {
        match *sizing {
            BlockSizing::ByCount(num_blocks) => {
                // ByCount always carries at least one block after normalization
                let num_blocks = num_blocks.max(1);
                let block_size = num_tokens / num_blocks;
                BlockPlan {
                    block_size,
                    num_blocks,
                    remainder_blocks: num_tokens - block_size * num_blocks,
                }
            }
            BlockSizing::BySize { block_size, last_block } => {
                let block_size = block_size.max(1);
                let num_blocks = match last_block {
                    LastBlock::BigLast | LastBlock::TruncateLast => num_tokens / block_size,
                    LastBlock::SmallLast => num_tokens.div_ceil(block_size),
                    LastBlock::TruncateAll => 1,
                };
                BlockPlan {
                    block_size,
                    num_blocks,
                    remainder_blocks: 0,
                }
            }
        }
    }

    /// Is `block_index` the last block this plan calls for
    #[inline]
    pub fn is_final_block(&self, block_index: usize) -> bool {
        self.num_blocks > 0 && block_index == self.num_blocks - 1
    }
}
