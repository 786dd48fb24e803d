//! Deadline-to-height resolution.
//!
//! Finds the highest block committed at or before a wall-clock instant. Not
//! a binary search: block times are only approximately regular, so the
//! search estimates from the average interval and refines with
//! time-proportional steps. The step policy below matches the ledger's
//! reference counter; changing it changes which block a near-boundary
//! deadline resolves to.

use crate::error::AuditError;
use pollscan_transport::Ledger;
use pollscan_types::{BlockHeight, Timestamp};

/// Average block interval in chain seconds.
pub const BLOCK_INTERVAL_SECS: i64 = 60;

/// Steps within this many blocks of the boundary collapse to ±1, which
/// guarantees progress once the estimate is close.
const STEP_CLAMP_BLOCKS: i64 = 10;

/// The highest block committed at or before `target`.
///
/// Callers handle the no-deadline case themselves (an open poll has no
/// cutoff and this is never called).
pub async fn height_at<L: Ledger>(
    ledger: &L,
    target: Timestamp,
    now: Timestamp,
) -> Result<BlockHeight, AuditError> {
    let target_chain = target.to_chain_secs();
    let elapsed = now.to_chain_secs() - target_chain;

    let current = ledger.chain_height().await? as i64;
    let mut height = (current - elapsed.div_euclid(BLOCK_INTERVAL_SECS)).max(1);

    loop {
        let block = ledger.block_at(height as u64).await?;
        // Floored division, like the reference: -30s of gap is one block
        // back, not zero.
        let mut step = (target_chain - block.time_stamp).div_euclid(BLOCK_INTERVAL_SECS);
        if step < 0 && step > -STEP_CLAMP_BLOCKS {
            step = -1;
        }
        if (0..=STEP_CLAMP_BLOCKS).contains(&step) {
            step = 1;
        }

        if block.time_stamp <= target_chain {
            let next = ledger.block_at(height as u64 + 1).await?;
            if next.time_stamp > target_chain {
                return Ok(height as u64);
            }
            height += step;
        } else {
            height += step;
        }
        height = height.max(1);
    }
}
