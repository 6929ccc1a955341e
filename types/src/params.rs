//! Protocol parameters shared by the relayer, verifier and ledger.

use crate::Stake;
use serde::{Deserialize, Serialize};

/// Fixed-point base for percentages: `10^18` is 100%.
pub const PCT_BASE: u128 = 1_000_000_000_000_000_000;

/// Economic and timing parameters of a relay deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// How long a proposal accepts batches after it starts (seconds).
    pub vote_time_secs: u64,

    /// How long after submission a batch may be challenged (seconds).
    pub challenge_window_secs: u64,

    /// Collateral moved from the relayer bond to a successful challenger.
    pub slashing_cost: Stake,

    /// Records per batch before the relayer submits automatically.
    pub max_batch_size: usize,

    /// Share of `yea / (yea + nay)` required to pass, in `PCT_BASE` units.
    pub support_required_pct: u128,

    /// Share of `yea / voting_power` required to pass, in `PCT_BASE` units.
    pub min_accept_quorum_pct: u128,
}

impl ProtocolParams {
    /// One week, the challenge window of the reference deployment.
    pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 7 * 24 * 3600;

    pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

    /// Whether `support_required_pct` and `min_accept_quorum_pct` are coherent:
    /// `quorum <= support < 100%`.
    pub fn thresholds_are_valid(&self) -> bool {
        self.min_accept_quorum_pct <= self.support_required_pct
            && self.support_required_pct < PCT_BASE
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            vote_time_secs: 7 * 24 * 3600,
            challenge_window_secs: Self::DEFAULT_CHALLENGE_WINDOW_SECS,
            slashing_cost: Stake::from_units(1000, 18),
            max_batch_size: Self::DEFAULT_MAX_BATCH_SIZE,
            support_required_pct: PCT_BASE / 100 * 60, // 60%
            min_accept_quorum_pct: PCT_BASE / 100 * 50, // 50%
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        assert!(ProtocolParams::default().thresholds_are_valid());
    }

    #[test]
    fn support_of_one_hundred_percent_is_invalid() {
        let params = ProtocolParams {
            support_required_pct: PCT_BASE,
            ..ProtocolParams::default()
        };
        assert!(!params.thresholds_are_valid());
    }

    #[test]
    fn quorum_above_support_is_invalid() {
        let params = ProtocolParams {
            support_required_pct: PCT_BASE / 2,
            min_accept_quorum_pct: PCT_BASE / 2 + 1,
            ..ProtocolParams::default()
        };
        assert!(!params.thresholds_are_valid());
    }
}
