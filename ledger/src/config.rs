//! Ledger configuration with TOML file support.

use crate::LedgerError;
use serde::{Deserialize, Serialize};
use svrp_types::{Address, ProtocolParams, Stake, PCT_BASE};

/// Configuration for a reference ballot ledger.
///
/// Percentages are in `PCT_BASE` (`10^18` = 100%) units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Address of the ballot; vote records carry its fingerprint.
    pub ballot: Address,

    /// The only address allowed to submit batches.
    pub relayer: Address,

    /// How long a proposal accepts batches (seconds).
    #[serde(default = "default_vote_time_secs")]
    pub vote_time_secs: u64,

    /// How long a batch can be challenged after submission (seconds).
    #[serde(default = "default_challenge_window_secs")]
    pub challenge_window_secs: u64,

    /// Collateral paid to a successful challenger.
    #[serde(default = "default_slashing_cost")]
    pub slashing_cost: Stake,

    /// Required `yea / (yea + nay)` for new proposals.
    #[serde(default = "default_support_required_pct")]
    pub support_required_pct: u64,

    /// Required `yea / voting_power` for new proposals.
    #[serde(default = "default_min_accept_quorum_pct")]
    pub min_accept_quorum_pct: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_vote_time_secs() -> u64 {
    ProtocolParams::default().vote_time_secs
}

fn default_challenge_window_secs() -> u64 {
    ProtocolParams::DEFAULT_CHALLENGE_WINDOW_SECS
}

fn default_slashing_cost() -> Stake {
    ProtocolParams::default().slashing_cost
}

fn default_support_required_pct() -> u64 {
    (PCT_BASE / 100 * 60) as u64
}

fn default_min_accept_quorum_pct() -> u64 {
    (PCT_BASE / 100 * 50) as u64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LedgerConfig {
    pub fn new(ballot: Address, relayer: Address) -> Self {
        Self {
            ballot,
            relayer,
            vote_time_secs: default_vote_time_secs(),
            challenge_window_secs: default_challenge_window_secs(),
            slashing_cost: default_slashing_cost(),
            support_required_pct: default_support_required_pct(),
            min_accept_quorum_pct: default_min_accept_quorum_pct(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// The protocol parameters this configuration describes.
    pub fn params(&self) -> ProtocolParams {
        ProtocolParams {
            vote_time_secs: self.vote_time_secs,
            challenge_window_secs: self.challenge_window_secs,
            slashing_cost: self.slashing_cost,
            support_required_pct: u128::from(self.support_required_pct),
            min_accept_quorum_pct: u128::from(self.min_accept_quorum_pct),
            ..ProtocolParams::default()
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        let params = self.params();
        if !params.thresholds_are_valid() {
            return Err(LedgerError::InvalidThresholds {
                support: params.support_required_pct,
                quorum: params.min_accept_quorum_pct,
            });
        }
        Ok(())
    }
}
