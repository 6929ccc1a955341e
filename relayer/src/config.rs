//! Relayer configuration with TOML file support.

use crate::RelayerError;
use serde::{Deserialize, Serialize};
use svrp_types::{Address, ProposalId, ProtocolParams};

/// Configuration for one relayer, serving one proposal of one ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Address of the ballot the relayer submits to.
    pub ballot: Address,

    /// Proposal whose votes this relayer collects.
    #[serde(default)]
    pub proposal_id: ProposalId,

    /// Address the relayer submits from.
    pub relayer: Address,

    /// Votes per batch before submitting automatically.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Pending commands buffered by [`crate::RelayerHandle`].
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_max_batch_size() -> usize {
    ProtocolParams::DEFAULT_MAX_BATCH_SIZE
}

fn default_channel_capacity() -> usize {
    64
}

impl RelayerConfig {
    pub fn new(ballot: Address, proposal_id: ProposalId, relayer: Address) -> Self {
        Self {
            ballot,
            proposal_id,
            relayer,
            max_batch_size: default_max_batch_size(),
            channel_capacity: default_channel_capacity(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RelayerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RelayerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RelayerError> {
        let config: Self = toml::from_str(s).map_err(|e| RelayerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RelayerError> {
        toml::to_string_pretty(self).map_err(|e| RelayerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), RelayerError> {
        if self.max_batch_size == 0 {
            return Err(RelayerError::Config("max_batch_size must be at least 1".into()));
        }
        if self.channel_capacity == 0 {
            return Err(RelayerError::Config("channel_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
