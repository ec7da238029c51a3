use crate::Retry;
use std::{str::FromStr, time::Duration};

/// The role of the node, selected at startup.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, derive_more::Display)]
pub enum NodeRole {
    /// Replays the canonical transaction chain.
    #[default]
    #[display("verifier")]
    Verifier,
    /// Orders new transactions and includes the L1 to L2 queue.
    #[display("sequencer")]
    Sequencer,
}

impl NodeRole {
    /// Returns true if the node is a sequencer.
    pub const fn is_sequencer(&self) -> bool {
        matches!(self, Self::Sequencer)
    }
}

impl FromStr for NodeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verifier" => Ok(Self::Verifier),
            "sequencer" => Ok(Self::Sequencer),
            other => Err(format!("unknown node role {other}, expected verifier or sequencer")),
        }
    }
}

/// The configuration of the [`crate::SyncService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncServiceConfig {
    /// The role of the node.
    pub role: NodeRole,
    /// The number of blocks the local chain is rolled back by at startup.
    pub initial_reorg_depth: u64,
    /// The L1 height at which the canonical transaction chain was deployed, used to anchor an
    /// empty chain.
    pub ctc_deploy_height: u64,
    /// The interval between two polls of the data transport service.
    pub poll_interval: Duration,
    /// The retry strategy of the calls to the data transport service.
    pub remote_retry: Retry,
    /// The capacity of the new transactions feed.
    pub feed_capacity: usize,
}

impl Default for SyncServiceConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::default(),
            initial_reorg_depth: 0,
            ctc_deploy_height: 0,
            poll_interval: Duration::from_secs(1),
            remote_retry: Retry::default(),
            feed_capacity: 4096,
        }
    }
}
