//! The rollup sync node: wires the sync service, the local chain and the block builder, and
//! exposes the command line arguments of the `rollup-sync` binary.

pub use args::{
    BlockBuilderArgs, DatabaseArgs, RollupClientArgs, RollupSyncNodeConfig, SubmitterArgs,
    SyncServiceArgs, ValidatorArgs,
};
mod args;

pub mod commands;

mod constants;

pub use node::{NodeSyncService, RollupSyncNode};
mod node;

pub use submitter::CallDataSubmitter;
mod submitter;
