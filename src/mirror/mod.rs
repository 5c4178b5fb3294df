//! Mirroring core: snapshot reader, equality test, copy, confirmation gate,
//! reconciliation and the engine that drives them.

pub mod compare;
pub mod copy;
pub mod engine;
pub mod policy;
pub mod reconcile;
pub mod snapshot;
pub mod stats;

use crate::core::config::MirrorConfig;
use crate::core::errors::Result;
use crate::frontend::Frontend;
use crate::logger::activity::ActivityLog;

use self::engine::MirrorEngine;
use self::policy::SharedPolicy;
use self::reconcile::DirectoryPair;
use self::stats::MirrorStats;

/// Mirror `config.source` onto `config.destination`, asking `frontend` where
/// the policy is undecided.
pub fn run(config: &MirrorConfig, frontend: &dyn Frontend) -> Result<MirrorStats> {
    let activity = ActivityLog::from_option(config.activity_log.as_deref());
    let root = DirectoryPair::new(
        config.source.clone(),
        config.destination.clone(),
        SharedPolicy::new(config.policy),
    );
    MirrorEngine::new(frontend, &activity, config.parallelism).run(root)
}
