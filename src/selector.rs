//! Replica selection policy

use std::fmt;

use rand::Rng;

/// Chooses which replica configuration backs the read connection
///
/// Called once, when the read connection is first built; the resulting
/// connection is cached, so later reads never re-roll.
pub trait ReplicaSelector: fmt::Debug + Send + Sync {
   /// Return an index in `0..replica_count`. `replica_count` is never zero.
   fn select(&self, replica_count: usize) -> usize;
}

/// Uniform random choice over the replica list
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReplicaSelector;

impl ReplicaSelector for RandomReplicaSelector {
   fn select(&self, replica_count: usize) -> usize {
      rand::thread_rng().gen_range(0..replica_count)
   }
}
