//! Exhaustive testcase generator implementing the [Twins paper](https://arxiv.org/pdf/2004.10617)
//! technique for testing Byzantine behaviour in BFT consensus protocols.
//!
//! The main concepts are:
//! * If we have a committee of `n = 3f + 1` nodes, then up to `f` nodes can have a _twin_ in the
//!   network: a duplicate identity with the same validator key. Twins behave honestly in terms of
//!   state machine implementation, but because their memory is isolated and they receive different
//!   messages, they exhibit Byzantine behaviour such as equivocation and amnesia.
//! * In each round the nodes are split into disjunct partitions, and the test harness only allows
//!   communication between nodes in the same partition in that round.
//! * The harness controls who is the leader in each round; when a twinned node is leading, its
//!   twin is also leading.
//! * Unlike sampling-based Twins tests, this generator enumerates *every* combination of
//!   (partitioning, leader) per round across all rounds, and shards the resulting corpus across
//!   machines, workers and bounded-size files so the full space is never materialized in memory.
//!
//! The serialized corpus is consumed by an external protocol test harness; this crate only
//! produces it.

pub use crate::{
    config::{Config, RunConfig},
    generator::{Filter, Generator},
};

pub mod cluster;
pub mod config;
pub mod generator;
pub mod output;
pub mod partition;
pub mod scenario;
pub mod shard;
