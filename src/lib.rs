//! Link-state network simulator: a topology of routers joined by weighted
//! bidirectional links, each link markable up or down, with shortest-path
//! routes recomputed from current link state on demand.

pub mod network;
pub mod algorithms;
pub mod config;

use std::sync::{Arc, RwLock};

pub type RouterId = String;

pub use algorithms::dijkstra::{
    INFINITY, ShortestPathTree, calculate_shortest_paths, reconstruct_path,
};
pub use network::topology::{HalfEdge, Topology, TopologyError};

/// Shared handle for callers that mutate the topology from several threads.
///
/// The core itself is single-threaded and unsynchronized: hold the write
/// lock across a mutation, and the read lock across one whole
/// `calculate_shortest_paths` call. Cloning the topology and computing on
/// the snapshot works just as well.
pub type SharedTopology = Arc<RwLock<Topology>>;
