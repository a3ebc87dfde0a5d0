pub mod topology;

pub use topology::{HalfEdge, Topology, TopologyError};
