pub mod dijkstra;

pub use dijkstra::{INFINITY, ShortestPathTree, calculate_shortest_paths, reconstruct_path};
