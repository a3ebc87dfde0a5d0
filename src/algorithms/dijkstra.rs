use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::warn;

use crate::RouterId;
use crate::network::Topology;

/// Sentinel distance for unreachable routers.
pub const INFINITY: u64 = u64::MAX;

/// Result of one single-source shortest-path computation: the minimum cost
/// to every known router and the predecessor of each reachable one on its
/// cheapest path back to the source.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: RouterId,
    distances: HashMap<RouterId, u64>,
    predecessors: HashMap<RouterId, RouterId>,
}

impl ShortestPathTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Minimum cost to reach `id`, or `INFINITY` if unreachable or unknown.
    pub fn distance(&self, id: &str) -> u64 {
        self.distances.get(id).copied().unwrap_or(INFINITY)
    }

    pub fn is_reachable(&self, id: &str) -> bool {
        self.distance(id) < INFINITY
    }

    pub fn distances(&self) -> &HashMap<RouterId, u64> {
        &self.distances
    }

    pub fn predecessors(&self) -> &HashMap<RouterId, RouterId> {
        &self.predecessors
    }

    /// Forward-ordered path from the source to `destination`, empty when no
    /// path exists.
    pub fn path_to(&self, destination: &str) -> Vec<RouterId> {
        reconstruct_path(&self.source, destination, &self.predecessors)
    }
}

#[derive(Debug)]
struct State {
    cost: u64,
    router: RouterId,
}

impl Eq for State {}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm over the subgraph of currently-up links,
/// O((V + E) log V) with a binary-heap frontier.
///
/// Equal-cost candidates resolve to whichever path is processed first; the
/// ordering is deterministic for a given mutation history but not otherwise
/// specified.
pub fn calculate_shortest_paths(topology: &Topology, source: &str) -> ShortestPathTree {
    let mut distances: HashMap<RouterId, u64> = HashMap::new();
    let mut predecessors: HashMap<RouterId, RouterId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Initialize distances
    for router in topology.routers() {
        distances.insert(router.clone(), INFINITY);
    }

    // An unknown source is a valid query: everything stays unreachable.
    if topology.contains_router(source) {
        distances.insert(source.to_string(), 0);
        heap.push(State {
            cost: 0,
            router: source.to_string(),
        });
    }

    while let Some(State { cost, router }) = heap.pop() {
        // Skip if we've already found a better path (stale heap entry)
        if cost > distances.get(&router).copied().unwrap_or(INFINITY) {
            continue;
        }

        for edge in topology.neighbors(&router) {
            // Down links are invisible, not merely penalized
            if !edge.up {
                continue;
            }

            let new_cost = cost + u64::from(edge.cost);

            if new_cost < distances.get(&edge.neighbor).copied().unwrap_or(INFINITY) {
                distances.insert(edge.neighbor.clone(), new_cost);
                predecessors.insert(edge.neighbor.clone(), router.clone());
                heap.push(State {
                    cost: new_cost,
                    router: edge.neighbor.clone(),
                });
            }
        }
    }

    ShortestPathTree {
        source: source.to_string(),
        distances,
        predecessors,
    }
}

/// Walk the predecessor map backward from `destination` and return the
/// forward-ordered path from `source`, inclusive at both ends.
///
/// Returns an empty path when `destination` has no predecessor entry (and
/// is not the source itself). A predecessor map produced by
/// `calculate_shortest_paths` always chains every entry back to the source;
/// if a caller-supplied map does not, the walk refuses to return a
/// truncated path and yields an empty one instead.
pub fn reconstruct_path(
    source: &str,
    destination: &str,
    predecessors: &HashMap<RouterId, RouterId>,
) -> Vec<RouterId> {
    if destination == source {
        return vec![source.to_string()];
    }
    if !predecessors.contains_key(destination) {
        return Vec::new();
    }

    let mut path = vec![destination.to_string()];
    let mut current = destination;

    while current != source {
        let Some(prev) = predecessors.get(current) else {
            warn!("broken predecessor chain at {current} while walking {source} -> {destination}");
            return Vec::new();
        };
        path.push(prev.clone());
        current = prev;

        // A valid chain visits each router at most once
        if path.len() > predecessors.len() + 1 {
            warn!("cycle in predecessor map while walking {source} -> {destination}");
            return Vec::new();
        }
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Topology {
        let mut topology = Topology::new();
        topology.add_link("A", "B", 4).unwrap();
        topology.add_link("A", "C", 2).unwrap();
        topology.add_link("B", "C", 1).unwrap();
        topology
    }

    #[test]
    fn triangle_routes_through_cheapest_detour() {
        let tree = calculate_shortest_paths(&triangle(), "A");

        assert_eq!(tree.distance("C"), 2);
        assert_eq!(tree.distance("B"), 3);
        assert_eq!(tree.path_to("B"), ["A", "C", "B"]);
    }

    #[test]
    fn source_distance_is_zero() {
        let tree = calculate_shortest_paths(&triangle(), "A");

        assert_eq!(tree.distance("A"), 0);
        assert_eq!(tree.path_to("A"), ["A"]);
    }

    #[test]
    fn failover_excludes_the_down_link() {
        let mut topology = triangle();
        topology.set_link_state("A", "C", false).unwrap();

        let tree = calculate_shortest_paths(&topology, "A");

        assert_eq!(tree.distance("B"), 4);
        assert_eq!(tree.distance("C"), 5);
        assert_eq!(tree.path_to("C"), ["A", "B", "C"]);
    }

    #[test]
    fn recovery_restores_original_routes() {
        let mut topology = triangle();
        topology.set_link_state("A", "C", false).unwrap();
        topology.set_link_state("A", "C", true).unwrap();

        let tree = calculate_shortest_paths(&topology, "A");

        assert_eq!(tree.distance("B"), 3);
        assert_eq!(tree.distance("C"), 2);
        assert_eq!(tree.path_to("B"), ["A", "C", "B"]);
    }

    #[test]
    fn down_link_is_skipped_even_when_cheapest() {
        let mut topology = Topology::new();
        topology.add_link("A", "B", 1).unwrap();
        topology.add_link("A", "C", 10).unwrap();
        topology.add_link("C", "B", 10).unwrap();
        topology.set_link_state("A", "B", false).unwrap();

        let tree = calculate_shortest_paths(&topology, "A");
        assert_eq!(tree.distance("B"), 20);
        assert_eq!(tree.path_to("B"), ["A", "C", "B"]);

        topology.set_link_state("A", "B", true).unwrap();
        let tree = calculate_shortest_paths(&topology, "A");
        assert_eq!(tree.distance("B"), 1);
        assert_eq!(tree.path_to("B"), ["A", "B"]);
    }

    #[test]
    fn isolated_router_is_unreachable() {
        let mut topology = triangle();
        topology.add_router("D");

        let tree = calculate_shortest_paths(&topology, "A");

        assert_eq!(tree.distance("D"), INFINITY);
        assert!(!tree.is_reachable("D"));
        assert!(tree.path_to("D").is_empty());
    }

    #[test]
    fn unknown_source_leaves_everything_unreachable() {
        let topology = triangle();
        let tree = calculate_shortest_paths(&topology, "Z");

        assert_eq!(tree.distances().len(), topology.router_count());
        assert!(tree.distances().values().all(|&d| d == INFINITY));
        assert!(tree.predecessors().is_empty());
        assert!(tree.path_to("B").is_empty());
    }

    #[test]
    fn empty_graph_query_is_harmless() {
        let tree = calculate_shortest_paths(&Topology::new(), "A");

        assert!(tree.distances().is_empty());
        assert!(!tree.is_reachable("A"));
    }

    #[test]
    fn cheapest_parallel_link_wins() {
        let mut topology = Topology::new();
        topology.add_link("A", "B", 5).unwrap();
        topology.add_link("A", "B", 2).unwrap();

        let tree = calculate_shortest_paths(&topology, "A");
        assert_eq!(tree.distance("B"), 2);

        // Downing the pair only affects the first link in insertion order;
        // the cheaper parallel link keeps carrying the route.
        topology.set_link_state("A", "B", false).unwrap();
        let tree = calculate_shortest_paths(&topology, "A");
        assert_eq!(tree.distance("B"), 2);
    }

    #[test]
    fn broken_predecessor_chain_yields_empty_path() {
        let mut predecessors = HashMap::new();
        predecessors.insert("C".to_string(), "B".to_string());

        assert!(reconstruct_path("A", "C", &predecessors).is_empty());
    }

    #[test]
    fn cyclic_predecessor_map_yields_empty_path() {
        let mut predecessors = HashMap::new();
        predecessors.insert("B".to_string(), "C".to_string());
        predecessors.insert("C".to_string(), "B".to_string());

        assert!(reconstruct_path("A", "B", &predecessors).is_empty());
    }

    #[test]
    fn destination_without_entry_means_no_path() {
        let predecessors = HashMap::new();
        assert!(reconstruct_path("A", "B", &predecessors).is_empty());
    }
}
