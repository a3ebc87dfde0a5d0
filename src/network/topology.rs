use std::collections::HashMap;

use log::info;
use thiserror::Error;

use crate::RouterId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("invalid link cost {cost}: metric must be a non-negative 32-bit value")]
    InvalidCost { cost: i64 },

    #[error("no link between {a} and {b}")]
    LinkNotFound { a: RouterId, b: RouterId },
}

/// One direction of a link, stored in the owning router's adjacency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfEdge {
    pub neighbor: RouterId,
    pub cost: u32,
    pub up: bool,
}

/// Link-state database: the set of routers and each router's adjacency.
///
/// The two half-edges of one link are separate records kept in sync by
/// `set_link_state`, the sole writer of both. The router set is the key set
/// of the adjacency map, so adding a router twice is naturally a no-op.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    adjacency: HashMap<RouterId, Vec<HalfEdge>>,
}

impl Topology {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Add a router to the network. Idempotent.
    pub fn add_router(&mut self, id: &str) {
        self.adjacency.entry(id.to_string()).or_default();
    }

    /// Add a bidirectional link between two routers, creating missing
    /// endpoints. Parallel links between the same pair are allowed and are
    /// never merged. Rejects costs outside the unsigned 32-bit range and
    /// leaves the graph untouched.
    pub fn add_link(&mut self, a: &str, b: &str, cost: i64) -> Result<(), TopologyError> {
        let cost = u32::try_from(cost).map_err(|_| TopologyError::InvalidCost { cost })?;

        self.add_router(a);
        self.add_router(b);

        self.adjacency.entry(a.to_string()).or_default().push(HalfEdge {
            neighbor: b.to_string(),
            cost,
            up: true,
        });
        self.adjacency.entry(b.to_string()).or_default().push(HalfEdge {
            neighbor: a.to_string(),
            cost,
            up: true,
        });

        info!("Link added: {a} <-> {b} (cost: {cost})");
        Ok(())
    }

    /// Mark a link up or down. Targets the first half-edge `a -> b` and the
    /// first `b -> a` in insertion order; both directions are updated or
    /// neither is.
    pub fn set_link_state(&mut self, a: &str, b: &str, up: bool) -> Result<(), TopologyError> {
        let not_found = || TopologyError::LinkNotFound {
            a: a.to_string(),
            b: b.to_string(),
        };

        if a == b {
            // A self loop keeps both half-edges in the same adjacency list.
            let edges = self.adjacency.get_mut(a).ok_or_else(not_found)?;
            let mut matches = edges
                .iter()
                .enumerate()
                .filter(|(_, edge)| edge.neighbor == b)
                .map(|(i, _)| i);
            let (Some(first), Some(second)) = (matches.next(), matches.next()) else {
                return Err(not_found());
            };
            edges[first].up = up;
            edges[second].up = up;
        } else {
            let pos_a = self
                .adjacency
                .get(a)
                .and_then(|edges| edges.iter().position(|edge| edge.neighbor == b));
            let pos_b = self
                .adjacency
                .get(b)
                .and_then(|edges| edges.iter().position(|edge| edge.neighbor == a));

            let (Some(pos_a), Some(pos_b)) = (pos_a, pos_b) else {
                return Err(not_found());
            };

            if let Some(edge) = self.adjacency.get_mut(a).and_then(|edges| edges.get_mut(pos_a)) {
                edge.up = up;
            }
            if let Some(edge) = self.adjacency.get_mut(b).and_then(|edges| edges.get_mut(pos_b)) {
                edge.up = up;
            }
        }

        info!("Link {}: {a} <-> {b}", if up { "UP" } else { "DOWN" });
        Ok(())
    }

    /// A router's half-edges in insertion order; empty for unknown routers.
    pub fn neighbors(&self, id: &str) -> &[HalfEdge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_router(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// All known routers, in no particular order.
    pub fn routers(&self) -> impl Iterator<Item = &RouterId> {
        self.adjacency.keys()
    }

    pub fn router_count(&self) -> usize {
        self.adjacency.len()
    }
}
