use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::network::Topology;

/// On-disk description of a topology, loaded from JSON.
///
/// Routers only need listing when they have no links; link endpoints are
/// created implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub routers: Vec<String>,
    pub links: Vec<LinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub from: String,
    pub to: String,
    pub cost: i64,
}

impl TopologyConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading topology file {path}"))?;
        let config: TopologyConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing topology file {path}"))?;
        Ok(config)
    }

    /// Instantiate the described topology, with every link up.
    pub fn build(&self) -> Result<Topology> {
        let mut topology = Topology::new();

        for router in &self.routers {
            topology.add_router(router);
        }
        for link in &self.links {
            topology
                .add_link(&link.from, &link.to, link.cost)
                .with_context(|| format!("adding link {} <-> {}", link.from, link.to))?;
        }

        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_topology_from_json() {
        let config: TopologyConfig = serde_json::from_str(
            r#"{
                "routers": ["D"],
                "links": [
                    {"from": "A", "to": "B", "cost": 4},
                    {"from": "A", "to": "C", "cost": 2}
                ]
            }"#,
        )
        .unwrap();

        let topology = config.build().unwrap();

        assert_eq!(topology.router_count(), 4);
        assert_eq!(topology.neighbors("A").len(), 2);
        assert!(topology.neighbors("D").is_empty());
    }

    #[test]
    fn negative_cost_in_config_fails_build() {
        let config: TopologyConfig =
            serde_json::from_str(r#"{"links": [{"from": "A", "to": "B", "cost": -3}]}"#).unwrap();

        assert!(config.build().is_err());
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let path = std::env::temp_dir().join("routeflow-config-test.json");
        fs::write(&path, r#"{"links": [{"from": "X", "to": "Y", "cost": 1}]}"#).unwrap();

        let config = TopologyConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.links.len(), 1);
        assert_eq!(config.links[0].cost, 1);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TopologyConfig::load("/nonexistent/topo.json").is_err());
    }
}
