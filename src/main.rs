use anyhow::{Result, bail};
use clap::Parser;

use routeflow::config::TopologyConfig;
use routeflow::{RouterId, Topology, calculate_shortest_paths};

#[derive(Parser)]
#[command(name = "routeflow", about = "Link-state routing simulator")]
struct Cli {
    /// JSON topology file; defaults to the built-in six-router demo mesh
    #[arg(long)]
    topology: Option<String>,

    /// Router to print the routing table for
    #[arg(long, default_value = "R1")]
    source: String,

    /// Route queries, as SRC:DST pairs
    #[arg(long = "route", value_name = "SRC:DST")]
    routes: Vec<String>,

    /// Links to mark down before computing, as A:B pairs
    #[arg(long = "fail", value_name = "A:B")]
    fail: Vec<String>,

    /// Links to restore, as A:B pairs
    #[arg(long = "restore", value_name = "A:B")]
    restore: Vec<String>,

    /// Run the scripted failover/recovery demo on the built-in mesh
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.demo {
        return run_demo();
    }

    let mut topology = match &cli.topology {
        Some(path) => TopologyConfig::load(path)?.build()?,
        None => demo_mesh()?,
    };

    for pair in &cli.fail {
        let (a, b) = parse_pair(pair)?;
        topology.set_link_state(a, b, false)?;
    }
    for pair in &cli.restore {
        let (a, b) = parse_pair(pair)?;
        topology.set_link_state(a, b, true)?;
    }

    display_topology(&topology);
    display_routing_table(&topology, &cli.source);

    for pair in &cli.routes {
        let (src, dest) = parse_pair(pair)?;
        find_route(&topology, src, dest);
    }

    Ok(())
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once(':') {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a, b)),
        _ => bail!("expected a pair like A:B, got {pair:?}"),
    }
}

/// Built-in six-router demo mesh.
fn demo_mesh() -> Result<Topology> {
    let mut topology = Topology::new();
    for (a, b, cost) in [
        ("R1", "R2", 4),
        ("R1", "R3", 2),
        ("R2", "R3", 1),
        ("R2", "R4", 5),
        ("R3", "R4", 8),
        ("R3", "R5", 10),
        ("R4", "R5", 2),
        ("R4", "R6", 6),
        ("R5", "R6", 3),
    ] {
        topology.add_link(a, b, cost)?;
    }
    Ok(topology)
}

fn format_path(path: &[RouterId]) -> String {
    path.join(" -> ")
}

fn display_topology(topology: &Topology) {
    println!("\n========================================");
    println!("NETWORK TOPOLOGY");
    println!("========================================");

    let mut routers: Vec<_> = topology.routers().collect();
    routers.sort();

    for router in routers {
        println!("{router} connects to:");
        for edge in topology.neighbors(router) {
            println!(
                "  -> {} (cost: {}, status: {})",
                edge.neighbor,
                edge.cost,
                if edge.up { "UP" } else { "DOWN" }
            );
        }
        println!();
    }
    println!("========================================\n");
}

fn display_routing_table(topology: &Topology, source: &str) {
    let tree = calculate_shortest_paths(topology, source);

    println!("\n========================================");
    println!("ROUTING TABLE FOR ROUTER: {source}");
    println!("========================================");
    println!("{:<15}{:<10}Path", "Destination", "Cost");
    println!("----------------------------------------");

    let mut routers: Vec<_> = topology.routers().collect();
    routers.sort();

    for router in routers {
        if router.as_str() == source {
            continue;
        }
        if tree.is_reachable(router) {
            println!(
                "{:<15}{:<10}{}",
                router,
                tree.distance(router),
                format_path(&tree.path_to(router))
            );
        } else {
            println!("{:<15}{:<10}No path available", router, "INF");
        }
    }
    println!("========================================\n");
}

fn find_route(topology: &Topology, src: &str, dest: &str) {
    println!("\n>>> Finding route from {src} to {dest}");

    let tree = calculate_shortest_paths(topology, src);
    let path = tree.path_to(dest);

    if path.is_empty() {
        println!("NO ROUTE AVAILABLE");
        return;
    }

    println!("Optimal path: {}", format_path(&path));
    println!("Total cost: {}", tree.distance(dest));
}

fn run_demo() -> Result<()> {
    println!("RouteFlow: link-state routing with Dijkstra");
    println!("Building network topology...");

    let mut network = demo_mesh()?;

    display_topology(&network);
    display_routing_table(&network, "R1");

    find_route(&network, "R1", "R6");
    find_route(&network, "R1", "R5");

    println!("\n========== SIMULATING LINK FAILURE ==========");
    network.set_link_state("R1", "R3", false)?;
    display_routing_table(&network, "R1");
    find_route(&network, "R1", "R6");

    network.set_link_state("R2", "R3", false)?;
    find_route(&network, "R1", "R5");

    println!("\n========== RESTORING NETWORK ==========");
    network.set_link_state("R1", "R3", true)?;
    network.set_link_state("R2", "R3", true)?;

    display_routing_table(&network, "R1");
    find_route(&network, "R1", "R6");

    println!("\nSimulation complete");
    Ok(())
}
