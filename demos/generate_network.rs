//! Example: Generate a road network
//!
//! Demonstrates the basic usage of the generation pipeline. Set `RUST_LOG`
//! (for example `RUST_LOG=road_network=debug`) to see per-round progress.

use road_network_sca::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Road Network Generation Example");
    println!("===============================\n");

    // Create a configuration for a sparse map
    let config = NetworkConfigBuilder::new()
        .seed(42)
        .density(PointDensity::Sparse) // Sparse keeps the example quick
        .unwrap()
        .starting_segment_count(8)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Bounds: {} x {}", config.bounds.width(), config.bounds.height());
    println!("  Attraction Points: {}", config.attraction_point_count);
    println!("  Segment Length: {}", config.segment_length);
    println!("  Kill Distance: {}", config.kill_distance);
    println!("  Starting Segments: {}", config.starting_segment_count);
    println!();

    // A minor road everywhere, with a motorway band across the middle
    let width = config.bounds.width() as usize / 8;
    let height = config.bounds.height() as usize / 8;
    let classes: Vec<RoadClass> = (0..width * height)
        .map(|i| {
            let row = i / width;
            if row.abs_diff(height / 2) < 3 {
                RoadClass::Motorway
            } else {
                RoadClass::Minor
            }
        })
        .collect();
    let terrain = RasterTerrain::from_classes(width, height, classes)
        .expect("Failed to build terrain")
        .with_cell_size(8.0);

    println!("Generating network...");
    let mut reporter = TimingReporter::new();
    let network = RoadNetwork::generate_with_reporter(config, &terrain, &mut reporter)
        .expect("Failed to generate network");
    let summary = network.summary();
    println!("Generated {} segments\n", network.segment_count());

    println!("Statistics:");
    println!("  Rounds: {}", summary.rounds);
    println!("  Grown segments: {}", summary.grown_segments);
    println!("  Connectors: {}", summary.connectors);
    println!("  Remaining points: {}", summary.remaining_points);
    println!("  Termination: {:?}", summary.termination);
    println!();

    println!("Phase timings:");
    for (phase, duration) in reporter.timings().iter() {
        println!("  {:<10} {:?}", phase.name(), duration);
    }
    println!("  {:<10} {:?}", "total", reporter.timings().total());
    println!();

    // Show the roots growth started from
    println!("Starting locations:");
    for (i, location) in network.starting_locations().iter().enumerate() {
        let root = network.forest().roots()[i];
        println!(
            "  Root {}: ({:.2}, {:.2}), depth of deepest descendant={}",
            i,
            location.x,
            location.y,
            deepest_descendant(&network, root)
        );
    }

    let roads = generate_segment_mesh(&network, &BasicColorMapper);
    let points = generate_point_mesh(network.remaining_points(), &BasicColorMapper);
    println!(
        "\nMesh: {} road vertices, {} point vertices",
        roads.vertex_count(),
        points.vertex_count()
    );

    println!("\nGeneration complete!");
}

fn deepest_descendant(network: &RoadNetwork, root: SegmentId) -> usize {
    let forest = network.forest();
    forest
        .iter()
        .filter(|(_, seg)| seg.root == root && seg.tag == SegmentTag::Grown)
        .map(|(id, _)| forest.depth(id))
        .max()
        .unwrap_or(0)
}
