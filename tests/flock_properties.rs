//! Integration tests for the flock driver.
//!
//! These exercise the public API end to end: population construction,
//! neighbor queries against brute force, force scenarios and tick invariants.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shoal::prelude::*;
use shoal::spatial::neighbors_brute_force;
use shoal::{initialize_population, SpatialGrid};

fn single(position: Vec3, velocity: Vec3) -> Flock<()> {
    let store = AgentStore::from_agents(vec![Agent::new(position, velocity, ())]);
    Flock::from_store(store, FlockConfig::default()).unwrap()
}

fn random_cloud(seed: u64, count: usize, extent: f32) -> Vec<Vec3> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
        })
        .collect()
}

fn sorted(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_population_size_is_edge_cubed() {
    for edge in 0..=6i64 {
        let store = initialize_population(edge, 10.0, 3, Palette::Reef).unwrap();
        assert_eq!(store.len() as i64, edge * edge * edge);
    }
}

#[test]
fn test_empty_population_is_not_an_error() {
    let flock = Simulation::new().with_edge_length(0).build().unwrap();
    assert!(flock.is_empty());
}

#[test]
fn test_negative_edge_length_rejected() {
    assert!(matches!(
        initialize_population(-1, 10.0, 0, Palette::Reef),
        Err(ConfigError::NegativeEdgeLength(-1))
    ));
}

#[test]
fn test_lattice_centered_on_origin() {
    let store = initialize_population(4, 10.0, 0, Palette::Reef).unwrap();
    let centroid: Vec3 = store.iter().map(|a| a.position()).sum::<Vec3>() / store.len() as f32;
    // Offsets run -2..=1, so the centroid sits half a step below the origin.
    assert!((centroid - Vec3::splat(-0.5)).length() < 1e-4);
}

// ============================================================================
// Spatial index
// ============================================================================

#[test]
fn test_grid_matches_brute_force_on_random_clouds() {
    for seed in 0..5 {
        let positions = random_cloud(seed, 400, 12.0);
        let grid = SpatialGrid::build(positions.iter().copied(), 5.0).unwrap();
        let graph = grid.neighbor_graph();
        for i in 0..positions.len() {
            assert_eq!(
                sorted(graph.neighbors_of(i).to_vec()),
                sorted(neighbors_brute_force(&positions, i, 5.0)),
                "seed {} agent {}",
                seed,
                i
            );
        }
    }
}

#[test]
fn test_grid_matches_brute_force_on_cell_boundaries() {
    // Points sitting exactly on cell faces, edges and corners, both signs.
    let mut positions = Vec::new();
    for x in -3..=3 {
        for y in -2..=2 {
            for z in -2..=2 {
                positions.push(Vec3::new(x as f32 * 2.5, y as f32 * 5.0, z as f32 * 5.0));
            }
        }
    }
    positions.push(Vec3::new(-0.0001, 0.0, 4.9999));
    positions.push(Vec3::new(0.0001, -5.0, 5.0001));

    let grid = SpatialGrid::build(positions.iter().copied(), 5.0).unwrap();
    for i in 0..positions.len() {
        assert_eq!(
            sorted(grid.neighbors_of(i)),
            sorted(neighbors_brute_force(&positions, i, 5.0))
        );
    }
}

#[test]
fn test_agent_never_its_own_neighbor() {
    let positions = random_cloud(11, 300, 6.0);
    let grid = SpatialGrid::build(positions.iter().copied(), 5.0).unwrap();
    let graph = grid.neighbor_graph();
    for i in 0..positions.len() {
        assert!(!graph.neighbors_of(i).contains(&i));
        assert!(!grid.candidates(i).contains(&i));
    }
}

#[test]
fn test_neighbor_relation_is_symmetric() {
    let positions = random_cloud(5, 300, 10.0);
    let graph = SpatialGrid::build(positions.iter().copied(), 5.0)
        .unwrap()
        .neighbor_graph();
    for i in 0..positions.len() {
        for &j in graph.neighbors_of(i) {
            assert!(graph.neighbors_of(j).contains(&i));
        }
    }
}

#[test]
fn test_rebuild_twice_gives_identical_buckets() {
    let positions = random_cloud(9, 200, 20.0);
    let a = SpatialGrid::build(positions.iter().copied(), 5.0).unwrap();
    let mut b = SpatialGrid::build(random_cloud(10, 50, 3.0), 5.0).unwrap();
    b.rebuild(positions.iter().copied(), 5.0).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Force scenarios
// ============================================================================

#[test]
fn test_boundary_push_back_near_edge() {
    let flock = single(Vec3::new(0.0, 99.9, 0.0), Vec3::ZERO);
    let parts = flock.force_breakdown(0).unwrap().unwrap();
    let force = parts.total();
    assert!(force.length() > 10.0);
    assert!((force.length() - 15.0).abs() < 0.05);
    assert!(force.y < 0.0);
}

#[test]
fn test_boundary_push_near_center() {
    let flock = single(Vec3::new(0.0, 0.0, 0.001), Vec3::ZERO);
    let force = flock.force_breakdown(0).unwrap().unwrap().total();
    assert!((force.length() - 0.015).abs() < 1e-5);

    let at_origin = single(Vec3::ZERO, Vec3::ZERO);
    assert_eq!(at_origin.force_breakdown(0).unwrap().unwrap().total(), Vec3::ZERO);
}

#[test]
fn test_isolated_agent_only_feels_boundary() {
    let store = AgentStore::from_agents(vec![
        Agent::new(Vec3::new(10.0, 0.0, 0.0), Vec3::X, ()),
        Agent::new(Vec3::new(-30.0, 0.0, 0.0), Vec3::Y, ()),
    ]);
    let flock = Flock::from_store(store, FlockConfig::default()).unwrap();
    let parts = flock.force_breakdown(0).unwrap().unwrap();
    assert_eq!(parts.alignment, Vec3::ZERO);
    assert_eq!(parts.cohesion, Vec3::ZERO);
    assert_eq!(parts.separation, Vec3::ZERO);
    assert_ne!(parts.boundary, Vec3::ZERO);
}

#[test]
fn test_coincident_agents_stay_finite() {
    let store = AgentStore::from_agents(vec![
        Agent::new(Vec3::new(3.0, 3.0, 3.0), Vec3::X, ()),
        Agent::new(Vec3::new(3.0, 3.0, 3.0), Vec3::NEG_X, ()),
    ]);
    let mut flock = Flock::from_store(store, FlockConfig::default()).unwrap();
    let parts = flock.force_breakdown(0).unwrap().unwrap();
    assert!(parts.separation.is_finite());

    for _ in 0..20 {
        flock.tick(1.0 / 60.0).unwrap();
    }
    for agent in flock.agents() {
        assert!(agent.position().is_finite());
        assert!(agent.velocity().is_finite());
        assert!(agent.facing().is_finite());
    }
}

// ============================================================================
// Tick invariants
// ============================================================================

#[test]
fn test_speed_never_exceeds_max() {
    let mut flock = Simulation::new()
        .with_edge_length(5)
        .with_seed(1)
        .with_alignment_scaling(10.0)
        .with_separation_scaling(1.5)
        .with_max_speed(4.0)
        .build()
        .unwrap();

    for _ in 0..100 {
        let stats = flock.tick(0.05).unwrap();
        assert!(stats.max_speed <= 4.0);
        for agent in flock.agents() {
            assert!(agent.velocity().length() <= 4.0);
        }
    }
}

#[test]
fn test_identical_inputs_give_identical_ticks() {
    let build = || {
        Simulation::new()
            .with_edge_length(6)
            .with_seed(99)
            .build()
            .unwrap()
    };
    let mut a = build();
    let mut b = build();
    for _ in 0..30 {
        a.tick(1.0 / 60.0).unwrap();
        b.tick(1.0 / 60.0).unwrap();
    }
    assert_eq!(a.agents(), b.agents());
}

#[test]
fn test_same_store_same_result() {
    let store = initialize_population(4, 10.0, 12, Palette::Ocean).unwrap();
    let mut a = Flock::from_store(store.clone(), FlockConfig::default()).unwrap();
    let mut b = Flock::from_store(store, FlockConfig::default()).unwrap();
    a.tick(0.02).unwrap();
    b.tick(0.02).unwrap();
    assert_eq!(a.agents(), b.agents());
}

#[test]
fn test_tags_carried_through_unchanged() {
    let mut flock = Simulation::new()
        .with_edge_length(3)
        .build_with(|ctx| format!("fish-{}", ctx.index))
        .unwrap();
    for _ in 0..10 {
        flock.tick(0.1).unwrap();
    }
    for (i, agent) in flock.agents().iter().enumerate() {
        assert_eq!(agent.tag(), &format!("fish-{}", i));
    }
}

#[test]
fn test_facing_tracks_velocity() {
    let mut flock = Simulation::new().with_edge_length(3).with_seed(4).build().unwrap();
    flock.tick(1.0 / 60.0).unwrap();
    for i in 0..flock.len() {
        let velocity = flock.velocity(i).unwrap();
        let forward = flock.facing(i).unwrap() * Vec3::NEG_Z;
        assert!((forward - velocity.normalize()).length() < 1e-3);
    }
}

#[test]
fn test_flock_stays_contained() {
    let mut flock = Simulation::new().with_edge_length(3).with_seed(21).build().unwrap();
    for _ in 0..1500 {
        flock.tick(1.0 / 60.0).unwrap();
    }
    for agent in flock.agents() {
        assert!(agent.position().length() < 101.0, "escaped to {:?}", agent.position());
    }
}

#[test]
fn test_default_flock_speed_within_cap() {
    let mut flock = Simulation::new().with_edge_length(8).with_seed(2).build().unwrap();
    for _ in 0..200 {
        flock.tick(1.0 / 60.0).unwrap();
        for agent in flock.agents() {
            assert!(agent.velocity().length() <= 10.0);
        }
    }
}

#[test]
fn test_rejected_tick_preserves_state() {
    let mut flock = Simulation::new().with_edge_length(2).build().unwrap();
    flock.tick(0.1).unwrap();
    let before = flock.agents().clone();
    assert!(flock.tick(-1.0).is_err());
    assert!(flock.tick(f32::NAN).is_err());
    assert_eq!(flock.agents(), &before);
    assert_eq!(flock.tick_count(), 1);
}
