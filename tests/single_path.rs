//! Tests that involve a handful of agents on a short, hand-built path.

use queue_sim::{
    math::Point2d, AgentId, DwellZone, Path, Simulation, SimulationAttributes, SpawnAttributes,
};

fn attributes(exit_y: f64) -> SimulationAttributes {
    SimulationAttributes {
        exit_y,
        agent_radius: 5.0,
        tick_duration: 16.0,
        wait_time: 50.0,
    }
}

fn spawn(sim: &mut Simulation, count: usize, speed: f64) {
    let attributes = SpawnAttributes {
        count,
        base_speed: speed,
        speed_jitter: 0.0,
        spacing: 11.0,
    };
    sim.spawn_seeded(&attributes, 0).unwrap();
}

/// Test that an agent walks a straight segment, snaps onto its end and then stays put.
#[test]
fn agent_walks_to_end_of_path() {
    let path = Path::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)], None).unwrap();
    let mut sim = Simulation::new(path, attributes(100.0)).unwrap();
    spawn(&mut sim, 1, 5.0);

    let agents = sim.step();
    assert_eq!(agents[0].position(), Point2d::new(5.0, 0.0));
    assert_eq!(agents[0].waypoint(), 0);

    let agents = sim.step();
    assert_eq!(agents[0].position(), Point2d::new(10.0, 0.0));
    assert_eq!(agents[0].waypoint(), 1);

    let before = sim.agents()[0].clone();
    let agents = sim.step();
    assert_eq!(agents[0], before);
    assert!(!sim.is_finished());
}

/// Test that an agent in the dwell zone waits for the wait time, then moves on.
#[test]
fn agent_dwells_once() {
    let path = Path::new(
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 100.0),
            Point2d::new(0.0, 200.0),
        ],
        Some(DwellZone::beside_obstacle(0, 0.0, 20.0)),
    )
    .unwrap();
    let mut sim = Simulation::new(path, attributes(200.0)).unwrap();
    spawn(&mut sim, 1, 5.0);

    let agent = &sim.step()[0];
    assert!(agent.waiting());
    assert_eq!(agent.position(), Point2d::new(0.0, 0.0));

    // ceil(50 / 16) = 4 further ticks
    for _ in 0..3 {
        let agent = &sim.step()[0];
        assert!(agent.waiting());
        assert!(!agent.passed_dwell());
    }
    let agent = &sim.step()[0];
    assert!(!agent.waiting());
    assert!(agent.passed_dwell());
    assert_eq!(agent.waypoint(), 1);
    assert_eq!(agent.wait_elapsed(), 0.0);
    assert_eq!(agent.position(), Point2d::new(0.0, 0.0));

    // Still inside the zone, but it does not fire again.
    let agent = &sim.step()[0];
    assert!(!agent.waiting());
    assert_eq!(agent.position(), Point2d::new(0.0, 5.0));
}

/// Test that an agent stays still while its predecessor is too close, and only then.
#[test]
fn agent_follows_predecessor() {
    let path = Path::new(vec![Point2d::new(0.0, 0.0), Point2d::new(100.0, 0.0)], None).unwrap();
    let mut sim = Simulation::new(path, attributes(100.0)).unwrap();
    spawn(&mut sim, 2, 5.0);

    // Both start on the same spot; agent 1 waits for a gap of 3 radii.
    for ahead in [5.0, 10.0, 15.0] {
        let agents = sim.step();
        assert_eq!(agents[0].position(), Point2d::new(ahead, 0.0));
        assert_eq!(agents[1].position(), Point2d::new(0.0, 0.0));
    }

    // The gap was 2 radii before the last tick, and is exactly 3 now.
    let agents = sim.step();
    assert_eq!(agents[0].position(), Point2d::new(20.0, 0.0));
    assert_eq!(agents[1].position(), Point2d::new(5.0, 0.0));
}

/// Test that an agent whose predecessor has left the scene is never blocked.
#[test]
fn exited_predecessor_does_not_block() {
    let path = Path::new(vec![Point2d::new(0.0, 0.0), Point2d::new(0.0, 10.0)], None).unwrap();
    let mut sim = Simulation::new(path, attributes(10.0)).unwrap();
    spawn(&mut sim, 2, 5.0);

    // Agent 0 reaches the exit on tick 2 and is removed on tick 3,
    // when agent 1 still sees it in the pre-tick snapshot.
    sim.step();
    sim.step();
    assert_eq!(sim.agents()[0].position(), Point2d::new(0.0, 10.0));
    let agents = sim.step();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id(), AgentId(1));
    assert_eq!(agents[0].position(), Point2d::new(0.0, 0.0));
    assert!(sim.get_agent(AgentId(0)).is_none());

    let agents = sim.step();
    assert_eq!(agents[0].position(), Point2d::new(0.0, 5.0));
}

/// Test that an agent standing exactly on the exit boundary is removed by the next tick.
#[test]
fn agent_on_boundary_is_removed() {
    let path = Path::new(vec![Point2d::new(0.0, 50.0), Point2d::new(0.0, 80.0)], None).unwrap();
    let mut sim = Simulation::new(path, attributes(50.0)).unwrap();
    spawn(&mut sim, 3, 5.0);

    assert!(sim.step().is_empty());
    assert!(sim.is_finished());
    assert!(sim.step().is_empty());
}

/// Test that agents on a path that ends above the exit stop at its end forever.
#[test]
fn agents_freeze_at_end_of_short_path() {
    let path = Path::new(vec![Point2d::new(0.0, 0.0), Point2d::new(0.0, 20.0)], None).unwrap();
    let mut sim = Simulation::new(path, attributes(100.0)).unwrap();
    spawn(&mut sim, 1, 5.0);

    for _ in 0..10 {
        sim.step();
    }
    let agent = &sim.agents()[0];
    assert_eq!(agent.position(), Point2d::new(0.0, 20.0));
    assert_eq!(agent.waypoint(), 1);
    assert!(!sim.is_finished());
}
