use crate::error::{Error, Result};
use crate::math::Point2d;
use crate::{DwellZone, Path, Simulation, SimulationAttributes, SpawnAttributes};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

/// A description of a complete scene: a square box with a rectangular
/// obstacle at its centre, the path around it, and the agents to send along it.
///
/// Missing fields take their values from [SceneConfig::reference].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// The side length of the square scene. Agents leave at `y = scene_size`.
    pub scene_size: f64,
    /// The radius of an agent.
    pub agent_radius: f64,
    /// The number of agents to spawn.
    pub agent_count: usize,
    /// How long each agent dwells beside the obstacle.
    pub wait_time: f64,
    /// The simulated time per tick.
    pub tick_duration: f64,
    /// The width of the obstacle.
    pub obstacle_width: f64,
    /// The height of the obstacle. Agents dwell while level with it.
    pub obstacle_height: f64,
    /// The route, in order.
    pub waypoints: Vec<Point2d>,
    /// The waypoint whose outgoing segment runs alongside the obstacle.
    pub dwell_waypoint: Option<usize>,
    /// The minimum distance travelled per tick.
    pub base_speed: f64,
    /// The upper bound of the random speed added to each agent.
    pub speed_jitter: f64,
    /// The stagger between consecutive agents, used only for drawing.
    pub spacing: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl SceneConfig {
    /// The reference scene: a 600 unit box, an 80x200 obstacle,
    /// and 5000 agents that enter from the right and leave through the bottom.
    pub fn reference() -> Self {
        let scene_size = 600.0;
        let agent_radius = 5.0;
        let obstacle_width = 80.0;
        let obstacle_height = 200.0;
        Self {
            scene_size,
            agent_radius,
            agent_count: 5000,
            wait_time: 50.0,
            tick_duration: 16.0,
            obstacle_width,
            obstacle_height,
            waypoints: reference_waypoints(scene_size, obstacle_width, obstacle_height),
            dwell_waypoint: Some(3),
            base_speed: 5.0,
            speed_jitter: 0.5,
            spacing: 2.2 * agent_radius,
        }
    }

    /// Loads a scene from a JSON file.
    pub fn from_file<P: AsRef<std::path::Path>>(file: P) -> Result<Self> {
        let reader = BufReader::new(File::open(file)?);
        let config: SceneConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let positive = [
            ("scene size", self.scene_size),
            ("obstacle width", self.obstacle_width),
            ("obstacle height", self.obstacle_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Configuration(format!(
                    "{name} must be positive, but is {value}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the path, with its dwell zone level with the obstacle.
    pub fn path(&self) -> Result<Path> {
        self.validate()?;
        let dwell = self
            .dwell_waypoint
            .map(|idx| DwellZone::beside_obstacle(idx, 0.5 * self.scene_size, self.obstacle_height));
        Path::new(self.waypoints.clone(), dwell)
    }

    /// The engine parameters of this scene.
    pub fn simulation_attributes(&self) -> SimulationAttributes {
        SimulationAttributes {
            exit_y: self.scene_size,
            agent_radius: self.agent_radius,
            tick_duration: self.tick_duration,
            wait_time: self.wait_time,
        }
    }

    /// The spawn parameters of this scene.
    pub fn spawn_attributes(&self) -> SpawnAttributes {
        SpawnAttributes {
            count: self.agent_count,
            base_speed: self.base_speed,
            speed_jitter: self.speed_jitter,
            spacing: self.spacing,
        }
    }

    /// Builds a simulation of this scene with no agents spawned yet.
    pub fn build(&self) -> Result<Simulation> {
        Simulation::new(self.path()?, self.simulation_attributes())
    }
}

/// The route around an obstacle centred in a square scene.
///
/// Agents enter on the right edge, walk left above the obstacle, loop up and
/// around to its left side, walk down past it, then cut right and leave
/// through the bottom edge.
pub fn reference_waypoints(size: f64, obstacle_width: f64, obstacle_height: f64) -> Vec<Point2d> {
    let mid = 0.5 * size;
    let left = mid - 0.5 * obstacle_width;
    let top = mid - 0.5 * obstacle_height;
    let bottom = mid + 0.5 * obstacle_height;
    vec![
        Point2d::new(size, 180.0),
        Point2d::new(left - 147.0, 180.0),
        Point2d::new(left - 147.0, top - 140.0),
        Point2d::new(left - 190.0, top - 140.0),
        Point2d::new(left - 190.0, bottom - 60.0),
        Point2d::new(left - 190.0, bottom - 60.0),
        Point2d::new(left - 90.0, bottom - 60.0),
        Point2d::new(left - 90.0, size),
    ]
}
