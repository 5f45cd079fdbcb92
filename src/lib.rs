pub use agent::{Agent, AgentView};
pub use cgmath;
pub use config::{reference_waypoints, SceneConfig};
pub use error::{Error, Result};
pub use path::{DwellZone, Path};
use serde::{Deserialize, Serialize};
pub use simulation::{Simulation, SimulationAttributes, SpawnAttributes};
pub use util::Interval;

mod agent;
mod config;
mod error;
pub mod math;
mod path;
mod simulation;
mod util;

/// Unique ID of an [Agent], which is also its position in the spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub usize);

impl AgentId {
    /// The ID of the agent spawned immediately before this one.
    pub fn predecessor(self) -> Option<AgentId> {
        self.0.checked_sub(1).map(AgentId)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
