use crate::agent::{Agent, AgentView};
use crate::error::{Error, Result};
use crate::{AgentId, Path};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Agents closer than this many radii to the agent ahead of them will not move.
const FOLLOW_RADII: f64 = 3.0;

/// The fixed parameters of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationAttributes {
    /// Agents whose y-coordinate reaches this value are removed.
    pub exit_y: f64,
    /// The radius of an agent.
    pub agent_radius: f64,
    /// The simulated time that passes each tick.
    pub tick_duration: f64,
    /// How long an agent dwells for.
    pub wait_time: f64,
}

/// The attributes of a batch of spawned agents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnAttributes {
    /// The number of agents.
    pub count: usize,
    /// The minimum distance travelled per tick.
    pub base_speed: f64,
    /// Each agent's speed is increased by a random amount below this.
    pub speed_jitter: f64,
    /// The stagger between consecutive agents, used only for drawing.
    pub spacing: f64,
}

/// A simulation of agents queueing along a path.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The path all agents follow.
    path: Path,
    /// The fixed parameters.
    attribs: SimulationAttributes,
    /// The live agents, in ID order.
    agents: Vec<Agent>,
    /// The current frame of simulation.
    frame: usize,
}

impl SimulationAttributes {
    /// The distance to the agent ahead below which an agent stops.
    pub fn follow_distance(&self) -> f64 {
        FOLLOW_RADII * self.agent_radius
    }

    fn validate(&self) -> Result<()> {
        let positive = [
            ("agent radius", self.agent_radius),
            ("tick duration", self.tick_duration),
            ("wait time", self.wait_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Configuration(format!(
                    "{name} must be positive, but is {value}"
                )));
            }
        }
        if !self.exit_y.is_finite() {
            return Err(Error::Configuration(format!(
                "exit boundary must be finite, but is {}",
                self.exit_y
            )));
        }
        Ok(())
    }
}

impl SpawnAttributes {
    fn validate(&self) -> Result<()> {
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return Err(Error::Configuration(format!(
                "base speed must be positive, but is {}",
                self.base_speed
            )));
        }
        if !(self.speed_jitter.is_finite() && self.speed_jitter >= 0.0) {
            return Err(Error::Configuration(format!(
                "speed jitter must be non-negative, but is {}",
                self.speed_jitter
            )));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(Error::Configuration(format!(
                "spacing must be non-negative, but is {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

impl Simulation {
    /// Creates a new simulation with no agents.
    pub fn new(path: Path, attribs: SimulationAttributes) -> Result<Self> {
        attribs.validate()?;
        if !path.reaches_exit(attribs.exit_y) {
            warn!(
                "the path ends above the exit boundary {}; agents will stop at its last waypoint",
                attribs.exit_y
            );
        }
        Ok(Self {
            path,
            attribs,
            agents: vec![],
            frame: 0,
        })
    }

    /// Replaces all agents with `attributes.count` new agents on the first waypoint.
    ///
    /// Agent `i` gets the ID `i`, a speed of `base_speed` plus a uniform
    /// random amount in `[0, speed_jitter)`, and a stagger of `i * spacing`.
    pub fn spawn<R: Rng + ?Sized>(&mut self, attributes: &SpawnAttributes, rng: &mut R) -> Result<()> {
        attributes.validate()?;
        let start = self.path.waypoint(0)?;
        let jitter = (attributes.speed_jitter > 0.0).then(|| Uniform::new(0.0, attributes.speed_jitter));

        self.agents = (0..attributes.count)
            .map(|idx| {
                let extra = match &jitter {
                    Some(distr) => distr.sample(&mut *rng),
                    None => 0.0,
                };
                let speed = attributes.base_speed + extra;
                Agent::new(AgentId(idx), start, speed, idx as f64 * attributes.spacing)
            })
            .collect();
        self.frame = 0;

        debug!(
            "spawned {} agents at {:?} with base speed {}",
            attributes.count, start, attributes.base_speed
        );
        Ok(())
    }

    /// Like [spawn](Self::spawn), but draws speeds from a generator seeded with `seed`.
    pub fn spawn_seeded(&mut self, attributes: &SpawnAttributes, seed: u64) -> Result<()> {
        self.spawn(attributes, &mut StdRng::seed_from_u64(seed))
    }

    /// Advances the simulation by one tick and returns the live agents.
    pub fn step(&mut self) -> &[Agent] {
        let before = self.agents.len();
        let next = self
            .agents
            .iter()
            .enumerate()
            .filter_map(|(idx, agent)| agent.step(self.predecessor(idx), &self.path, &self.attribs))
            .collect::<Vec<_>>();
        self.agents = next;
        self.frame += 1;

        let exited = before - self.agents.len();
        if exited > 0 {
            debug!(
                "frame {}: {} agents exited, {} remain",
                self.frame,
                exited,
                self.agents.len()
            );
        }
        &self.agents
    }

    /// Gets the agent immediately ahead of the agent at `idx` in the queue,
    /// i.e. the one whose ID is one less, if it is still live.
    fn predecessor(&self, idx: usize) -> Option<&Agent> {
        let id = self.agents[idx].id().predecessor()?;
        let ahead = &self.agents[idx.checked_sub(1)?];
        (ahead.id() == id).then_some(ahead)
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The simulated time since the agents were spawned.
    pub fn elapsed(&self) -> f64 {
        self.frame as f64 * self.attribs.tick_duration
    }

    /// The live agents, in ID order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Returns an iterator over the live agents as seen by a renderer.
    pub fn views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.agents.iter().map(Agent::view)
    }

    /// Gets the agent with the given ID, if it is live.
    pub fn get_agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents
            .binary_search_by_key(&id, Agent::id)
            .ok()
            .map(|idx| &self.agents[idx])
    }

    /// Whether every agent has left the scene.
    pub fn is_finished(&self) -> bool {
        self.agents.is_empty()
    }

    /// Gets the path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the fixed parameters.
    pub fn attributes(&self) -> &SimulationAttributes {
        &self.attribs
    }
}
