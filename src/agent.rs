use crate::math::{step_towards, Point2d};
use crate::{AgentId, Path, SimulationAttributes};
use cgmath::prelude::*;
use log::trace;
use serde::{Deserialize, Serialize};

/// A simulated agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    /// The agent's ID, which is also its place in the queue.
    id: AgentId,
    /// The agent's position in scene coordinates.
    pos: Point2d,
    /// The index of the waypoint the agent last left. It is heading for the next one.
    waypoint: usize,
    /// The distance the agent travels per tick.
    speed: f64,
    /// Whether the agent is currently dwelling.
    waiting: bool,
    /// The time spent dwelling so far.
    wait_elapsed: f64,
    /// Whether the agent has finished its dwell.
    passed_dwell: bool,
    /// The spawn stagger, used only for drawing the initial queue.
    offset: f64,
}

/// What a presentation layer needs to draw an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    pub waiting: bool,
}

impl Agent {
    /// Creates an agent standing on the first waypoint.
    pub(crate) fn new(id: AgentId, pos: Point2d, speed: f64, offset: f64) -> Self {
        Self {
            id,
            pos,
            waypoint: 0,
            speed,
            waiting: false,
            wait_elapsed: 0.0,
            passed_dwell: false,
            offset,
        }
    }

    /// Gets the agent's ID.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The agent's position in scene coordinates.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The index of the waypoint the agent last left.
    pub fn waypoint(&self) -> usize {
        self.waypoint
    }

    /// The distance travelled per tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the agent is dwelling.
    pub fn waiting(&self) -> bool {
        self.waiting
    }

    /// The time spent in the current dwell.
    pub fn wait_elapsed(&self) -> f64 {
        self.wait_elapsed
    }

    /// Whether the agent has already dwelled.
    pub fn passed_dwell(&self) -> bool {
        self.passed_dwell
    }

    /// The spawn stagger.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Gets the agent as seen by a renderer.
    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id,
            x: self.pos.x,
            y: self.pos.y,
            waiting: self.waiting,
        }
    }

    /// Whether the agent has reached the exit boundary.
    pub(crate) fn has_exited(&self, exit_y: f64) -> bool {
        self.pos.y >= exit_y
    }

    /// Computes the agent's state after one tick.
    ///
    /// Every agent is read as it was before the tick, so `predecessor`
    /// must come from the same snapshot as `self`.
    ///
    /// # Parameters
    /// * `predecessor` - The agent whose ID is one less than this one, if it is still live
    /// * `path` - The path being followed
    /// * `attribs` - The simulation attributes
    ///
    /// # Returns
    /// The new state, or `None` if the agent has left the scene.
    pub(crate) fn step(
        &self,
        predecessor: Option<&Agent>,
        path: &Path,
        attribs: &SimulationAttributes,
    ) -> Option<Agent> {
        if self.has_exited(attribs.exit_y) {
            return None;
        }
        assert!(
            self.wait_elapsed >= 0.0,
            "agent {} has a negative wait time {}",
            self.id,
            self.wait_elapsed
        );

        let mut next = self.clone();

        if self.waiting {
            let elapsed = self.wait_elapsed + attribs.tick_duration;
            if elapsed >= attribs.wait_time {
                trace!("agent {} finished dwelling", self.id);
                next.waiting = false;
                next.wait_elapsed = 0.0;
                next.passed_dwell = true;
                next.waypoint += 1;
            } else {
                next.wait_elapsed = elapsed;
            }
            return Some(next);
        }

        let Some(target) = path.next_waypoint(self.waypoint) else {
            // Out of waypoints before the exit; hold position.
            return Some(next);
        };

        if !self.passed_dwell && path.is_in_dwell_zone(self.pos, self.waypoint) {
            trace!("agent {} started dwelling at {:?}", self.id, self.pos);
            next.waiting = true;
            return Some(next);
        }

        if self.is_blocked_by(predecessor, attribs.follow_distance()) {
            return Some(next);
        }

        let (pos, reached) = step_towards(self.pos, target, self.speed);
        next.pos = pos;
        if reached {
            next.waypoint += 1;
        }
        Some(next)
    }

    /// Whether the agent ahead in the queue is too close to move towards.
    /// Only the direct predecessor is considered, not the nearest agent.
    fn is_blocked_by(&self, predecessor: Option<&Agent>, follow_distance: f64) -> bool {
        predecessor
            .map(|ahead| ahead.pos.distance(self.pos) < follow_distance)
            .unwrap_or(false)
    }

    /// Puts the agent into an arbitrary state for tests.
    #[cfg(test)]
    pub(crate) fn with_state(mut self, pos: Point2d, waypoint: usize, waiting: bool) -> Self {
        self.pos = pos;
        self.waypoint = waypoint;
        self.waiting = waiting;
        self
    }
}
