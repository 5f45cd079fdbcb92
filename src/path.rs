use crate::error::{Error, Result};
use crate::math::Point2d;
use crate::util::Interval;
use cgmath::prelude::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The fixed route that every agent follows, from the first waypoint to the last.
#[derive(Clone, Debug)]
pub struct Path {
    /// The waypoints, in the order they are visited.
    waypoints: Vec<Point2d>,
    /// The zone in which agents must stop once and wait.
    dwell: Option<DwellZone>,
}

/// A region alongside an obstacle where every agent must pause exactly once.
///
/// An agent is inside the zone when it is heading away from `waypoint`
/// and its y-coordinate lies strictly within `band`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DwellZone {
    /// The index of the waypoint whose outgoing segment passes the obstacle.
    pub waypoint: usize,
    /// The vertical extent of the obstacle.
    pub band: Interval<f64>,
}

impl DwellZone {
    /// Creates a dwell zone beside an obstacle of the given height,
    /// centred vertically on `centre_y`.
    pub fn beside_obstacle(waypoint: usize, centre_y: f64, obstacle_height: f64) -> Self {
        Self {
            waypoint,
            band: Interval::disc(centre_y, 0.5 * obstacle_height),
        }
    }

    /// The vertical centre of the obstacle.
    pub fn centre_y(&self) -> f64 {
        self.band.midpoint()
    }

    fn contains(&self, position: Point2d, waypoint: usize) -> bool {
        waypoint == self.waypoint && self.band.contains_open(position.y)
    }
}

impl Path {
    /// Creates a path, checking that it has at least two waypoints and that the
    /// dwell zone (if any) is attached to a waypoint with an outgoing segment.
    pub fn new(waypoints: Vec<Point2d>, dwell: Option<DwellZone>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(Error::Configuration(format!(
                "a path needs at least 2 waypoints, but has {}",
                waypoints.len()
            )));
        }
        if let Some(idx) = waypoints
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(Error::Configuration(format!(
                "waypoint {idx} has non-finite coordinates"
            )));
        }
        if let Some(zone) = &dwell {
            if zone.waypoint + 1 >= waypoints.len() {
                return Err(Error::Configuration(format!(
                    "dwell waypoint {} has no outgoing segment",
                    zone.waypoint
                )));
            }
            if !(zone.band.length() > 0.0) {
                return Err(Error::Configuration(format!(
                    "dwell band {:?} must have a positive height",
                    zone.band
                )));
            }
        }
        Ok(Self { waypoints, dwell })
    }

    /// The number of waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Gets the waypoint at index `idx`.
    pub fn waypoint(&self, idx: usize) -> Result<Point2d> {
        self.waypoints.get(idx).copied().ok_or(Error::OutOfRange {
            index: idx,
            count: self.waypoints.len(),
        })
    }

    /// Gets the waypoint following `idx`, or `None` if `idx` is the last one.
    pub fn next_waypoint(&self, idx: usize) -> Option<Point2d> {
        self.waypoints.get(idx.checked_add(1)?).copied()
    }

    /// All the waypoints, in order.
    pub fn waypoints(&self) -> &[Point2d] {
        &self.waypoints
    }

    /// The dwell zone, if the path has one.
    pub fn dwell_zone(&self) -> Option<&DwellZone> {
        self.dwell.as_ref()
    }

    /// Whether an agent at `position`, heading away from waypoint `waypoint`,
    /// is alongside the obstacle and must stop to dwell.
    pub fn is_in_dwell_zone(&self, position: Point2d, waypoint: usize) -> bool {
        self.dwell
            .map(|zone| zone.contains(position, waypoint))
            .unwrap_or(false)
    }

    /// The total length of the polyline.
    pub fn length(&self) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(*b))
            .sum()
    }

    /// Whether the last waypoint lies on or beyond the exit boundary `exit_y`.
    /// If it does not, agents finishing the path stop there forever.
    pub fn reaches_exit(&self, exit_y: f64) -> bool {
        self.waypoints
            .last()
            .map(|p| p.y >= exit_y)
            .unwrap_or(false)
    }
}
