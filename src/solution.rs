//! Delivery events and the ordered solution list.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::instance::{Instance, NodeId, VehicleId};
use crate::reconstruct::ReconstructError;

#[derive(Debug, Error)]
pub enum SolutionError {
    #[error("failed to read solution file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed solution at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("invalid JSON solution: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a client is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    #[serde(rename = "T")]
    Truck,
    #[serde(rename = "D")]
    Drone,
}

impl DeliveryMode {
    pub fn code(self) -> &'static str {
        match self {
            DeliveryMode::Truck => "T",
            DeliveryMode::Drone => "D",
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T" => Ok(DeliveryMode::Truck),
            "D" => Ok(DeliveryMode::Drone),
            other => Err(format!("unknown delivery mode {:?}", other)),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One client served by one vehicle. Serialized as a `(client, vehicle, mode)` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeId, VehicleId, DeliveryMode)", into = "(NodeId, VehicleId, DeliveryMode)")]
pub struct DeliveryEvent {
    pub client_id: NodeId,
    pub vehicle_id: VehicleId,
    pub mode: DeliveryMode,
}

impl DeliveryEvent {
    pub const fn new(client_id: NodeId, vehicle_id: VehicleId, mode: DeliveryMode) -> Self {
        Self {
            client_id,
            vehicle_id,
            mode,
        }
    }

    pub const fn truck(client_id: NodeId, vehicle_id: VehicleId) -> Self {
        Self::new(client_id, vehicle_id, DeliveryMode::Truck)
    }

    pub const fn drone(client_id: NodeId, vehicle_id: VehicleId) -> Self {
        Self::new(client_id, vehicle_id, DeliveryMode::Drone)
    }
}

impl From<(NodeId, VehicleId, DeliveryMode)> for DeliveryEvent {
    fn from((client_id, vehicle_id, mode): (NodeId, VehicleId, DeliveryMode)) -> Self {
        Self::new(client_id, vehicle_id, mode)
    }
}

impl From<DeliveryEvent> for (NodeId, VehicleId, DeliveryMode) {
    fn from(event: DeliveryEvent) -> Self {
        (event.client_id, event.vehicle_id, event.mode)
    }
}

/// Ordered list of delivery events.
///
/// Events of one vehicle appear in the order that vehicle executes them;
/// events of different vehicles may be interleaved arbitrarily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    events: Vec<DeliveryEvent>,
}

impl Solution {
    pub fn new(events: Vec<DeliveryEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[DeliveryEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeliveryEvent> {
        self.events.iter()
    }

    /// Parses a JSON list of `[client, vehicle, "T" | "D"]` tuples.
    pub fn from_json(s: &str) -> Result<Self, SolutionError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a solution file. `.json` files are read as tuple lists, anything
    /// else as the line format accepted by [`FromStr`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SolutionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let solution = if is_json {
            Self::from_json(&contents)?
        } else {
            contents.parse()?
        };

        info!(path = %path.display(), events = solution.len(), "loaded solution");
        Ok(solution)
    }

    /// Checks every reference against the instance, in list order.
    pub fn validate(&self, instance: &Instance) -> Result<(), ReconstructError> {
        for (index, event) in self.events.iter().enumerate() {
            check_event(instance, index, event)?;
        }
        Ok(())
    }

    /// Events of one vehicle, in their original relative order.
    pub fn vehicle_events(&self, vehicle_id: VehicleId) -> impl Iterator<Item = &DeliveryEvent> {
        self.events
            .iter()
            .filter(move |event| event.vehicle_id == vehicle_id)
    }

    /// Splits the list into one sub-list per vehicle `1..=num_vehicles`,
    /// preserving each vehicle's relative order.
    pub fn partition_by_vehicle(&self, num_vehicles: usize) -> Vec<Vec<DeliveryEvent>> {
        let mut partitions = vec![Vec::new(); num_vehicles];
        for event in &self.events {
            if let Some(slot) = (event.vehicle_id as usize)
                .checked_sub(1)
                .and_then(|idx| partitions.get_mut(idx))
            {
                slot.push(*event);
            }
        }
        partitions
    }
}

pub(crate) fn check_event(
    instance: &Instance,
    index: usize,
    event: &DeliveryEvent,
) -> Result<(), ReconstructError> {
    if !instance.has_vehicle(event.vehicle_id) {
        return Err(ReconstructError::UnknownVehicle {
            index,
            vehicle_id: event.vehicle_id,
            num_vehicles: instance.num_vehicles(),
        });
    }
    if instance.client(event.client_id).is_none() {
        return Err(ReconstructError::UnknownClient {
            index,
            client_id: event.client_id,
            num_clients: instance.num_clients(),
        });
    }
    Ok(())
}

impl From<Vec<DeliveryEvent>> for Solution {
    fn from(events: Vec<DeliveryEvent>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<DeliveryEvent> for Solution {
    fn from_iter<I: IntoIterator<Item = DeliveryEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a DeliveryEvent;
    type IntoIter = std::slice::Iter<'a, DeliveryEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Line format: `client vehicle mode`, separated by whitespace and/or commas.
/// Blank lines and `#` comments are ignored.
impl FromStr for Solution {
    type Err = SolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut events = Vec::new();
        for (line_no, raw) in s.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            events.push(parse_event(line, line_no)?);
        }
        Ok(Self::new(events))
    }
}

fn parse_event(line: &str, line_no: usize) -> Result<DeliveryEvent, SolutionError> {
    let malformed = |reason: String| SolutionError::Malformed {
        line: line_no,
        reason,
    };

    let tokens: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();
    let [client, vehicle, mode] = tokens[..] else {
        return Err(malformed(format!(
            "expected 3 fields, found {}",
            tokens.len()
        )));
    };

    let client_id = client
        .parse::<NodeId>()
        .map_err(|_| malformed(format!("invalid client id {:?}", client)))?;
    let vehicle_id = vehicle
        .parse::<VehicleId>()
        .map_err(|_| malformed(format!("invalid vehicle id {:?}", vehicle)))?;
    let mode = mode.parse::<DeliveryMode>().map_err(malformed)?;

    Ok(DeliveryEvent::new(client_id, vehicle_id, mode))
}
