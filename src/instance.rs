//! VRPD instance model and its line-oriented text format.
//!
//! Client ids are positional: the client on line `5 + i` of the file gets
//! id `i + 1`. Node id 0 is always the depot.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Identifier of a graph node. 0 is the depot, clients start at 1.
pub type NodeId = u32;

/// 1-based vehicle identifier.
pub type VehicleId = u32;

/// Node id reserved for the depot.
pub const DEPOT_ID: NodeId = 0;

const HEADER_LINES: usize = 5;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed instance at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl InstanceError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        InstanceError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Planar integer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Coordinate {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Client {
    pub demand: u32,
    pub location: Coordinate,
}

/// Where an instance was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InstanceSource {
    File(PathBuf),
    #[default]
    Memory,
}

/// An immutable VRPD instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    depot: Coordinate,
    vehicle_capacities: Vec<u32>,
    drone_capacities: Vec<u32>,
    clients: Vec<Client>,
    source: InstanceSource,
}

impl Instance {
    /// Builds an instance, checking declared counts against the capacity lists.
    pub fn new(
        num_vehicles: usize,
        vehicle_capacities: Vec<u32>,
        num_drones: usize,
        drone_capacities: Vec<u32>,
        depot: Coordinate,
        clients: Vec<Client>,
    ) -> Result<Self, InstanceError> {
        if vehicle_capacities.len() != num_vehicles {
            return Err(InstanceError::malformed(
                1,
                format!(
                    "expected {} vehicle capacities, found {}",
                    num_vehicles,
                    vehicle_capacities.len()
                ),
            ));
        }
        if drone_capacities.len() != num_drones {
            return Err(InstanceError::malformed(
                3,
                format!(
                    "expected {} drone capacities, found {}",
                    num_drones,
                    drone_capacities.len()
                ),
            ));
        }

        Ok(Self {
            depot,
            vehicle_capacities,
            drone_capacities,
            clients,
            source: InstanceSource::Memory,
        })
    }

    /// Reads and parses an instance file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut instance: Instance = contents.parse()?;
        instance.source = InstanceSource::File(path.to_path_buf());
        info!(
            path = %path.display(),
            vehicles = instance.num_vehicles(),
            drones = instance.num_drones(),
            clients = instance.num_clients(),
            "loaded instance"
        );

        Ok(instance)
    }

    pub fn depot(&self) -> Coordinate {
        self.depot
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicle_capacities.len()
    }

    pub fn num_drones(&self) -> usize {
        self.drone_capacities.len()
    }

    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn vehicle_capacities(&self) -> &[u32] {
        &self.vehicle_capacities
    }

    pub fn drone_capacities(&self) -> &[u32] {
        &self.drone_capacities
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn source(&self) -> &InstanceSource {
        &self.source
    }

    /// Capacity of the truck with the given 1-based id.
    pub fn vehicle_capacity(&self, vehicle_id: VehicleId) -> Option<u32> {
        index_of(vehicle_id).and_then(|idx| self.vehicle_capacities.get(idx).copied())
    }

    /// Capacity of the drone riding on the given vehicle, if it carries one.
    pub fn drone_capacity(&self, vehicle_id: VehicleId) -> Option<u32> {
        index_of(vehicle_id).and_then(|idx| self.drone_capacities.get(idx).copied())
    }

    pub fn has_vehicle(&self, vehicle_id: VehicleId) -> bool {
        self.vehicle_capacity(vehicle_id).is_some()
    }

    /// Resolves a 1-based client id to its record.
    pub fn client(&self, client_id: NodeId) -> Option<&Client> {
        index_of(client_id).and_then(|idx| self.clients.get(idx))
    }

    /// Location of any node, depot included.
    pub fn location_of(&self, node_id: NodeId) -> Option<Coordinate> {
        if node_id == DEPOT_ID {
            Some(self.depot)
        } else {
            self.client(node_id).map(|client| client.location)
        }
    }
}

fn index_of(id: u32) -> Option<usize> {
    (id as usize).checked_sub(1)
}

impl FromStr for Instance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() < HEADER_LINES {
            return Err(InstanceError::malformed(
                lines.len(),
                format!("expected at least {} header lines", HEADER_LINES),
            ));
        }

        let num_vehicles = parse_count(lines[0], 0)?;
        let vehicle_capacities = parse_u32_list(lines[1], 1)?;
        let num_drones = parse_count(lines[2], 2)?;
        let drone_capacities = parse_u32_list(lines[3], 3)?;
        let depot = parse_coordinate(&parse_i64_list(lines[4], 4)?, 4)?;

        let mut clients = Vec::with_capacity(lines.len() - HEADER_LINES);
        for (offset, line) in lines[HEADER_LINES..].iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = HEADER_LINES + offset;
            let values = parse_i64_list(line, line_no)?;
            let (&demand, location) = values
                .split_first()
                .ok_or_else(|| InstanceError::malformed(line_no, "missing client demand"))?;
            let demand = u32::try_from(demand).map_err(|_| {
                InstanceError::malformed(line_no, format!("invalid demand {}", demand))
            })?;
            clients.push(Client {
                demand,
                location: parse_coordinate(location, line_no)?,
            });
        }

        debug!(clients = clients.len(), "parsed client records");

        Instance::new(
            num_vehicles,
            vehicle_capacities,
            num_drones,
            drone_capacities,
            depot,
            clients,
        )
    }
}

fn parse_count(line: &str, line_no: usize) -> Result<usize, InstanceError> {
    let trimmed = line.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| InstanceError::malformed(line_no, format!("invalid count {:?}", trimmed)))
}

fn parse_u32_list(line: &str, line_no: usize) -> Result<Vec<u32>, InstanceError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| {
                InstanceError::malformed(line_no, format!("invalid capacity {:?}", token))
            })
        })
        .collect()
}

fn parse_i64_list(line: &str, line_no: usize) -> Result<Vec<i64>, InstanceError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| {
                InstanceError::malformed(line_no, format!("invalid integer {:?}", token))
            })
        })
        .collect()
}

fn parse_coordinate(values: &[i64], line_no: usize) -> Result<Coordinate, InstanceError> {
    match values {
        [x, y] => Ok(Coordinate::new(*x, *y)),
        _ => Err(InstanceError::malformed(
            line_no,
            format!("expected 2 coordinates, found {}", values.len()),
        )),
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[u32]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

const RULE: &str = "------------------------------------------------------------------------";

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        match &self.source {
            InstanceSource::File(path) => writeln!(f, "Instance file = {}", path.display())?,
            InstanceSource::Memory => writeln!(f, "randomly generated")?,
        }
        writeln!(f, "{}", RULE)?;
        writeln!(f, "number of vehicles (and drones)={}", self.num_vehicles())?;
        write!(f, "vehicle_capacities=")?;
        write_list(f, &self.vehicle_capacities)?;
        writeln!(f)?;
        write!(f, "drone_capacities=")?;
        write_list(f, &self.drone_capacities)?;
        writeln!(f)?;
        writeln!(f, "depot={}", self.depot)?;
        writeln!(f, "Clients:")?;
        for (idx, client) in self.clients.iter().enumerate() {
            writeln!(
                f,
                "  Client {}: Demand = {}, Location = {}",
                idx + 1,
                client.demand,
                client.location
            )?;
        }
        writeln!(f, "{}", RULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2\n10 12\n1\n5\n0 0\n3 1 1\n2 2 2\n4 -3 5\n";

    #[test]
    fn test_parse_sample() {
        let instance: Instance = SAMPLE.parse().unwrap();
        assert_eq!(instance.num_vehicles(), 2);
        assert_eq!(instance.vehicle_capacities(), &[10, 12]);
        assert_eq!(instance.num_drones(), 1);
        assert_eq!(instance.drone_capacities(), &[5]);
        assert_eq!(instance.depot(), Coordinate::new(0, 0));
        assert_eq!(instance.num_clients(), 3);
        assert_eq!(instance.client(3).unwrap().location, Coordinate::new(-3, 5));
        assert_eq!(instance.source(), &InstanceSource::Memory);
    }

    #[test]
    fn test_client_ids_are_positional() {
        let instance: Instance = SAMPLE.parse().unwrap();
        assert!(instance.client(0).is_none());
        assert_eq!(instance.client(1).unwrap().demand, 3);
        assert_eq!(instance.client(2).unwrap().demand, 2);
        assert!(instance.client(4).is_none());
    }

    #[test]
    fn test_location_of_depot_and_clients() {
        let instance: Instance = SAMPLE.parse().unwrap();
        assert_eq!(instance.location_of(DEPOT_ID), Some(Coordinate::new(0, 0)));
        assert_eq!(instance.location_of(2), Some(Coordinate::new(2, 2)));
        assert_eq!(instance.location_of(9), None);
    }

    #[test]
    fn test_drone_capacity_by_vehicle() {
        let instance: Instance = SAMPLE.parse().unwrap();
        assert_eq!(instance.drone_capacity(1), Some(5));
        assert_eq!(instance.drone_capacity(2), None);
        assert_eq!(instance.vehicle_capacity(2), Some(12));
        assert_eq!(instance.vehicle_capacity(0), None);
    }

    #[test]
    fn test_vehicle_count_mismatch() {
        let err = "3\n10 12\n0\n\n0 0\n".parse::<Instance>().unwrap_err();
        match err {
            InstanceError::Malformed { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_drone_count_mismatch() {
        let err = "1\n10\n2\n5\n0 0\n".parse::<Instance>().unwrap_err();
        match err {
            InstanceError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_field() {
        let err = "1\n10\n1\n5\n0 0\nabc 1 1\n".parse::<Instance>().unwrap_err();
        match err {
            InstanceError::Malformed { line, reason } => {
                assert_eq!(line, 5);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_header_lines() {
        let err = "1\n10\n".parse::<Instance>().unwrap_err();
        assert!(matches!(err, InstanceError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_client_without_coordinates() {
        let err = "1\n10\n0\n\n0 0\n7\n".parse::<Instance>().unwrap_err();
        assert!(matches!(err, InstanceError::Malformed { line: 5, .. }));
    }

    #[test]
    fn test_negative_demand_rejected() {
        let err = "1\n10\n0\n\n0 0\n-1 2 2\n".parse::<Instance>().unwrap_err();
        assert!(matches!(err, InstanceError::Malformed { line: 5, .. }));
    }

    #[test]
    fn test_blank_client_lines_skipped() {
        let instance: Instance = "1\n10\n0\n\n0 0\n\n1 1 1\n\n".parse().unwrap();
        assert_eq!(instance.num_clients(), 1);
        assert_eq!(instance.num_drones(), 0);
    }

    #[test]
    fn test_summary_lists_clients() {
        let instance: Instance = SAMPLE.parse().unwrap();
        let summary = instance.to_string();
        assert!(summary.contains("randomly generated"));
        assert!(summary.contains("vehicle_capacities=[10, 12]"));
        assert!(summary.contains("depot=(0, 0)"));
        assert!(summary.contains("Client 3: Demand = 4, Location = (-3, 5)"));
    }
}
