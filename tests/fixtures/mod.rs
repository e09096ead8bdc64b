//! Test fixtures for vrpd-routes.
//!
//! Provides:
//! - A builder for in-memory instances with sensible defaults
//! - Paths to the instance and solution files under `tests/fixtures/data`

#![allow(dead_code)]

use std::path::PathBuf;

use vrpd_routes::{Client, Coordinate, Instance};

/// Builder for test instances. Every vehicle carries a drone unless told otherwise.
#[derive(Clone, Debug)]
pub struct TestInstance {
    vehicle_capacities: Vec<u32>,
    drone_capacities: Vec<u32>,
    depot: Coordinate,
    clients: Vec<Client>,
}

impl TestInstance {
    pub fn new(num_vehicles: usize) -> Self {
        Self {
            vehicle_capacities: vec![10; num_vehicles],
            drone_capacities: vec![5; num_vehicles],
            depot: Coordinate::new(0, 0),
            clients: Vec::new(),
        }
    }

    pub fn without_drones(mut self) -> Self {
        self.drone_capacities.clear();
        self
    }

    pub fn depot(mut self, x: i64, y: i64) -> Self {
        self.depot = Coordinate::new(x, y);
        self
    }

    pub fn client(mut self, demand: u32, x: i64, y: i64) -> Self {
        self.clients.push(Client {
            demand,
            location: Coordinate::new(x, y),
        });
        self
    }

    /// Adds `n` clients on a diagonal, client `i` at `(i, i)`.
    pub fn clients_on_diagonal(mut self, n: usize) -> Self {
        for i in 1..=n as i64 {
            self = self.client(1, i, i);
        }
        self
    }

    pub fn build(self) -> Instance {
        Instance::new(
            self.vehicle_capacities.len(),
            self.vehicle_capacities,
            self.drone_capacities.len(),
            self.drone_capacities,
            self.depot,
            self.clients,
        )
        .expect("valid test instance")
    }
}

/// One vehicle (capacity 10) with a drone (capacity 5), depot at the origin,
/// clients `{3, (1,1)}` and `{2, (2,2)}`.
pub fn single_vehicle_instance() -> Instance {
    Instance::new(
        1,
        vec![10],
        1,
        vec![5],
        Coordinate::new(0, 0),
        vec![
            Client {
                demand: 3,
                location: Coordinate::new(1, 1),
            },
            Client {
                demand: 2,
                location: Coordinate::new(2, 2),
            },
        ],
    )
    .expect("valid instance")
}

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/data")
        .join(name)
}
