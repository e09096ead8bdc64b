//! vrpd-routes
//!
//! Rebuilds per-vehicle truck and drone routes of a Vehicle Routing Problem
//! with Drones solution from its flat delivery event list.

pub mod instance;
pub mod solution;
pub mod graph;
pub mod reconstruct;
pub mod traits;
pub mod report;
pub mod render;

pub use graph::{EdgeKind, Node, NodeKind, RouteEdge, RouteGraph};
pub use instance::{Client, Coordinate, DEPOT_ID, Instance, InstanceError, NodeId, VehicleId};
pub use reconstruct::{ReconstructError, ReconstructOptions, reconstruct, reconstruct_parallel};
pub use solution::{DeliveryEvent, DeliveryMode, Solution, SolutionError};
