//! Route reconstruction from a flat delivery event list.
//!
//! Each vehicle is tracked by a two-field state machine: where its truck
//! stands and where its drone is docked. Events are applied strictly in
//! list order, each one touching only its own vehicle's state.

use std::collections::BTreeMap;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::{EdgeKind, RouteEdge, RouteGraph};
use crate::instance::{DEPOT_ID, Instance, NodeId, VehicleId};
use crate::solution::{DeliveryEvent, DeliveryMode, Solution, check_event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    #[error("event {index} references unknown client {client_id} (valid ids: 1..={num_clients})")]
    UnknownClient {
        index: usize,
        client_id: NodeId,
        num_clients: usize,
    },

    #[error("event {index} references unknown vehicle {vehicle_id} (valid ids: 1..={num_vehicles})")]
    UnknownVehicle {
        index: usize,
        vehicle_id: VehicleId,
        num_vehicles: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ReconstructOptions {
    /// Send a drone still away from its truck at the end of the list back
    /// to the depot with a closing `DroneReturn` edge.
    pub close_stranded_drones: bool,
}

/// Position of one vehicle's truck and drone during reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleRouteState {
    pub truck_position: NodeId,
    pub drone_position: NodeId,
}

impl Default for VehicleRouteState {
    fn default() -> Self {
        Self {
            truck_position: DEPOT_ID,
            drone_position: DEPOT_ID,
        }
    }
}

/// Outcome of applying one event to a vehicle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub edges: Vec<RouteEdge>,
    pub next: VehicleRouteState,
}

impl VehicleRouteState {
    /// True when the drone is not docked on the truck.
    pub fn drone_away(&self) -> bool {
        self.drone_position != self.truck_position
    }

    /// Applies one delivery to this state without mutating it.
    pub fn transition(self, vehicle_id: VehicleId, mode: DeliveryMode, client_id: NodeId) -> Transition {
        match mode {
            DeliveryMode::Truck => {
                let mut edges = vec![RouteEdge::new(
                    self.truck_position,
                    client_id,
                    vehicle_id,
                    EdgeKind::Truck,
                )];
                if self.drone_away() {
                    edges.push(RouteEdge::new(
                        self.drone_position,
                        client_id,
                        vehicle_id,
                        EdgeKind::DroneReturn,
                    ));
                }
                Transition {
                    edges,
                    next: VehicleRouteState {
                        truck_position: client_id,
                        drone_position: client_id,
                    },
                }
            }
            DeliveryMode::Drone => Transition {
                edges: vec![RouteEdge::new(
                    self.drone_position,
                    client_id,
                    vehicle_id,
                    EdgeKind::DroneSortie,
                )],
                next: VehicleRouteState {
                    drone_position: client_id,
                    ..self
                },
            },
        }
    }

    /// Edges closing this vehicle's route once all events are applied.
    pub fn closing_edges(self, vehicle_id: VehicleId, options: &ReconstructOptions) -> Vec<RouteEdge> {
        let mut edges = Vec::new();
        if self.truck_position != DEPOT_ID {
            edges.push(RouteEdge::new(
                self.truck_position,
                DEPOT_ID,
                vehicle_id,
                EdgeKind::Truck,
            ));
        }
        if self.drone_away() && options.close_stranded_drones {
            edges.push(RouteEdge::new(
                self.drone_position,
                DEPOT_ID,
                vehicle_id,
                EdgeKind::DroneReturn,
            ));
        }
        edges
    }
}

/// Rebuilds every vehicle's route from the event list.
///
/// Fails on the first event referencing an unknown client or vehicle; no
/// partial graph is returned.
pub fn reconstruct(
    instance: &Instance,
    solution: &Solution,
    options: &ReconstructOptions,
) -> Result<RouteGraph, ReconstructError> {
    let mut graph = RouteGraph::new(instance.depot());
    let mut states: BTreeMap<VehicleId, VehicleRouteState> = (1..=instance.num_vehicles() as VehicleId)
        .map(|vehicle_id| (vehicle_id, VehicleRouteState::default()))
        .collect();
    for &vehicle_id in states.keys() {
        graph.route_mut(vehicle_id);
    }

    for (index, event) in solution.iter().enumerate() {
        check_event(instance, index, event)?;
        let state = states
            .get_mut(&event.vehicle_id)
            .ok_or(ReconstructError::UnknownVehicle {
                index,
                vehicle_id: event.vehicle_id,
                num_vehicles: instance.num_vehicles(),
            })?;
        apply_event(instance, &mut graph, state, event);
    }

    for (vehicle_id, state) in states {
        let closing = state.closing_edges(vehicle_id, options);
        if state.drone_away() && !options.close_stranded_drones {
            debug!(vehicle_id, drone_position = state.drone_position, "drone left away from truck");
        }
        graph.route_mut(vehicle_id).extend(closing);
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "reconstructed routes"
    );
    Ok(graph)
}

/// Same result as [`reconstruct`], with vehicles rebuilt on the rayon pool.
///
/// The whole list is validated up front so the reported error matches the
/// sequential pass.
pub fn reconstruct_parallel(
    instance: &Instance,
    solution: &Solution,
    options: &ReconstructOptions,
) -> Result<RouteGraph, ReconstructError> {
    solution.validate(instance)?;

    let partials: Vec<RouteGraph> = solution
        .partition_by_vehicle(instance.num_vehicles())
        .into_par_iter()
        .enumerate()
        .map(|(idx, events)| reconstruct_vehicle(instance, idx as VehicleId + 1, &events, options))
        .collect();

    let mut graph = RouteGraph::new(instance.depot());
    for partial in partials {
        graph.merge(partial);
    }
    Ok(graph)
}

fn reconstruct_vehicle(
    instance: &Instance,
    vehicle_id: VehicleId,
    events: &[DeliveryEvent],
    options: &ReconstructOptions,
) -> RouteGraph {
    let mut graph = RouteGraph::new(instance.depot());
    graph.route_mut(vehicle_id);
    let mut state = VehicleRouteState::default();
    for event in events {
        apply_event(instance, &mut graph, &mut state, event);
    }
    let closing = state.closing_edges(vehicle_id, options);
    graph.route_mut(vehicle_id).extend(closing);
    graph
}

fn apply_event(
    instance: &Instance,
    graph: &mut RouteGraph,
    state: &mut VehicleRouteState,
    event: &DeliveryEvent,
) {
    if let Some(location) = instance.location_of(event.client_id) {
        graph.add_client(event.client_id, location);
    }
    if event.mode == DeliveryMode::Drone && instance.drone_capacity(event.vehicle_id).is_none() {
        warn!(
            vehicle_id = event.vehicle_id,
            client_id = event.client_id,
            "drone delivery on a vehicle without a drone"
        );
    }

    let Transition { edges, next } = state.transition(event.vehicle_id, event.mode, event.client_id);
    graph.route_mut(event.vehicle_id).extend(edges);
    *state = next;
}
