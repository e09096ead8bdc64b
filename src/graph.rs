//! Reconstructed route graph.
//!
//! The graph is a directed multigraph: the same pair of nodes may be joined
//! by several edges of different vehicles or kinds. Edges are kept grouped
//! per vehicle in emission order, nodes are keyed by id. Two graphs built
//! from the same per-vehicle event sequences compare equal no matter how
//! the vehicles were interleaved in the input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instance::{Coordinate, DEPOT_ID, NodeId, VehicleId};
use crate::solution::DeliveryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Depot,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub location: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Ground travel of the truck.
    Truck,
    /// Drone leaving its dock point towards a client.
    DroneSortie,
    /// Drone rejoining its truck.
    DroneReturn,
}

impl EdgeKind {
    pub fn mode(self) -> DeliveryMode {
        match self {
            EdgeKind::Truck => DeliveryMode::Truck,
            EdgeKind::DroneSortie | EdgeKind::DroneReturn => DeliveryMode::Drone,
        }
    }

    pub fn is_drone(self) -> bool {
        self.mode() == DeliveryMode::Drone
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub vehicle_id: VehicleId,
    pub kind: EdgeKind,
}

impl RouteEdge {
    pub const fn new(from: NodeId, to: NodeId, vehicle_id: VehicleId, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            vehicle_id,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGraph {
    nodes: BTreeMap<NodeId, Node>,
    routes: BTreeMap<VehicleId, Vec<RouteEdge>>,
}

impl RouteGraph {
    pub(crate) fn new(depot: Coordinate) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            DEPOT_ID,
            Node {
                id: DEPOT_ID,
                kind: NodeKind::Depot,
                location: depot,
            },
        );
        Self {
            nodes,
            routes: BTreeMap::new(),
        }
    }

    /// Adds a client node unless one with this id already exists.
    pub(crate) fn add_client(&mut self, id: NodeId, location: Coordinate) {
        self.nodes.entry(id).or_insert(Node {
            id,
            kind: NodeKind::Client,
            location,
        });
    }

    pub(crate) fn route_mut(&mut self, vehicle_id: VehicleId) -> &mut Vec<RouteEdge> {
        self.routes.entry(vehicle_id).or_default()
    }

    pub(crate) fn merge(&mut self, other: RouteGraph) {
        for (id, node) in other.nodes {
            self.nodes.entry(id).or_insert(node);
        }
        for (vehicle_id, edges) in other.routes {
            self.route_mut(vehicle_id).extend(edges);
        }
    }

    pub fn depot(&self) -> Option<&Node> {
        self.nodes.get(&DEPOT_ID)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order, depot first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Vehicle ids that have a route entry, ascending.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.routes.keys().copied()
    }

    /// Edges of one vehicle in emission order, closure last.
    pub fn route(&self, vehicle_id: VehicleId) -> &[RouteEdge] {
        self.routes
            .get(&vehicle_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All edges, vehicle by vehicle.
    pub fn edges(&self) -> impl Iterator<Item = &RouteEdge> {
        self.routes.values().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &RouteEdge> {
        self.edges().filter(move |edge| edge.kind == kind)
    }

    pub fn contains_edge(&self, edge: &RouteEdge) -> bool {
        self.route(edge.vehicle_id).contains(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_has_only_depot() {
        let graph = RouteGraph::new(Coordinate::new(3, 4));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.depot().unwrap().location, Coordinate::new(3, 4));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_client_is_idempotent() {
        let mut graph = RouteGraph::new(Coordinate::new(0, 0));
        graph.add_client(1, Coordinate::new(1, 1));
        graph.add_client(1, Coordinate::new(1, 1));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(1).unwrap().kind, NodeKind::Client);
    }

    #[test]
    fn test_edge_modes() {
        assert_eq!(EdgeKind::Truck.mode(), DeliveryMode::Truck);
        assert!(EdgeKind::DroneSortie.is_drone());
        assert!(EdgeKind::DroneReturn.is_drone());
    }

    #[test]
    fn test_missing_route_is_empty() {
        let graph = RouteGraph::new(Coordinate::new(0, 0));
        assert!(graph.route(7).is_empty());
    }

    #[test]
    fn test_merge_keeps_vehicle_order() {
        let mut left = RouteGraph::new(Coordinate::new(0, 0));
        left.route_mut(1).push(RouteEdge::new(0, 1, 1, EdgeKind::Truck));
        let mut right = RouteGraph::new(Coordinate::new(0, 0));
        right.add_client(2, Coordinate::new(2, 2));
        right.route_mut(2).push(RouteEdge::new(0, 2, 2, EdgeKind::Truck));

        left.merge(right);
        assert_eq!(left.node_count(), 2);
        assert_eq!(left.vehicles().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(left.edge_count(), 2);
    }
}
