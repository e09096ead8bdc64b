//! Seams between the reconstruction core and its presentation layers.
//!
//! The core never draws anything itself. Renderers consume the finished
//! graph and produce a document in whatever format they target.

use plotters::style::RGBColor;

use crate::graph::{EdgeKind, NodeKind, RouteGraph};
use crate::instance::VehicleId;
use crate::render::RenderError;

/// Produces a document from a reconstructed graph.
pub trait GraphRenderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, graph: &RouteGraph) -> Result<String, RenderError>;
}

/// Stroke pattern of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Marker shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Square,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub color: RGBColor,
    pub line: LineStyle,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub color: RGBColor,
    pub shape: NodeShape,
}

/// Tableau palette used for truck edges.
pub const VEHICLE_PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub const DRONE_COLOR: RGBColor = RGBColor(0xff, 0x00, 0x00);

pub const DEPOT_COLOR: RGBColor = RGBColor(0xff, 0x00, 0x00);

/// CSS "lightgreen".
pub const CLIENT_COLOR: RGBColor = RGBColor(0x90, 0xee, 0x90);

/// Deterministic palette entry for a vehicle.
pub fn vehicle_color(vehicle_id: VehicleId) -> RGBColor {
    VEHICLE_PALETTE[vehicle_id.saturating_sub(1) as usize % VEHICLE_PALETTE.len()]
}

pub fn edge_style(kind: EdgeKind, vehicle_id: VehicleId) -> EdgeStyle {
    match kind {
        EdgeKind::Truck => EdgeStyle {
            color: vehicle_color(vehicle_id),
            line: LineStyle::Solid,
            label: "Camion",
        },
        EdgeKind::DroneSortie | EdgeKind::DroneReturn => EdgeStyle {
            color: DRONE_COLOR,
            line: LineStyle::Dashed,
            label: "Drone",
        },
    }
}

pub fn node_style(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Depot => NodeStyle {
            color: DEPOT_COLOR,
            shape: NodeShape::Square,
        },
        NodeKind::Client => NodeStyle {
            color: CLIENT_COLOR,
            shape: NodeShape::Circle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_color_wraps() {
        assert_eq!(vehicle_color(1), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(vehicle_color(10), RGBColor(0x17, 0xbe, 0xcf));
        assert_eq!(vehicle_color(11), vehicle_color(1));
    }

    #[test]
    fn test_drone_edges_share_style() {
        assert_eq!(edge_style(EdgeKind::DroneSortie, 1), edge_style(EdgeKind::DroneReturn, 4));
        assert_eq!(edge_style(EdgeKind::DroneSortie, 1).line, LineStyle::Dashed);
    }

    #[test]
    fn test_truck_edges_follow_vehicle() {
        let style = edge_style(EdgeKind::Truck, 2);
        assert_eq!(style.color, RGBColor(0xff, 0x7f, 0x0e));
        assert_eq!(style.line, LineStyle::Solid);
    }

    #[test]
    fn test_depot_and_client_differ() {
        assert_ne!(node_style(NodeKind::Depot), node_style(NodeKind::Client));
    }
}
