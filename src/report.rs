//! Human-readable solution report and route listings.

use std::io::{self, Write};

use crate::graph::RouteGraph;
use crate::solution::{DeliveryEvent, DeliveryMode, Solution};

pub fn mode_label(mode: DeliveryMode) -> &'static str {
    match mode {
        DeliveryMode::Truck => "Camion",
        DeliveryMode::Drone => "Drone",
    }
}

pub fn describe_event(event: &DeliveryEvent) -> String {
    format!(
        "Client {} est servi par le véhicule {} avec un {}.",
        event.client_id,
        event.vehicle_id,
        mode_label(event.mode)
    )
}

/// Writes one line per event, in list order.
pub fn write_report<W: Write>(solution: &Solution, out: &mut W) -> io::Result<()> {
    for event in solution {
        writeln!(out, "{}", describe_event(event))?;
    }
    Ok(())
}

pub fn report(solution: &Solution) -> String {
    solution
        .iter()
        .map(|event| describe_event(event) + "\n")
        .collect()
}

/// Lists every vehicle's edges, vehicles ascending, closure last.
pub fn write_routes<W: Write>(graph: &RouteGraph, out: &mut W) -> io::Result<()> {
    for vehicle_id in graph.vehicles() {
        writeln!(out, "Vehicle {}:", vehicle_id)?;
        for edge in graph.route(vehicle_id) {
            writeln!(out, "  {:?} {} -> {}", edge.kind, edge.from, edge.to)?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON of the whole graph, newline terminated.
pub fn write_graph_json<W: Write>(graph: &RouteGraph, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, graph)?;
    writeln!(out)
}
