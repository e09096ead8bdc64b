//! SVG rendering of reconstructed routes.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, TextStyle};
use thiserror::Error;
use tracing::info;

use crate::graph::{Node, RouteEdge, RouteGraph};
use crate::traits::{GraphRenderer, LineStyle, NodeShape, edge_style, node_style};

/// Base name of persisted diagrams.
pub const SOLUTION_FILE_STEM: &str = "VRPDSolution";

const DASH_LENGTH: u32 = 6;
const DASH_SPACING: u32 = 4;
const ARROW_SIZE: f64 = 8.0;
const LOOP_SAMPLES: usize = 24;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw diagram: {0}")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct SvgConfig {
    pub width: u32,
    pub height: u32,
    /// Blank border around the plotted nodes, in pixels.
    pub margin: u32,
    pub node_radius: u32,
    pub title: String,
    pub title_size: u32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            margin: 40,
            node_radius: 10,
            title: "VPRD".to_string(),
            title_size: 25,
        }
    }
}

type Plot<'a> = DrawingArea<SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    config: SvgConfig,
}

impl SvgRenderer {
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }

    /// Pixel box the nodes are plotted into, below the title.
    fn plot_area(&self) -> (Range<i32>, Range<i32>) {
        let cfg = &self.config;
        let margin = cfg.margin as i32;
        let top = margin + cfg.title_size as i32;
        let right = (cfg.width as i32 - margin).max(margin + 1);
        let bottom = (cfg.height as i32 - margin).max(top + 1);
        (margin..right, top..bottom)
    }

    fn draw(&self, root: &DrawingArea<SVGBackend<'_>, Shift>, graph: &RouteGraph) -> Result<(), RenderError> {
        let cfg = &self.config;
        root.fill(&WHITE)?;

        let title_style = TextStyle::from(FontDesc::new(
            FontFamily::SansSerif,
            f64::from(cfg.title_size),
            FontStyle::Normal,
        ))
        .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            cfg.title.clone(),
            ((cfg.width / 2) as i32, (cfg.margin / 2 + cfg.title_size / 2) as i32),
            title_style,
        ))?;

        let (pixel_x, pixel_y) = self.plot_area();
        let (logic_x, logic_y) = equal_aspect_ranges(graph, &pixel_x, &pixel_y);
        let plot: Plot<'_> = root.apply_coord_spec(Cartesian2d::<RangedCoordf64, RangedCoordf64>::new(
            logic_x,
            logic_y,
            (pixel_x, pixel_y),
        ));

        for edge in graph.edges() {
            if let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) {
                self.draw_edge(root, &plot, edge, from, to)?;
            }
        }
        for node in graph.nodes() {
            self.draw_node(root, &plot, node)?;
        }
        Ok(())
    }

    fn draw_edge(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        plot: &Plot<'_>,
        edge: &RouteEdge,
        from: &Node,
        to: &Node,
    ) -> Result<(), RenderError> {
        let style = edge_style(edge.kind, edge.vehicle_id);
        let r = f64::from(self.config.node_radius);
        let a = plot.map_coordinate(&logical(from));
        let b = plot.map_coordinate(&logical(to));

        let points = if a == b {
            self_loop(a, r)
        } else {
            let (start, end) = shorten(a, b, r);
            vec![start, end]
        };

        match style.line {
            LineStyle::Solid => root.draw(&PathElement::new(points.clone(), style.color.stroke_width(2)))?,
            LineStyle::Dashed => root.draw(&DashedPathElement::new(
                points.clone(),
                DASH_LENGTH,
                DASH_SPACING,
                style.color.stroke_width(2),
            ))?,
        }

        if let [.., prev, tip] = points[..] {
            root.draw(&Polygon::new(arrow_head(prev, tip), style.color.filled()))?;
        }
        Ok(())
    }

    fn draw_node(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        plot: &Plot<'_>,
        node: &Node,
    ) -> Result<(), RenderError> {
        let style = node_style(node.kind);
        let r = self.config.node_radius as i32;
        let (x, y) = plot.map_coordinate(&logical(node));

        match style.shape {
            NodeShape::Square => {
                root.draw(&Rectangle::new([(x - r, y - r), (x + r, y + r)], style.color.filled()))?
            }
            NodeShape::Circle => root.draw(&Circle::new((x, y), r, style.color.filled()))?,
        }

        let label_style = TextStyle::from(FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal))
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(node.id.to_string(), (x, y), label_style))?;
        Ok(())
    }
}

impl GraphRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, graph: &RouteGraph) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.config.width, self.config.height))
                .into_drawing_area();
            self.draw(&root, graph)?;
            root.present()?;
        }
        Ok(svg)
    }
}

/// Renders the graph and writes it as `VRPDSolution.<ext>` inside `dir`.
pub fn save_svg<R: GraphRenderer>(
    graph: &RouteGraph,
    renderer: &R,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, RenderError> {
    let path = dir
        .as_ref()
        .join(format!("{}.{}", SOLUTION_FILE_STEM, renderer.extension()));
    let document = renderer.render(graph)?;
    fs::write(&path, document).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "image has been saved");
    Ok(path)
}

fn logical(node: &Node) -> (f64, f64) {
    (node.location.x as f64, node.location.y as f64)
}

/// Logical ranges covering every node, widened so both axes share one scale.
fn equal_aspect_ranges(
    graph: &RouteGraph,
    pixel_x: &Range<i32>,
    pixel_y: &Range<i32>,
) -> (Range<f64>, Range<f64>) {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for (x, y) in graph.nodes().map(logical) {
        bounds = Some(match bounds {
            None => (x, x, y, y),
            Some((min_x, max_x, min_y, max_y)) => (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y)),
        });
    }
    let (min_x, max_x, min_y, max_y) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));

    let width = f64::from(pixel_x.end - pixel_x.start);
    let height = f64::from(pixel_y.end - pixel_y.start);
    let span_x = (max_x - min_x).max(1.0);
    let span_y = (max_y - min_y).max(1.0);
    let scale = (width / span_x).min(height / span_y);

    let half_x = width / scale / 2.0;
    let half_y = height / scale / 2.0;
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    ((mid_x - half_x)..(mid_x + half_x), (mid_y - half_y)..(mid_y + half_y))
}

/// Pulls both ends of a segment in by `r` so arrowheads stay outside node markers.
fn shorten(a: (i32, i32), b: (i32, i32), r: f64) -> ((i32, i32), (i32, i32)) {
    let (dx, dy) = (f64::from(b.0 - a.0), f64::from(b.1 - a.1));
    let len = dx.hypot(dy);
    if len <= 2.0 * r {
        return (a, b);
    }
    let (ux, uy) = (dx / len * r, dy / len * r);
    (
        (a.0 + ux.round() as i32, a.1 + uy.round() as i32),
        (b.0 - ux.round() as i32, b.1 - uy.round() as i32),
    )
}

/// Arc sitting on top of a node, for edges that start and end at the same node.
fn self_loop(center: (i32, i32), r: f64) -> Vec<(i32, i32)> {
    let (cx, cy) = (f64::from(center.0), f64::from(center.1) - 2.0 * r);
    let start = 120f64.to_radians();
    let sweep = 300f64.to_radians();
    (0..=LOOP_SAMPLES)
        .map(|i| {
            let angle = start + sweep * i as f64 / LOOP_SAMPLES as f64;
            (
                (cx + r * angle.cos()).round() as i32,
                (cy + r * angle.sin()).round() as i32,
            )
        })
        .collect()
}

/// Triangle pointing at `tip`, aligned with the segment `prev -> tip`.
fn arrow_head(prev: (i32, i32), tip: (i32, i32)) -> Vec<(i32, i32)> {
    let (dx, dy) = (f64::from(tip.0 - prev.0), f64::from(tip.1 - prev.1));
    let len = dx.hypot(dy);
    if len == 0.0 {
        return vec![tip];
    }
    let (ux, uy) = (dx / len, dy / len);
    let (bx, by) = (f64::from(tip.0) - ux * ARROW_SIZE, f64::from(tip.1) - uy * ARROW_SIZE);
    let (px, py) = (-uy * ARROW_SIZE / 2.0, ux * ARROW_SIZE / 2.0);
    vec![
        tip,
        ((bx + px).round() as i32, (by + py).round() as i32),
        ((bx - px).round() as i32, (by - py).round() as i32),
    ]
}
