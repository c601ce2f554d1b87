//! Rasterizing the network and its k-core to PNG files.
//!
//! Sizes follow print conventions: figures are square, 10 inches wide, rendered at a fixed dpi;
//! marker sizes are areas in points² and line widths are in points.

use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    hash::Hash,
    path::{Path, PathBuf},
};

use nalgebra::Point2;
use plotters::{coord::Shift, prelude::*, style::FontStyle};

use crate::{
    graph::Graph,
    kcore::KCore,
    layout::Layout,
    ranking::top_n,
    Error, Result,
};

const FIGURE_INCHES: u32 = 10;
const POINTS_PER_INCH: f64 = 72.0;
const NODE_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
/// The family labels are registered under and drawn with.
const LABEL_FAMILY: &str = "sans-serif";

/// Fonts probed when no label font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Settings for the optional plots.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Seed of the spring layout.
    pub seed: u64,
    /// Requested k for the k-core plot.
    pub k: u32,
    /// How many of the highest-degree nodes get a label, 0 for none.
    pub label_top: usize,
    /// Output files are `{prefix}_full.png` and `{prefix}_kcore{k}.png`.
    pub prefix: String,
    /// TrueType font used for labels, system fonts are probed when unset.
    pub font: Option<PathBuf>,
}

impl PlotConfig {
    pub fn full_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_full.png", self.prefix))
    }

    pub fn kcore_path(&self, k: u32) -> PathBuf {
        PathBuf::from(format!("{}_kcore{k}.png", self.prefix))
    }
}

/// How one kind of plot looks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub dpi: u32,
    pub edge_alpha: f64,
    /// Edge width, in points.
    pub edge_width: f64,
    /// Marker area is `node_base + node_scale * degree`, in points².
    pub node_base: f64,
    pub node_scale: f64,
    /// Label size, in points.
    pub font_size: f64,
}

/// The whole network: many faint edges.
pub const FULL: Style = Style {
    dpi: 200,
    edge_alpha: 0.03,
    edge_width: 0.3,
    node_base: 8.0,
    node_scale: 0.4,
    font_size: 6.0,
};

/// The k-core: fewer, denser nodes drawn a little bolder.
pub const KCORE: Style = Style {
    dpi: 220,
    edge_alpha: 0.08,
    edge_width: 0.5,
    node_base: 12.0,
    node_scale: 0.7,
    font_size: 7.0,
};

impl Style {
    fn pixels(&self, points: f64) -> f64 {
        points * self.dpi as f64 / POINTS_PER_INCH
    }

    /// Marker radius in pixels for a node of the given degree.
    fn radius(&self, degree: u32) -> f64 {
        let area = self.node_base + self.node_scale * degree as f64;
        self.pixels(area.sqrt() / 2.0)
    }
}

/// Proof that a font was registered for labels.
#[derive(Clone, Copy, Debug)]
pub struct LabelFont(());

impl LabelFont {
    /// Registers the font at `path`, or the first readable system font when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        let candidates: Vec<&Path> = match path {
            Some(path) => vec![path],
            None => SYSTEM_FONTS.iter().map(Path::new).collect(),
        };

        for candidate in candidates {
            let Ok(bytes) = fs::read(candidate) else {
                continue;
            };

            // The font registry keeps the bytes for the rest of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font(LABEL_FAMILY, FontStyle::Normal, bytes) {
                Ok(()) => {
                    tracing::debug!(font = %candidate.display(), "registered label font");
                    return Some(Self(()));
                }
                Err(_) => {
                    tracing::warn!(font = %candidate.display(), "unusable font");
                }
            }
        }

        None
    }

    fn style(&self, pixels: f64) -> TextStyle<'static> {
        (LABEL_FAMILY, pixels).into_font().color(&BLACK)
    }
}

/// A drawing surface for a single image.
///
/// Layout coordinates are mapped onto the pixels inside `margin`, so the plotted nodes fill the
/// image. The surface is flushed to disk by [`Canvas::save`] and released when dropped, on
/// every path.
struct Canvas<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
    size: u32,
    margin: f64,
    low: Point2<f64>,
    high: Point2<f64>,
}

impl<'a> Canvas<'a> {
    fn open(
        path: &'a Path,
        size: u32,
        margin: f64,
        points: impl Iterator<Item = Point2<f64>>,
    ) -> Result<Self> {
        let (low, high) = points.fold(
            (
                Point2::new(f64::INFINITY, f64::INFINITY),
                Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(low, high), p| (low.inf(&p), high.sup(&p)),
        );

        let area = BitMapBackend::new(path, (size, size)).into_drawing_area();
        area.fill(&WHITE).map_err(render_error)?;

        Ok(Self {
            area,
            size,
            margin: margin.min(size as f64 / 4.0),
            low,
            high,
        })
    }

    fn pixel(&self, p: &Point2<f64>) -> (i32, i32) {
        let span = self.size as f64 - 2.0 * self.margin;
        let x = fraction(p.x, self.low.x, self.high.x);
        // Pixel rows grow downwards.
        let y = 1.0 - fraction(p.y, self.low.y, self.high.y);

        (
            (self.margin + x * span).round() as i32,
            (self.margin + y * span).round() as i32,
        )
    }

    fn save(self) -> Result<()> {
        self.area.present().map_err(render_error)
    }
}

/// Position of `v` within `[low, high]`, the middle when the range is empty.
fn fraction(v: f64, low: f64, high: f64) -> f64 {
    if high > low {
        (v - low) / (high - low)
    } else {
        0.5
    }
}

fn render_error(e: impl Display) -> Error {
    Error::Render(e.to_string())
}

/// Draws `graph` at the positions of `layout` and writes it to `path`.
///
/// Node sizes come from `degrees`; the `label_top` highest-degree nodes are labelled when a font
/// is available.
pub fn draw<T>(
    graph: &Graph<T>,
    layout: &Layout<T>,
    degrees: &HashMap<T, u32>,
    style: &Style,
    label_top: usize,
    font: Option<&LabelFont>,
    path: &Path,
) -> Result<()>
where
    T: Clone + Eq + Hash + Ord + Display,
{
    let size = FIGURE_INCHES * style.dpi;
    let nodes: Vec<(&T, &Point2<f64>)> = graph
        .nodes()
        .filter_map(|node| layout.get(node).map(|p| (node, p)))
        .collect();

    let largest = degrees.values().copied().max().unwrap_or(0);
    let margin = style.radius(largest).ceil() + 2.0;
    let canvas = Canvas::open(path, size, margin, nodes.iter().map(|(_, p)| **p))?;

    let edge_style = BLACK
        .mix(style.edge_alpha)
        .stroke_width(style.pixels(style.edge_width).round().max(1.0) as u32);
    for (edge, _) in graph.edges() {
        if let (Some(a), Some(b)) = (layout.get(edge.source()), layout.get(edge.target())) {
            canvas
                .area
                .draw(&PathElement::new(
                    vec![canvas.pixel(a), canvas.pixel(b)],
                    edge_style,
                ))
                .map_err(render_error)?;
        }
    }

    for (node, p) in &nodes {
        let degree = degrees.get(*node).copied().unwrap_or(0);
        let radius = style.radius(degree).round().max(1.0) as i32;
        canvas
            .area
            .draw(&Circle::new(canvas.pixel(p), radius, NODE_COLOR.filled()))
            .map_err(render_error)?;
    }

    if label_top > 0 {
        match font {
            Some(font) => {
                let text_style = font.style(style.pixels(style.font_size));
                for (node, _) in top_n(degrees, label_top) {
                    if let Some(p) = layout.get(&node) {
                        canvas
                            .area
                            .draw(&Text::new(
                                node.to_string(),
                                canvas.pixel(p),
                                text_style.clone(),
                            ))
                            .map_err(render_error)?;
                    }
                }
            }
            None => tracing::warn!("no label font available, drawing without labels"),
        }
    }

    canvas.save()?;
    tracing::info!(path = %path.display(), "wrote plot");

    Ok(())
}

/// Renders the whole network to `{prefix}_full.png` and returns the path.
pub fn render_full<T>(
    graph: &Graph<T>,
    layout: &Layout<T>,
    config: &PlotConfig,
    font: Option<&LabelFont>,
) -> Result<PathBuf>
where
    T: Clone + Eq + Hash + Ord + Display,
{
    let path = config.full_path();
    draw(
        graph,
        layout,
        &graph.degree_centrality(),
        &FULL,
        config.label_top,
        font,
        &path,
    )?;

    Ok(path)
}

/// Renders a k-core to `{prefix}_kcore{k}.png` and returns the path. Nodes are sized and
/// labelled by their degree within the core.
pub fn render_kcore<T>(
    kcore: &KCore<T>,
    layout: &Layout<T>,
    config: &PlotConfig,
    font: Option<&LabelFont>,
) -> Result<PathBuf>
where
    T: Clone + Eq + Hash + Ord + Display,
{
    let path = config.kcore_path(kcore.k);
    draw(
        &kcore.graph,
        layout,
        &kcore.graph.degree_centrality(),
        &KCORE,
        config.label_top,
        font,
        &path,
    )?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use crate::{edge::Edge, kcore::k_core_with_fallback, layout::spring_layout};

    use super::*;

    /// Reads the width and height from a PNG header.
    fn png_size(path: &Path) -> (u32, u32) {
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        (width, height)
    }

    fn triangle_with_tail() -> Graph<String> {
        let mut graph = Graph::new();
        for (a, b) in [("Thor", "Loki"), ("Loki", "Odin"), ("Odin", "Thor"), ("Odin", "Frigga")] {
            graph.insert(Edge::new(a.to_string(), b.to_string()));
        }
        graph
    }

    fn config(dir: &Path, k: u32, label_top: usize) -> PlotConfig {
        PlotConfig {
            seed: 42,
            k,
            label_top,
            prefix: dir.join("asgard").display().to_string(),
            font: None,
        }
    }

    #[test]
    fn paths() {
        let config = PlotConfig {
            seed: 0,
            k: 3,
            label_top: 0,
            prefix: "marvel_network".into(),
            font: None,
        };

        assert_eq!(config.full_path(), PathBuf::from("marvel_network_full.png"));
        assert_eq!(config.kcore_path(7), PathBuf::from("marvel_network_kcore7.png"));
    }

    #[test]
    fn radius_grows_with_degree() {
        assert!(FULL.radius(10) > FULL.radius(1));
        // 8pt² at 200 dpi.
        assert!((FULL.radius(0) - 8f64.sqrt() / 2.0 * 200.0 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn renders_both_images() {
        let dir = tempfile::tempdir().unwrap();
        let graph = triangle_with_tail();
        let layout = spring_layout(&graph, 42);
        let config = config(dir.path(), 2, 0);

        let full = render_full(&graph, &layout, &config, None).unwrap();
        assert_eq!(png_size(&full), (2000, 2000));

        let kcore = k_core_with_fallback(&graph, config.k);
        let core = render_kcore(&kcore, &layout, &config, None).unwrap();
        assert!(core.ends_with("asgard_kcore2.png"));
        assert_eq!(png_size(&core), (2200, 2200));
    }

    #[test]
    fn labels_without_font_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let graph = triangle_with_tail();
        let layout = spring_layout(&graph, 42);
        let config = config(dir.path(), 2, 3);

        let full = render_full(&graph, &layout, &config, None).unwrap();
        assert!(full.exists());
    }

    #[test]
    fn missing_font() {
        assert!(LabelFont::load(Some(Path::new("/definitely/not/a/font.ttf"))).is_none());
    }

    #[test]
    fn empty_core_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let graph: Graph<String> = Graph::new();
        let config = config(dir.path(), 20, 0);

        let kcore = k_core_with_fallback(&graph, config.k);
        let path = render_kcore(&kcore, &Layout::new(), &config, None).unwrap();

        assert!(path.ends_with("asgard_kcore0.png"));
        assert!(path.exists());
    }
}
