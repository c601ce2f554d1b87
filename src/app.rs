//! The batch pipeline behind the `marvel-stats` binary.

use std::io::Write;

use anyhow::{Context, Result};

use crate::{
    cli::Args,
    graphml, kcore,
    layout::spring_layout,
    plot::{self, LabelFont},
    report,
};

/// Loads the graph named by `args`, writes the report to `out` and renders the plots when
/// asked to.
///
/// A missing input file surfaces as [`crate::Error::NotFound`] before anything is written.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let raw = graphml::read_graphml(&args.graphml)?;
    let graph = raw.simplify();
    tracing::info!(
        nodes = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );

    report::write_report(&graph, args.top, out).context("failed to compute statistics")?;

    if !args.plot {
        return Ok(());
    }

    let config = args.plot_config();
    let font = if config.label_top > 0 {
        LabelFont::load(config.font.as_deref())
    } else {
        None
    };

    // One layout for both images so they can be compared side by side.
    let layout = spring_layout(&graph, config.seed);

    let full = plot::render_full(&graph, &layout, &config, font.as_ref())
        .context("failed to render the full network")?;
    writeln!(out, "Wrote {}", full.display())?;

    let kcore = kcore::k_core_with_fallback(&graph, config.k);
    if kcore.fell_back {
        writeln!(out, "[Note] Requested k too high; using max k={}", kcore.k)?;
    }

    let core = plot::render_kcore(&kcore, &layout, &config, font.as_ref())
        .with_context(|| format!("failed to render the {}-core", kcore.k))?;
    writeln!(out, "Wrote {}", core.display())?;

    Ok(())
}
