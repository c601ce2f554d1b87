use std::path::PathBuf;

use clap::Parser;

use crate::plot::PlotConfig;

/// Size, density and centrality statistics for a GraphML network, with optional plots.
#[derive(Clone, Debug, Parser)]
#[command(name = "marvel-stats", version, about)]
pub struct Args {
    /// Path to the GraphML file
    #[arg(default_value = "marvel-network.graphml")]
    pub graphml: PathBuf,
    /// How many top nodes to list per ranking
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Generate PNG plots (full network and k-core)
    #[arg(long)]
    pub plot: bool,
    /// k for the k-core plot
    #[arg(long, default_value_t = 20)]
    pub k: u32,
    /// Spring layout seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Output filename prefix for the PNGs
    #[arg(long, default_value = "marvel_network")]
    pub prefix: String,
    /// Label the top N nodes by degree on each plot
    #[arg(long, default_value_t = 0)]
    pub label_top: usize,
    /// TrueType font for labels, defaults to a system font
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,
}

impl Args {
    pub fn plot_config(&self) -> PlotConfig {
        PlotConfig {
            seed: self.seed,
            k: self.k,
            label_top: self.label_top,
            prefix: self.prefix.clone(),
            font: self.font.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["marvel-stats"]).unwrap();

        assert_eq!(args.graphml, PathBuf::from("marvel-network.graphml"));
        assert_eq!(args.top, 5);
        assert!(!args.plot);
        assert_eq!(args.k, 20);
        assert_eq!(args.seed, 42);
        assert_eq!(args.prefix, "marvel_network");
        assert_eq!(args.label_top, 0);
        assert_eq!(args.font, None);
    }

    #[test]
    fn all_options() {
        let args = Args::try_parse_from([
            "marvel-stats",
            "heroes.graphml",
            "--top",
            "10",
            "--plot",
            "--k",
            "7",
            "--seed",
            "1",
            "--prefix",
            "out/vis",
            "--label-top",
            "3",
            "--font",
            "DejaVuSans.ttf",
        ])
        .unwrap();

        assert_eq!(args.graphml, PathBuf::from("heroes.graphml"));
        assert_eq!(args.top, 10);
        assert!(args.plot);
        assert_eq!(
            args.plot_config(),
            PlotConfig {
                seed: 1,
                k: 7,
                label_top: 3,
                prefix: "out/vis".into(),
                font: Some(PathBuf::from("DejaVuSans.ttf")),
            }
        );
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(Args::try_parse_from(["marvel-stats", "--top", "-1"]).is_err());
    }
}
