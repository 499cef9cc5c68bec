use anyhow::Result;
use clap::{Parser, Subcommand};
use hullcolor::synth::ScatterCfg;
use hullcolor::{DEFAULT_SCALE_FACTOR, DEFAULT_SEED_COLOR};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod orchestrate;
mod palette;
mod provenance;
mod table;

use orchestrate::{ColorOpts, DemoOpts, Summary};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Color building clusters so that touching clusters never share a color")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Color every granularity (`k_<n>` column) of every CSV map under --input
    Color {
        /// A CSV file or a directory of CSV files
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Hull growth about the building centroid before the contact test
        #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
        scale: f64,
        /// Color of the first cluster in processing order
        #[arg(long, default_value_t = DEFAULT_SEED_COLOR)]
        seed_color: usize,
        /// Flip y to `page_height - y` before any geometry
        #[arg(long)]
        page_height: Option<f64>,
        /// Directory of headerless 0/1 CSV matrices, `<dir>/<map>/k_<n>.csv`,
        /// to color against instead of derived contact
        #[arg(long)]
        adjacency_dir: Option<PathBuf>,
    },
    /// Color a seeded synthetic layout
    Demo {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 12)]
        clusters: usize,
        #[arg(long, default_value_t = 4)]
        columns: usize,
        #[arg(long, default_value_t = 2025)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
        scale: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Color {
            input,
            out,
            scale,
            seed_color,
            page_height,
            adjacency_dir,
        } => {
            let opts = ColorOpts {
                input,
                out,
                scale_factor: scale,
                seed_color,
                page_height,
                adjacency_dir,
            };
            finish(orchestrate::color_inputs(&opts)?)
        }
        Action::Demo {
            out,
            clusters,
            columns,
            seed,
            scale,
        } => {
            let opts = DemoOpts {
                out,
                layout: ScatterCfg {
                    columns,
                    clusters,
                    ..ScatterCfg::default()
                },
                seed,
                scale_factor: scale,
                seed_color: DEFAULT_SEED_COLOR,
            };
            finish(orchestrate::demo(&opts)?)
        }
        Action::Report => report(),
    }
}

fn finish(summary: Summary) -> Result<()> {
    tracing::info!(
        runs = summary.runs,
        skipped = summary.skipped,
        outputs = summary.outputs.len(),
        "done"
    );
    Ok(())
}

fn report() -> Result<()> {
    let doc = provenance::document(&provenance::Payload::new(serde_json::json!({})));
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
