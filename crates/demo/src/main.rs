// File: crates/demo/src/main.rs
// Summary: Headless demo: mounts a container in a LayoutHost, attaches a SizeObserver wired to a
// BarChart, replays `--size` changes and writes one PNG per emitted box.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use chart_core::{BarChart, BarChartConfig, LayoutHost, ObservedBox, SizeObserver};
use chart_render_skia::{render_png, RenderOptions};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chart-demo")]
#[command(about = "Render a responsive bar chart at a series of container sizes")]
struct Args {
    /// CSV file with a `value` column (or a single numeric column)
    #[arg(long, conflicts_with = "values")]
    data: Option<PathBuf>,

    /// Inline values, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    values: Vec<f64>,

    /// Container size as WIDTHxHEIGHT; repeat to replay a resize sequence
    #[arg(long = "size", value_parser = parse_size, default_value = "400x200")]
    sizes: Vec<ObservedBox>,

    /// Chart config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "target/out")]
    out: PathBuf,

    /// Show the value label for this bar
    #[arg(long)]
    hover: Option<usize>,

    /// Skip axis and hover text
    #[arg(long)]
    no_labels: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BarChartConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => BarChartConfig::default(),
    };
    let data = match &args.data {
        Some(path) => load_values_csv(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?,
        None if !args.values.is_empty() => args.values.clone(),
        None => vec![10.0, 20.0, 200.0],
    };
    info!(bars = data.len(), sizes = args.sizes.len(), "starting");

    let opts = RenderOptions {
        theme: chart_core::theme::find(&config.theme),
        draw_labels: !args.no_labels,
        ..RenderOptions::default()
    };
    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    let host = Rc::new(LayoutHost::new());
    let container = host.mount();
    let chart = Rc::new(RefCell::new(BarChart::new(config)?.with_data(data)));
    let mut observer = SizeObserver::with_listener(Rc::clone(&host), Rc::clone(&chart));
    observer.attach(Some(container)).context("attaching size observer")?;

    let mut written = 0usize;
    let mut last_revision = chart.borrow().revision();
    for size in &args.sizes {
        host.resize(container, *size)?;
        let batches = host.flush();
        let revision = chart.borrow().revision();
        if revision == last_revision {
            debug!(width = size.width, height = size.height, batches, "no new box emitted");
            continue;
        }
        last_revision = revision;
        if let Some(index) = args.hover {
            if !chart.borrow_mut().pointer_enter(index) {
                warn!(index, "hover index out of range");
            }
        }

        let Some(png) = render_png(&chart.borrow(), opts)? else {
            continue;
        };
        let path = args.out.join(format!("bars_{}x{}.png", size.width, size.height));
        std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
        written += 1;
    }

    observer.dispose();
    if written == 0 {
        warn!("container was never measured; nothing rendered");
    }
    Ok(())
}

fn parse_size(s: &str) -> Result<ObservedBox, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
    if !(w >= 0.0 && h >= 0.0) {
        return Err(format!("size must be non-negative: '{s}'"));
    }
    Ok(ObservedBox::new(w, h))
}

/// Read values from a CSV with an optional header. Uses the `value` column when present,
/// otherwise the first column.
fn load_values_csv(path: &Path) -> Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut column = 0usize;
    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        if row == 0 {
            let headers: Vec<String> = rec.iter().map(|h| h.trim().to_lowercase()).collect();
            if headers.iter().any(|h| h.parse::<f64>().is_err()) {
                column = headers.iter().position(|h| h == "value").unwrap_or(0);
                debug!(?headers, column, "csv header");
                continue;
            }
        }
        match rec.get(column).map(str::trim).map(str::parse::<f64>) {
            Some(Ok(v)) => out.push(v),
            _ => warn!(row, "skipping non-numeric row"),
        }
    }
    if out.is_empty() {
        anyhow::bail!("no values loaded; check the header and delimiter");
    }
    Ok(out)
}
