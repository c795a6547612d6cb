use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use ngurra_core::chart::{year_labels, PlotArea};
use ngurra_core::display::{progress_color, series_style, Presentable};
use ngurra_core::filter::{filter_interventions, InterventionTab, EMPTY_RESULTS_HINT};
use ngurra_core::link::{is_common_scheme, open_link, LinkOpener, LINK_FAILURE};
use ngurra_core::schedule::MockAction;
use ngurra_core::screen::{AppState, AppTab};
use ngurra_core::{filter_services, scale_trend, DashboardConfig, Dataset, ServiceFilter};
use ngurra_data::{load_dataset_str, sample_dataset, summarize};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "ngurra-cli",
    about = "Inspect the health-gap sample data the dashboards render."
)]
struct Args {
    /// Dataset JSON to load instead of the built-in sample.
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// DashboardConfig JSON; missing fields keep their defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "NGURRA_LOG", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the summary figures as JSON.
    Summary,
    /// List services matching a query and a category filter.
    Services {
        #[arg(short, long, default_value = "")]
        query: String,
        /// One of: all, available, urgent, emergency.
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// List interventions under a tracking tab.
    Interventions {
        /// One of: active, planning, completed, all.
        #[arg(short, long, default_value = "active")]
        tab: String,
    },
    /// Print the scaled trend chart.
    Chart {
        /// Print pixel positions instead of fractions.
        #[arg(long)]
        pixels: bool,
    },
    /// Run the simulated data refresh.
    Refresh {
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// Run the simulated AI analysis.
    Analysis {
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// Open an informational link with the system handler.
    OpenLink {
        /// A URL, or the title of one of the dataset's links.
        target: String,
    },
}

struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn can_open(&self, url: &Url) -> bool {
        is_common_scheme(url)
    }

    fn open(&self, url: &Url) -> Result<(), String> {
        open::that(url.as_str()).map_err(|err| err.to_string())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = &args.log_level;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("ngurra_core={level},ngurra_data={level},ngurra_cli={level},warn").into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(args.config.as_ref())?;
    let dataset = load_dataset(args.dataset.as_ref())?;

    match args.command {
        Command::Summary => {
            let summary = summarize(&dataset);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Services { query, filter } => {
            let filter = ServiceFilter::from_id(&filter)?;
            let visible = filter_services(&dataset.services, &query, filter);
            if visible.is_empty() {
                println!("No services found. {EMPTY_RESULTS_HINT}");
            }
            for service in visible {
                println!(
                    "{:<8} {:<42} {:<10} slots {:>3}  {}",
                    service.id,
                    service.name,
                    service.status.badge().label,
                    service.available_slots,
                    service.phone
                );
            }
        }
        Command::Interventions { tab } => {
            let tab = InterventionTab::from_id(&tab)?;
            for item in filter_interventions(&dataset.interventions, tab) {
                println!(
                    "{:<36} {:<14} {:>3}% ({}) {}",
                    item.name,
                    item.community,
                    item.progress_percent,
                    progress_color(item.progress_percent),
                    item.status.badge().label
                );
            }
        }
        Command::Chart { pixels } => print_chart(&dataset, &config, pixels),
        Command::Refresh { cancel_after_ms } => {
            run_action(MockAction::Refresh, &config, cancel_after_ms).await;
        }
        Command::Analysis { cancel_after_ms } => {
            run_action(MockAction::Analysis, &config, cancel_after_ms).await;
        }
        Command::OpenLink { target } => {
            let raw = dataset
                .links
                .iter()
                .find(|link| link.title.eq_ignore_ascii_case(&target))
                .map(|link| link.url.clone())
                .unwrap_or(target);
            match open_link(&SystemOpener, &raw) {
                Ok(url) => println!("Opened {url}"),
                Err(err) => {
                    error!(%err, "link not opened");
                    bail!("{}: {}", LINK_FAILURE.title, LINK_FAILURE.message);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {path:?}"))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("Config file {path:?} is not a valid DashboardConfig"))?;
    debug!(?config, "config loaded");
    Ok(config)
}

fn load_dataset(path: Option<&PathBuf>) -> anyhow::Result<Dataset> {
    match path {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read dataset file {path:?}"))?;
            Ok(load_dataset_str(&data)?)
        }
        None => Ok(sample_dataset()?),
    }
}

fn print_chart(dataset: &Dataset, config: &DashboardConfig, pixels: bool) {
    let layout = scale_trend(&dataset.trend, &dataset.trend_series);
    if layout.is_empty() {
        println!("No trend data.");
        return;
    }

    let area = PlotArea::new(config.chart_height);
    for point in &layout.points {
        let cells: Vec<String> = point
            .series
            .iter()
            .map(|(key, coord)| {
                let label = series_style(key).label;
                if pixels {
                    let px = area.project(*coord);
                    format!("{label}=({:.1}%, {:.1}px)", px.left_percent, px.top)
                } else {
                    format!("{label}=({:.3}, {:.3})", coord.x_frac, coord.y_frac)
                }
            })
            .collect();
        println!("{}  {}", point.year, cells.join("  "));
    }

    let ticks: Vec<String> = layout
        .bounds
        .value_ticks(config.value_tick_count)
        .iter()
        .map(|tick| format!("{tick:.1}"))
        .collect();
    println!("value ticks: {}", ticks.join(", "));

    let years: Vec<String> = year_labels(&layout, config.year_label_step)
        .iter()
        .map(|label| label.year.to_string())
        .collect();
    println!("year labels: {}", years.join(", "));
}

async fn run_action(action: MockAction, config: &DashboardConfig, cancel_after_ms: Option<u64>) {
    let notice = action.completion_notice();
    let on_done = move || println!("{}: {}", notice.title, notice.message);

    let mut app = AppState::default();
    let home = match action {
        MockAction::Refresh => {
            app.dashboard.start_refresh(config, on_done);
            AppTab::Dashboard
        }
        MockAction::Analysis => {
            app.select_tab(AppTab::Tracking);
            app.tracking.open_analysis();
            app.tracking.run_analysis(config, on_done);
            AppTab::Tracking
        }
    };
    info!(task = action.label(), "started");

    if let Some(ms) = cancel_after_ms {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        // Navigating away is what cancels a pending action.
        let away = if home == AppTab::Dashboard {
            AppTab::About
        } else {
            AppTab::Dashboard
        };
        if app.select_tab(away) {
            println!("{} cancelled", action.label());
            return;
        }
        debug!(task = action.label(), "finished before cancellation");
    }

    let task = match action {
        MockAction::Refresh => app.dashboard.take_refresh(),
        MockAction::Analysis => app.tracking.take_analysis(),
    };
    if let Some(task) = task {
        let state = task.join().await;
        debug!(?state, "task finished");
    }
}
