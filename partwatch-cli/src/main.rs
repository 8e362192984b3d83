//! Command-line runner for the partwatch engine.
//!
//! Polls one machine and emits each published snapshot as a line of JSON,
//! suitable for piping into a dashboard process or `jq`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use partwatch_client::ApiClient;
use partwatch_engine::{Engine, EngineConfig, EngineState};
use partwatch_types::{CompanyId, MachineId, PartId, TimeRange};

#[derive(Parser, Debug)]
#[command(name = "partwatch")]
#[command(about = "Poll a machine's parts, counters and errors into JSON snapshots")]
struct Args {
    /// Machine to poll
    #[arg(short, long, conflicts_with_all = ["list_machines", "part_detail"])]
    machine: Option<MachineId>,

    /// List the machines of a company and exit
    #[arg(long, value_name = "COMPANY_ID", conflicts_with = "part_detail")]
    list_machines: Option<CompanyId>,

    /// Fetch full error detail for one part and exit
    #[arg(long, value_name = "PART_ID")]
    part_detail: Option<PartId>,

    /// Backend base address (overrides config file and environment)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Polling interval in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Error lookup window (1m, 10m, 1h, 2h, 3h, 12h, 1d, 1w, 1mo)
    #[arg(short, long)]
    range: Option<TimeRange>,

    /// Path to a settings file (TOML/JSON/YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, serde::Deserialize)]
struct Settings {
    endpoint: String,
    interval_secs: u64,
    range: TimeRange,
}

impl Settings {
    /// Layer defaults, an optional settings file, `PARTWATCH_*` environment
    /// variables, and command-line flags, in that order.
    fn load(args: &Args) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("endpoint", "http://localhost:5000")?
            .set_default("interval_secs", 3u64)?
            .set_default("range", "1h")?;

        if let Some(path) = &args.config {
            builder = builder.add_source(config::File::from(path.clone()));
        }
        builder = builder.add_source(config::Environment::with_prefix("PARTWATCH"));

        if let Some(endpoint) = &args.endpoint {
            builder = builder.set_override("endpoint", endpoint.clone())?;
        }
        if let Some(interval) = args.interval {
            builder = builder.set_override("interval_secs", interval)?;
        }
        if let Some(range) = args.range {
            builder = builder.set_override("range", range.label())?;
        }

        builder
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partwatch=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args)?;

    let client = ApiClient::builder()
        .endpoint(&settings.endpoint)
        .timeout(request_timeout(settings.interval_secs))
        .build();

    if let Some(company) = args.list_machines {
        return list_machines(&client, company).await;
    }
    if let Some(part) = args.part_detail {
        return print_part_detail(&client, part, settings.range).await;
    }

    let Some(machine) = args.machine else {
        bail!("--machine is required unless --list-machines or --part-detail is given");
    };

    run_poll(client, machine, &settings).await
}

/// Keep requests strictly shorter than the polling interval so a slow
/// backend cannot queue ticks behind itself.
fn request_timeout(interval_secs: u64) -> Duration {
    Duration::from_millis((interval_secs.max(1) * 1000).saturating_sub(500))
}

async fn list_machines(client: &ApiClient, company: CompanyId) -> Result<()> {
    let machines = client
        .machines(company)
        .await
        .context("machine directory fetch failed")?;
    for machine in machines {
        println!("{}\t{}", machine.id, machine.name);
    }
    Ok(())
}

async fn print_part_detail(client: &ApiClient, part: PartId, range: TimeRange) -> Result<()> {
    let records = client
        .error_detail(part, range.resolve_now())
        .await
        .context("error detail fetch failed")?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn run_poll(client: ApiClient, machine: MachineId, settings: &Settings) -> Result<()> {
    let config = EngineConfig::default()
        .tick_interval(Duration::from_secs(settings.interval_secs.max(1)))
        .time_range(settings.range);

    let engine = Engine::new(client, config);
    let mut states = engine.state_changes();
    let mut snapshots = engine.store().subscribe();

    engine.select_machine(machine);
    info!(machine, endpoint = %settings.endpoint, "polling started");

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = states.borrow_and_update().clone();
                match state {
                    EngineState::CatalogError(reason) => {
                        bail!("catalog unavailable for machine {machine}: {reason}");
                    }
                    EngineState::Ready => info!(machine, "catalog loaded"),
                    _ => {}
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    if snapshot.any_degraded() {
                        warn!(machine, "one or more sources degraded this tick");
                    }
                    println!("{}", serde_json::to_string(&*snapshot)?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping");
                engine.stop();
                return Ok(());
            }
        }
    }
}
