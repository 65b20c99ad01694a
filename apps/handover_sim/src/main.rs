use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use handover_core::{HandoverCapabilities, HandoverRequest, HandoverSequencer};
use shared::domain::{PeerAddress, ResourceLocator};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod simulated;

use config::load_settings;
use simulated::{ConsoleFailureNotifier, PowerScript, SimulatedRadio, StdoutDispatcher};

const DEFAULT_POWER_ON_AFTER_MS: u64 = 1000;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    peer: String,
    /// Locator URL or absolute file path; repeat for a batch.
    #[arg(long = "resource", required = true)]
    resources: Vec<String>,
    #[arg(long)]
    remote_activating: bool,
    #[arg(long)]
    radio_on: bool,
    #[arg(long)]
    reject_enable: bool,
    #[arg(long, conflicts_with = "power_off_after_ms")]
    power_on_after_ms: Option<u64>,
    #[arg(long)]
    power_off_after_ms: Option<u64>,
    #[arg(long, default_value = "handover.toml")]
    config: PathBuf,
}

fn resource_locator(raw: &str) -> Result<ResourceLocator> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return ResourceLocator::from_file_path(path).map_err(Into::into);
    }
    ResourceLocator::parse(raw).with_context(|| format!("failed to parse resource '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let resources = args
        .resources
        .iter()
        .map(|raw| resource_locator(raw))
        .collect::<Result<Vec<_>>>()?;
    let request = HandoverRequest::new(
        PeerAddress::new(args.peer),
        resources,
        args.remote_activating,
    )?;

    let script = match args.power_off_after_ms {
        Some(ms) => PowerScript::ReportOffAfter(Duration::from_millis(ms)),
        None => PowerScript::ReportOnAfter(Duration::from_millis(
            args.power_on_after_ms.unwrap_or(DEFAULT_POWER_ON_AFTER_MS),
        )),
    };
    let radio = SimulatedRadio::new(args.radio_on, args.reject_enable, script);

    let capabilities = HandoverCapabilities::new(Arc::new(radio))
        .with_dispatcher(Arc::new(StdoutDispatcher))
        .with_failure_notifier(Arc::new(ConsoleFailureNotifier));
    let sequencer = HandoverSequencer::new(request, capabilities, settings.sequencer_config());
    info!(
        handover_id = %sequencer.id(),
        remote_enable_delay_ms = settings.remote_enable_delay_ms,
        "sim: starting handover"
    );

    let outcome = sequencer.run().await?;
    println!("Handover finished: {outcome:?}");

    Ok(())
}
