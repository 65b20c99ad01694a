//! In-process stand-ins for the radio, transfer service and failure surface.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use handover_core::{FailureNotifier, TransferDispatcher};
use radio_integration::{PowerEventHub, RadioPowerController};
use shared::protocol::{RadioPowerEvent, RadioPowerState, TransferRequest};
use tokio::sync::broadcast;
use tracing::info;

/// What the simulated radio does after an accepted enable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerScript {
    ReportOnAfter(Duration),
    ReportOffAfter(Duration),
}

pub struct SimulatedRadio {
    enabled: Arc<AtomicBool>,
    reject_enable: bool,
    script: PowerScript,
    hub: PowerEventHub,
}

impl SimulatedRadio {
    pub fn new(initially_on: bool, reject_enable: bool, script: PowerScript) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(initially_on)),
            reject_enable,
            script,
            hub: PowerEventHub::new(),
        }
    }
}

impl RadioPowerController for SimulatedRadio {
    fn is_radio_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn request_enable_radio(&self) -> bool {
        if self.reject_enable {
            info!("sim: radio rejected enable request");
            return false;
        }

        let hub = self.hub.clone();
        let enabled = Arc::clone(&self.enabled);
        let script = self.script;
        tokio::spawn(async move {
            hub.publish(RadioPowerState::TurningOn);
            match script {
                PowerScript::ReportOnAfter(after) => {
                    tokio::time::sleep(after).await;
                    enabled.store(true, Ordering::SeqCst);
                    hub.publish(RadioPowerState::On);
                }
                PowerScript::ReportOffAfter(after) => {
                    tokio::time::sleep(after).await;
                    hub.publish(RadioPowerState::TurningOff);
                    hub.publish(RadioPowerState::Off);
                }
            }
        });
        true
    }

    fn subscribe_power_events(&self) -> broadcast::Receiver<RadioPowerEvent> {
        self.hub.subscribe()
    }
}

/// Prints the dispatched request as JSON on stdout.
pub struct StdoutDispatcher;

#[async_trait]
impl TransferDispatcher for StdoutDispatcher {
    async fn dispatch_transfer(&self, request: TransferRequest) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&request)?);
        Ok(())
    }
}

pub struct ConsoleFailureNotifier;

impl FailureNotifier for ConsoleFailureNotifier {
    fn notify_failure(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handover_core::{
        HandoverCapabilities, HandoverOutcome, HandoverRequest, HandoverSequencer, SequencerConfig,
    };
    use shared::domain::PeerAddress;

    fn request(remote_activating: bool) -> HandoverRequest {
        HandoverRequest::parse(
            PeerAddress::new("sim-peer"),
            ["file:///tmp/photo.png"],
            remote_activating,
        )
        .expect("request")
    }

    fn sequencer(radio: SimulatedRadio, remote_activating: bool) -> HandoverSequencer {
        let capabilities = HandoverCapabilities::new(Arc::new(radio))
            .with_dispatcher(Arc::new(StdoutDispatcher))
            .with_failure_notifier(Arc::new(ConsoleFailureNotifier));
        HandoverSequencer::new(
            request(remote_activating),
            capabilities,
            SequencerConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_power_on_leads_to_dispatch() {
        let radio = SimulatedRadio::new(
            false,
            false,
            PowerScript::ReportOnAfter(Duration::from_millis(800)),
        );
        let outcome = sequencer(radio, true).run().await.expect("run");
        assert_eq!(outcome, HandoverOutcome::Dispatched);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_power_off_aborts() {
        let radio = SimulatedRadio::new(
            false,
            false,
            PowerScript::ReportOffAfter(Duration::from_millis(800)),
        );
        let outcome = sequencer(radio, false).run().await.expect("run");
        assert!(matches!(outcome, HandoverOutcome::Aborted(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_rejection_fails() {
        let radio = SimulatedRadio::new(
            false,
            true,
            PowerScript::ReportOnAfter(Duration::from_millis(800)),
        );
        let outcome = sequencer(radio, false).run().await.expect("run");
        assert!(matches!(outcome, HandoverOutcome::Failed(_)));
    }
}
