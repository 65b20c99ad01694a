use std::{future, sync::Arc, time::Duration};

use shared::{
    domain::HandoverId,
    protocol::{RadioPowerEvent, RadioPowerState},
};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{sleep_until, Instant},
};
use tracing::{debug, error, info, warn};

use crate::{
    config::SequencerConfig,
    content_type::resolve_content_type,
    error::HandoverError,
    timing::remote_readiness_delay,
    transfer::{build_transfer_request, HandoverRequest},
    HandoverCapabilities,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoverOutcome {
    Dispatched,
    /// Ended with a failure notification shown to the user.
    Failed(HandoverError),
    /// Ended silently.
    Aborted(HandoverError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerState {
    Init,
    EnablingLocalRadio { give_up_at: Option<Instant> },
    AwaitingRemoteReadiness { dispatch_at: Instant },
    Complete(HandoverOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerInput {
    Power(RadioPowerState),
    DispatchTimerElapsed,
    EnableTimerElapsed,
    PowerEventsClosed,
}

/// Single-shot: inputs a state does not expect, including everything after
/// completion, are ignored.
pub struct HandoverSequencer {
    id: HandoverId,
    request: HandoverRequest,
    capabilities: HandoverCapabilities,
    config: SequencerConfig,
    state: SequencerState,
    started_at: Option<Instant>,
    power_events: Option<broadcast::Receiver<RadioPowerEvent>>,
}

impl HandoverSequencer {
    pub fn new(
        request: HandoverRequest,
        capabilities: HandoverCapabilities,
        config: SequencerConfig,
    ) -> Self {
        Self {
            id: HandoverId::new(),
            request,
            capabilities,
            config,
            state: SequencerState::Init,
            started_at: None,
            power_events: None,
        }
    }

    pub fn id(&self) -> HandoverId {
        self.id
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SequencerState::Complete(_))
    }

    pub fn outcome(&self) -> Option<&HandoverOutcome> {
        match &self.state {
            SequencerState::Complete(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn dispatch_at(&self) -> Option<Instant> {
        match self.state {
            SequencerState::AwaitingRemoteReadiness { dispatch_at } => Some(dispatch_at),
            _ => None,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.power_events.is_some()
    }

    pub async fn start(&mut self) -> Result<(), HandoverError> {
        if self.started_at.is_some() {
            return Err(HandoverError::AlreadyStarted);
        }

        let started_at = Instant::now();
        self.started_at = Some(started_at);
        // Subscribe before querying so no transition is missed.
        self.power_events = Some(self.capabilities.radio.subscribe_power_events());

        if self.capabilities.radio.is_radio_enabled() {
            info!(
                handover_id = %self.id,
                peer = %self.request.peer(),
                remote_activating = self.request.remote_activating(),
                "handover: local radio already on"
            );
            self.evaluate_remote_readiness(Duration::ZERO).await;
        } else if self.capabilities.radio.request_enable_radio() {
            let give_up_at = self
                .config
                .local_enable_timeout
                .map(|timeout| started_at + timeout);
            info!(
                handover_id = %self.id,
                peer = %self.request.peer(),
                "handover: enabling local radio"
            );
            self.state = SequencerState::EnablingLocalRadio { give_up_at };
        } else {
            self.finish_with(HandoverError::RadioEnableRejected);
        }

        Ok(())
    }

    pub async fn handle_input(&mut self, input: SequencerInput) {
        match input {
            SequencerInput::Power(RadioPowerState::On) if self.is_enabling() => {
                let elapsed = self
                    .started_at
                    .map(|started_at| started_at.elapsed())
                    .unwrap_or_default();
                info!(
                    handover_id = %self.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "handover: local radio on"
                );
                self.evaluate_remote_readiness(elapsed).await;
            }
            SequencerInput::Power(RadioPowerState::Off) if self.is_enabling() => {
                self.finish_with(HandoverError::RadioDisabledDuringWait);
            }
            SequencerInput::EnableTimerElapsed => match self.expired_enable_timeout() {
                Some(timeout) => self.finish_with(HandoverError::LocalEnableTimedOut(timeout)),
                None => self.ignore(input),
            },
            SequencerInput::PowerEventsClosed if self.is_enabling() => {
                self.finish_with(HandoverError::PowerEventsClosed);
            }
            SequencerInput::DispatchTimerElapsed if self.dispatch_due() => {
                self.dispatch().await;
            }
            input => self.ignore(input),
        }
    }

    fn ignore(&self, input: SequencerInput) {
        debug!(
            handover_id = %self.id,
            state = ?self.state,
            ?input,
            "handover: ignoring input"
        );
    }

    /// `None` before `start` and once complete.
    pub async fn next_input(&mut self) -> Option<SequencerInput> {
        loop {
            let (dispatch_at, give_up_at) = match &self.state {
                SequencerState::Init | SequencerState::Complete(_) => return None,
                SequencerState::EnablingLocalRadio { give_up_at } => (None, *give_up_at),
                SequencerState::AwaitingRemoteReadiness { dispatch_at } => {
                    (Some(*dispatch_at), None)
                }
            };

            tokio::select! {
                received = recv_power_event(self.power_events.as_mut()) => match received {
                    Ok(event) => return Some(SequencerInput::Power(event.state)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            handover_id = %self.id,
                            skipped,
                            "handover: power events lagged"
                        );
                    }
                    Err(RecvError::Closed) => {
                        if self.is_enabling() {
                            return Some(SequencerInput::PowerEventsClosed);
                        }
                        self.power_events = None;
                    }
                },
                _ = sleep_until_deadline(dispatch_at) => {
                    return Some(SequencerInput::DispatchTimerElapsed);
                }
                _ = sleep_until_deadline(give_up_at) => {
                    return Some(SequencerInput::EnableTimerElapsed);
                }
            }
        }
    }

    pub async fn run_until_complete(&mut self) -> Result<HandoverOutcome, HandoverError> {
        while let Some(input) = self.next_input().await {
            self.handle_input(input).await;
        }
        self.outcome().cloned().ok_or(HandoverError::NotStarted)
    }

    pub async fn run(mut self) -> Result<HandoverOutcome, HandoverError> {
        self.start().await?;
        self.run_until_complete().await
    }

    fn is_enabling(&self) -> bool {
        matches!(self.state, SequencerState::EnablingLocalRadio { .. })
    }

    /// The armed enable timeout, once its deadline has passed.
    fn expired_enable_timeout(&self) -> Option<Duration> {
        match (&self.state, self.started_at) {
            (
                SequencerState::EnablingLocalRadio {
                    give_up_at: Some(give_up_at),
                },
                Some(started_at),
            ) if Instant::now() >= *give_up_at => {
                Some(give_up_at.saturating_duration_since(started_at))
            }
            _ => None,
        }
    }

    fn dispatch_due(&self) -> bool {
        matches!(
            self.state,
            SequencerState::AwaitingRemoteReadiness { dispatch_at } if Instant::now() >= dispatch_at
        )
    }

    async fn evaluate_remote_readiness(&mut self, elapsed: Duration) {
        match remote_readiness_delay(
            self.request.remote_activating(),
            elapsed,
            self.config.remote_enable_delay,
        ) {
            Some(delay) => {
                info!(
                    handover_id = %self.id,
                    delay_ms = delay.as_millis() as u64,
                    "handover: waiting for remote radio"
                );
                self.state = SequencerState::AwaitingRemoteReadiness {
                    dispatch_at: Instant::now() + delay,
                };
            }
            None => self.dispatch().await,
        }
    }

    async fn dispatch(&mut self) {
        let primary = self.request.primary_resource();
        let content_type = resolve_content_type(primary, self.capabilities.content_types.as_ref());
        if content_type.is_none() {
            debug!(
                handover_id = %self.id,
                "handover: {}",
                HandoverError::ContentTypeUnresolved(primary.to_string())
            );
        }

        let request = build_transfer_request(&self.request, content_type);
        info!(
            handover_id = %self.id,
            peer = %request.peer,
            resources = request.payload.len(),
            content_type = ?request.content_type,
            "handover: dispatching transfer"
        );

        let dispatcher = Arc::clone(&self.capabilities.dispatcher);
        if let Err(err) = dispatcher.dispatch_transfer(request).await {
            error!(handover_id = %self.id, "handover: transfer dispatch failed: {err:#}");
        }

        self.complete(HandoverOutcome::Dispatched);
    }

    fn finish_with(&mut self, err: HandoverError) {
        if err.is_user_visible() {
            self.capabilities
                .failure_notifier
                .notify_failure(&self.config.failure_message);
            self.complete(HandoverOutcome::Failed(err));
        } else {
            self.complete(HandoverOutcome::Aborted(err));
        }
    }

    fn complete(&mut self, outcome: HandoverOutcome) {
        if self.power_events.take().is_some() {
            debug!(handover_id = %self.id, "handover: released power-event subscription");
        }
        info!(handover_id = %self.id, ?outcome, "handover: complete");
        self.state = SequencerState::Complete(outcome);
    }
}

async fn recv_power_event(
    events: Option<&mut broadcast::Receiver<RadioPowerEvent>>,
) -> Result<RadioPowerEvent, RecvError> {
    match events {
        Some(events) => events.recv().await,
        None => future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
