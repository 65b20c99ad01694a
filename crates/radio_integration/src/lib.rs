use shared::protocol::{RadioPowerEvent, RadioPowerState};
use tokio::sync::broadcast;
use tracing::debug;

const POWER_EVENT_CAPACITY: usize = 16;

/// Dropping a receiver from `subscribe_power_events` unsubscribes.
pub trait RadioPowerController: Send + Sync {
    fn is_radio_enabled(&self) -> bool;
    /// `true` when the enable request was accepted and is in progress,
    /// `false` when the radio refused immediately.
    fn request_enable_radio(&self) -> bool;
    fn subscribe_power_events(&self) -> broadcast::Receiver<RadioPowerEvent>;
}

#[derive(Debug, Clone)]
pub struct PowerEventHub {
    sender: broadcast::Sender<RadioPowerEvent>,
}

impl PowerEventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(POWER_EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RadioPowerEvent> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers saw the event.
    pub fn publish(&self, state: RadioPowerState) -> usize {
        let delivered = self.sender.send(RadioPowerEvent::new(state)).unwrap_or(0);
        debug!(?state, delivered, "radio: power event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PowerEventHub {
    fn default() -> Self {
        Self::new()
    }
}
