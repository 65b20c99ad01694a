use std::time::Duration;

/// Worst-case time a peer radio needs to become ready once negotiation began.
pub const REMOTE_ENABLE_DELAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_FAILURE_MESSAGE: &str = "Handover did not complete.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    pub remote_enable_delay: Duration,
    /// `None` waits for the local radio forever.
    pub local_enable_timeout: Option<Duration>,
    pub failure_message: String,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            remote_enable_delay: REMOTE_ENABLE_DELAY,
            local_enable_timeout: None,
            failure_message: DEFAULT_FAILURE_MESSAGE.into(),
        }
    }
}
