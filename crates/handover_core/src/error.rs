use std::time::Duration;

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoverError {
    #[error("handover needs at least one resource")]
    NoResources,
    #[error("invalid resource locator: {0}")]
    InvalidLocator(#[from] ApiException),
    #[error("handover sequencer was already started")]
    AlreadyStarted,
    #[error("handover sequencer has not been started")]
    NotStarted,
    #[error("local radio refused to enable")]
    RadioEnableRejected,
    #[error("local radio was turned off while enabling")]
    RadioDisabledDuringWait,
    #[error("local radio did not report on within {}ms", .0.as_millis())]
    LocalEnableTimedOut(Duration),
    #[error("radio power events ended before the local radio reported on")]
    PowerEventsClosed,
    #[error("could not determine content type for {0}")]
    ContentTypeUnresolved(String),
}

impl HandoverError {
    /// Whether this error ends a handover with a user-visible notification.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::RadioEnableRejected | Self::LocalEnableTimedOut(_)
        )
    }
}
