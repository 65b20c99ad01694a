use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use radio_integration::RadioPowerController;
use shared::{
    domain::ResourceLocator,
    error::{ApiException, ErrorCode},
    protocol::TransferRequest,
};
use tracing::warn;

pub mod config;
pub mod content_type;
pub mod error;
mod sequencer;
pub mod timing;
pub mod transfer;

pub use config::{SequencerConfig, DEFAULT_FAILURE_MESSAGE, REMOTE_ENABLE_DELAY};
pub use error::HandoverError;
pub use sequencer::{HandoverOutcome, HandoverSequencer, SequencerInput, SequencerState};
pub use transfer::{build_transfer_request, HandoverRequest};

/// Errors are logged by the sequencer and never retried.
#[async_trait]
pub trait TransferDispatcher: Send + Sync {
    async fn dispatch_transfer(&self, request: TransferRequest) -> Result<()>;
}

pub struct MissingTransferDispatcher;

#[async_trait]
impl TransferDispatcher for MissingTransferDispatcher {
    async fn dispatch_transfer(&self, request: TransferRequest) -> Result<()> {
        Err(ApiException::new(
            ErrorCode::Unavailable,
            format!("no transfer dispatcher available for peer {}", request.peer),
        )
        .into())
    }
}

pub trait FailureNotifier: Send + Sync {
    fn notify_failure(&self, message: &str);
}

pub struct LogFailureNotifier;

impl FailureNotifier for LogFailureNotifier {
    fn notify_failure(&self, message: &str) {
        warn!("handover: {message}");
    }
}

pub trait ContentTypeRegistry: Send + Sync {
    fn content_type(&self, locator: &ResourceLocator) -> Option<String>;
}

pub struct MissingContentTypeRegistry;

impl ContentTypeRegistry for MissingContentTypeRegistry {
    fn content_type(&self, _locator: &ResourceLocator) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct HandoverCapabilities {
    pub radio: Arc<dyn RadioPowerController>,
    pub dispatcher: Arc<dyn TransferDispatcher>,
    pub failure_notifier: Arc<dyn FailureNotifier>,
    pub content_types: Arc<dyn ContentTypeRegistry>,
}

impl HandoverCapabilities {
    pub fn new(radio: Arc<dyn RadioPowerController>) -> Self {
        Self::new_with_dependencies(
            radio,
            Arc::new(MissingTransferDispatcher),
            Arc::new(LogFailureNotifier),
            Arc::new(MissingContentTypeRegistry),
        )
    }

    pub fn new_with_dependencies(
        radio: Arc<dyn RadioPowerController>,
        dispatcher: Arc<dyn TransferDispatcher>,
        failure_notifier: Arc<dyn FailureNotifier>,
        content_types: Arc<dyn ContentTypeRegistry>,
    ) -> Self {
        Self {
            radio,
            dispatcher,
            failure_notifier,
            content_types,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn TransferDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_failure_notifier(mut self, failure_notifier: Arc<dyn FailureNotifier>) -> Self {
        self.failure_notifier = failure_notifier;
        self
    }

    pub fn with_content_types(mut self, content_types: Arc<dyn ContentTypeRegistry>) -> Self {
        self.content_types = content_types;
        self
    }
}
