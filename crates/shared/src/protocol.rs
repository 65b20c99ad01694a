use serde::{Deserialize, Serialize};

use crate::domain::{PeerAddress, ResourceLocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioPowerState {
    Off,
    TurningOn,
    On,
    TurningOff,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioPowerEvent {
    pub state: RadioPowerState,
}

impl RadioPowerEvent {
    pub fn new(state: RadioPowerState) -> Self {
        Self { state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "resources", rename_all = "snake_case")]
pub enum TransferPayload {
    Single(ResourceLocator),
    Batch(Vec<ResourceLocator>),
}

impl TransferPayload {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(resources) => resources.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resources(&self) -> &[ResourceLocator] {
        match self {
            Self::Single(resource) => std::slice::from_ref(resource),
            Self::Batch(resources) => resources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub peer: PeerAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub payload: TransferPayload,
    pub connection_handover: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(raw: &str) -> ResourceLocator {
        ResourceLocator::parse(raw).expect("locator")
    }

    #[test]
    fn batch_exposes_resources_in_order() {
        let resources = vec![
            locator("content://media/3"),
            locator("file:///tmp/b.txt"),
            locator("content://media/1"),
        ];
        let payload = TransferPayload::Batch(resources.clone());
        assert_eq!(payload.resources(), resources.as_slice());
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn single_exposes_one_resource() {
        let payload = TransferPayload::Single(locator("file:///tmp/a.png"));
        assert_eq!(payload.resources(), &[locator("file:///tmp/a.png")]);
        assert!(!payload.is_empty());
    }

    #[test]
    fn transfer_request_serializes_with_tagged_payload() {
        let request = TransferRequest {
            peer: PeerAddress::new("00:11:22:33:44:55"),
            content_type: None,
            payload: TransferPayload::Single(locator("file:///tmp/a.png")),
            connection_handover: true,
        };

        let json = serde_json::to_value(&request).expect("json");
        assert_eq!(json["peer"], "00:11:22:33:44:55");
        assert_eq!(json["payload"]["type"], "single");
        assert_eq!(json["payload"]["resources"], "file:///tmp/a.png");
        assert!(json.get("content_type").is_none());
        assert_eq!(json["connection_handover"], true);
    }
}
