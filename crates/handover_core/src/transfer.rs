use shared::{
    domain::{PeerAddress, ResourceLocator},
    protocol::{TransferPayload, TransferRequest},
};

use crate::error::HandoverError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoverRequest {
    peer: PeerAddress,
    resources: Vec<ResourceLocator>,
    remote_activating: bool,
}

impl HandoverRequest {
    pub fn new(
        peer: PeerAddress,
        resources: Vec<ResourceLocator>,
        remote_activating: bool,
    ) -> Result<Self, HandoverError> {
        if resources.is_empty() {
            return Err(HandoverError::NoResources);
        }
        Ok(Self {
            peer,
            resources,
            remote_activating,
        })
    }

    pub fn parse<I, S>(
        peer: PeerAddress,
        raw_resources: I,
        remote_activating: bool,
    ) -> Result<Self, HandoverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resources = raw_resources
            .into_iter()
            .map(|raw| ResourceLocator::parse(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(peer, resources, remote_activating)
    }

    pub fn peer(&self) -> &PeerAddress {
        &self.peer
    }

    pub fn resources(&self) -> &[ResourceLocator] {
        &self.resources
    }

    /// Resource whose content type labels the whole transfer.
    pub fn primary_resource(&self) -> &ResourceLocator {
        &self.resources[0]
    }

    pub fn remote_activating(&self) -> bool {
        self.remote_activating
    }
}

pub fn build_transfer_request(
    request: &HandoverRequest,
    content_type: Option<String>,
) -> TransferRequest {
    let payload = match request.resources() {
        [single] => TransferPayload::Single(single.clone()),
        many => TransferPayload::Batch(many.to_vec()),
    };

    TransferRequest {
        peer: request.peer().clone(),
        content_type,
        payload,
        connection_handover: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> PeerAddress {
        PeerAddress::new("00:11:22:33:44:55")
    }

    #[test]
    fn rejects_empty_resources() {
        let err = HandoverRequest::new(peer(), Vec::new(), false).expect_err("empty");
        assert_eq!(err, HandoverError::NoResources);
    }

    #[test]
    fn parse_reports_invalid_locator() {
        let err = HandoverRequest::parse(peer(), ["file:///tmp/a.png", "not a url"], false)
            .expect_err("invalid");
        assert!(matches!(err, HandoverError::InvalidLocator(_)));
    }

    #[test]
    fn single_resource_builds_single_item_request() {
        let request =
            HandoverRequest::parse(peer(), ["file:///tmp/a.png"], false).expect("request");
        let transfer = build_transfer_request(&request, Some("image/png".into()));

        assert_eq!(transfer.peer, peer());
        assert_eq!(transfer.content_type.as_deref(), Some("image/png"));
        assert!(transfer.connection_handover);
        assert_eq!(
            transfer.payload,
            TransferPayload::Single(request.primary_resource().clone())
        );
    }

    #[test]
    fn several_resources_build_batch_in_input_order() {
        let raw = [
            "content://media/9",
            "file:///tmp/b.txt",
            "content://media/1",
        ];
        let request = HandoverRequest::parse(peer(), raw, true).expect("request");
        let transfer = build_transfer_request(&request, None);

        let TransferPayload::Batch(resources) = &transfer.payload else {
            panic!("expected batch payload, got {:?}", transfer.payload);
        };
        let sent = resources.iter().map(|r| r.as_str()).collect::<Vec<_>>();
        assert_eq!(sent, raw);
        assert_eq!(transfer.content_type, None);
    }
}
