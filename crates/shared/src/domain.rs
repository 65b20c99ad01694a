use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{ApiException, ErrorCode};

/// Opaque identity of the remote device, as learned during negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerAddress(pub String);

impl PeerAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlates every log line of one handover attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandoverId(pub Uuid);

impl HandoverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandoverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub const SCHEME_CONTENT: &str = "content";
pub const SCHEME_FILE: &str = "file";

/// Locator of one resource to hand over, e.g. `content://media/external/images/7`
/// or `file:///sdcard/DCIM/photo.JPG`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceLocator(Url);

impl ResourceLocator {
    pub fn parse(raw: &str) -> Result<Self, ApiException> {
        Url::parse(raw.trim()).map(Self).map_err(|err| {
            ApiException::new(
                ErrorCode::Validation,
                format!("invalid resource locator '{raw}': {err}"),
            )
        })
    }

    pub fn from_file_path(path: &Path) -> Result<Self, ApiException> {
        Url::from_file_path(path).map(Self).map_err(|()| {
            ApiException::new(
                ErrorCode::Validation,
                format!("resource path '{}' is not absolute", path.display()),
            )
        })
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for ResourceLocator {
    fn from(value: Url) -> Self {
        Self(value)
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_and_file_locators() {
        let content = ResourceLocator::parse("content://media/external/images/7").expect("content");
        assert_eq!(content.scheme(), SCHEME_CONTENT);

        let file = ResourceLocator::parse(" file:///sdcard/DCIM/photo.JPG ").expect("file");
        assert_eq!(file.scheme(), SCHEME_FILE);
        assert_eq!(file.as_str(), "file:///sdcard/DCIM/photo.JPG");
    }

    #[test]
    fn rejects_relative_locators() {
        let err = ResourceLocator::parse("photo.jpg").expect_err("relative");
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[test]
    fn rejects_relative_file_paths() {
        let err = ResourceLocator::from_file_path(Path::new("relative/photo.jpg"))
            .expect_err("relative path");
        assert_eq!(err.code, ErrorCode::Validation);
    }
}
