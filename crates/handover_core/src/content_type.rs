use shared::domain::{ResourceLocator, SCHEME_CONTENT, SCHEME_FILE};
use tracing::debug;

use crate::ContentTypeRegistry;

/// Content type of a resource: `content` locators ask the platform registry,
/// `file` locators go by their lower-cased extension. Anything else is unknown.
pub fn resolve_content_type(
    locator: &ResourceLocator,
    registry: &dyn ContentTypeRegistry,
) -> Option<String> {
    match locator.scheme() {
        SCHEME_CONTENT => registry.content_type(locator),
        SCHEME_FILE => {
            let extension = file_extension(locator)?;
            mime_guess::from_ext(&extension)
                .first_raw()
                .map(str::to_owned)
        }
        scheme => {
            debug!(
                locator = %locator,
                scheme,
                "handover: could not determine content type for locator"
            );
            None
        }
    }
}

/// Suffix after the last `.` of the final path segment, lower-cased.
pub fn file_extension(locator: &ResourceLocator) -> Option<String> {
    let file_name = locator.url().path_segments()?.next_back()?;
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
