//! Opening informational links in an external handler.

use tracing::warn;
use url::Url;

use crate::schedule::Notice;
use crate::GapError;

/// Platform hook that hands a URL to the system browser or dialer.
pub trait LinkOpener {
    /// Whether the platform has a handler for this URL's scheme.
    fn can_open(&self, url: &Url) -> bool;
    fn open(&self, url: &Url) -> Result<(), String>;
}

/// The notice shown when a link could not be opened.
pub const LINK_FAILURE: Notice = Notice {
    title: "Error",
    message: "Unable to open link",
};

/// Parses `raw`, checks the platform can handle it and opens it.
///
/// Every failure is reported as [`GapError::UnhandledLink`]; callers show
/// [`LINK_FAILURE`] and carry on.
pub fn open_link(opener: &dyn LinkOpener, raw: &str) -> Result<Url, GapError> {
    let url = Url::parse(raw).map_err(|err| {
        warn!(url = raw, %err, "rejected malformed link");
        GapError::UnhandledLink(format!("{raw}: {err}"))
    })?;

    if !opener.can_open(&url) {
        warn!(url = raw, scheme = url.scheme(), "no handler for link");
        return Err(GapError::UnhandledLink(format!(
            "{raw}: no handler for scheme {}",
            url.scheme()
        )));
    }

    opener.open(&url).map_err(|err| {
        warn!(url = raw, %err, "link handler failed");
        GapError::UnhandledLink(format!("{raw}: {err}"))
    })?;
    Ok(url)
}

/// Schemes a phone or desktop browser can normally hand off.
pub const COMMON_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

pub fn is_common_scheme(url: &Url) -> bool {
    COMMON_SCHEMES.contains(&url.scheme())
}
