//! Location / navigation port

use url::Url;

/// The current location and full-page navigation
pub trait Navigator: Send + Sync {
    /// Absolute URL of the current location, fragment included
    fn current_href(&self) -> String;

    /// Leave the current page for `url`
    fn navigate(&self, url: &str);

    /// `scheme://host[:port]` of the current location
    fn origin(&self) -> String {
        let href = self.current_href();
        match Url::parse(&href) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => href.trim_end_matches('/').to_string(),
        }
    }
}
