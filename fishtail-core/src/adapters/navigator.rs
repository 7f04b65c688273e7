//! Navigator that records where it was sent instead of leaving the page

use std::sync::Mutex;

use crate::ports::Navigator;

#[derive(Debug)]
pub struct RecordingNavigator {
    href: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Mutex::new(href.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Simulate an in-app route change (no full-page navigation recorded)
    pub fn set_href(&self, href: impl Into<String>) {
        *self.href.lock().unwrap_or_else(|e| e.into_inner()) = href.into();
    }

    /// Every full-page navigation, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn current_href(&self) -> String {
        self.href.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn navigate(&self, url: &str) {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());
        self.set_href(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_href() {
        let nav = RecordingNavigator::new("http://localhost:8080/#/dashboard?x=1");
        assert_eq!(nav.origin(), "http://localhost:8080");
        let nav = RecordingNavigator::new("https://fishtail.example/menu");
        assert_eq!(nav.origin(), "https://fishtail.example");
    }

    #[test]
    fn test_navigation_is_recorded() {
        let nav = RecordingNavigator::new("http://localhost:8080/");
        nav.navigate("http://api.example/auth/login");
        assert_eq!(nav.last().as_deref(), Some("http://api.example/auth/login"));
        assert_eq!(nav.current_href(), "http://api.example/auth/login");
        nav.set_href("http://localhost:8080/#/menu");
        assert_eq!(nav.history().len(), 1);
    }
}
