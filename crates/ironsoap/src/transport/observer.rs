//! Request/response observation for auditing.

/// Receives a report of every request/response pair the transport handles.
///
/// Bodies are passed through the configured [`BodyFilters`] first, so
/// credentials and other sensitive content never leave the process through
/// an audit sink.
pub trait Observer {
    fn on_request(&self, method: &str, url: &str, headers: &[(String, String)], body: &str);

    fn on_response(
        &self,
        method: &str,
        url: &str,
        status: u16,
        headers: &[(String, String)],
        body: &str,
    );
}

/// Substring replacements applied to observed bodies.
#[derive(Debug, Clone, Default)]
pub struct BodyFilters {
    replacements: Vec<(String, String)>,
}

impl BodyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a replacement and returns the modified filter set.
    pub fn replace(mut self, pattern: impl Into<String>, substitute: impl Into<String>) -> Self {
        self.replacements.push((pattern.into(), substitute.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Applies every replacement, in insertion order.
    pub fn apply(&self, body: &str) -> String {
        let mut filtered = body.to_string();
        for (pattern, substitute) in &self.replacements {
            filtered = filtered.replace(pattern, substitute);
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_pass_body_through() {
        let filters = BodyFilters::new();
        assert!(filters.is_empty());
        assert_eq!(filters.apply("secret"), "secret");
    }

    #[test]
    fn test_replacements_apply_in_order() {
        let filters = BodyFilters::new()
            .replace("password123", "[FILTERED]")
            .replace("token-abc", "[TOKEN]");
        assert_eq!(
            filters.apply("<a>password123</a><b>token-abc</b>"),
            "<a>[FILTERED]</a><b>[TOKEN]</b>"
        );
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let filters = BodyFilters::new().replace("x", "y");
        assert_eq!(filters.apply("xx"), "yy");
    }
}
