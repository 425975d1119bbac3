use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("goldrate/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client. Every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Keeps at most the first few characters of a response body for error messages.
pub fn snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_long_bodies() {
        assert_eq!(snippet("short"), "short");
        let long = "x".repeat(500);
        let cut = snippet(&long);
        assert_eq!(cut.len(), 203);
        assert!(cut.ends_with("..."));
    }
}
