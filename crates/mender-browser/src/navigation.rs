use crate::{Error, Result};
use url::Url;

/// Turn user input into a navigable URL, defaulting to https when no scheme is given.
/// Local files and `about:` pages pass through.
pub fn normalize_url(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidUrl("empty URL".to_string()));
    }

    let candidate = if input.contains("://") || input.starts_with("about:") || input.starts_with("data:") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    Url::parse(&candidate)
        .map(|url| url.to_string())
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_https_scheme() {
        assert_eq!(
            normalize_url("example.com/login").unwrap(),
            "https://example.com/login"
        );
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(
            normalize_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080/"
        );
        assert_eq!(
            normalize_url("file:///tmp/login_test.html").unwrap(),
            "file:///tmp/login_test.html"
        );
    }

    #[test]
    fn test_about_blank_passes_through() {
        assert_eq!(normalize_url("about:blank").unwrap(), "about:blank");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(normalize_url("  ").is_err());
    }
}
