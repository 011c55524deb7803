//! Text extraction primitives.

use regex::Regex;

/// Extract first match from content using regex pattern with capture group.
/// Pattern must contain exactly one capture group for the value to extract.
/// Empty captures count as no match.
pub fn extract_first(content: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_first_returns_capture() {
        let re = Regex::new(r#"version\s*=\s*"([^"]*)""#).unwrap();
        assert_eq!(
            extract_first("version = \"1.2.3\"\nversion = \"9\"", &re),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn extract_first_ignores_empty_capture() {
        let re = Regex::new(r#"id\s*"([^"]*)""#).unwrap();
        assert_eq!(extract_first("id \"\"", &re), None);
    }
}
