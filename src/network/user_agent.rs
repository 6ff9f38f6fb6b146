//! User agent generation

/// Build the descriptive user agent public wiki APIs expect
pub fn generate_user_agent(suffix: Option<&str>) -> String {
    let base = format!("suggest-rs/{} (reqwest)", crate::VERSION);
    match suffix.map(str::trim) {
        Some(s) if !s.is_empty() => format!("{} {}", base, s),
        _ => base,
    }
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_agent() {
        let ua = generate_user_agent(None);
        assert!(ua.starts_with("suggest-rs/"));
        assert!(ua.contains(crate::VERSION));
    }

    #[test]
    fn test_user_agent_suffix() {
        let ua = generate_user_agent(Some(" contact@example.org "));
        assert!(ua.ends_with(" contact@example.org"));
        assert_eq!(generate_user_agent(Some("  ")), generate_user_agent(None));
    }
}
