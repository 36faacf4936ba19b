use std::path::{Component, Path};

/// Validates a CIDR range (e.g. `10.0.0.0/8`). Rejects bare IPs without a prefix.
pub fn validate_cidr(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("CIDR cannot be empty".to_string());
    }
    if !value.contains('/') {
        return Err("CIDR must include a prefix (e.g. 10.0.0.0/8)".to_string());
    }
    value
        .parse::<ipnetwork::IpNetwork>()
        .map(|_| ())
        .map_err(|e| format!("invalid CIDR '{value}': {e}"))
}

/// Validates a literal IP address (no prefix).
pub fn validate_ip(value: &str) -> Result<(), String> {
    value
        .parse::<std::net::IpAddr>()
        .map(|_| ())
        .map_err(|e| format!("invalid IP address '{value}': {e}"))
}

/// Ports are decimal `1..=65535`.
pub fn validate_port(value: &str) -> Result<u16, String> {
    let port: u16 = value
        .parse()
        .map_err(|_| format!("invalid port '{value}'"))?;
    if port == 0 {
        return Err("port must be in range 1..=65535".to_string());
    }
    Ok(port)
}

/// Country values are two-letter ISO codes, upper-cased by the caller before
/// storage; this only validates the shape.
pub fn validate_country_code(value: &str) -> Result<(), String> {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!(
            "invalid country code '{value}': expected two ASCII letters"
        ));
    }
    Ok(())
}

/// A jail's `filter_regex` must compile and must declare at least one capture
/// group (group 1 = source IP; optional group 2 = destination port).
pub fn validate_filter_regex(pattern: &str) -> Result<fancy_regex::Regex, String> {
    let re = fancy_regex::Regex::new(pattern).map_err(|e| format!("invalid regex: {e}"))?;
    if re.captures_len() < 2 {
        return Err("filter_regex must declare at least one capture group".to_string());
    }
    Ok(re)
}

/// Rejects `..` traversal and relative paths; the caller additionally checks
/// the resolved path falls under one of the configured allow-listed roots.
pub fn validate_log_path(path: &str, allowed_roots: &[String]) -> Result<(), String> {
    let p = Path::new(path);
    if !p.is_absolute() {
        return Err(format!("log path '{path}' must be absolute"));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(format!("log path '{path}' may not contain '..'"));
    }
    if allowed_roots.is_empty() {
        return Err("no allow-listed log roots configured".to_string());
    }
    let under_allowed_root = allowed_roots.iter().any(|root| p.starts_with(root));
    if !under_allowed_root {
        return Err(format!(
            "log path '{path}' is not under an allow-listed root"
        ));
    }
    Ok(())
}
