use super::schema::Config;
use super::parse_timeout;

/// Upper bound on configured retries
const MAX_RETRIES: u32 = 10;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref url) = config.data_url {
        let trimmed = url.trim();
        if !trimmed.is_empty() {
            match reqwest::Url::parse(trimmed) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(format!(
                    "data_url: unsupported scheme '{}' (expected http or https)",
                    parsed.scheme()
                )),
                Err(e) => errors.push(format!("data_url: invalid URL '{}' - {}", url, e)),
            }
        }
    }

    if let Some(ref timeout) = config.timeout {
        if let Err(e) = parse_timeout(timeout) {
            errors.push(format!("timeout: {:#}", e));
        }
    }

    if let Some(retries) = config.retries {
        if retries > MAX_RETRIES {
            errors.push(format!("retries: must be at most {}, got {}", MAX_RETRIES, retries));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
