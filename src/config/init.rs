use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{get_config_path, parse_timeout, Config, DATA_URL_ENV};
use crate::source::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Check a data URL entered in the wizard. Empty input is allowed.
fn check_data_url(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Ok(());
    }
    match reqwest::Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(format!("unsupported scheme '{}'", url.scheme())),
        Err(e) => Err(e.to_string()),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Prompt Archive Configuration");
    println!("============================");
    println!();
    println!("The archive reads prompts and submissions from a JSON endpoint");
    println!("(usually a published spreadsheet script).");
    println!(
        "Leave the URL empty to supply it through {} instead.",
        DATA_URL_ENV
    );
    println!();

    let data_url = loop {
        let input = prompt("Data source URL: ")?;
        match check_data_url(&input) {
            Ok(()) => break (!input.is_empty()).then_some(input),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let default_timeout = humantime::format_duration(DEFAULT_TIMEOUT).to_string();
    let timeout = loop {
        let input = prompt_with_default("Request timeout", &default_timeout)?;
        match parse_timeout(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {:#}. Try again.", e),
        }
    };

    let retries: u32 = loop {
        let input = prompt_with_default("Retries after a failed fetch", &DEFAULT_RETRIES.to_string())?;
        match input.parse::<u32>() {
            Ok(v) if v <= 10 => break v,
            _ => println!("  Invalid: must be a whole number from 0 to 10. Try again."),
        }
    };

    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        data_url,
        timeout: Some(timeout),
        retries: Some(retries),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `prompt-archive` to see the leaderboard.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_data_url() {
        assert!(check_data_url("").is_ok());
        assert!(check_data_url("https://script.google.com/macros/s/abc/exec").is_ok());
        assert!(check_data_url("file:///tmp/data.json").is_err());
        assert!(check_data_url("no scheme").is_err());
    }
}
