use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:10022";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub debug: bool,
}

/// Initializes the application configuration from `.env` and the process
/// environment. CLI flags land in the environment before this runs.
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let raw_url = env::var("HAZARD_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let base_url = parse_base_url(&raw_url)?;

    let token = env::var("HAZARD_API_TOKEN")
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let timeout_secs = match env::var("HAZARD_API_TIMEOUT_SECS") {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .wrap_err_with(|| format!("Invalid HAZARD_API_TIMEOUT_SECS: {value}"))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    Ok(AppConfig {
        api: ApiConfig {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        },
        download_dir: get_download_dir(),
        log_file: get_log_file(),
        debug: env::var("DEBUG").is_ok_and(|value| value == "1"),
    })
}

/// Paths are appended to the base URL, so a trailing slash is stripped and
/// only http(s) schemes are accepted.
pub fn parse_base_url(raw: &str) -> color_eyre::eyre::Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).wrap_err_with(|| format!("Invalid base URL: {raw}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(eyre!("Base URL must be http or https: {raw}"));
    }

    Ok(url)
}

/// Gets the directory downloads are written to
pub fn get_download_dir() -> PathBuf {
    env::var("HAZARD_DOWNLOAD_DIR").map_or_else(|_| PathBuf::from("./downloads"), PathBuf::from)
}

pub fn get_log_file() -> PathBuf {
    env::var("HAZARD_LOG_FILE").map_or_else(|_| PathBuf::from("hazard-viewer.log"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() -> color_eyre::eyre::Result<()> {
        let url = parse_base_url("https://hazard.example.org/api/")?;
        assert_eq!(url.as_str(), "https://hazard.example.org/api");
        Ok(())
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://hazard.example.org").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
