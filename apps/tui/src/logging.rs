use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "hazard_viewer=debug,info"
    } else {
        "hazard_viewer=info,warn"
    }
}

/// Sends tracing output to `log_file`; the terminal belongs to the UI.
pub fn init_tracing(log_file: &Path, debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create log directory {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_the_crate_level() {
        assert!(default_filter(true).starts_with("hazard_viewer=debug"));
        assert!(default_filter(false).starts_with("hazard_viewer=info"));
    }

    #[test]
    fn log_directory_is_created() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let log_file = dir.path().join("logs").join("hazard-viewer.log");
        // A second subscriber may already be installed by another test.
        let _ = init_tracing(&log_file, false);
        assert!(log_file.exists());
        Ok(())
    }
}
