use clap::{CommandFactory, Parser};

use crate::event::HeadlessQuery;

#[derive(Debug, Parser)]
#[command(name = "hazard-viewer", version, about = "Seismic hazard results in the terminal")]
pub struct CliArgs {
    /// Print a hazard summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the API base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// API token; switches to the authenticated routes
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Override the download directory
    #[arg(long = "download-dir", value_name = "PATH")]
    pub download_dir: Option<String>,

    /// Override the log file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Headless: project id
    #[arg(long, value_name = "ID")]
    pub project: Option<String>,

    /// Headless: station id
    #[arg(long, value_name = "ID")]
    pub site: Option<String>,

    /// Headless: intensity measure, e.g. PGA or pSA_1.0
    #[arg(long, value_name = "IM")]
    pub im: Option<String>,

    /// Headless: component, e.g. RotD50
    #[arg(long, value_name = "COMPONENT")]
    pub component: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.base_url {
            std::env::set_var("HAZARD_API_BASE_URL", url);
        }
        if let Some(token) = &self.token {
            std::env::set_var("HAZARD_API_TOKEN", token);
        }
        if let Some(dir) = &self.download_dir {
            std::env::set_var("HAZARD_DOWNLOAD_DIR", dir);
        }
        if let Some(file) = &self.log_file {
            std::env::set_var("HAZARD_LOG_FILE", file);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn headless_query(&self) -> HeadlessQuery {
        HeadlessQuery {
            project: self.project.clone(),
            site: self.site.clone(),
            im: self.im.clone(),
            component: self.component.clone(),
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
