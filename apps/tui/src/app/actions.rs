use crate::api::requests::{self, SiteRef};
use crate::api::{ApiClient, Route};
use crate::config::AppConfig;
use crate::domain::{Component, Im, ReturnPeriod};
use crate::fetch::{Payload, Requests, Viewer};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Owns the API client and the request groups; every network call the UI
/// makes goes through here.
#[derive(Debug)]
pub struct AppActions {
    pub client: Option<ApiClient>,
    pub requests: Requests,
    pub download_dir: PathBuf,
}

impl AppActions {
    pub fn new() -> Self {
        Self {
            client: None,
            requests: Requests::new(),
            download_dir: PathBuf::from("./downloads"),
        }
    }

    pub fn initialize(&mut self, config: &AppConfig) -> Result<()> {
        self.client = Some(ApiClient::new(&config.api)?);
        self.download_dir.clone_from(&config.download_dir);
        info!(
            base_url = %config.api.base_url,
            authenticated = config.api.token.is_some(),
            "api client ready"
        );
        Ok(())
    }

    fn client(&self) -> Result<ApiClient> {
        self.client
            .clone()
            .ok_or_else(|| color_eyre::eyre::eyre!("API client not initialized"))
    }

    pub fn load_projects(&mut self) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Projects, async move {
            requests::project_ids(&client).await.map(Payload::Projects)
        }))
    }

    pub fn load_metadata(&mut self, project_id: String) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Metadata, async move {
            requests::project_metadata(&client, &project_id)
                .await
                .map(|metadata| Payload::Metadata(Box::new(metadata)))
        }))
    }

    pub fn fetch_hazard(&mut self, site: SiteRef, im: Im, component: Component) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Hazard, async move {
            requests::hazard(&client, &site, im, component)
                .await
                .map(|data| Payload::Hazard(Box::new(data)))
        }))
    }

    pub fn fetch_disagg(
        &mut self,
        site: SiteRef,
        im: Im,
        component: Component,
        rp: ReturnPeriod,
    ) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Disagg, async move {
            requests::disagg(&client, &site, im, component, rp)
                .await
                .map(|data| Payload::Disagg(Box::new(data)))
        }))
    }

    pub fn fetch_uhs(
        &mut self,
        site: SiteRef,
        component: Component,
        rps: Vec<ReturnPeriod>,
    ) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Uhs, async move {
            requests::uhs(&client, &site, component, &rps)
                .await
                .map(|data| Payload::Uhs(Box::new(data)))
        }))
    }

    pub fn fetch_gms(&mut self, site: SiteRef, gms_id: String) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Gms, async move {
            requests::gms(&client, &site, &gms_id)
                .await
                .map(|data| Payload::Gms(Box::new(data)))
        }))
    }

    pub fn fetch_scenario(
        &mut self,
        site: SiteRef,
        component: Component,
        ims: Vec<Im>,
    ) -> Result<u64> {
        let client = self.client()?;
        Ok(self.requests.start(Viewer::Scenario, async move {
            requests::scenario(&client, &site, component, &ims)
                .await
                .map(|data| Payload::Scenario(Box::new(data)))
        }))
    }

    /// Fetches the archive behind `token` and writes it into the download
    /// directory.
    pub fn start_download(
        &mut self,
        viewer: Viewer,
        token: String,
        file_name: String,
    ) -> Result<u64> {
        let route = download_route(viewer)
            .ok_or_else(|| color_eyre::eyre::eyre!("Nothing to download for {}", viewer.label()))?;
        let client = self.client()?;
        let target = get_file_path(&self.download_dir, &file_name);

        Ok(self.requests.start(Viewer::Download, async move {
            let bytes = requests::download(&client, route, &token).await?;
            write_download(&target, &bytes).await?;
            Ok::<_, crate::api::ApiError>(Payload::Download(target))
        }))
    }
}

impl Default for AppActions {
    fn default() -> Self {
        Self::new()
    }
}

pub const fn download_route(viewer: Viewer) -> Option<Route> {
    match viewer {
        Viewer::Hazard => Some(Route::HazardDownload),
        Viewer::Disagg => Some(Route::DisaggDownload),
        Viewer::Uhs => Some(Route::UhsDownload),
        Viewer::Gms => Some(Route::GmsDownload),
        Viewer::Scenario => Some(Route::ScenarioDownload),
        Viewer::Projects | Viewer::Metadata | Viewer::Download => None,
    }
}

pub fn get_file_path(download_dir: impl AsRef<Path>, file_name: &str) -> PathBuf {
    download_dir.as_ref().join(format!("{file_name}.zip"))
}

/// `<viewer>_<project>_<station>_<timestamp>`, with anything outside
/// `[A-Za-z0-9._-]` replaced so backend ids are safe as file names.
pub fn download_file_name(viewer: Viewer, site: &SiteRef, timestamp: &str) -> String {
    let raw = format!(
        "{}_{}_{}_{}",
        viewer.label(),
        site.project_id,
        site.station_id,
        timestamp
    );
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

async fn write_download(target: &Path, bytes: &[u8]) -> Result<(), crate::api::ApiError> {
    let io_error =
        |e: std::io::Error| crate::api::ApiError::Internal(format!("failed to save download: {e}"));

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
    }
    tokio::fs::write(target, bytes).await.map_err(io_error)?;
    info!(path = %target.display(), bytes = bytes.len(), "download saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_names_are_filesystem_safe() {
        let site = SiteRef {
            project_id: "gnzl".to_string(),
            station_id: "Site A/1".to_string(),
        };
        assert_eq!(
            download_file_name(Viewer::Uhs, &site, "2024-05-01T10:00"),
            "uhs_gnzl_Site-A-1_2024-05-01T10-00"
        );
        assert_eq!(
            get_file_path("out", "hazard_x"),
            PathBuf::from("out").join("hazard_x.zip")
        );
    }

    #[test]
    fn only_result_viewers_have_downloads() {
        assert_eq!(download_route(Viewer::Gms), Some(Route::GmsDownload));
        assert_eq!(download_route(Viewer::Projects), None);
    }

    #[tokio::test]
    async fn write_download_creates_missing_directories() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("nested").join("hazard.zip");
        write_download(&target, b"PK").await?;
        assert_eq!(std::fs::read(&target)?, b"PK");
        Ok(())
    }

    #[test]
    fn actions_need_a_client() {
        let mut actions = AppActions::new();
        assert!(actions.load_projects().is_err());
    }
}
