use crate::app::actions::{download_file_name, AppActions};
use crate::app::forms::{FormOptions, Forms};
use crate::app::store::{Applied, Context};
use crate::config::AppConfig;
use crate::fetch::{FetchMessage, Viewer};
use color_eyre::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Projects,
    Hazard,
    Disagg,
    Uhs,
    Gms,
    Scenario,
}

impl AppScreen {
    pub const TABS: [Self; 6] = [
        Self::Projects,
        Self::Hazard,
        Self::Disagg,
        Self::Uhs,
        Self::Gms,
        Self::Scenario,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Projects => "Site",
            Self::Hazard => "Hazard",
            Self::Disagg => "Disaggregation",
            Self::Uhs => "UHS",
            Self::Gms => "GMS",
            Self::Scenario => "Scenarios",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Projects => 0,
            Self::Hazard => 1,
            Self::Disagg => 2,
            Self::Uhs => 3,
            Self::Gms => 4,
            Self::Scenario => 5,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::TABS.len() {
            Some(Self::TABS[index])
        } else {
            None
        }
    }

    pub const fn viewer(self) -> Option<Viewer> {
        match self {
            Self::Projects => None,
            Self::Hazard => Some(Viewer::Hazard),
            Self::Disagg => Some(Viewer::Disagg),
            Self::Uhs => Some(Viewer::Uhs),
            Self::Gms => Some(Viewer::Gms),
            Self::Scenario => Some(Viewer::Scenario),
        }
    }

    /// Number of form fields on the screen.
    pub const fn field_count(self) -> usize {
        match self {
            Self::Projects => 0,
            Self::Hazard | Self::Uhs | Self::Scenario => 2,
            Self::Disagg => 3,
            Self::Gms => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFocus {
    Projects,
    Sites,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub context: Context,
    pub options: FormOptions,
    pub forms: Forms,
    pub field_index: usize,
    pub project_focus: ProjectFocus,
    pub selected_project_index: usize,
    pub selected_site_index: usize,
    pub search_active: bool,
    pub search_query: String,
    pub filtered_site_ids: Vec<String>,
    pub show_branches: bool,
    pub gms_im_index: usize,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub pending_download: Option<Viewer>,
    pub actions: AppActions,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            screen: AppScreen::Projects,
            show_help: false,
            status_message: String::new(),
            context: Context::default(),
            options: FormOptions::default(),
            forms: Forms::default(),
            field_index: 0,
            project_focus: ProjectFocus::Projects,
            selected_project_index: 0,
            selected_site_index: 0,
            search_active: false,
            search_query: String::new(),
            filtered_site_ids: Vec::new(),
            show_branches: false,
            gms_im_index: 0,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            pending_download: None,
            actions: AppActions::new(),
        }
    }

    pub fn initialize(&mut self, config: &AppConfig) -> Result<()> {
        self.actions.initialize(config)?;
        self.actions.load_projects()?;
        self.context.mark_loading(Viewer::Projects);
        self.status_message = "Loading projects...".to_string();
        Ok(())
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    /// Project ids with their display names, ordered by id.
    pub fn project_list(&self) -> Vec<(String, String)> {
        self.context
            .projects
            .ready()
            .map(|ids| {
                ids.0
                    .iter()
                    .map(|(id, name)| (id.clone(), name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Station ids of the loaded project, narrowed by the search query.
    pub fn visible_sites(&self) -> Vec<String> {
        if self.search_active && !self.search_query.is_empty() {
            return self.filtered_site_ids.clone();
        }
        self.context
            .metadata
            .ready()
            .map(|metadata| metadata.sites.0.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn refresh_site_filter(&mut self) {
        let Some(metadata) = self.context.metadata.ready() else {
            self.filtered_site_ids.clear();
            return;
        };

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, String)> = metadata
            .sites
            .0
            .iter()
            .filter_map(|(id, site)| {
                let by_id = matcher.fuzzy_match(id, &self.search_query);
                let by_name = matcher.fuzzy_match(&site.name, &self.search_query);
                by_id.max(by_name).map(|score| (score, id.clone()))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        self.filtered_site_ids = scored.into_iter().map(|(_, id)| id).collect();
        self.selected_site_index = 0;
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.filtered_site_ids.clear();
        self.selected_site_index = 0;
    }

    pub fn select_project(&mut self, project_id: String) {
        if self.context.project_id.as_deref() == Some(project_id.as_str())
            && self.context.metadata.ready().is_some()
        {
            self.project_focus = ProjectFocus::Sites;
            return;
        }

        info!(project_id = %project_id, "project selected");
        self.context
            .select_project(&mut self.actions.requests, project_id.clone());
        self.options = FormOptions::default();
        self.forms = Forms::default();
        self.clear_search();

        match self.actions.load_metadata(project_id) {
            Ok(_) => {
                self.status_message = "Loading project...".to_string();
                self.project_focus = ProjectFocus::Sites;
            }
            Err(e) => self.status_message = format!("Failed to load project: {e}"),
        }
    }

    pub fn select_site(&mut self, station_id: String) {
        info!(station_id = %station_id, "site selected");
        self.context
            .select_station(&mut self.actions.requests, station_id.clone());
        self.status_message = format!("Site {station_id} selected");
        self.screen = AppScreen::Hazard;
        self.field_index = 0;
    }

    pub fn switch_screen(&mut self, screen: AppScreen) {
        if self.screen != screen {
            self.screen = screen;
            self.field_index = 0;
        }
    }

    /// A form input changed: the viewer's result and in-flight set are
    /// dropped.
    pub fn form_changed(&mut self, viewer: Viewer) {
        self.context.invalidate(&mut self.actions.requests, viewer);
    }

    /// The "Get" action of the current viewer. Does nothing but set a
    /// status message when the form is incomplete.
    pub fn submit(&mut self) {
        let Some(viewer) = self.screen.viewer() else {
            return;
        };
        let Some(site) = self.context.site() else {
            self.status_message = "Select a project and site first".to_string();
            return;
        };

        let options = &self.options;
        let result = match viewer {
            Viewer::Hazard => self.forms.hazard.request(options).map(|(im, component)| {
                self.actions.fetch_hazard(site, im, component)
            }),
            Viewer::Disagg => self
                .forms
                .disagg
                .request(options)
                .map(|(im, component, rp)| self.actions.fetch_disagg(site, im, component, rp)),
            Viewer::Uhs => self
                .forms
                .uhs
                .request(options)
                .map(|(component, rps)| self.actions.fetch_uhs(site, component, rps)),
            Viewer::Gms => self
                .forms
                .gms
                .request(options)
                .map(|gms_id| self.actions.fetch_gms(site, gms_id)),
            Viewer::Scenario => self
                .forms
                .scenario
                .request(options)
                .map(|(component, ims)| self.actions.fetch_scenario(site, component, ims)),
            Viewer::Projects | Viewer::Metadata | Viewer::Download => return,
        };

        match result {
            None => {
                self.status_message = "Complete the form to fetch results".to_string();
            }
            Some(Ok(generation)) => {
                debug!(viewer = viewer.label(), generation, "request started");
                self.context.mark_loading(viewer);
                self.status_message = format!("Fetching {}...", self.screen.label());
            }
            Some(Err(e)) => {
                self.status_message = format!("Failed to start request: {e}");
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        if self.context.site().is_none() {
            return false;
        }
        let options = &self.options;
        match self.screen {
            AppScreen::Projects => false,
            AppScreen::Hazard => self.forms.hazard.is_valid(options),
            AppScreen::Disagg => self.forms.disagg.is_valid(options),
            AppScreen::Uhs => self.forms.uhs.is_valid(options),
            AppScreen::Gms => self.forms.gms.is_valid(options),
            AppScreen::Scenario => self.forms.scenario.is_valid(options),
        }
    }

    pub fn request_download(&mut self) {
        let Some(viewer) = self.screen.viewer() else {
            return;
        };
        if self.context.download_token(viewer).is_none() {
            self.status_message = "No results to download yet".to_string();
            return;
        }
        self.pending_download = Some(viewer);
    }

    /// Starts the queued download, if any. Returns whether one started.
    pub fn start_pending_download(&mut self) -> Result<bool> {
        let Some(viewer) = self.pending_download.take() else {
            return Ok(false);
        };
        let (Some(token), Some(site)) = (
            self.context.download_token(viewer).map(ToString::to_string),
            self.context.site(),
        ) else {
            return Ok(false);
        };

        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        let file_name = download_file_name(viewer, &site, &timestamp);
        self.actions.start_download(viewer, token, file_name)?;
        Ok(true)
    }

    /// Folds a finished request into the shared context.
    pub fn apply_fetch(&mut self, message: FetchMessage) {
        let viewer = message.viewer;
        match self.context.apply(&self.actions.requests, message) {
            Applied::Stored => self.on_stored(viewer),
            Applied::Failed(code) => {
                self.status_message = format!("{} failed: {code}", viewer.label());
            }
            Applied::Ignored => {}
        }
    }

    fn on_stored(&mut self, viewer: Viewer) {
        match viewer {
            Viewer::Projects => {
                let count = self.project_list().len();
                self.status_message = format!("{count} projects available");
                self.selected_project_index = 0;
            }
            Viewer::Metadata => {
                if let Some(metadata) = self.context.metadata.ready() {
                    self.options = FormOptions::from_metadata(metadata);
                    self.forms = Forms::with_defaults(&self.options);
                    self.selected_site_index = 0;
                    self.gms_im_index = 0;
                    self.status_message = format!("{} sites loaded", metadata.sites.0.len());
                }
            }
            Viewer::Gms => {
                self.gms_im_index = 0;
                self.status_message = "GMS results ready".to_string();
            }
            other => {
                self.status_message = format!("{} results ready", other.label());
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        HazardCurveSet, HazardResponse, ProjectIms, ProjectSite, ProjectSites, UhsResponse,
    };
    use crate::api::requests::{HazardData, ProjectMetadata, UhsData};
    use crate::api::ApiError;
    use crate::app::handle_input;
    use crate::app::store::ViewerState;
    use crate::domain::{Im, ImKind, ReturnPeriod};
    use crate::fetch::Payload;
    use crossterm::event::KeyCode;
    use std::collections::BTreeMap;

    fn metadata() -> ProjectMetadata {
        let sites: BTreeMap<String, ProjectSite> = [
            ("WTMC", "Wellington"),
            ("CCCC", "Christchurch Cathedral"),
            ("AKL", "Auckland"),
        ]
        .into_iter()
        .map(|(id, name)| {
            (
                id.to_string(),
                ProjectSite {
                    name: name.to_string(),
                    lat: 0.0,
                    lon: 0.0,
                    vs30: Some(400.0),
                },
            )
        })
        .collect();

        ProjectMetadata {
            sites: ProjectSites(sites),
            ims: ProjectIms {
                ims: vec!["PGA".to_string(), "PGV".to_string()],
                components: vec!["RotD50".to_string()],
            },
            uhs_rps: vec![ReturnPeriod(100), ReturnPeriod(500)],
            ..ProjectMetadata::default()
        }
    }

    fn app_with_metadata() -> App {
        let mut app = App::new();
        app.context
            .select_project(&mut app.actions.requests, "gnzl".to_string());
        let generation = app
            .actions
            .requests
            .start(Viewer::Metadata, async { Err(ApiError::Aborted) });
        app.apply_fetch(FetchMessage {
            viewer: Viewer::Metadata,
            generation,
            outcome: Ok(Payload::Metadata(Box::new(metadata()))),
        });
        app
    }

    #[tokio::test]
    async fn metadata_fills_form_options_and_defaults() {
        let app = app_with_metadata();
        assert_eq!(app.options.ims.len(), 2);
        assert!(app.forms.hazard.im.is_some());
        assert_eq!(app.visible_sites(), ["AKL", "CCCC", "WTMC"]);
    }

    #[tokio::test]
    async fn fuzzy_filter_matches_names_and_ids() {
        let mut app = app_with_metadata();
        app.search_active = true;
        app.search_query = "chch".to_string();
        app.refresh_site_filter();
        assert_eq!(app.visible_sites(), ["CCCC"]);

        app.clear_search();
        assert_eq!(app.visible_sites().len(), 3);
    }

    #[tokio::test]
    async fn get_is_disabled_without_a_site() {
        let mut app = app_with_metadata();
        app.screen = AppScreen::Hazard;
        assert!(!app.can_submit());

        app.submit();
        assert!(matches!(app.context.hazard, ViewerState::Idle));

        app.context
            .select_station(&mut app.actions.requests, "WTMC".to_string());
        assert!(app.can_submit());
        assert_eq!(app.context.site_vs30(), Some(400.0));
    }

    #[tokio::test]
    async fn download_needs_ready_results() {
        let mut app = app_with_metadata();
        app.screen = AppScreen::Uhs;
        app.request_download();
        assert!(app.pending_download.is_none());
        assert_eq!(app.status_message, "No results to download yet");
    }

    /// Stores `payload` as the current result of `viewer`, leaving its
    /// request group with a pending generation.
    fn store_ready(app: &mut App, viewer: Viewer, payload: Payload) -> u64 {
        let generation = app
            .actions
            .requests
            .start(viewer, std::future::pending::<Result<Payload, ApiError>>());
        app.apply_fetch(FetchMessage {
            viewer,
            generation,
            outcome: Ok(payload),
        });
        generation
    }

    fn hazard_payload() -> Payload {
        Payload::Hazard(Box::new(HazardData {
            response: HazardResponse {
                ensemble_hazard: HazardCurveSet::default(),
                branches_hazard: BTreeMap::new(),
                download_token: Some("hazard-token".to_string()),
            },
            nz_code: None,
        }))
    }

    fn uhs_payload() -> Payload {
        Payload::Uhs(Box::new(UhsData {
            response: UhsResponse {
                uhs_results: Vec::new(),
                branch_uhs_results: Vec::new(),
                download_token: Some("uhs-token".to_string()),
            },
            nz_code: Vec::new(),
        }))
    }

    fn app_with_site() -> App {
        let mut app = app_with_metadata();
        app.select_site("WTMC".to_string());
        app
    }

    #[tokio::test]
    async fn changing_a_hazard_field_drops_its_results() {
        let mut app = app_with_site();
        assert_eq!(app.screen, AppScreen::Hazard);
        let generation = store_ready(&mut app, Viewer::Hazard, hazard_payload());
        assert!(app.context.hazard.ready().is_some());

        handle_input(&mut app, KeyCode::Right);

        assert_eq!(app.forms.hazard.im, Some(Im::scalar(ImKind::Pgv)));
        assert!(app.context.hazard.ready().is_none());
        assert!(!app.actions.requests.is_current(Viewer::Hazard, generation));
        assert_eq!(app.context.download_token(Viewer::Hazard), None);
    }

    #[tokio::test]
    async fn toggling_a_uhs_return_period_drops_its_results() {
        let mut app = app_with_site();
        app.switch_screen(AppScreen::Uhs);
        let generation = store_ready(&mut app, Viewer::Uhs, uhs_payload());

        // Moving the cursor is not a change
        handle_input(&mut app, KeyCode::Down);
        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.forms.uhs.cursor, 1);
        assert!(app.context.uhs.ready().is_some());
        assert!(app.actions.requests.is_current(Viewer::Uhs, generation));

        handle_input(&mut app, KeyCode::Char(' '));

        assert_eq!(app.forms.uhs.rps, vec![ReturnPeriod(100), ReturnPeriod(500)]);
        assert!(app.context.uhs.ready().is_none());
        assert!(!app.actions.requests.is_current(Viewer::Uhs, generation));
    }

    #[tokio::test]
    async fn changing_one_viewer_leaves_the_others_alone() {
        let mut app = app_with_site();
        let hazard = store_ready(&mut app, Viewer::Hazard, hazard_payload());
        let uhs = store_ready(&mut app, Viewer::Uhs, uhs_payload());

        app.form_changed(Viewer::Hazard);

        assert!(app.context.hazard.ready().is_none());
        assert!(!app.actions.requests.is_current(Viewer::Hazard, hazard));
        assert!(app.context.uhs.ready().is_some());
        assert!(app.actions.requests.is_current(Viewer::Uhs, uhs));
    }

    #[tokio::test]
    async fn selecting_another_project_clears_every_result() {
        let mut app = app_with_site();
        let hazard = store_ready(&mut app, Viewer::Hazard, hazard_payload());
        let uhs = store_ready(&mut app, Viewer::Uhs, uhs_payload());

        app.select_project("cant".to_string());

        assert_eq!(app.context.project_id.as_deref(), Some("cant"));
        assert!(app.context.station_id.is_none());
        assert!(app.context.hazard.ready().is_none());
        assert!(app.context.uhs.ready().is_none());
        assert!(!app.actions.requests.is_current(Viewer::Hazard, hazard));
        assert!(!app.actions.requests.is_current(Viewer::Uhs, uhs));
        assert!(app.options.ims.is_empty());
    }

    #[test]
    fn screens_round_trip_through_tab_index() {
        for screen in AppScreen::TABS {
            assert_eq!(AppScreen::from_index(screen.index()), Some(screen));
        }
        assert_eq!(AppScreen::from_index(6), None);
    }
}
