use crate::api::models::{DisaggResponse, GmsResponse, ProjectIds, ScenarioResponse};
use crate::api::requests::{HazardData, ProjectMetadata, SiteRef, UhsData};
use crate::api::ErrorCode;
use crate::fetch::{FetchMessage, Payload, Requests, Viewer};

#[derive(Debug, Clone)]
pub enum ViewerState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ErrorCode),
}

impl<T> Default for ViewerState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ViewerState<T> {
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<ErrorCode> {
        match self {
            Self::Failed(code) => Some(*code),
            _ => None,
        }
    }
}

/// What happened to a message coming back from a request group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    Failed(ErrorCode),
    /// Aborted requests and superseded generations.
    Ignored,
}

/// Cross-view state shared by every screen. Only the event loop writes it.
#[derive(Debug, Default)]
pub struct Context {
    pub projects: ViewerState<ProjectIds>,
    pub project_id: Option<String>,
    pub metadata: ViewerState<ProjectMetadata>,
    pub station_id: Option<String>,
    pub hazard: ViewerState<HazardData>,
    pub disagg: ViewerState<DisaggResponse>,
    pub uhs: ViewerState<UhsData>,
    pub gms: ViewerState<GmsResponse>,
    pub scenario: ViewerState<ScenarioResponse>,
}

impl Context {
    pub fn site(&self) -> Option<SiteRef> {
        Some(SiteRef {
            project_id: self.project_id.clone()?,
            station_id: self.station_id.clone()?,
        })
    }

    pub fn site_vs30(&self) -> Option<f64> {
        let station = self.station_id.as_ref()?;
        self.metadata.ready()?.sites.0.get(station)?.vs30
    }

    /// Changing project drops the site and everything derived from it.
    pub fn select_project(&mut self, requests: &mut Requests, project_id: String) {
        requests.cancel(Viewer::Metadata);
        requests.cancel_results();
        self.project_id = Some(project_id);
        self.metadata = ViewerState::Loading;
        self.station_id = None;
        self.clear_results();
    }

    pub fn select_station(&mut self, requests: &mut Requests, station_id: String) {
        if self.station_id.as_deref() == Some(station_id.as_str()) {
            return;
        }
        requests.cancel_results();
        self.station_id = Some(station_id);
        self.clear_results();
    }

    /// An input of one viewer changed: its result no longer matches.
    pub fn invalidate(&mut self, requests: &mut Requests, viewer: Viewer) {
        requests.cancel(viewer);
        match viewer {
            Viewer::Hazard => self.hazard = ViewerState::Idle,
            Viewer::Disagg => self.disagg = ViewerState::Idle,
            Viewer::Uhs => self.uhs = ViewerState::Idle,
            Viewer::Gms => self.gms = ViewerState::Idle,
            Viewer::Scenario => self.scenario = ViewerState::Idle,
            Viewer::Projects | Viewer::Metadata | Viewer::Download => {}
        }
    }

    pub fn mark_loading(&mut self, viewer: Viewer) {
        match viewer {
            Viewer::Projects => self.projects = ViewerState::Loading,
            Viewer::Metadata => self.metadata = ViewerState::Loading,
            Viewer::Hazard => self.hazard = ViewerState::Loading,
            Viewer::Disagg => self.disagg = ViewerState::Loading,
            Viewer::Uhs => self.uhs = ViewerState::Loading,
            Viewer::Gms => self.gms = ViewerState::Loading,
            Viewer::Scenario => self.scenario = ViewerState::Loading,
            Viewer::Download => {}
        }
    }

    fn clear_results(&mut self) {
        self.hazard = ViewerState::Idle;
        self.disagg = ViewerState::Idle;
        self.uhs = ViewerState::Idle;
        self.gms = ViewerState::Idle;
        self.scenario = ViewerState::Idle;
    }

    fn fail(&mut self, viewer: Viewer, code: ErrorCode) {
        match viewer {
            Viewer::Projects => self.projects = ViewerState::Failed(code),
            Viewer::Metadata => self.metadata = ViewerState::Failed(code),
            Viewer::Hazard => self.hazard = ViewerState::Failed(code),
            Viewer::Disagg => self.disagg = ViewerState::Failed(code),
            Viewer::Uhs => self.uhs = ViewerState::Failed(code),
            Viewer::Gms => self.gms = ViewerState::Failed(code),
            Viewer::Scenario => self.scenario = ViewerState::Failed(code),
            Viewer::Download => {}
        }
    }

    /// Stores a fetch result. Stale generations and aborts never touch the
    /// store, so a cancelled request cannot put a viewer into error state.
    pub fn apply(&mut self, requests: &Requests, message: FetchMessage) -> Applied {
        if !requests.is_current(message.viewer, message.generation) {
            return Applied::Ignored;
        }

        let payload = match message.outcome {
            Ok(payload) => payload,
            Err(e) if e.is_abort() => return Applied::Ignored,
            Err(e) => {
                let code = e.code().unwrap_or(ErrorCode::Server);
                tracing::warn!(viewer = message.viewer.label(), error = %e, "request failed");
                self.fail(message.viewer, code);
                return Applied::Failed(code);
            }
        };

        match payload {
            Payload::Projects(ids) => self.projects = ViewerState::Ready(ids),
            Payload::Metadata(metadata) => self.metadata = ViewerState::Ready(*metadata),
            Payload::Hazard(data) => self.hazard = ViewerState::Ready(*data),
            Payload::Disagg(data) => self.disagg = ViewerState::Ready(*data),
            Payload::Uhs(data) => self.uhs = ViewerState::Ready(*data),
            Payload::Gms(data) => self.gms = ViewerState::Ready(*data),
            Payload::Scenario(data) => self.scenario = ViewerState::Ready(*data),
            Payload::Download(_) => {}
        }
        Applied::Stored
    }

    pub fn download_token(&self, viewer: Viewer) -> Option<&str> {
        let token = match viewer {
            Viewer::Hazard => self.hazard.ready()?.response.download_token.as_ref(),
            Viewer::Disagg => self.disagg.ready()?.download_token.as_ref(),
            Viewer::Uhs => self.uhs.ready()?.response.download_token.as_ref(),
            Viewer::Gms => self.gms.ready()?.download_token.as_ref(),
            Viewer::Scenario => self.scenario.ready()?.download_token.as_ref(),
            Viewer::Projects | Viewer::Metadata | Viewer::Download => None,
        };
        token.map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{HazardCurveSet, HazardResponse};
    use crate::api::ApiError;

    fn hazard_payload(token: &str) -> Payload {
        Payload::Hazard(Box::new(HazardData {
            response: HazardResponse {
                ensemble_hazard: HazardCurveSet::default(),
                branches_hazard: std::collections::BTreeMap::new(),
                download_token: Some(token.to_string()),
            },
            nz_code: None,
        }))
    }

    fn context_with_site(requests: &mut Requests) -> Context {
        let mut context = Context::default();
        context.select_project(requests, "gnzl".to_string());
        context.select_station(requests, "WTMC".to_string());
        context
    }

    #[tokio::test]
    async fn aborted_fetch_does_not_set_error_state() {
        let mut requests = Requests::new();
        let mut context = context_with_site(&mut requests);
        let generation = requests.start(Viewer::Hazard, async { Err(ApiError::Aborted) });
        context.mark_loading(Viewer::Hazard);

        let applied = context.apply(
            &requests,
            FetchMessage {
                viewer: Viewer::Hazard,
                generation,
                outcome: Err(ApiError::Aborted),
            },
        );
        assert_eq!(applied, Applied::Ignored);
        assert!(context.hazard.error().is_none());
    }

    #[tokio::test]
    async fn failures_are_stored_as_coarse_codes() {
        let mut requests = Requests::new();
        let mut context = context_with_site(&mut requests);
        let generation = requests.start(Viewer::Disagg, async { Err(ApiError::Timeout) });

        let applied = context.apply(
            &requests,
            FetchMessage {
                viewer: Viewer::Disagg,
                generation,
                outcome: Err(ApiError::Status { code: 404 }),
            },
        );
        assert_eq!(applied, Applied::Failed(ErrorCode::NotFound));
        assert_eq!(context.disagg.error(), Some(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn stale_generation_is_dropped() {
        let mut requests = Requests::new();
        let mut context = context_with_site(&mut requests);
        let old = requests.start(Viewer::Hazard, async { Ok(hazard_payload("old")) });
        requests.start(Viewer::Hazard, async { Ok(hazard_payload("new")) });

        let applied = context.apply(
            &requests,
            FetchMessage {
                viewer: Viewer::Hazard,
                generation: old,
                outcome: Ok(hazard_payload("old")),
            },
        );
        assert_eq!(applied, Applied::Ignored);
        assert!(context.hazard.ready().is_none());
    }

    #[tokio::test]
    async fn changing_station_clears_results_and_cancels() {
        let mut requests = Requests::new();
        let mut context = context_with_site(&mut requests);
        let generation = requests.start(Viewer::Hazard, async { Ok(hazard_payload("t1")) });
        context.apply(
            &requests,
            FetchMessage {
                viewer: Viewer::Hazard,
                generation,
                outcome: Ok(hazard_payload("t1")),
            },
        );
        assert_eq!(context.download_token(Viewer::Hazard), Some("t1"));

        context.select_station(&mut requests, "CHCH".to_string());
        assert!(context.hazard.ready().is_none());
        assert!(!requests.is_current(Viewer::Hazard, generation));
        assert_eq!(context.download_token(Viewer::Hazard), None);
    }

    #[tokio::test]
    async fn site_requires_project_and_station() {
        let mut requests = Requests::new();
        let mut context = Context::default();
        assert!(context.site().is_none());
        context.select_project(&mut requests, "gnzl".to_string());
        assert!(context.site().is_none());
        context.select_station(&mut requests, "WTMC".to_string());
        assert_eq!(
            context.site().map(|site| site.station_id),
            Some("WTMC".to_string())
        );
    }
}
