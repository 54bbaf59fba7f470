//! In-flight request bookkeeping. Each viewer owns one request group; a
//! new click aborts whatever that viewer still has in flight, and results
//! come back to the event loop tagged with the generation that issued them.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::api::models::{DisaggResponse, GmsResponse, ProjectIds, ScenarioResponse};
use crate::api::requests::{HazardData, ProjectMetadata, UhsData};
use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewer {
    Projects,
    Metadata,
    Hazard,
    Disagg,
    Uhs,
    Gms,
    Scenario,
    Download,
}

impl Viewer {
    /// Viewers whose results depend on the selected site.
    pub const RESULTS: [Self; 5] = [
        Self::Hazard,
        Self::Disagg,
        Self::Uhs,
        Self::Gms,
        Self::Scenario,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Metadata => "project",
            Self::Hazard => "hazard",
            Self::Disagg => "disagg",
            Self::Uhs => "uhs",
            Self::Gms => "gms",
            Self::Scenario => "scenario",
            Self::Download => "download",
        }
    }
}

#[derive(Debug)]
pub enum Payload {
    Projects(ProjectIds),
    Metadata(Box<ProjectMetadata>),
    Hazard(Box<HazardData>),
    Disagg(Box<DisaggResponse>),
    Uhs(Box<UhsData>),
    Gms(Box<GmsResponse>),
    Scenario(Box<ScenarioResponse>),
    Download(PathBuf),
}

#[derive(Debug)]
pub struct FetchMessage {
    pub viewer: Viewer,
    pub generation: u64,
    pub outcome: Result<Payload, ApiError>,
}

/// The in-flight request set of one viewer.
#[derive(Debug)]
pub struct RequestGroup {
    viewer: Viewer,
    generation: u64,
    handle: Option<AbortHandle>,
}

impl RequestGroup {
    pub const fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            generation: 0,
            handle: None,
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Aborts the in-flight set. Anything it still reports is stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!(viewer = self.viewer.label(), generation = self.generation, "aborting");
            }
            handle.abort();
        }
        self.generation += 1;
    }

    /// Cancels the previous set and spawns `request` as the new one. The
    /// outcome is always reported, with cancellation surfacing as
    /// `ApiError::Aborted`.
    pub fn replace<F>(&mut self, tx: &UnboundedSender<FetchMessage>, request: F) -> u64
    where
        F: Future<Output = Result<Payload, ApiError>> + Send + 'static,
    {
        self.cancel();

        let viewer = self.viewer;
        let generation = self.generation;
        let task = tokio::spawn(request);
        self.handle = Some(task.abort_handle());

        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => Err(ApiError::Aborted),
                Err(e) => Err(ApiError::Internal(format!("request task failed: {e}"))),
            };
            let _ = tx.send(FetchMessage {
                viewer,
                generation,
                outcome,
            });
        });

        generation
    }
}

impl Drop for RequestGroup {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Request groups for every viewer plus the channel their results land on.
#[derive(Debug)]
pub struct Requests {
    tx: UnboundedSender<FetchMessage>,
    rx: UnboundedReceiver<FetchMessage>,
    groups: HashMap<Viewer, RequestGroup>,
}

impl Requests {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            tx,
            rx,
            groups: HashMap::new(),
        }
    }

    fn group(&mut self, viewer: Viewer) -> &mut RequestGroup {
        self.groups
            .entry(viewer)
            .or_insert_with(|| RequestGroup::new(viewer))
    }

    pub fn start<F>(&mut self, viewer: Viewer, request: F) -> u64
    where
        F: Future<Output = Result<Payload, ApiError>> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.group(viewer).replace(&tx, request)
    }

    pub fn cancel(&mut self, viewer: Viewer) {
        if let Some(group) = self.groups.get_mut(&viewer) {
            group.cancel();
        }
    }

    pub fn cancel_results(&mut self) {
        for viewer in Viewer::RESULTS {
            self.cancel(viewer);
        }
    }

    pub fn is_current(&self, viewer: Viewer, generation: u64) -> bool {
        self.groups
            .get(&viewer)
            .is_some_and(|group| group.is_current(generation))
    }

    pub fn try_next(&mut self) -> Option<FetchMessage> {
        self.rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<FetchMessage> {
        self.rx.recv().await
    }
}

impl Default for Requests {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn replacing_aborts_the_previous_request() {
        let mut requests = Requests::new();

        let first = requests.start(Viewer::Hazard, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Payload::Download(PathBuf::from("never")))
        });
        let second = requests.start(Viewer::Hazard, async {
            Ok(Payload::Download(PathBuf::from("done")))
        });
        assert!(second > first);

        let mut seen = Vec::new();
        for _ in 0..2 {
            if let Ok(Some(message)) =
                tokio::time::timeout(Duration::from_secs(5), requests.next()).await
            {
                seen.push(message);
            }
        }

        let aborted = seen.iter().find(|m| m.generation == first);
        assert!(matches!(
            aborted.map(|m| &m.outcome),
            Some(Err(ApiError::Aborted))
        ));
        assert!(!requests.is_current(Viewer::Hazard, first));

        let latest = seen.iter().find(|m| m.generation == second);
        assert!(matches!(
            latest.map(|m| &m.outcome),
            Some(Ok(Payload::Download(_)))
        ));
        assert!(requests.is_current(Viewer::Hazard, second));
    }

    #[tokio::test]
    async fn cancel_makes_the_outstanding_generation_stale() {
        let mut requests = Requests::new();
        let generation = requests.start(Viewer::Gms, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(ApiError::Timeout)
        });

        requests.cancel(Viewer::Gms);
        assert!(!requests.is_current(Viewer::Gms, generation));

        let message = tokio::time::timeout(Duration::from_secs(5), requests.next()).await;
        assert!(matches!(
            message,
            Ok(Some(FetchMessage {
                outcome: Err(ApiError::Aborted),
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn viewers_do_not_cancel_each_other() {
        let mut requests = Requests::new();
        let hazard = requests.start(Viewer::Hazard, async {
            Ok(Payload::Download(PathBuf::from("hazard")))
        });
        requests.start(Viewer::Uhs, async {
            Ok(Payload::Download(PathBuf::from("uhs")))
        });
        assert!(requests.is_current(Viewer::Hazard, hazard));

        requests.cancel(Viewer::Uhs);
        assert!(requests.is_current(Viewer::Hazard, hazard));
    }
}
