use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::api::requests::{self, SiteRef};
use crate::app::forms::FormOptions;
use crate::app::{handle_input, App};
use crate::domain::{Component, Im, ReturnPeriod};
use crate::fetch::{FetchMessage, Payload, Viewer};
use crate::plot;
use crate::ui;

// States of a result download
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum DownloadState {
    Idle,
    Downloading,
    Success,
    Error,
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Downloading => write!(f, "Downloading"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
enum DownloadEvent {
    Start,
    Success(PathBuf),
    Error(String),
    Reset,
}

impl fmt::Display for DownloadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Success(path) => write!(f, "Success({path})", path = path.display()),
            Self::Error(msg) => write!(f, "Error({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: DownloadState,
    event: DownloadEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct DownloadMachine {
    state: DownloadState,
}

impl DownloadMachine {
    const fn new(initial_state: DownloadState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> DownloadState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &DownloadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }

    /// Runs `event` and, on a terminal state, the reset back to idle.
    fn finish(&mut self, event: &DownloadEvent, app: &mut App) {
        if let Err(e) = self.process_event(event, app) {
            warn!(error = %e, "download state");
        }
        if matches!(self.state, DownloadState::Success | DownloadState::Error)
            && self.process_event(&DownloadEvent::Reset, app).is_err()
        {
            // Non-fatal reset error
        }
    }
}

struct NextState(DownloadState);

impl TryFrom<(DownloadState, &DownloadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (DownloadState, &DownloadEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (DownloadState::Idle, DownloadEvent::Start) => {
                app.status_message = "Downloading results...".to_string();
                Ok(Self(DownloadState::Downloading))
            }
            (DownloadState::Downloading, DownloadEvent::Success(path)) => {
                let filename = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("unknown");

                app.status_message = format!("Saved {filename}");
                Ok(Self(DownloadState::Success))
            }
            (DownloadState::Downloading, DownloadEvent::Error(error)) => {
                app.status_message = format!("Download failed: {error}");
                Ok(Self(DownloadState::Error))
            }
            (DownloadState::Success | DownloadState::Error, DownloadEvent::Reset) => {
                Ok(Self(DownloadState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Routes one finished request either to the download machine or into the
/// shared context.
fn handle_fetch_message(app: &mut App, machine: &mut DownloadMachine, message: FetchMessage) {
    if message.viewer != Viewer::Download {
        app.apply_fetch(message);
        return;
    }

    // Only the latest download counts
    if !app.actions.requests.is_current(Viewer::Download, message.generation) {
        return;
    }

    let event = match message.outcome {
        Ok(Payload::Download(path)) => DownloadEvent::Success(path),
        Ok(_) => DownloadEvent::Error("unexpected payload".to_string()),
        Err(e) if e.is_abort() => return,
        Err(e) => DownloadEvent::Error(e.code().map_or_else(|| e.to_string(), |code| code.to_string())),
    };
    machine.finish(&event, app);
}

fn start_download(app: &mut App, machine: &mut DownloadMachine) {
    if machine.state() != DownloadState::Idle {
        app.pending_download = None;
        app.status_message = "A download is already running".to_string();
        return;
    }

    if machine.process_event(&DownloadEvent::Start, app).is_err() {
        return;
    }

    match app.start_pending_download() {
        Ok(true) => {}
        Ok(false) => machine.finish(&DownloadEvent::Error("nothing to download".to_string()), app),
        Err(e) => machine.finish(&DownloadEvent::Error(e.to_string()), app),
    }
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut download_machine = DownloadMachine::new(DownloadState::Idle);

    loop {
        // Advance the spinner and other animation state
        app.update();

        // Draw the current frame
        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        // Handle keyboard input
        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {
                    // Ignore non-key events
                }
            }
        }

        // Fold in whatever the request groups have finished
        while let Some(message) = app.actions.requests.try_next() {
            debug!(
                viewer = message.viewer.label(),
                generation = message.generation,
                ok = message.outcome.is_ok(),
                "request finished"
            );
            handle_fetch_message(app, &mut download_machine, message);
        }

        // Start a download queued by the last key press
        if app.pending_download.is_some() {
            start_download(app, &mut download_machine);
        }
    }
    Ok(())
}

/// What `--headless` fetches. Anything left out falls back to the first
/// value the backend offers.
#[derive(Debug, Clone, Default)]
pub struct HeadlessQuery {
    pub project: Option<String>,
    pub site: Option<String>,
    pub im: Option<String>,
    pub component: Option<String>,
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, query: &HeadlessQuery, json: bool) -> Result<()> {
    let summary = build_headless_summary(app, query).await?;

    if json {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{json}");
    } else {
        render_headless_summary(&summary);
    }

    Ok(())
}

fn render_headless_summary(summary: &HeadlessSummary) {
    println!("\nSeismic Hazard");
    println!("==============");
    println!("Project: {}", summary.project_id);
    println!("Site: {} ({})", summary.station_id, summary.site_name);
    if let Some(vs30) = summary.vs30 {
        println!("Vs30: {vs30:.0} m/s");
    }
    println!("IM: {} ({})", summary.im, summary.component);
    println!("Curve points: {}", summary.curve_points);

    println!("\nIM levels by return period:");
    for level in &summary.levels {
        match level.im_level {
            Some(value) => println!("- {} years: {value:.4}", level.return_period),
            None => println!("- {} years: outside curve", level.return_period),
        }
    }
}

const HEADLESS_RETURN_PERIODS: [u32; 4] = [100, 500, 1000, 2500];

async fn build_headless_summary(app: &App, query: &HeadlessQuery) -> Result<HeadlessSummary> {
    let client = app
        .actions
        .client
        .clone()
        .ok_or_else(|| eyre!("API client not initialized"))?;

    let project_id = match &query.project {
        Some(project) => project.clone(),
        None => requests::project_ids(&client)
            .await?
            .0
            .into_keys()
            .next()
            .ok_or_else(|| eyre!("Backend offers no projects"))?,
    };

    let metadata = requests::project_metadata(&client, &project_id).await?;
    let options = FormOptions::from_metadata(&metadata);

    let station_id = match &query.site {
        Some(site) if metadata.sites.0.contains_key(site) => site.clone(),
        Some(site) => return Err(eyre!("Unknown site {site} in project {project_id}")),
        None => metadata
            .sites
            .0
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| eyre!("Project {project_id} has no sites"))?,
    };
    let site = metadata.sites.0.get(&station_id);

    let im = pick(&options.ims, query.im.as_deref(), Im::parse, "IM")?;
    let component = pick(
        &options.components,
        query.component.as_deref(),
        Component::parse,
        "component",
    )?;

    let site_ref = SiteRef {
        project_id: project_id.clone(),
        station_id: station_id.clone(),
    };
    let data = requests::hazard(&client, &site_ref, im, component).await?;
    let points = plot::curve_points(&data.response.ensemble_hazard.total);

    let levels = HEADLESS_RETURN_PERIODS
        .into_iter()
        .map(|years| HeadlessLevel {
            return_period: years,
            im_level: plot::im_at_exceedance(&points, ReturnPeriod(years).exceedance()),
        })
        .collect();

    Ok(HeadlessSummary {
        project_id,
        site_name: site.map(|s| s.name.clone()).unwrap_or_default(),
        vs30: site.and_then(|s| s.vs30),
        station_id,
        im: im.to_string(),
        component: component.as_str().to_string(),
        curve_points: points.len(),
        levels,
    })
}

/// The requested value if the project offers it, else its first option.
fn pick<T: Copy + PartialEq>(
    options: &[T],
    requested: Option<&str>,
    parse: fn(&str) -> Option<T>,
    what: &str,
) -> Result<T> {
    match requested {
        Some(raw) => parse(raw)
            .filter(|value| options.contains(value))
            .ok_or_else(|| eyre!("{what} {raw} is not offered by this project")),
        None => options
            .first()
            .copied()
            .ok_or_else(|| eyre!("Project offers no {what}")),
    }
}

#[derive(serde::Serialize)]
struct HeadlessSummary {
    project_id: String,
    station_id: String,
    site_name: String,
    vs30: Option<f64>,
    im: String,
    component: String,
    curve_points: usize,
    levels: Vec<HeadlessLevel>,
}

#[derive(serde::Serialize)]
struct HeadlessLevel {
    return_period: u32,
    im_level: Option<f64>,
}
