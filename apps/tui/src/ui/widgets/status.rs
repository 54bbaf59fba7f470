use crate::api::ErrorCode;
use crate::app::store::ViewerState;
use crate::app::{App, AppScreen};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Spinner frame for the app's animation counter (0..2π).
pub fn spinner_frame(animation_counter: f64) -> &'static str {
    let turns = (animation_counter / std::f64::consts::TAU).rem_euclid(1.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let index = (turns * SPINNER.len() as f64) as usize;
    SPINNER[index.min(SPINNER.len() - 1)]
}

pub fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = AppScreen::TABS
        .iter()
        .map(|screen| TextLine::from(screen.label()))
        .collect::<Vec<_>>();

    let site = match (&app.context.project_id, &app.context.station_id) {
        (Some(project), Some(station)) => format!(" {project} / {station} "),
        (Some(project), None) => format!(" {project} "),
        _ => " no project ".to_string(),
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("Seismic Hazard")
                .title_bottom(TextLine::from(site).right_aligned())
                .borders(Borders::ALL),
        )
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

pub fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect, title: &str) {
    let text = format!("{} Loading {title}...", spinner_frame(app.animation_counter));
    let paragraph = Paragraph::new(text)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub fn render_error(f: &mut Frame<'_>, area: Rect, code: ErrorCode) {
    let text = Text::from(vec![
        TextLine::from(Span::styled(
            code.title(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(code.message()),
    ]);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Draws the loading indicator, the error panel, an idle hint, or hands
/// the ready value to `render_ready`.
pub fn render_viewer_state<T>(
    app: &App,
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    state: &ViewerState<T>,
    render_ready: impl FnOnce(&App, &mut Frame<'_>, Rect, &T),
) {
    match state {
        ViewerState::Idle => {
            let hint = if app.context.site().is_some() {
                "Press Enter to get results"
            } else {
                "Select a project and site first"
            };
            super::charts::render_placeholder(f, area, title, hint);
        }
        ViewerState::Loading => render_loading(app, f, area, title),
        ViewerState::Failed(code) => render_error(f, area, *code),
        ViewerState::Ready(value) => render_ready(app, f, area, value),
    }
}

fn shortcut(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default(),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Span::styled(format!(" {key} "), key_style),
        Span::styled(format!("{label} "), label_style),
    ]
}

pub fn shortcuts(app: &App) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    match app.screen {
        AppScreen::Projects => {
            spans.extend(shortcut("Enter", "Select", true));
            spans.extend(shortcut("/", "Filter", app.context.metadata.ready().is_some()));
        }
        screen => {
            spans.extend(shortcut("Enter", "Get", app.can_submit()));
            let downloadable = screen
                .viewer()
                .is_some_and(|viewer| app.context.download_token(viewer).is_some());
            spans.extend(shortcut("d", "Download", downloadable));
            if screen == AppScreen::Hazard {
                spans.extend(shortcut("b", "Branches", true));
            }
            if screen == AppScreen::Gms {
                spans.extend(shortcut("[ ]", "IM", app.context.gms.ready().is_some()));
            }
        }
    }
    spans.extend(shortcut("Tab", "Screen", true));
    spans.extend(shortcut("F1", "Help", true));
    spans.extend(shortcut("q", "Quit", true));
    spans
}

pub fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let text = Text::from(vec![
        TextLine::from(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Cyan),
        )),
        TextLine::from(shortcuts(app)),
    ]);
    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::TOP));
    f.render_widget(paragraph, area);
}
