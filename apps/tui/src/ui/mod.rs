// UI module for hazard-viewer
// Frame layout plus per-screen rendering

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    // Tabs, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    widgets::status::render_tabs(app, f, chunks[0]);

    // Render the active screen
    match app.screen {
        AppScreen::Projects => screens::projects::render_projects(app, f, chunks[1]),
        AppScreen::Hazard => screens::hazard::render_hazard(app, f, chunks[1]),
        AppScreen::Disagg => screens::disagg::render_disagg(app, f, chunks[1]),
        AppScreen::Uhs => screens::uhs::render_uhs(app, f, chunks[1]),
        AppScreen::Gms => screens::gms::render_gms(app, f, chunks[1]),
        AppScreen::Scenario => screens::scenario::render_scenario(app, f, chunks[1]),
    }

    widgets::status::render_status_bar(app, f, chunks[2]);

    // Help popup goes on top of everything
    if app.show_help {
        widgets::popup::render_help(app, f);
    }
}

/// Form column on the left, results on the right.
pub fn split_form(area: ratatui::layout::Rect) -> (ratatui::layout::Rect, ratatui::layout::Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);
    (columns[0], columns[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn every_screen_draws_without_data() -> Result<(), Box<dyn std::error::Error>> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40))?;
        let mut app = App::new();
        for screen in AppScreen::TABS {
            app.screen = screen;
            terminal.draw(|f| ui(&app, f))?;
        }
        app.show_help = true;
        terminal.draw(|f| ui(&app, f))?;
        Ok(())
    }
}
