use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

use crate::app::input::helpers::{wrap_decrement, wrap_increment};

mod disagg;
mod gms;
mod hazard;
mod help;
mod projects;
mod scenario;
mod uhs;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // The site filter swallows printable keys while it is open.
    if app.screen == AppScreen::Projects && app.search_active {
        projects::handle_search_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Projects => projects::handle_projects_input(app, key),
        AppScreen::Hazard => hazard::handle_hazard_input(app, key),
        AppScreen::Disagg => disagg::handle_disagg_input(app, key),
        AppScreen::Uhs => uhs::handle_uhs_input(app, key),
        AppScreen::Gms => gms::handle_gms_input(app, key),
        AppScreen::Scenario => scenario::handle_scenario_input(app, key),
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    let tabs = AppScreen::TABS.len();
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Tab => {
            let next = wrap_increment(app.screen.index(), tabs);
            if let Some(screen) = AppScreen::from_index(next) {
                app.switch_screen(screen);
            }
        }
        KeyCode::BackTab => {
            let previous = wrap_decrement(app.screen.index(), tabs);
            if let Some(screen) = AppScreen::from_index(previous) {
                app.switch_screen(screen);
            }
        }
        _ => return false,
    }
    true
}

/// Keys every result viewer shares. Returns `true` when the key was used.
fn handle_viewer_input(app: &mut App, key: KeyCode) -> bool {
    let fields = app.screen.field_count();
    match key {
        KeyCode::Up => {
            app.field_index = wrap_decrement(app.field_index, fields);
        }
        KeyCode::Down => {
            app.field_index = wrap_increment(app.field_index, fields);
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Char('d') => {
            app.request_download();
        }
        KeyCode::Esc => {
            app.switch_screen(AppScreen::Projects);
        }
        _ => return false,
    }
    true
}
