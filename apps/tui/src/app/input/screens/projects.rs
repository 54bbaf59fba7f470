use crate::app::input::helpers::step_clamped;
use crate::app::state::{App, ProjectFocus};
use crossterm::event::KeyCode;

const PAGE: isize = 5;

pub fn handle_projects_input(app: &mut App, key: KeyCode) {
    match app.project_focus {
        ProjectFocus::Projects => handle_project_list(app, key),
        ProjectFocus::Sites => handle_site_list(app, key),
    }
}

fn handle_project_list(app: &mut App, key: KeyCode) {
    let projects = app.project_list();
    match key {
        KeyCode::Up => {
            app.selected_project_index = step_clamped(app.selected_project_index, -1, projects.len());
        }
        KeyCode::Down => {
            app.selected_project_index = step_clamped(app.selected_project_index, 1, projects.len());
        }
        KeyCode::Enter | KeyCode::Right => {
            if let Some((id, _)) = projects.into_iter().nth(app.selected_project_index) {
                app.select_project(id);
            }
        }
        _ => {}
    }
}

fn handle_site_list(app: &mut App, key: KeyCode) {
    let total_rows = app.visible_sites().len();
    match key {
        KeyCode::Left | KeyCode::Esc => {
            app.project_focus = ProjectFocus::Projects;
        }
        KeyCode::Char('/') => {
            app.search_active = true;
            app.search_query.clear();
            app.refresh_site_filter();
        }
        KeyCode::Enter => select_highlighted_site(app),
        other => move_site_cursor(app, other, total_rows),
    }
}

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    let total_rows = app.visible_sites().len();
    match key {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => {
            select_highlighted_site(app);
            app.clear_search();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.refresh_site_filter();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.refresh_site_filter();
        }
        other => move_site_cursor(app, other, total_rows),
    }
}

fn select_highlighted_site(app: &mut App) {
    if let Some(station_id) = app.visible_sites().into_iter().nth(app.selected_site_index) {
        app.select_site(station_id);
    }
}

fn move_site_cursor(app: &mut App, key: KeyCode, total_rows: usize) {
    let index = app.selected_site_index;
    app.selected_site_index = match key {
        KeyCode::Up => step_clamped(index, -1, total_rows),
        KeyCode::Down => step_clamped(index, 1, total_rows),
        KeyCode::PageUp => step_clamped(index, -PAGE, total_rows),
        KeyCode::PageDown => step_clamped(index, PAGE, total_rows),
        KeyCode::Home => 0,
        KeyCode::End => total_rows.saturating_sub(1),
        _ => index,
    };
}
