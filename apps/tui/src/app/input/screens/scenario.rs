use crate::app::forms::cycle;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::fetch::Viewer;
use crossterm::event::KeyCode;

pub fn handle_scenario_input(app: &mut App, key: KeyCode) {
    if super::handle_viewer_input(app, key) {
        return;
    }

    let ims = app.options.ims.len();
    let form = &mut app.forms.scenario;
    match (app.field_index, key) {
        (0, KeyCode::Left | KeyCode::Right) => {
            let next = cycle(&app.options.components, form.component.as_ref(), key == KeyCode::Right);
            if next != form.component {
                form.component = next;
                app.form_changed(Viewer::Scenario);
            }
        }
        (_, KeyCode::Left) => form.cursor = wrap_decrement(form.cursor, ims),
        (_, KeyCode::Right) => form.cursor = wrap_increment(form.cursor, ims),
        (1, KeyCode::Char(' ')) => {
            form.toggle_at_cursor(&app.options);
            app.form_changed(Viewer::Scenario);
        }
        _ => {}
    }
}
