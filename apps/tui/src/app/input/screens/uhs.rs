use crate::app::forms::cycle;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::fetch::Viewer;
use crossterm::event::KeyCode;

pub fn handle_uhs_input(app: &mut App, key: KeyCode) {
    if super::handle_viewer_input(app, key) {
        return;
    }

    let rps = app.options.uhs_rps.len();
    let form = &mut app.forms.uhs;
    match (app.field_index, key) {
        (0, KeyCode::Left | KeyCode::Right) => {
            let next = cycle(&app.options.components, form.component.as_ref(), key == KeyCode::Right);
            if next != form.component {
                form.component = next;
                app.form_changed(Viewer::Uhs);
            }
        }
        (_, KeyCode::Left) => form.cursor = wrap_decrement(form.cursor, rps),
        (_, KeyCode::Right) => form.cursor = wrap_increment(form.cursor, rps),
        (_, KeyCode::Char('b')) => app.show_branches = !app.show_branches,
        (1, KeyCode::Char(' ')) => {
            form.toggle_at_cursor(&app.options);
            app.form_changed(Viewer::Uhs);
        }
        _ => {}
    }
}
