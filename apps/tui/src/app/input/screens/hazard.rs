use crate::app::forms::cycle;
use crate::app::state::App;
use crate::fetch::Viewer;
use crossterm::event::KeyCode;

pub fn handle_hazard_input(app: &mut App, key: KeyCode) {
    if super::handle_viewer_input(app, key) {
        return;
    }

    match key {
        KeyCode::Left | KeyCode::Right => {
            let forward = key == KeyCode::Right;
            let form = &mut app.forms.hazard;
            let before = form.clone();
            match app.field_index {
                0 => form.im = cycle(&app.options.ims, form.im.as_ref(), forward),
                _ => {
                    form.component = cycle(&app.options.components, form.component.as_ref(), forward);
                }
            }
            if *form != before {
                app.form_changed(Viewer::Hazard);
            }
        }
        KeyCode::Char('b') => {
            app.show_branches = !app.show_branches;
        }
        _ => {}
    }
}
