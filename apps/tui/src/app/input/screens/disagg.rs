use crate::app::forms::cycle;
use crate::app::state::App;
use crate::fetch::Viewer;
use crossterm::event::KeyCode;

pub fn handle_disagg_input(app: &mut App, key: KeyCode) {
    if super::handle_viewer_input(app, key) {
        return;
    }

    if let KeyCode::Left | KeyCode::Right = key {
        let forward = key == KeyCode::Right;
        let options = &app.options;
        let form = &mut app.forms.disagg;
        let before = form.clone();
        match app.field_index {
            0 => form.im = cycle(&options.ims, form.im.as_ref(), forward),
            1 => form.component = cycle(&options.components, form.component.as_ref(), forward),
            _ => form.rp = cycle(&options.disagg_rps, form.rp.as_ref(), forward),
        }
        if *form != before {
            app.form_changed(Viewer::Disagg);
        }
    }
}
