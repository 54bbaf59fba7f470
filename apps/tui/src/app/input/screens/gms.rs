use crate::app::forms::cycle;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::fetch::Viewer;
use crossterm::event::KeyCode;

pub fn handle_gms_input(app: &mut App, key: KeyCode) {
    if super::handle_viewer_input(app, key) {
        return;
    }

    let plotted_ims = app
        .context
        .gms
        .ready()
        .map_or(0, |response| response.gcim_cdf_x.len());

    match key {
        KeyCode::Left | KeyCode::Right => {
            let next = cycle(
                &app.options.gms_ids,
                app.forms.gms.gms_id.as_ref(),
                key == KeyCode::Right,
            );
            if next != app.forms.gms.gms_id {
                app.forms.gms.gms_id = next;
                app.form_changed(Viewer::Gms);
            }
        }
        KeyCode::Char('[') => app.gms_im_index = wrap_decrement(app.gms_im_index, plotted_ims),
        KeyCode::Char(']') => app.gms_im_index = wrap_increment(app.gms_im_index, plotted_ims),
        _ => {}
    }
}
