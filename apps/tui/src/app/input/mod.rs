pub mod helpers;
pub mod screens;

use crate::app::state::App;
use crossterm::event::KeyCode;

/// Input never awaits: anything slow is spawned onto a request group and
/// lands back in the event loop.
pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}
