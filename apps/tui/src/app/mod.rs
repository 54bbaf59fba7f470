// App module for hazard-viewer
// Handles application state, forms and the calls behind them

pub mod actions;
pub mod forms;
pub mod input;
pub mod state;
pub mod store;

pub use input::handle_input;
pub use state::{App, AppScreen, ProjectFocus};
