pub mod charts;
pub mod forms;
pub mod popup;
pub mod status;
pub mod tables;
