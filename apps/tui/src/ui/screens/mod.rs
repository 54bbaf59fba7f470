pub mod disagg;
pub mod gms;
pub mod hazard;
pub mod projects;
pub mod scenario;
pub mod uhs;
