pub mod places;
pub mod runtime;
pub mod server;
pub mod wm;
