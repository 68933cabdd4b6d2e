pub mod daemon;
pub mod location;
pub mod macros;
pub mod photo;
pub mod places;
