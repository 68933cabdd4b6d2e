pub mod app;
pub mod theme;
pub mod wheel;
pub mod window;
