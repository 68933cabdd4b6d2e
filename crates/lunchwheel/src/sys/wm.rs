use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{CursorPosition, Monitors};
use hyprland::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

nearby::impl_string_newtype!(MonitorName);

/// The monitor Hyprland reports as focused, positioned in the global layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusedMonitor {
    pub name: MonitorName,
    pub origin: Point,
}

impl FocusedMonitor {
    /// Global layout coordinates to coordinates local to this monitor.
    pub fn localize(&self, global: Point) -> Point {
        Point::new(global.x - self.origin.x, global.y - self.origin.y)
    }
}

/// `None` outside a Hyprland session.
pub fn focused_monitor() -> Option<FocusedMonitor> {
    Monitors::get()
        .map_err(|e| log::debug!("Monitor query failed: {}", e))
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| FocusedMonitor {
            name: MonitorName(m.name),
            origin: Point::new(m.x as f64, m.y as f64),
        })
}

pub fn cursor_on(monitor: &FocusedMonitor) -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    Some(monitor.localize(Point::new(cursor.x as f64, cursor.y as f64)))
}
