use crate::gui::wheel::REFERENCE_HEIGHT;
use crate::sys::wm::{self, MonitorName, Point};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

/// Where the wheel goes when the overlay is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Option<Point>,
    pub monitor_height: f64,
}

/// Full-screen transparent overlay; the panel needs keyboard focus for its entry.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell unsupported, falling back to a regular window");
        return;
    }
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("lunchwheel"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}

/// Moves the overlay onto the focused monitor and finds the cursor there.
/// Falls back to the reference height when GDK does not know the monitor.
pub fn place_overlay(window: &gtk::ApplicationWindow) -> Placement {
    let focused = wm::focused_monitor();
    let gdk_monitor = focused.as_ref().and_then(|m| find_monitor(&m.name));

    let monitor_height = match &gdk_monitor {
        Some(monitor) => {
            window.set_monitor(Some(monitor));
            monitor.geometry().height() as f64
        }
        None => REFERENCE_HEIGHT,
    };

    let center = pointer_in(window).or_else(|| focused.as_ref().and_then(wm::cursor_on));
    Placement {
        center,
        monitor_height,
    }
}

fn pointer_in(window: &gtk::ApplicationWindow) -> Option<Point> {
    let pointer = gdk::Display::default()?.default_seat()?.pointer()?;
    let (x, y, _) = window.surface()?.device_position(&pointer)?;
    Some(Point::new(x, y))
}

fn find_monitor(name: &MonitorName) -> Option<gdk::Monitor> {
    let monitors = gdk::Display::default()?.monitors();
    (0..monitors.n_items())
        .filter_map(|i| monitors.item(i)?.downcast::<gdk::Monitor>().ok())
        .find(|m| m.connector().is_some_and(|c| c.as_str() == name.as_str()))
}
