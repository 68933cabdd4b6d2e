pub mod geometry;
pub mod model;
pub mod motion;
pub mod view;

pub use geometry::{SliceSpan, selected_index, slice_width};
pub use model::{Label, Wheel, WheelError, WheelItem};
pub use motion::{Motion, Phase, SpinTuning, Step};
pub use view::{WheelStyle, draw};

pub const FULL_TURN: f64 = 360.0;
pub const POINTER_ANGLE: f64 = 270.0; // screen degrees, 12 o'clock
pub const REFERENCE_HEIGHT: f64 = 1440.0;
pub const ICON_SIZE: i32 = 128;
pub const WHEEL_RADIUS: f64 = 150.0;
pub const LABEL_OFFSET: f64 = 130.0; // label anchor distance from center
pub const LABEL_FONT_SIZE: f64 = 10.0;
pub const HUB_RADIUS: f64 = 14.0;
pub const POINTER_SIZE: f64 = 14.0;
pub const SELECTION_LINE_WIDTH: f64 = 4.0;
pub const ICON_RADIUS_FACTOR: f64 = 0.45; // icon center, relative to wheel radius
