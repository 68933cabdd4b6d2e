use super::geometry::{SliceSpan, deg_to_rad};
use super::model::{Wheel, WheelItem};
use super::{
    HUB_RADIUS, ICON_RADIUS_FACTOR, ICON_SIZE, LABEL_FONT_SIZE, LABEL_OFFSET, POINTER_ANGLE,
    POINTER_SIZE, REFERENCE_HEIGHT, SELECTION_LINE_WIDTH, WHEEL_RADIUS,
};
use crate::gui::theme::ThemeColors;
use crate::sys::wm::Point;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use std::f64::consts::PI;

/// Placement and sizes of the wheel on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelStyle {
    pub center: Point,
    /// Set once the wheel is placed at the cursor; otherwise it follows the area center.
    pub anchored: bool,
    pub radius: f64,
    pub label_offset: f64,
    pub font_size: f64,
    pub scale_factor: f64,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            center: Point::default(),
            anchored: false,
            radius: WHEEL_RADIUS,
            label_offset: LABEL_OFFSET,
            font_size: LABEL_FONT_SIZE,
            scale_factor: 1.0,
        }
    }
}

impl WheelStyle {
    pub fn resize(&mut self, radius: f64, label_offset: f64, font_size: f64) {
        self.radius = radius;
        self.label_offset = label_offset;
        self.font_size = font_size;
    }

    pub fn rescale(&mut self, center: Point, monitor_height: f64) {
        self.center = center;
        self.anchored = true;
        self.scale_factor = monitor_height / REFERENCE_HEIGHT;
    }

    pub fn fit(&mut self, width: f64, height: f64) {
        if !self.anchored {
            self.center = Point::new(width / 2.0, height / 2.0);
        }
    }

    pub fn scaled_radius(&self) -> f64 {
        self.radius * self.scale_factor
    }

    pub fn contains(&self, point: Point) -> bool {
        let (dx, dy) = (point.x - self.center.x, point.y - self.center.y);
        dx.hypot(dy) <= self.scaled_radius()
    }
}

struct SliceRenderer<'a> {
    item: &'a WheelItem,
    span: SliceSpan,
    style: &'a WheelStyle,
    selected: bool,
}

impl<'a> SliceRenderer<'a> {
    fn new(item: &'a WheelItem, span: SliceSpan, style: &'a WheelStyle, selected: bool) -> Self {
        Self {
            item,
            span,
            style,
            selected,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_sector(cr)?;
        if self.selected {
            self.draw_outline(cr, colors)?;
        }
        if let Some(pixbuf) = &self.item.pixbuf {
            self.draw_icon(cr, pixbuf)?;
        }
        self.draw_label(cr, colors)
    }

    fn sector_path(&self, cr: &Context) {
        let center = self.style.center;
        cr.move_to(center.x, center.y);
        cr.arc(
            center.x,
            center.y,
            self.style.scaled_radius(),
            deg_to_rad(self.span.start),
            deg_to_rad(self.span.end),
        );
        cr.line_to(center.x, center.y);
        cr.close_path();
    }

    fn draw_sector(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (r, g, b) = self.item.color.rgb();
        cr.set_source_rgb(r, g, b);
        self.sector_path(cr);
        cr.fill()
    }

    fn draw_outline(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (r, g, b, a) = colors.selection.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.set_line_width(SELECTION_LINE_WIDTH * self.style.scale_factor);
        self.sector_path(cr);
        cr.stroke()
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // fit the icon inside the slice, between hub and label
        let radius = self.style.scaled_radius();
        let half_width = (deg_to_rad(self.span.width()) / 2.0).min(PI / 2.0);
        let chord = 2.0 * radius * ICON_RADIUS_FACTOR * half_width.sin();
        let size = chord.min(radius * 0.4);
        let icon_scale = size / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        let mid = deg_to_rad(self.span.mid());
        let (cx, cy) = (
            self.style.center.x + radius * ICON_RADIUS_FACTOR * mid.cos(),
            self.style.center.y + radius * ICON_RADIUS_FACTOR * mid.sin(),
        );

        cr.save()?;
        cr.translate(cx - iw / 2.0, cy - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let scale = self.style.scale_factor;
        cr.save()?;
        cr.translate(self.style.center.x, self.style.center.y);
        cr.rotate(deg_to_rad(self.span.mid()));

        let (r, g, b, a) = colors.label.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.style.font_size * scale);

        let text = self.item.label.as_str();
        if let Ok(ext) = cr.text_extents(text) {
            // centered on the anchor, baseline just below the slice bisector
            cr.move_to(
                self.style.label_offset * scale - ext.width() / 2.0,
                self.style.font_size * scale,
            );
            cr.show_text(text)?;
        }
        cr.restore()
    }
}

pub fn draw(
    cr: &Context,
    wheel: &Wheel,
    style: &WheelStyle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let selection = wheel.selection_index();
    for (i, item, span) in wheel.slices() {
        SliceRenderer::new(item, span, style, selection == Some(i)).draw(cr, colors)?;
    }

    draw_hub(cr, style, colors)?;
    draw_pointer(cr, style, colors)
}

fn draw_hub(cr: &Context, style: &WheelStyle, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.hub.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.arc(
        style.center.x,
        style.center.y,
        HUB_RADIUS * style.scale_factor,
        0.0,
        2.0 * PI,
    );
    cr.fill()
}

/// Triangle at the rim marking the angle the selection is read from.
fn draw_pointer(
    cr: &Context,
    style: &WheelStyle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let size = POINTER_SIZE * style.scale_factor;
    let angle = deg_to_rad(POINTER_ANGLE);
    let (dx, dy) = (angle.cos(), angle.sin());
    let (nx, ny) = (-dy, dx);
    let rim = style.scaled_radius();

    let tip = (
        style.center.x + dx * (rim - size),
        style.center.y + dy * (rim - size),
    );
    let base = (
        style.center.x + dx * (rim + size / 2.0),
        style.center.y + dy * (rim + size / 2.0),
    );

    let (r, g, b, a) = colors.pointer.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.move_to(tip.0, tip.1);
    cr.line_to(base.0 + nx * size / 2.0, base.1 + ny * size / 2.0);
    cr.line_to(base.0 - nx * size / 2.0, base.1 - ny * size / 2.0);
    cr.close_path();
    cr.fill()
}
