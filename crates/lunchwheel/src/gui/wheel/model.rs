use super::geometry::{self, SliceSpan};
use super::motion::{Motion, Phase, SpinTuning, Step};
use super::ICON_SIZE;
use crate::gui::theme::{Palette, SliceColor};
use derive_more::{AsRef, Deref, Display, From, Into};
use gdk_pixbuf::Pixbuf;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

nearby::impl_string_newtype!(Label);

#[derive(Debug, Clone)]
pub struct WheelItem {
    pub label: Label,
    pub color: SliceColor,
    pub icon: Option<PathBuf>,
    pub pixbuf: Option<Pixbuf>,
}

impl WheelItem {
    pub fn new(label: Label, color: SliceColor, icon: Option<PathBuf>) -> Self {
        let pixbuf = icon.as_deref().and_then(Self::load_icon);
        Self {
            label,
            color,
            icon,
            pixbuf,
        }
    }

    fn load_icon(path: &Path) -> Option<Pixbuf> {
        Pixbuf::from_file_at_scale(path, ICON_SIZE, ICON_SIZE, true)
            .map_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("the wheel has no items")]
    Empty,
    #[error("no item at index {index} (wheel has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub struct Wheel {
    items: Vec<WheelItem>,
    palette: Palette,
    motion: Motion,
    selection: Option<usize>,
}

impl Wheel {
    pub fn new(palette: Palette, motion: Motion) -> Self {
        Self {
            items: Vec::new(),
            palette,
            motion,
            selection: None,
        }
    }

    pub fn items(&self) -> &[WheelItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn angle(&self) -> f64 {
        self.motion.angle()
    }

    pub fn phase(&self) -> Phase {
        self.motion.phase()
    }

    /// The color is fixed when the item is added, so later removals never
    /// recolor the remaining slices.
    pub fn add_item(&mut self, label: Label, icon: Option<PathBuf>) -> &WheelItem {
        let color = self.palette.color_for(self.items.len());
        self.items.push(WheelItem::new(label, color, icon));
        self.selection = None;
        &self.items[self.items.len() - 1]
    }

    pub fn remove_item(&mut self, index: usize) -> Result<WheelItem, WheelError> {
        if index >= self.items.len() {
            return Err(WheelError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.selection = None;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selection = None;
    }

    /// Starts (or resumes) spinning. Returns whether a new frame loop is needed.
    pub fn spin(&mut self) -> Result<bool, WheelError> {
        if self.items.is_empty() {
            return Err(WheelError::Empty);
        }
        let was_animating = self.motion.phase().is_animating();
        if self.motion.start() {
            self.selection = None;
        }
        Ok(!was_animating)
    }

    /// Click handler: a spinning wheel starts stopping, anything else spins.
    pub fn toggle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool, WheelError> {
        if self.motion.phase() == Phase::Spinning {
            self.motion.stop(rng);
            return Ok(false);
        }
        self.spin()
    }

    pub fn tick(&mut self) -> Step {
        let step = self.motion.tick();
        if step == Step::Settled {
            self.selection = geometry::selected_index(self.motion.angle(), self.items.len());
            match self.current_selection() {
                Some(item) => log::info!("You got: {}", item.label),
                None => log::warn!("Wheel settled with no items"),
            }
        }
        step
    }

    pub fn selection_index(&self) -> Option<usize> {
        self.selection
    }

    pub fn current_selection(&self) -> Option<&WheelItem> {
        self.selection.and_then(|i| self.items.get(i))
    }

    pub fn slices(&self) -> impl Iterator<Item = (usize, &WheelItem, SliceSpan)> {
        let spans = geometry::slice_spans(self.motion.angle(), self.items.len());
        self.items
            .iter()
            .zip(spans)
            .enumerate()
            .map(|(i, (item, span))| (i, item, span))
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_tuning(&mut self, tuning: SpinTuning) {
        self.motion.set_tuning(tuning);
    }
}
