//! Slide layout engine.
//!
//! Places accepted images into a fixed grid of slots, allocating a new
//! content slide whenever the current one is full.

mod header;

pub use header::{HeaderSlide, HEADER_BODY_PLACEHOLDER, HEADER_TITLE};

use crate::config::SettingsConfig;
use crate::deck::{Emu, Frame, Picture, SlideDeck, SlideId};
use crate::error::DeckError;

/// Image box and slot offsets, converted to EMU once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideGeometry {
    pub image_width: Emu,
    pub image_height: Emu,
    /// (left, top) per slot, in placement order
    pub slots: Vec<(Emu, Emu)>,
}

impl SlideGeometry {
    pub fn from_settings(settings: &SettingsConfig) -> Self {
        Self {
            image_width: Emu::from_cm(settings.image_width_cm),
            image_height: Emu::from_cm(settings.image_height_cm),
            slots: settings
                .positions
                .iter()
                .map(|p| (Emu::from_cm(p.left), Emu::from_cm(p.top)))
                .collect(),
        }
    }

    /// Images per content slide.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Frame of the given slot.
    pub fn frame(&self, slot: usize) -> Option<Frame> {
        let &(left, top) = self.slots.get(slot)?;
        Some(Frame {
            left,
            top,
            width: self.image_width,
            height: self.image_height,
        })
    }
}

/// Where an image ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slide: SlideId,
    pub slot: usize,
    pub frame: Frame,
}

/// Cursor over the growing deck.
#[derive(Debug)]
pub struct SlideLayoutEngine {
    geometry: SlideGeometry,
    content_layout: usize,
    current: Option<SlideId>,
    on_current: usize,
    slides_created: usize,
    images_placed: usize,
}

impl SlideLayoutEngine {
    pub fn new(geometry: SlideGeometry, content_layout: usize) -> Self {
        Self {
            geometry,
            content_layout,
            current: None,
            on_current: 0,
            slides_created: 0,
            images_placed: 0,
        }
    }

    pub fn from_settings(settings: &SettingsConfig) -> Self {
        Self::new(
            SlideGeometry::from_settings(settings),
            settings.content_layout,
        )
    }

    /// Place one image in the next free slot.
    ///
    /// The cursor only advances when the picture is inserted; a slide that
    /// was allocated but stayed empty is reused by the next call.
    pub fn place<D>(&mut self, deck: &mut D, picture: Picture) -> Result<Placement, DeckError>
    where
        D: SlideDeck + ?Sized,
    {
        let capacity = self.geometry.capacity();
        let slide = match self.current {
            Some(slide) if self.on_current < capacity => slide,
            _ => {
                let slide = deck.add_slide(self.content_layout)?;
                tracing::debug!("Allocated content slide {}", slide.index());
                self.current = Some(slide);
                self.on_current = 0;
                self.slides_created += 1;
                slide
            }
        };

        let slot = self.on_current;
        let frame = self
            .geometry
            .frame(slot)
            .ok_or_else(|| DeckError::MalformedPart {
                part: "layout".into(),
                message: format!("no position configured for slot {slot}"),
            })?;

        deck.add_picture(slide, picture, frame)?;
        self.on_current += 1;
        self.images_placed += 1;

        Ok(Placement { slide, slot, frame })
    }

    /// Content slides allocated so far.
    pub fn slides_created(&self) -> usize {
        self.slides_created
    }

    pub fn images_placed(&self) -> usize {
        self.images_placed
    }
}
