//! Slide deck abstraction.
//!
//! The layout engine talks to a [`SlideDeck`]; [`PptxDeck`] implements it on
//! top of an Office Open XML presentation opened from a template.

#[cfg(test)]
pub(crate) mod fixtures;
mod pptx;
mod xml;

pub use pptx::PptxDeck;

use image::ImageFormat;

use crate::error::DeckError;

/// Handle to a slide added during this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlideId(pub(crate) usize);

impl SlideId {
    /// Position among the slides added by this deck (0-based).
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Length in English Metric Units, the OOXML drawing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Emu(pub i64);

impl Emu {
    pub const PER_CM: f64 = 360_000.0;

    /// Convert centimetres to EMU, truncating toward zero.
    pub fn from_cm(cm: f64) -> Self {
        Emu((cm * Self::PER_CM) as i64)
    }
}

/// Placement box of a picture on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

/// Image bytes to embed, captured at placement time.
#[derive(Debug, Clone)]
pub struct Picture {
    /// Original file name, kept as the picture description
    pub name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl Picture {
    /// Media file extension and content type for the embedded part.
    pub fn media_type(&self) -> (&'static str, &'static str) {
        match self.format {
            ImageFormat::Png => ("png", "image/png"),
            ImageFormat::Gif => ("gif", "image/gif"),
            ImageFormat::Bmp => ("bmp", "image/bmp"),
            ImageFormat::Tiff => ("tiff", "image/tiff"),
            _ => ("jpeg", "image/jpeg"),
        }
    }
}

/// A presentation that slides and pictures can be appended to.
pub trait SlideDeck {
    /// Number of slide layouts available in the template.
    fn layout_count(&self) -> usize;

    /// Append a slide built from the given layout.
    fn add_slide(&mut self, layout: usize) -> Result<SlideId, DeckError>;

    /// Fill the slide's title placeholder.
    fn set_title(&mut self, slide: SlideId, text: &str) -> Result<(), DeckError>;

    /// Fill the placeholder with the given index, one paragraph per line.
    fn set_placeholder_text(
        &mut self,
        slide: SlideId,
        idx: u32,
        lines: &[String],
    ) -> Result<(), DeckError>;

    /// Embed a picture at the given frame.
    fn add_picture(
        &mut self,
        slide: SlideId,
        picture: Picture,
        frame: Frame,
    ) -> Result<(), DeckError>;

    /// Number of slides added so far.
    fn slide_count(&self) -> usize;
}
