//! Header slide emitted before any photographs.

use chrono::NaiveDate;

use crate::deck::{SlideDeck, SlideId};
use crate::error::DeckError;

pub const HEADER_TITLE: &str = "RELATÓRIO FOTOGRÁFICO";

/// Body placeholder index on the header layout.
pub const HEADER_BODY_PLACEHOLDER: u32 = 1;

const SERVICE_CLASSIFICATION: &str = "CORRETIVO";

/// Site metadata printed on the first slide.
#[derive(Debug, Clone)]
pub struct HeaderSlide {
    pub unit: String,
    pub address: String,
    pub date: NaiveDate,
}

impl HeaderSlide {
    pub fn new(unit: impl Into<String>, address: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            unit: unit.into(),
            address: address.into(),
            date,
        }
    }

    /// Body paragraphs, one per line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("UNIDADE: {}", self.unit),
            format!("ENDEREÇO: {}", self.address),
            format!("CLASSIFICAÇÃO DO SERVIÇO: ({SERVICE_CLASSIFICATION})"),
            format!("DATA: {}", self.date.format("%d/%m/%Y")),
        ]
    }

    /// Append the header slide using the given layout.
    pub fn emit<D>(&self, deck: &mut D, layout: usize) -> Result<SlideId, DeckError>
    where
        D: SlideDeck + ?Sized,
    {
        let slide = deck.add_slide(layout)?;
        deck.set_title(slide, HEADER_TITLE)?;
        deck.set_placeholder_text(slide, HEADER_BODY_PLACEHOLDER, &self.lines())?;
        tracing::debug!("Header slide added (layout {})", layout);
        Ok(slide)
    }
}
