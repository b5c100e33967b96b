//! Conversion between bitmap color tables ([`RgbQuad`]) and logical palettes
//! ([`ColorTable`]).

use super::entry::{CollapseBehavior, PaletteEntry, RgbQuad};
use super::error::PaletteError;
use super::table::{alloc_entries, ColorTable, MAX_PALETTE_SIZE};

/// Builds a logical palette with one [`CollapseBehavior::Normal`] entry per
/// requested color, in the same order.
pub fn build(requested: &[RgbQuad]) -> Result<ColorTable, PaletteError> {
    if requested.is_empty() || requested.len() > MAX_PALETTE_SIZE {
        return Err(PaletteError::OutOfRange(requested.len()));
    }

    let mut entries = alloc_entries(requested.len())?;
    entries.extend(requested.iter().map(|quad| {
        PaletteEntry::new(quad.red, quad.green, quad.blue, CollapseBehavior::Normal)
    }));

    ColorTable::from_entries(entries)
}

/// Reads a palette back into bitmap color-table form. Flags are dropped and the
/// reserved byte of every color is zero.
pub fn extract(table: &ColorTable) -> Vec<RgbQuad> {
    // The raw entry bytes are red-first, while color tables are blue-first,
    // so a plain reinterpretation has red and blue exchanged.
    table
        .iter()
        .map(|entry| RgbQuad::from_bytes(entry.to_bytes()).swap_red_blue())
        .collect()
}
