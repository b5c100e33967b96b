//! See [`spectrum`]

use super::entry::{CollapseBehavior, PaletteEntry};
use super::table::{ColorTable, MAX_PALETTE_SIZE};

/// Builds a full 256 color palette that evenly covers the RGB cube: 8 levels of
/// red and green and 4 levels of blue. Useful when several bitmaps with
/// unrelated palettes are shown at once, since all of them can map onto it.
///
/// Red cycles fastest, then green, then blue.
pub fn spectrum() -> ColorTable {
    let (mut red, mut green, mut blue) = (0u8, 0u8, 0u8);

    let entries = (0..MAX_PALETTE_SIZE)
        .map(|_| {
            let entry = PaletteEntry::new(red, green, blue, CollapseBehavior::Normal);

            red = red.wrapping_add(32);
            if red == 0 {
                green = green.wrapping_add(32);
                if green == 0 {
                    blue = blue.wrapping_add(64);
                }
            }

            entry
        })
        .collect::<Vec<_>>();

    ColorTable(entries)
}
