//! Duplication of palettes, optionally switching every entry between
//! "may collapse" and "never collapse" in one go.

use super::entry::{CollapseBehavior, PaletteEntry};
use super::error::PaletteError;
use super::table::{alloc_entries, ColorTable, MAX_PALETTE_SIZE};

/// Copies `source` into a new, independently owned table. `source` can be a
/// [`ColorTable`] or the raw entries read from a device.
pub fn copy_palette(source: &[PaletteEntry]) -> Result<ColorTable, PaletteError> {
    let mut entries = reserve_for(source)?;
    entries.extend_from_slice(source);
    Ok(ColorTable(entries))
}

/// Like [`copy_palette`], but every entry of the copy gets `flag`. Colors are
/// left untouched.
pub fn copy_palette_with_flag(
    source: &[PaletteEntry],
    flag: CollapseBehavior,
) -> Result<ColorTable, PaletteError> {
    let mut entries = reserve_for(source)?;
    entries.extend(source.iter().map(|entry| entry.with_flag(flag)));
    Ok(ColorTable(entries))
}

fn reserve_for(source: &[PaletteEntry]) -> Result<Vec<PaletteEntry>, PaletteError> {
    if source.is_empty() {
        return Err(PaletteError::InvalidHandle);
    }

    if source.len() > MAX_PALETTE_SIZE {
        return Err(PaletteError::OutOfRange(source.len()));
    }

    alloc_entries(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::spectrum;

    #[test]
    fn copy_is_equal_but_independent() {
        let original = spectrum();
        let mut copy = copy_palette(original.entries()).unwrap();

        assert_eq!(copy, original);

        copy[5].red = 1;
        copy[5].flag = CollapseBehavior::NoCollapse;

        assert_ne!(copy, original);
        assert_eq!(original, spectrum());
    }

    #[test]
    fn copy_keeps_flags() {
        let mut original = spectrum();
        original[3].flag = CollapseBehavior::NoCollapse;

        let copy = copy_palette(original.entries()).unwrap();
        assert_eq!(copy[3].flag, CollapseBehavior::NoCollapse);
        assert_eq!(copy[4].flag, CollapseBehavior::Normal);
    }

    #[test]
    fn copy_with_flag_rewrites_every_flag() {
        let original = spectrum();

        let protected = copy_palette_with_flag(original.entries(), CollapseBehavior::NoCollapse)
            .unwrap();
        assert_eq!(protected.len(), original.len());
        for (copied, orig) in protected.iter().zip(original.iter()) {
            assert!(copied.same_color(orig));
            assert_eq!(copied.flag, CollapseBehavior::NoCollapse);
        }

        let normal =
            copy_palette_with_flag(protected.entries(), CollapseBehavior::Normal).unwrap();
        assert_eq!(normal, original);
    }

    #[test]
    fn empty_source_is_an_invalid_handle() {
        assert_eq!(copy_palette(&[]), Err(PaletteError::InvalidHandle));
        assert_eq!(
            copy_palette_with_flag(&[], CollapseBehavior::Normal),
            Err(PaletteError::InvalidHandle)
        );
    }

    #[test]
    fn oversized_source_is_out_of_range() {
        let entries = vec![PaletteEntry::BLACK; 300];
        assert_eq!(copy_palette(&entries), Err(PaletteError::OutOfRange(300)));
    }
}
