//! See [`ColorTable`]

use super::entry::PaletteEntry;
use super::error::PaletteError;
use std::ops::{Index, IndexMut};
use std::slice;

/// Number of slots in a hardware color lookup table. No logical palette can
/// be larger than this.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An ordered list of 1 to [`MAX_PALETTE_SIZE`] palette entries. The index of an
/// entry is the hardware slot it is meant for, so no operation in this crate
/// ever reorders a table.
///
/// Tables are plain values: cloning one yields an independent copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable(pub(crate) Vec<PaletteEntry>);

impl ColorTable {
    /// Fails with [`PaletteError::OutOfRange`] if `entries` is empty or larger
    /// than a hardware table.
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Result<ColorTable, PaletteError> {
        check_len(entries.len())?;
        Ok(ColorTable(entries))
    }

    /// A table of `len` entries that all have the same value
    pub fn filled(len: usize, entry: PaletteEntry) -> Result<ColorTable, PaletteError> {
        check_len(len)?;

        let mut entries = alloc_entries(len)?;
        entries.resize(len, entry);

        Ok(ColorTable(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a table holds at least one entry
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, PaletteEntry> {
        self.0.iter()
    }
}

impl AsRef<[PaletteEntry]> for ColorTable {
    fn as_ref(&self) -> &[PaletteEntry] {
        &self.0
    }
}

impl Index<usize> for ColorTable {
    type Output = PaletteEntry;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.0[slot]
    }
}

impl IndexMut<usize> for ColorTable {
    fn index_mut(&mut self, slot: usize) -> &mut Self::Output {
        &mut self.0[slot]
    }
}

impl<'a> IntoIterator for &'a ColorTable {
    type Item = &'a PaletteEntry;
    type IntoIter = slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn check_len(len: usize) -> Result<(), PaletteError> {
    if len == 0 || len > MAX_PALETTE_SIZE {
        Err(PaletteError::OutOfRange(len))
    } else {
        Ok(())
    }
}

/// Reserves room for `len` entries without aborting the process if the
/// allocator gives up. The returned vector is empty.
pub(crate) fn alloc_entries(len: usize) -> Result<Vec<PaletteEntry>, PaletteError> {
    let mut entries = Vec::new();
    entries
        .try_reserve_exact(len)
        .map_err(|_| PaletteError::Allocation)?;
    Ok(entries)
}
