//! Identity palettes: logical palettes laid out so that logical index `i` ends
//! up in hardware slot `i` when realized. This is only possible if the palette
//! respects the colors the system reserves for itself, see [`reconcile`].

use super::device::{DevicePaletteInfo, StaticPolicy};
use super::entry::{CollapseBehavior, PaletteEntry, RgbQuad};
use super::error::PaletteError;
use super::table::{alloc_entries, ColorTable, MAX_PALETTE_SIZE};
use fixedbitset::FixedBitSet;

const LAST_SLOT: usize = MAX_PALETTE_SIZE - 1;

/// A full hardware-sized palette together with the slots it hands back to the
/// system (those marked [`CollapseBehavior::Normal`] by the reconciler).
#[derive(Clone, Debug)]
pub struct IdentityPalette {
    table: ColorTable,
    /// One bit per slot, set if the slot holds a system color
    protected: FixedBitSet,
}

impl IdentityPalette {
    pub fn table(&self) -> &ColorTable {
        &self.table
    }

    pub fn is_protected(&self, slot: usize) -> bool {
        self.protected.contains(slot)
    }

    pub fn protected_count(&self) -> usize {
        self.protected.count_ones(..)
    }

    /// Number of slots that are available to the application
    pub fn free_count(&self) -> usize {
        MAX_PALETTE_SIZE - self.protected_count()
    }
}

/// Merges the `requested` colors with the static colors of a device into a
/// 256 entry palette.
///
/// With [`StaticPolicy::AllStatic`], the request is copied as is, except that
/// slot 0 is always black and slot 255 always white. Requested colors at those
/// two positions are lost.
///
/// With [`StaticPolicy::PartialStatic`], the lower and upper
/// `static_color_count / 2` slots keep the colors found in `system_entries`.
/// The slots in between take the requested color *with the same index*, so the
/// first `static_color_count / 2` requested colors are never used. Slots past
/// the end of the request keep the color found in `system_entries`.
///
/// `system_entries` is ignored for `AllStatic` devices. Missing entries count as
/// black.
pub fn reconcile(
    requested: &[RgbQuad],
    info: &DevicePaletteInfo,
    system_entries: &[PaletteEntry],
) -> Result<IdentityPalette, PaletteError> {
    if requested.len() > MAX_PALETTE_SIZE {
        return Err(PaletteError::OutOfRange(requested.len()));
    }

    let mut entries = alloc_entries(MAX_PALETTE_SIZE)?;
    let mut protected = FixedBitSet::with_capacity(MAX_PALETTE_SIZE);

    match info.static_policy {
        StaticPolicy::AllStatic => fill_no_static(&mut entries, &mut protected, requested),
        StaticPolicy::PartialStatic => fill_partial_static(
            &mut entries,
            &mut protected,
            requested,
            static_half(info.static_color_count),
            system_entries,
        ),
    }

    log::debug!(
        "Reconciled {} colors against {:?} device, {} slots protected",
        requested.len(),
        info.static_policy,
        protected.count_ones(..)
    );

    Ok(IdentityPalette {
        table: ColorTable(entries),
        protected,
    })
}

fn fill_no_static(
    entries: &mut Vec<PaletteEntry>,
    protected: &mut FixedBitSet,
    requested: &[RgbQuad],
) {
    entries.extend(requested.iter().map(|color| no_collapse(*color)));
    entries.resize(
        MAX_PALETTE_SIZE,
        PaletteEntry::default().with_flag(CollapseBehavior::NoCollapse),
    );

    // These replace requested colors if the request is long enough
    entries[LAST_SLOT] = PaletteEntry::WHITE;
    entries[0] = PaletteEntry::BLACK;

    protected.insert(0);
    protected.insert(LAST_SLOT);
}

fn fill_partial_static(
    entries: &mut Vec<PaletteEntry>,
    protected: &mut FixedBitSet,
    requested: &[RgbQuad],
    half: usize,
    system_entries: &[PaletteEntry],
) {
    entries.extend(system_entries.iter().take(MAX_PALETTE_SIZE).copied());
    entries.resize(MAX_PALETTE_SIZE, PaletteEntry::default());

    let upper_static = MAX_PALETTE_SIZE - half;
    // Requested index == slot index, so requested[..half] is skipped
    let usable_end = requested.len().saturating_sub(half);

    for entry in &mut entries[..half] {
        entry.flag = CollapseBehavior::Normal;
    }
    protected.insert_range(..half);

    for (entry, color) in entries
        .iter_mut()
        .zip(requested)
        .take(usable_end)
        .skip(half)
    {
        *entry = no_collapse(*color);
    }

    for entry in &mut entries[usable_end.max(half)..upper_static] {
        entry.flag = CollapseBehavior::NoCollapse;
    }

    for entry in &mut entries[upper_static..] {
        entry.flag = CollapseBehavior::Normal;
    }
    protected.insert_range(upper_static..);
}

/// Number of static colors at each end of the hardware table
pub(crate) fn static_half(static_color_count: i32) -> usize {
    if static_color_count < 0 {
        log::warn!(
            "Device reports {} static colors, assuming none",
            static_color_count
        );
        return 0;
    }

    if static_color_count % 2 != 0 {
        log::warn!(
            "Odd number of static colors ({}), the extra one is left unprotected",
            static_color_count
        );
    }

    let half = static_color_count as usize / 2;

    if half > MAX_PALETTE_SIZE / 2 {
        log::warn!(
            "Device reports {} static colors, which is more than the palette can hold",
            static_color_count
        );
        MAX_PALETTE_SIZE / 2
    } else {
        half
    }
}

fn no_collapse(color: RgbQuad) -> PaletteEntry {
    PaletteEntry::new(
        color.red,
        color.green,
        color.blue,
        CollapseBehavior::NoCollapse,
    )
}
