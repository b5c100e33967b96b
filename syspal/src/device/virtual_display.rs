//! See [`VirtualDisplay`]

use super::{Capability, DevicePaletteInfo, PaletteDevice, RasterCaps, StaticPolicy};
use crate::entry::{CollapseBehavior, PaletteEntry};
use crate::identity::static_half;
use crate::table::{ColorTable, MAX_PALETTE_SIZE};
use std::cell::{Cell, RefCell};

/// The 20 colors a palette display reserves by default. The first ten occupy
/// the bottom of the hardware table, the last ten the top.
const DEFAULT_STATIC_COLORS: [(u8, u8, u8); 20] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (192, 220, 192),
    (166, 202, 240),
    (255, 251, 240),
    (160, 160, 164),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// A 256 entry hardware table with the default static colors at both ends
/// and black everywhere else
pub fn default_static_entries() -> Vec<PaletteEntry> {
    let mut entries = vec![PaletteEntry::BLACK; MAX_PALETTE_SIZE];
    let half = DEFAULT_STATIC_COLORS.len() / 2;

    for (i, (r, g, b)) in DEFAULT_STATIC_COLORS.iter().copied().enumerate() {
        let slot = if i < half {
            i
        } else {
            MAX_PALETTE_SIZE - DEFAULT_STATIC_COLORS.len() + i
        };
        entries[slot] = PaletteEntry::new(r, g, b, CollapseBehavior::Normal);
    }

    entries
}

/// An in-memory display with a 256 slot hardware palette. It performs no color
/// matching: realizing a palette simply copies logical entry `i` into hardware
/// slot `i` for every slot the system doesn't reserve.
///
/// It also keeps count of open contexts and live palette objects, so callers
/// can check that nothing leaks.
pub struct VirtualDisplay {
    info: DevicePaletteInfo,
    available: bool,
    failing_reads: bool,
    failing_realization: bool,
    hardware: RefCell<Vec<PaletteEntry>>,
    open_contexts: Cell<usize>,
    live_palettes: Cell<usize>,
    next_id: Cell<u32>,
}

pub struct VirtualContext(u32);

pub struct VirtualPalette {
    id: u32,
    table: ColorTable,
}

impl VirtualDisplay {
    pub fn new(info: DevicePaletteInfo) -> VirtualDisplay {
        VirtualDisplay {
            info,
            available: true,
            failing_reads: false,
            failing_realization: false,
            hardware: RefCell::new(default_static_entries()),
            open_contexts: Cell::new(0),
            live_palettes: Cell::new(0),
            next_id: Cell::new(1),
        }
    }

    /// The classic 8 bit display: 256 slots, 20 of them reserved
    pub fn palette_display() -> VirtualDisplay {
        VirtualDisplay::new(DevicePaletteInfo {
            supports_palette: true,
            slot_count: MAX_PALETTE_SIZE as i32,
            static_color_count: DEFAULT_STATIC_COLORS.len() as i32,
            static_policy: StaticPolicy::PartialStatic,
        })
    }

    /// A palette display where the application took over all but black and white
    pub fn no_static_display() -> VirtualDisplay {
        VirtualDisplay::new(DevicePaletteInfo {
            supports_palette: true,
            slot_count: MAX_PALETTE_SIZE as i32,
            static_color_count: 2,
            static_policy: StaticPolicy::AllStatic,
        })
    }

    /// A true-color display without any palette hardware
    pub fn direct_color_display() -> VirtualDisplay {
        VirtualDisplay::new(DevicePaletteInfo {
            supports_palette: false,
            slot_count: 0,
            static_color_count: -1,
            static_policy: StaticPolicy::PartialStatic,
        })
    }

    /// A display that never hands out a context
    pub fn unavailable() -> VirtualDisplay {
        VirtualDisplay {
            available: false,
            ..VirtualDisplay::palette_display()
        }
    }

    /// Makes every query of the system palette fail, like a driver that
    /// lost track of its palette
    pub fn with_failing_reads(self) -> VirtualDisplay {
        VirtualDisplay {
            failing_reads: true,
            ..self
        }
    }

    /// Palette objects can still be created, but selecting them never succeeds
    pub fn with_failing_realization(self) -> VirtualDisplay {
        VirtualDisplay {
            failing_realization: true,
            ..self
        }
    }

    /// Replaces the current hardware table. Missing slots become black.
    pub fn with_hardware_entries(self, mut entries: Vec<PaletteEntry>) -> VirtualDisplay {
        entries.resize(MAX_PALETTE_SIZE, PaletteEntry::BLACK);
        self.hardware.replace(entries);
        self
    }

    pub fn hardware_entries(&self) -> Vec<PaletteEntry> {
        self.hardware.borrow().clone()
    }

    /// Number of contexts that were opened but not closed yet
    pub fn open_contexts(&self) -> usize {
        self.open_contexts.get()
    }

    /// Number of palette objects that were created but not released yet
    pub fn live_palettes(&self) -> usize {
        self.live_palettes.get()
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    /// Hardware slots that realization may overwrite
    fn free_slots(&self) -> std::ops::Range<usize> {
        match self.info.static_policy {
            StaticPolicy::AllStatic => 1..MAX_PALETTE_SIZE - 1,
            StaticPolicy::PartialStatic => {
                let half = static_half(self.info.static_color_count);
                half..MAX_PALETTE_SIZE - half
            }
        }
    }
}

impl PaletteDevice for VirtualDisplay {
    type Context = VirtualContext;
    type Palette = VirtualPalette;

    fn open_context(&self) -> Option<VirtualContext> {
        if !self.available {
            return None;
        }

        self.open_contexts.set(self.open_contexts.get() + 1);
        Some(VirtualContext(self.next_id()))
    }

    fn close_context(&self, context: VirtualContext) {
        log::trace!("Closing virtual context {}", context.0);
        self.open_contexts.set(self.open_contexts.get() - 1);
    }

    fn capability(&self, _context: &VirtualContext, cap: Capability) -> i32 {
        match cap {
            Capability::SlotCount => self.info.slot_count,
            Capability::StaticColorCount => self.info.static_color_count,
            Capability::RasterCaps => {
                let mut caps = RasterCaps::BITBLT | RasterCaps::DI_BITMAP | RasterCaps::STRETCHBLT;
                caps.set(RasterCaps::PALETTE, self.info.supports_palette);
                caps.bits() as i32
            }
        }
    }

    fn static_policy(&self, _context: &VirtualContext) -> Option<StaticPolicy> {
        if self.failing_reads {
            None
        } else {
            Some(self.info.static_policy)
        }
    }

    fn system_entries(
        &self,
        _context: &VirtualContext,
        count: usize,
    ) -> Option<Vec<PaletteEntry>> {
        let hardware = self.hardware.borrow();

        if self.failing_reads || !self.info.supports_palette || count > hardware.len() {
            return None;
        }

        Some(hardware[..count].to_vec())
    }

    fn realize(&self, _context: &VirtualContext, table: &ColorTable) -> Option<VirtualPalette> {
        self.live_palettes.set(self.live_palettes.get() + 1);

        Some(VirtualPalette {
            id: self.next_id(),
            table: table.clone(),
        })
    }

    fn select_and_realize(
        &self,
        _context: &VirtualContext,
        palette: &VirtualPalette,
    ) -> Option<u32> {
        if self.failing_realization {
            return None;
        }

        if !self.info.supports_palette {
            return Some(0);
        }

        let mut hardware = self.hardware.borrow_mut();
        let mut changed = 0;

        for slot in self.free_slots().take_while(|slot| *slot < palette.table.len()) {
            let entry = palette.table[slot].with_flag(CollapseBehavior::Normal);

            if hardware[slot] != entry {
                hardware[slot] = entry;
                changed += 1;
            }
        }

        log::trace!("Virtual palette {} changed {} slots", palette.id, changed);
        Some(changed)
    }

    fn release(&self, palette: VirtualPalette) {
        log::trace!("Releasing virtual palette {}", palette.id);
        self.live_palettes.set(self.live_palettes.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ScreenContext;
    use crate::error::{DeviceUnavailable, PaletteError};

    #[test]
    fn default_static_colors_sit_at_both_ends() {
        let entries = default_static_entries();

        assert_eq!(entries.len(), 256);
        assert_eq!(entries[0], PaletteEntry::BLACK);
        assert_eq!(entries[1], PaletteEntry::new(128, 0, 0, CollapseBehavior::Normal));
        assert_eq!(entries[9], PaletteEntry::new(166, 202, 240, CollapseBehavior::Normal));
        assert_eq!(entries[10], PaletteEntry::BLACK);
        assert_eq!(entries[246], PaletteEntry::new(255, 251, 240, CollapseBehavior::Normal));
        assert_eq!(entries[255], PaletteEntry::WHITE);
    }

    #[test]
    fn context_guard_closes_on_drop() {
        let display = VirtualDisplay::palette_display();
        {
            let _context = ScreenContext::open(&display).unwrap();
            assert_eq!(display.open_contexts(), 1);
        }
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn palette_guard_releases_on_drop() {
        let display = VirtualDisplay::palette_display();
        let context = ScreenContext::open(&display).unwrap();
        let table = crate::spectrum::spectrum();
        {
            let _palette = context.realize(&table).unwrap();
            assert_eq!(display.live_palettes(), 1);
        }
        assert_eq!(display.live_palettes(), 0);
    }

    #[test]
    fn realization_leaves_static_slots_alone() {
        let display = VirtualDisplay::palette_display();
        let context = ScreenContext::open(&display).unwrap();
        let entry = PaletteEntry::new(1, 2, 3, CollapseBehavior::NoCollapse);
        let table = ColorTable::filled(256, entry).unwrap();

        let palette = context.realize(&table).unwrap();
        assert_eq!(context.select_and_realize(&palette), Ok(236));

        let hardware = display.hardware_entries();
        assert_eq!(hardware[..10], default_static_entries()[..10]);
        assert_eq!(hardware[246..], default_static_entries()[246..]);
        assert_eq!(hardware[10], PaletteEntry::new(1, 2, 3, CollapseBehavior::Normal));
    }

    #[test]
    fn direct_color_display_reports_no_palette() {
        let display = VirtualDisplay::direct_color_display();
        let context = ScreenContext::open(&display).unwrap();

        assert!(!context.supports_palette());
        assert_eq!(context.palette_entries_on_device(), -1);
        assert_eq!(
            context.system_entries(4),
            Err(PaletteError::DeviceUnavailable(DeviceUnavailable::QueryFailed))
        );
    }

    #[test]
    fn failing_reads_affect_every_query() {
        let display = VirtualDisplay::palette_display().with_failing_reads();
        let context = ScreenContext::open(&display).unwrap();
        let query_failed = PaletteError::DeviceUnavailable(DeviceUnavailable::QueryFailed);

        assert_eq!(context.static_policy(), Err(query_failed));
        assert_eq!(context.palette_info(), Err(query_failed));
        assert_eq!(context.system_entries(256), Err(query_failed));

        // Capabilities still come through
        assert!(context.supports_palette());
        assert_eq!(context.palette_entries_on_device(), 256);
    }

    #[test]
    fn failing_realization_leaves_hardware_alone() {
        let display = VirtualDisplay::palette_display().with_failing_realization();
        let context = ScreenContext::open(&display).unwrap();
        let palette = context.realize(&crate::spectrum::spectrum()).unwrap();

        assert_eq!(
            context.select_and_realize(&palette),
            Err(PaletteError::DeviceUnavailable(DeviceUnavailable::RealizeFailed))
        );
        assert_eq!(display.hardware_entries(), default_static_entries());
    }
}
