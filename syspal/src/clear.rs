//! Resetting the hardware palette. Palette-managed programs that ran before us
//! may leave entries behind that break the identity mapping of our own palette,
//! so it is a good idea to clear the system palette before realizing one.

use super::device::PaletteDevice;
use super::entry::{CollapseBehavior, PaletteEntry};
use super::error::PaletteError;
use super::system::apply_palette;
use super::table::{ColorTable, MAX_PALETTE_SIZE};

/// 256 black entries, none of which may collapse
pub fn clear_table() -> ColorTable {
    ColorTable(vec![
        PaletteEntry::BLACK.with_flag(CollapseBehavior::NoCollapse);
        MAX_PALETTE_SIZE
    ])
}

/// Realizes [`clear_table`] on `device`, which forces every free hardware slot
/// to black. Returns the number of hardware entries that changed.
pub fn clear_system_palette<D: PaletteDevice>(device: &D) -> Result<u32, PaletteError> {
    log::info!("Clearing system palette");
    apply_palette(device, &clear_table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{default_static_entries, VirtualDisplay};
    use crate::error::DeviceUnavailable;
    use crate::spectrum::spectrum;

    #[test]
    fn clear_table_is_black_and_nocollapse() {
        let table = clear_table();

        assert_eq!(table.len(), 256);
        for entry in &table {
            assert!(entry.same_color(&PaletteEntry::BLACK));
            assert_eq!(entry.flag, CollapseBehavior::NoCollapse);
        }
    }

    #[test]
    fn clearing_removes_leftovers_of_other_palettes() {
        let display = VirtualDisplay::palette_display();
        apply_palette(&display, &spectrum()).unwrap();
        assert_ne!(display.hardware_entries(), default_static_entries());

        let changed = clear_system_palette(&display).unwrap();

        assert!(changed > 0);
        assert_eq!(display.hardware_entries(), default_static_entries());
        assert_eq!(display.live_palettes(), 0);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn clearing_twice_changes_nothing() {
        let display = VirtualDisplay::palette_display();
        clear_system_palette(&display).unwrap();

        assert_eq!(clear_system_palette(&display), Ok(0));
    }

    #[test]
    fn clearing_reports_failed_realization() {
        let display = VirtualDisplay::palette_display().with_failing_realization();

        assert_eq!(
            clear_system_palette(&display),
            Err(PaletteError::DeviceUnavailable(
                DeviceUnavailable::RealizeFailed
            ))
        );
        assert_eq!(display.live_palettes(), 0);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn clearing_without_display_is_not_applicable() {
        let display = VirtualDisplay::unavailable();

        assert_eq!(
            clear_system_palette(&display),
            Err(PaletteError::DeviceUnavailable(DeviceUnavailable::NoContext))
        );
    }
}
