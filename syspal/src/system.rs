//! Palette operations that need a live device. Each of them opens its own
//! [`ScreenContext`] and closes it again before returning.

use super::device::{DevicePaletteInfo, PaletteDevice, ScreenContext, StaticPolicy};
use super::entry::RgbQuad;
use super::error::{DeviceUnavailable, PaletteError};
use super::identity::{reconcile, IdentityPalette};
use super::table::{ColorTable, MAX_PALETTE_SIZE};

pub fn device_palette_info<D: PaletteDevice>(
    device: &D,
) -> Result<DevicePaletteInfo, PaletteError> {
    ScreenContext::open(device)?.palette_info()
}

/// Returns a copy of the palette currently realized in hardware. The caller owns
/// the result; nothing is cached between calls.
pub fn system_palette<D: PaletteDevice>(device: &D) -> Result<ColorTable, PaletteError> {
    let context = ScreenContext::open(device)?;

    if !context.supports_palette() {
        log::warn!("Device has no palette hardware, there is no system palette to read");
        return Err(DeviceUnavailable::NoPaletteHardware.into());
    }

    let n_colors = context.palette_entries_on_device();
    if n_colors <= 0 || n_colors as usize > MAX_PALETTE_SIZE {
        return Err(PaletteError::OutOfRange(n_colors.max(0) as usize));
    }

    ColorTable::from_entries(context.system_entries(n_colors as usize)?)
}

/// Builds an identity palette for `requested` that respects the static colors
/// the device currently reserves. See [`reconcile`] for the slot layout.
pub fn identity_palette<D: PaletteDevice>(
    device: &D,
    requested: &[RgbQuad],
) -> Result<IdentityPalette, PaletteError> {
    if requested.len() > MAX_PALETTE_SIZE {
        return Err(PaletteError::OutOfRange(requested.len()));
    }

    let (info, system_entries) = {
        let context = ScreenContext::open(device)?;
        let info = context.palette_info()?;

        // Direct-color devices have no hardware table to read from
        let system_entries = match info.static_policy {
            StaticPolicy::PartialStatic if info.supports_palette => {
                context.system_entries(MAX_PALETTE_SIZE)?
            }
            _ => Vec::new(),
        };

        (info, system_entries)
    };

    reconcile(requested, &info, &system_entries)
}

/// Creates a palette object from `table`, realizes it in hardware, then
/// restores the previous palette and releases ours again. Returns the number of
/// hardware entries that changed.
pub fn apply_palette<D: PaletteDevice>(
    device: &D,
    table: &ColorTable,
) -> Result<u32, PaletteError> {
    let context = ScreenContext::open(device)?;
    let palette = context.realize(table)?;
    let changed = context.select_and_realize(&palette)?;

    log::debug!(
        "Realized palette of {} entries, {} hardware entries changed",
        table.len(),
        changed
    );

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{default_static_entries, VirtualDisplay};
    use crate::entry::{CollapseBehavior, PaletteEntry};

    #[test]
    fn reads_device_info() {
        let display = VirtualDisplay::palette_display();
        let info = device_palette_info(&display).unwrap();

        assert!(info.supports_palette);
        assert_eq!(info.slot_count, 256);
        assert_eq!(info.static_color_count, 20);
        assert_eq!(info.static_policy, StaticPolicy::PartialStatic);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn system_palette_is_a_snapshot() {
        let display = VirtualDisplay::palette_display();
        let mut first = system_palette(&display).unwrap();

        assert_eq!(first.entries(), &default_static_entries()[..]);

        first[100] = PaletteEntry::WHITE;
        let second = system_palette(&display).unwrap();

        assert_eq!(second[100], PaletteEntry::BLACK);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn system_palette_needs_palette_hardware() {
        let display = VirtualDisplay::direct_color_display();

        assert_eq!(
            system_palette(&display),
            Err(PaletteError::DeviceUnavailable(
                DeviceUnavailable::NoPaletteHardware
            ))
        );
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn unavailable_display_fails_without_leaking() {
        let display = VirtualDisplay::unavailable();
        let no_context = PaletteError::DeviceUnavailable(DeviceUnavailable::NoContext);

        assert_eq!(system_palette(&display).unwrap_err(), no_context);
        assert_eq!(device_palette_info(&display).unwrap_err(), no_context);
        assert_eq!(identity_palette(&display, &[]).unwrap_err(), no_context);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn identity_palette_uses_current_static_colors() {
        let mut hardware = default_static_entries();
        hardware[3] = PaletteEntry::new(9, 9, 9, CollapseBehavior::Normal);
        let display = VirtualDisplay::palette_display().with_hardware_entries(hardware);

        let requested = vec![RgbQuad::new(50, 60, 70); 256];
        let palette = identity_palette(&display, &requested).unwrap();

        assert_eq!(palette.table()[3], PaletteEntry::new(9, 9, 9, CollapseBehavior::Normal));
        assert_eq!(
            palette.table()[10],
            PaletteEntry::new(50, 60, 70, CollapseBehavior::NoCollapse)
        );
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn identity_palette_on_no_static_display() {
        let display = VirtualDisplay::no_static_display();
        let requested = vec![RgbQuad::new(50, 60, 70); 256];
        let palette = identity_palette(&display, &requested).unwrap();

        assert_eq!(palette.table()[0], PaletteEntry::BLACK);
        assert_eq!(palette.table()[255], PaletteEntry::WHITE);
        assert_eq!(palette.free_count(), 254);
    }

    #[test]
    fn identity_palette_rejects_oversized_request_before_opening_a_context() {
        let display = VirtualDisplay::unavailable();
        let requested = vec![RgbQuad::default(); 300];

        assert_eq!(
            identity_palette(&display, &requested).unwrap_err(),
            PaletteError::OutOfRange(300)
        );
    }

    #[test]
    fn failed_palette_reads_are_reported() {
        let display = VirtualDisplay::palette_display().with_failing_reads();
        let query_failed = PaletteError::DeviceUnavailable(DeviceUnavailable::QueryFailed);
        let requested = vec![RgbQuad::new(50, 60, 70); 256];

        assert_eq!(device_palette_info(&display).unwrap_err(), query_failed);
        assert_eq!(system_palette(&display).unwrap_err(), query_failed);
        assert_eq!(identity_palette(&display, &requested).unwrap_err(), query_failed);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn identity_palette_on_direct_color_display_protects_nothing() {
        let display = VirtualDisplay::direct_color_display();
        let requested = vec![RgbQuad::new(50, 60, 70); 256];
        let palette = identity_palette(&display, &requested).unwrap();

        assert_eq!(palette.protected_count(), 0);
        assert_eq!(
            palette.table()[0],
            PaletteEntry::new(50, 60, 70, CollapseBehavior::NoCollapse)
        );
    }

    #[test]
    fn failed_realization_is_not_reported_as_no_change() {
        let display = VirtualDisplay::palette_display().with_failing_realization();
        let table = ColorTable::filled(256, PaletteEntry::WHITE).unwrap();

        assert_eq!(
            apply_palette(&display, &table),
            Err(PaletteError::DeviceUnavailable(
                DeviceUnavailable::RealizeFailed
            ))
        );
        assert_eq!(display.hardware_entries(), default_static_entries());
        assert_eq!(display.live_palettes(), 0);
        assert_eq!(display.open_contexts(), 0);
    }

    #[test]
    fn applied_identity_palette_maps_one_to_one() {
        let display = VirtualDisplay::palette_display();
        let requested = (0..=255u8)
            .map(|i| RgbQuad::new(i, i, 0))
            .collect::<Vec<_>>();

        let palette = identity_palette(&display, &requested).unwrap();
        apply_palette(&display, palette.table()).unwrap();

        let hardware = display.hardware_entries();
        for slot in 10..246 {
            assert!(hardware[slot].same_color(&palette.table()[slot]));
        }
        assert_eq!(display.live_palettes(), 0);
        assert_eq!(display.open_contexts(), 0);
    }
}
