//! [`PaletteDevice`] implementation on top of the Win32 GDI. All palette logic
//! lives in `syspal`; this file only translates between its types and the
//! GDI structures.

use super::gdi_error::{GdiError, IntoGdiResult};
use std::ptr;
use syspal::{Capability, ColorTable, PaletteDevice, PaletteEntry, StaticPolicy, MAX_PALETTE_SIZE};
use winapi::shared::minwindef::{FALSE, WORD};
use winapi::shared::windef::{HDC, HPALETTE};
use winapi::um::wingdi::{
    CreatePalette, DeleteObject, GetDeviceCaps, GetSystemPaletteEntries, GetSystemPaletteUse,
    RealizePalette, SelectPalette, GDI_ERROR, LOGPALETTE, PALETTEENTRY, SYSPAL_ERROR,
    SYSPAL_NOSTATIC,
};
use winapi::um::winuser::{GetDC, ReleaseDC};

/// Version tag GDI expects in every logical palette header
const PALETTE_VERSION: WORD = 0x300;

/// `LOGPALETTE` with room for a full hardware table. GDI declares the entry
/// array with a single element and expects callers to allocate more.
#[repr(C)]
struct LogPalette {
    version: WORD,
    num_entries: WORD,
    entries: [PALETTEENTRY; MAX_PALETTE_SIZE],
}

impl LogPalette {
    fn from_table(table: &ColorTable) -> LogPalette {
        let mut log_palette = LogPalette {
            version: PALETTE_VERSION,
            num_entries: table.len() as WORD,
            entries: [PALETTEENTRY {
                peRed: 0,
                peGreen: 0,
                peBlue: 0,
                peFlags: 0,
            }; MAX_PALETTE_SIZE],
        };

        for (raw, entry) in log_palette.entries.iter_mut().zip(table.iter()) {
            let [red, green, blue, flags] = entry.to_bytes();
            raw.peRed = red;
            raw.peGreen = green;
            raw.peBlue = blue;
            raw.peFlags = flags;
        }

        log_palette
    }
}

/// The screen, accessed through the device context of the desktop
pub struct GdiDisplay;

pub struct ScreenDc(HDC);

/// A GDI palette object. Deleted when released by the device.
pub struct GdiPalette(HPALETTE);

impl PaletteDevice for GdiDisplay {
    type Context = ScreenDc;
    type Palette = GdiPalette;

    fn open_context(&self) -> Option<ScreenDc> {
        unsafe { GetDC(ptr::null_mut()) }
            .into_gdi_result("GetDC")
            .map(ScreenDc)
            .map_err(|err| log::warn!("{:?}", err))
            .ok()
    }

    fn close_context(&self, context: ScreenDc) {
        if unsafe { ReleaseDC(ptr::null_mut(), context.0) } == 0 {
            log::warn!("{:?}", GdiError::last("ReleaseDC"));
        }
    }

    fn capability(&self, context: &ScreenDc, cap: Capability) -> i32 {
        unsafe { GetDeviceCaps(context.0, cap.into()) }
    }

    fn static_policy(&self, context: &ScreenDc) -> Option<StaticPolicy> {
        // SYSPAL_NOSTATIC256 keeps black and white as well, but is
        // treated like SYSPAL_STATIC here
        match unsafe { GetSystemPaletteUse(context.0) } {
            SYSPAL_ERROR => {
                log::warn!("{:?}", GdiError::last("GetSystemPaletteUse"));
                None
            }
            SYSPAL_NOSTATIC => Some(StaticPolicy::AllStatic),
            _ => Some(StaticPolicy::PartialStatic),
        }
    }

    fn system_entries(&self, context: &ScreenDc, count: usize) -> Option<Vec<PaletteEntry>> {
        let empty = PALETTEENTRY {
            peRed: 0,
            peGreen: 0,
            peBlue: 0,
            peFlags: 0,
        };
        let mut raw = vec![empty; count];

        let copied = unsafe {
            GetSystemPaletteEntries(context.0, 0, count as u32, raw.as_mut_ptr())
        };
        if copied as usize != count {
            log::warn!(
                "Read {} of {} system palette entries: {:?}",
                copied,
                count,
                GdiError::last("GetSystemPaletteEntries")
            );
            return None;
        }

        Some(
            raw.iter()
                .map(|e| PaletteEntry::from_bytes([e.peRed, e.peGreen, e.peBlue, e.peFlags]))
                .collect(),
        )
    }

    fn realize(&self, _context: &ScreenDc, table: &ColorTable) -> Option<GdiPalette> {
        let log_palette = LogPalette::from_table(table);

        unsafe { CreatePalette(&log_palette as *const LogPalette as *const LOGPALETTE) }
            .into_gdi_result("CreatePalette")
            .map(GdiPalette)
            .map_err(|err| log::warn!("{:?}", err))
            .ok()
    }

    fn select_and_realize(&self, context: &ScreenDc, palette: &GdiPalette) -> Option<u32> {
        unsafe {
            let previous = match SelectPalette(context.0, palette.0, FALSE)
                .into_gdi_result("SelectPalette")
            {
                Ok(previous) => previous,
                Err(err) => {
                    log::warn!("{:?}", err);
                    return None;
                }
            };

            let changed = RealizePalette(context.0);
            let realize_error = if changed == GDI_ERROR {
                Some(GdiError::last("RealizePalette"))
            } else {
                None
            };

            SelectPalette(context.0, previous, FALSE);

            match realize_error {
                Some(err) => {
                    log::warn!("{:?}", err);
                    None
                }
                None => Some(changed),
            }
        }
    }

    fn release(&self, palette: GdiPalette) {
        if unsafe { DeleteObject(palette.0 as _) } == 0 {
            log::warn!("{:?}", GdiError::last("DeleteObject"));
        }
    }
}
