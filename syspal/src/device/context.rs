use super::{Capability, DevicePaletteInfo, PaletteDevice, RasterCaps, StaticPolicy};
use crate::entry::PaletteEntry;
use crate::error::{DeviceUnavailable, PaletteError};
use crate::table::ColorTable;
use std::mem::ManuallyDrop;

/// An open display context. The context is closed when this is dropped, no
/// matter which path the surrounding code takes.
pub struct ScreenContext<'d, D: PaletteDevice> {
    device: &'d D,
    /// Only taken out in `drop`
    context: ManuallyDrop<D::Context>,
}

impl<'d, D: PaletteDevice> ScreenContext<'d, D> {
    pub fn open(device: &'d D) -> Result<ScreenContext<'d, D>, PaletteError> {
        match device.open_context() {
            Some(context) => Ok(ScreenContext {
                device,
                context: ManuallyDrop::new(context),
            }),
            None => {
                log::warn!("Could not acquire a display context");
                Err(DeviceUnavailable::NoContext.into())
            }
        }
    }

    pub fn capability(&self, cap: Capability) -> i32 {
        self.device.capability(&self.context, cap)
    }

    pub fn raster_caps(&self) -> RasterCaps {
        RasterCaps::from_bits_truncate(self.capability(Capability::RasterCaps) as u32)
    }

    pub fn supports_palette(&self) -> bool {
        self.raster_caps().contains(RasterCaps::PALETTE)
    }

    pub fn static_policy(&self) -> Result<StaticPolicy, PaletteError> {
        self.device.static_policy(&self.context).ok_or_else(|| {
            log::warn!("Device did not report how it uses the system palette");
            DeviceUnavailable::QueryFailed.into()
        })
    }

    /// Size of the hardware palette. Devices without one report their number of
    /// static colors instead.
    pub fn palette_entries_on_device(&self) -> i32 {
        match self.capability(Capability::SlotCount) {
            0 => self.capability(Capability::StaticColorCount),
            n => n,
        }
    }

    pub fn palette_info(&self) -> Result<DevicePaletteInfo, PaletteError> {
        Ok(DevicePaletteInfo {
            supports_palette: self.supports_palette(),
            slot_count: self.capability(Capability::SlotCount),
            static_color_count: self.capability(Capability::StaticColorCount),
            static_policy: self.static_policy()?,
        })
    }

    /// Fails unless the device provides all `count` entries
    pub fn system_entries(&self, count: usize) -> Result<Vec<PaletteEntry>, PaletteError> {
        self.device
            .system_entries(&self.context, count)
            .ok_or_else(|| {
                log::warn!("Could not read {} system palette entries", count);
                DeviceUnavailable::QueryFailed.into()
            })
    }

    pub fn realize(&self, table: &ColorTable) -> Result<RealizedPalette<'d, D>, PaletteError> {
        match self.device.realize(&self.context, table) {
            Some(palette) => Ok(RealizedPalette {
                device: self.device,
                palette: ManuallyDrop::new(palette),
            }),
            None => {
                log::warn!("Device refused to create a palette of {} entries", table.len());
                Err(DeviceUnavailable::RealizeFailed.into())
            }
        }
    }

    pub fn select_and_realize(
        &self,
        palette: &RealizedPalette<'d, D>,
    ) -> Result<u32, PaletteError> {
        self.device
            .select_and_realize(&self.context, &palette.palette)
            .ok_or_else(|| {
                log::warn!("Device failed to realize the selected palette");
                DeviceUnavailable::RealizeFailed.into()
            })
    }
}

impl<D: PaletteDevice> Drop for ScreenContext<'_, D> {
    fn drop(&mut self) {
        // Safe since self.context is never touched again after this
        let context = unsafe { ManuallyDrop::take(&mut self.context) };
        self.device.close_context(context);
    }
}

/// A palette object living on a device. Released when dropped.
pub struct RealizedPalette<'d, D: PaletteDevice> {
    device: &'d D,
    palette: ManuallyDrop<D::Palette>,
}

impl<D: PaletteDevice> Drop for RealizedPalette<'_, D> {
    fn drop(&mut self) {
        // Safe since self.palette is never touched again after this
        let palette = unsafe { ManuallyDrop::take(&mut self.palette) };
        self.device.release(palette);
    }
}
