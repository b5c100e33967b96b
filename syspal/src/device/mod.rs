//! The boundary to the host graphics subsystem. Everything that actually talks
//! to a display goes through [`PaletteDevice`], which keeps the palette
//! algorithms testable without a screen. [`ScreenContext`] and
//! [`RealizedPalette`] make sure that every acquired context and every created
//! palette object is handed back to the device exactly once.

mod context;
mod virtual_display;

use super::entry::PaletteEntry;
use super::table::ColorTable;
use bitflags::bitflags;
use num_enum::IntoPrimitive;

pub use context::{RealizedPalette, ScreenContext};
pub use virtual_display::{default_static_entries, VirtualContext, VirtualDisplay, VirtualPalette};

/// Device capabilities we need to query. The discriminants are the indices
/// GDI's `GetDeviceCaps` uses for them.
#[derive(IntoPrimitive, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum Capability {
    /// Number of entries in the hardware palette (0 if there is none)
    SlotCount = 104,
    /// Number of colors reserved by the system, or -1 on direct-color devices
    StaticColorCount = 24,
    /// Bitmask of [`RasterCaps`]
    RasterCaps = 38,
}

bitflags! {
    pub struct RasterCaps: u32 {
        const BITBLT = 0x0001;
        const BANDING = 0x0002;
        const SCALING = 0x0004;
        const BITMAP64 = 0x0008;
        const DI_BITMAP = 0x0080;
        /// The device uses a hardware color lookup table
        const PALETTE = 0x0100;
        const DIBTODEV = 0x0200;
        const STRETCHBLT = 0x0800;
    }
}

/// How much of the hardware palette the system keeps for itself
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StaticPolicy {
    /// Only black (slot 0) and white (slot 255) are kept by convention
    AllStatic,
    /// The system keeps [`DevicePaletteInfo::static_color_count`] colors, split
    /// between both ends of the table
    PartialStatic,
}

/// Snapshot of the palette-related capabilities of a device
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DevicePaletteInfo {
    pub supports_palette: bool,
    pub slot_count: i32,
    pub static_color_count: i32,
    pub static_policy: StaticPolicy,
}

/// A display that may or may not have palette hardware. Implementors are thin
/// pass-throughs to the graphics driver; no palette logic belongs here.
///
/// Prefer [`ScreenContext::open`] over calling these methods directly, since it
/// takes care of closing the context again.
pub trait PaletteDevice {
    /// A handle that queries and realizations are made against
    type Context;
    /// A palette object created on the device
    type Palette;

    fn open_context(&self) -> Option<Self::Context>;

    /// Must be called exactly once per successful [`PaletteDevice::open_context`]
    fn close_context(&self, context: Self::Context);

    fn capability(&self, context: &Self::Context, cap: Capability) -> i32;

    /// `None` if the device doesn't say how it uses the system palette
    fn static_policy(&self, context: &Self::Context) -> Option<StaticPolicy>;

    /// Reads the first `count` entries of the hardware table. `None` unless all
    /// `count` of them could be read.
    fn system_entries(&self, context: &Self::Context, count: usize) -> Option<Vec<PaletteEntry>>;

    /// Creates a palette object from `table`
    fn realize(&self, context: &Self::Context, table: &ColorTable) -> Option<Self::Palette>;

    /// Selects `palette` into the context, maps it onto the hardware table and
    /// restores the previously selected palette. Returns the number of entries
    /// that changed in the hardware table, or `None` if selecting or realizing
    /// failed.
    fn select_and_realize(&self, context: &Self::Context, palette: &Self::Palette) -> Option<u32>;

    fn release(&self, palette: Self::Palette);
}
