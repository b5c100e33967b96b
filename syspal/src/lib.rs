//! syspal is the platform-agnostic core of a palette manager for displays with
//! a hardware color lookup table of up to 256 entries. It doesn't talk to any
//! graphics driver itself. Instead, the frontend provides an implementation of
//! [`PaletteDevice`] (see `syspal-windows` for one on top of GDI), and all
//! algorithms work on plain [`ColorTable`] values.
//!
//! What you get:
//! - [`build`] / [`extract`] to go from bitmap color tables to palettes and back
//! - [`spectrum`] for a general-purpose palette that covers the RGB cube
//! - [`copy_palette`] / [`copy_palette_with_flag`] to duplicate palettes
//! - [`reconcile`] / [`identity_palette`] to lay out an *identity palette*, which
//!   keeps the system's static colors in place so that logical index `i` lands
//!   in hardware slot `i`
//! - [`clear_system_palette`] to get rid of whatever other programs left in the
//!   hardware table
//!
//! The usual sequence to show an 8 bit bitmap without any color remapping:
//!
//! ```
//! use syspal::*;
//!
//! fn main() -> Result<(), PaletteError> {
//!     // In a real frontend, this would be the screen
//!     let display = VirtualDisplay::palette_display();
//!
//!     // Usually the color table of the bitmap
//!     let colors = (0..=255u8)
//!         .map(|i| RgbQuad::new(i, 255 - i, 128))
//!         .collect::<Vec<_>>();
//!
//!     clear_system_palette(&display)?;
//!
//!     let palette = identity_palette(&display, &colors)?;
//!     apply_palette(&display, palette.table())?;
//!
//!     // Slot 10 is the first one that isn't reserved by the system
//!     assert!(display.hardware_entries()[10].same_color(&palette.table()[10]));
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod clear;
mod copy;
pub mod device;
mod entry;
mod error;
mod identity;
mod spectrum;
mod system;
mod table;

pub use builder::{build, extract};
pub use clear::{clear_system_palette, clear_table};
pub use copy::{copy_palette, copy_palette_with_flag};
pub use device::{
    Capability, DevicePaletteInfo, PaletteDevice, RasterCaps, ScreenContext, StaticPolicy,
    VirtualDisplay,
};
pub use entry::{CollapseBehavior, EntryFlags, PaletteEntry, RgbQuad};
pub use error::{DeviceUnavailable, PaletteError};
pub use identity::{reconcile, IdentityPalette};
pub use spectrum::spectrum;
pub use system::{apply_palette, device_palette_info, identity_palette, system_palette};
pub use table::{ColorTable, MAX_PALETTE_SIZE};
