//! Frontend of syspal: the GDI implementation of [`syspal::PaletteDevice`] and
//! the commands of the `syspal-cli` binary.

mod command;
mod dump;
#[cfg(windows)]
mod gdi;
#[cfg(windows)]
mod gdi_error;

pub use command::{Command, CommandError, USAGE};
#[cfg(windows)]
pub use gdi::{GdiDisplay, GdiPalette, ScreenDc};
#[cfg(windows)]
pub use gdi_error::GdiError;
