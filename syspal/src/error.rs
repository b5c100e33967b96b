//! Error types shared by every palette operation

/// Why a device-dependent operation could not be carried out. Callers should
/// treat all of these as "not applicable on this display" rather than as bugs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceUnavailable {
    /// No display context could be acquired
    NoContext,
    /// The display does not use a hardware color lookup table
    NoPaletteHardware,
    /// The device refused to create, select or realize a palette object
    RealizeFailed,
    /// The device didn't answer a query about its palette
    QueryFailed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// Backing storage for a color table could not be reserved
    Allocation,

    /// The source table is absent (has no entries)
    InvalidHandle,

    /// The number of colors doesn't fit into a hardware table.
    /// Contains the offending count.
    OutOfRange(usize),

    DeviceUnavailable(DeviceUnavailable),
}

impl From<DeviceUnavailable> for PaletteError {
    fn from(reason: DeviceUnavailable) -> Self {
        PaletteError::DeviceUnavailable(reason)
    }
}
