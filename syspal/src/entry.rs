//! The two color representations this crate deals with: [`PaletteEntry`], the
//! slot of a logical palette, and [`RgbQuad`], the color-table entry of a
//! device-independent bitmap. They store their channels in different orders.

use bitflags::bitflags;
use num_enum::IntoPrimitive;

/// Tells the realization step how it may treat an entry when mapping the
/// logical palette onto the shared hardware table.
#[derive(IntoPrimitive, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum CollapseBehavior {
    /// The entry may be matched to an identical color that is already present
    Normal = 0x00,
    /// The entry always gets a hardware slot of its own
    NoCollapse = 0x04,
}

impl Default for CollapseBehavior {
    fn default() -> Self {
        CollapseBehavior::Normal
    }
}

impl CollapseBehavior {
    /// Interprets a raw flag byte as reported by a device. Bits other than
    /// NOCOLLAPSE are ignored, since we never animate palettes.
    pub fn from_raw_flags(raw: u8) -> CollapseBehavior {
        let flags = EntryFlags::from_bits_truncate(raw);

        if flags.contains(EntryFlags::NOCOLLAPSE) {
            CollapseBehavior::NoCollapse
        } else {
            CollapseBehavior::Normal
        }
    }
}

bitflags! {
    /// Raw per-entry flag bits of a hardware palette entry
    pub struct EntryFlags: u8 {
        const RESERVED = 0b_0000_0001;
        const EXPLICIT = 0b_0000_0010;
        const NOCOLLAPSE = 0b_0000_0100;
    }
}

/// One slot of a logical palette. The memory layout matches what palette
/// hardware expects: red, green, blue, flags.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub flag: CollapseBehavior,
}

impl PaletteEntry {
    pub const BLACK: PaletteEntry = PaletteEntry::new(0, 0, 0, CollapseBehavior::Normal);
    pub const WHITE: PaletteEntry = PaletteEntry::new(255, 255, 255, CollapseBehavior::Normal);

    pub const fn new(red: u8, green: u8, blue: u8, flag: CollapseBehavior) -> PaletteEntry {
        PaletteEntry {
            red,
            green,
            blue,
            flag,
        }
    }

    /// Builds an entry from the raw `[red, green, blue, flags]` bytes of a device
    pub fn from_bytes(bytes: [u8; 4]) -> PaletteEntry {
        PaletteEntry::new(
            bytes[0],
            bytes[1],
            bytes[2],
            CollapseBehavior::from_raw_flags(bytes[3]),
        )
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.flag.into()]
    }

    #[must_use]
    pub fn with_flag(self, flag: CollapseBehavior) -> PaletteEntry {
        PaletteEntry { flag, ..self }
    }

    /// Replaces the color channels, keeping the flag
    pub fn set_color(&mut self, color: RgbQuad) {
        self.red = color.red;
        self.green = color.green;
        self.blue = color.blue;
    }

    pub fn same_color(&self, other: &PaletteEntry) -> bool {
        self.red == other.red && self.green == other.green && self.blue == other.blue
    }
}

/// A color as it is stored in the color table of a device-independent bitmap:
/// blue first, then green, then red, followed by an unused byte.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct RgbQuad {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl RgbQuad {
    pub const fn new(red: u8, green: u8, blue: u8) -> RgbQuad {
        RgbQuad {
            blue,
            green,
            red,
            reserved: 0,
        }
    }

    /// Creates a color from a `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_rgb24(rgb: u32) -> RgbQuad {
        RgbQuad::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn to_rgb24(self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    /// Reads four bytes in color-table order (blue, green, red, reserved)
    pub fn from_bytes(bytes: [u8; 4]) -> RgbQuad {
        RgbQuad {
            blue: bytes[0],
            green: bytes[1],
            red: bytes[2],
            reserved: bytes[3],
        }
    }

    /// Exchanges the red and blue channel and clears the reserved byte
    #[must_use]
    pub fn swap_red_blue(self) -> RgbQuad {
        RgbQuad {
            blue: self.red,
            green: self.green,
            red: self.blue,
            reserved: 0,
        }
    }
}

impl From<PaletteEntry> for RgbQuad {
    fn from(entry: PaletteEntry) -> Self {
        RgbQuad::new(entry.red, entry.green, entry.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_flags_with_nocollapse_bit_are_nocollapse() {
        assert_eq!(
            CollapseBehavior::from_raw_flags(0x04),
            CollapseBehavior::NoCollapse
        );
        assert_eq!(
            CollapseBehavior::from_raw_flags(0x05),
            CollapseBehavior::NoCollapse
        );
    }

    #[test]
    fn raw_flags_without_nocollapse_bit_are_normal() {
        assert_eq!(CollapseBehavior::from_raw_flags(0x00), CollapseBehavior::Normal);
        assert_eq!(CollapseBehavior::from_raw_flags(0x01), CollapseBehavior::Normal);
        assert_eq!(CollapseBehavior::from_raw_flags(0x80), CollapseBehavior::Normal);
    }

    #[test]
    fn animation_flags_are_ignored() {
        let animated = EntryFlags::RESERVED | EntryFlags::EXPLICIT;

        assert_eq!(
            CollapseBehavior::from_raw_flags(animated.bits()),
            CollapseBehavior::Normal
        );
        assert_eq!(
            CollapseBehavior::from_raw_flags((animated | EntryFlags::NOCOLLAPSE).bits()),
            CollapseBehavior::NoCollapse
        );
    }

    #[test]
    fn entry_bytes_are_rgb_then_flags() {
        let entry = PaletteEntry::new(1, 2, 3, CollapseBehavior::NoCollapse);
        assert_eq!(entry.to_bytes(), [1, 2, 3, 0x04]);
        assert_eq!(PaletteEntry::from_bytes([1, 2, 3, 0x04]), entry);
    }

    #[test]
    fn quad_bytes_are_bgr_then_reserved() {
        let quad = RgbQuad::from_bytes([10, 20, 30, 40]);
        assert_eq!(quad.blue, 10);
        assert_eq!(quad.green, 20);
        assert_eq!(quad.red, 30);
        assert_eq!(quad.reserved, 40);
    }

    #[test]
    fn rgb24_conversion() {
        let quad = RgbQuad::from_rgb24(0x12_34_56);
        assert_eq!(quad, RgbQuad::new(0x12, 0x34, 0x56));
        assert_eq!(quad.to_rgb24(), 0x12_34_56);
    }
}
