//! Human readable renderings of palettes and device info, styled for the
//! terminal. Colors are printed the way the CLI accepts them, as `#RRGGBB`.

use console::style;
use syspal::{
    extract, CollapseBehavior, ColorTable, DevicePaletteInfo, IdentityPalette, StaticPolicy,
};

const SLOTS_PER_ROW: usize = 4;

pub fn device_info(info: &DevicePaletteInfo) -> String {
    let policy = match info.static_policy {
        StaticPolicy::AllStatic => "all static (only black and white reserved)",
        StaticPolicy::PartialStatic => "partial static",
    };

    let mut output = String::new();
    output.push_str(&format!(
        "{:<20}{}\n",
        "Palette hardware:",
        if info.supports_palette {
            style("yes").green()
        } else {
            style("no").red()
        }
    ));
    output.push_str(&format!("{:<20}{}\n", "Hardware slots:", info.slot_count));
    output.push_str(&format!(
        "{:<20}{}\n",
        "Static colors:", info.static_color_count
    ));
    output.push_str(&format!("{:<20}{}\n", "System palette use:", policy));
    output
}

pub fn table(table: &ColorTable) -> String {
    slots(table, |_| false)
}

/// Like [`table`], but slots the system keeps for itself are dimmed
pub fn identity(palette: &IdentityPalette) -> String {
    let mut output = slots(palette.table(), |slot| palette.is_protected(slot));
    output.push_str(&format!(
        "{} slots reserved by the system, {} free\n",
        palette.protected_count(),
        palette.free_count()
    ));
    output
}

pub fn changed_slots(changed: u32) -> String {
    format!(
        "{} {}\n",
        style(changed).cyan(),
        style("hardware palette entries changed").dim()
    )
}

fn slots<F: Fn(usize) -> bool>(table: &ColorTable, is_protected: F) -> String {
    let colors = extract(table);
    let mut output = String::new();

    for (slot, (color, entry)) in colors.iter().zip(table.iter()).enumerate() {
        let hex = format!("#{:06X}", color.to_rgb24());
        let marker = match entry.flag {
            CollapseBehavior::Normal => ' ',
            CollapseBehavior::NoCollapse => '*',
        };

        let cell = if is_protected(slot) {
            style(hex).dim()
        } else if entry.flag == CollapseBehavior::NoCollapse {
            style(hex).green()
        } else {
            style(hex)
        };

        output.push_str(&format!("{:>3}: {}{}", slot, cell, marker));

        if (slot + 1) % SLOTS_PER_ROW == 0 || slot + 1 == colors.len() {
            output.push('\n');
        } else {
            output.push_str("   ");
        }
    }

    output.push_str(&format!(
        "{} entries, {} marks NoCollapse\n",
        table.len(),
        style("*").green()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use syspal::{build, reconcile, spectrum, PaletteEntry, RgbQuad};

    #[test]
    fn one_row_per_four_slots() {
        let output = table(&spectrum());

        // 64 rows plus the summary line
        assert_eq!(output.lines().count(), 65);
        assert!(output.contains("#000000"));
        assert!(output.contains("#E0E0C0"));
        assert!(output.contains("256 entries"));
    }

    #[test]
    fn short_tables_end_their_last_row() {
        let colors = [RgbQuad::new(255, 0, 0), RgbQuad::new(0, 0, 255)];
        let output = table(&build(&colors).unwrap());

        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("#FF0000"));
        assert!(output.contains("#0000FF"));
    }

    #[test]
    fn identity_summary_counts_protected_slots() {
        let info = DevicePaletteInfo {
            supports_palette: true,
            slot_count: 256,
            static_color_count: 20,
            static_policy: StaticPolicy::PartialStatic,
        };
        let system = vec![PaletteEntry::WHITE; 256];
        let palette = reconcile(&[RgbQuad::new(1, 2, 3); 256], &info, &system).unwrap();

        let output = identity(&palette);

        assert!(output.contains("20 slots reserved by the system, 236 free"));
        assert!(output.contains("#010203"));
        assert!(output.contains("#FFFFFF"));
    }

    #[test]
    fn device_info_lists_all_values() {
        let info = DevicePaletteInfo {
            supports_palette: false,
            slot_count: 0,
            static_color_count: -1,
            static_policy: StaticPolicy::PartialStatic,
        };
        let output = device_info(&info);

        assert!(output.contains("-1"));
        assert!(output.contains("partial static"));
        assert_eq!(output.lines().count(), 4);
    }
}
