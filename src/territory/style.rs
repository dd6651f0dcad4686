//! Deterministic zone colours.

use crate::config::StyleConfig;

/// Hue in `0..360` derived from the label.
///
/// Runs `h = (h << 5) - h + unit` over the UTF-16 code units, where only the
/// shift wraps to 32 bits, then takes `|h| mod 360`.
pub fn zone_hue(label: &str) -> u32 {
    let mut h: i64 = 0;
    for unit in label.encode_utf16() {
        let shifted = (h as i32).wrapping_shl(5);
        h = i64::from(shifted) - h + i64::from(unit);
    }
    (h.unsigned_abs() % 360) as u32
}

pub fn zone_color(label: &str, style: &StyleConfig) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        zone_hue(label),
        style.saturation,
        style.lightness
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hues() {
        assert_eq!(zone_hue(""), 0);
        assert_eq!(zone_hue("A"), 65);
        // 65 * 31 + 66
        assert_eq!(zone_hue("AB"), 2081 % 360);
    }

    #[test]
    fn test_long_labels_stay_in_range() {
        let label = "PAS Strasbourg Neudorf - Meinau - Neuhof (secteur collège Solignac)";
        let hue = zone_hue(label);
        assert!(hue < 360);
        assert_eq!(hue, zone_hue(label));
    }

    #[test]
    fn test_color_format() {
        let style = StyleConfig::default();
        assert_eq!(zone_color("A", &style), "hsl(65, 65%, 60%)");
        assert_ne!(zone_color("PAS 1", &style), zone_color("PAS 2", &style));
    }
}
