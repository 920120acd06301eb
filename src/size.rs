/// Binary unit prefixes, smallest first. Anything past "Zi" is reported as "Yi".
const PREFIXES: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count as a human-readable binary-unit string
///
/// Plain byte counts are right-aligned to four columns ("   0 B"),
/// larger values carry one decimal ("1.5 KiB").
pub fn format_size(bytes: u128) -> String {
    format_size_with_suffix(bytes, "B")
}

/// Same as [`format_size`] with a custom unit suffix
#[allow(clippy::cast_precision_loss)]
pub fn format_size_with_suffix(bytes: u128, suffix: &str) -> String {
    if bytes < 1024 {
        return format!("{bytes:4} {suffix}");
    }

    let mut num = bytes as f64 / 1024.0;
    for prefix in &PREFIXES[1..] {
        if num.round() < 1024.0 {
            return format!("{num:3.1} {prefix}{suffix}");
        }
        num /= 1024.0;
    }

    format!("{num:.1} Yi{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_padded_to_four_columns() {
        assert_eq!(format_size(0), "   0 B");
    }

    #[test]
    fn plain_bytes_have_no_decimals() {
        assert_eq!(format_size(1), "   1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn kibibytes_have_one_decimal() {
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(2048), "2.0 KiB");
    }

    #[test]
    fn larger_units() {
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
        assert_eq!(format_size(3 * 1024u128.pow(3) / 2), "1.5 GiB");
        assert_eq!(format_size(1024u128.pow(7)), "1.0 ZiB");
    }

    #[test]
    fn values_that_round_up_move_to_next_unit() {
        // 1023.9 KiB rounds to 1024, so it is shown as MiB
        assert_eq!(format_size(1_048_474), "1.0 MiB");
    }

    #[test]
    fn beyond_zebibytes_falls_through_to_yobibytes() {
        assert_eq!(format_size(1024u128.pow(8)), "1.0 YiB");
        assert_eq!(format_size(2048 * 1024u128.pow(8)), "2048.0 YiB");
    }

    #[test]
    fn custom_suffix() {
        assert_eq!(format_size_with_suffix(1024, "B/s"), "1.0 KiB/s");
        assert_eq!(format_size_with_suffix(12, "b"), "  12 b");
    }
}
