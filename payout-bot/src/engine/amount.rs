//! Fixed-point amount encoding: user-entered decimal text to integer base
//! units at 8 decimal places, and back for display. String-based so no
//! float round-trip can lose precision on the stored value.

/// Base units per whole token (10^8).
pub const UNITS_PER_TOKEN: u64 = 100_000_000;

/// Minimum accepted amount: 1 token.
pub const MIN_BASE_UNITS: u64 = UNITS_PER_TOKEN;

/// Parses decimal text into base units, rounding half-up past the 8th
/// fractional digit. Rejects empty, signed, and non-numeric input.
pub fn parse_base_units(input: &str) -> Option<u64> {
    let s = input.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let int_val: u64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let digits: Vec<u64> = frac_part.bytes().map(|b| (b - b'0') as u64).collect();
    let round_up = digits.len() > 8 && digits[8] >= 5;
    let mut frac_val: u64 = 0;
    for i in 0..8 {
        frac_val = frac_val * 10 + digits.get(i).copied().unwrap_or(0);
    }

    let mut base = int_val
        .checked_mul(UNITS_PER_TOKEN)?
        .checked_add(frac_val)?;
    if round_up {
        base = base.checked_add(1)?;
    }
    Some(base)
}

/// Renders base units as a decimal token amount ("500000000" -> "5").
pub fn format_base_units(units: u64) -> String {
    let whole = units / UNITS_PER_TOKEN;
    let frac = units % UNITS_PER_TOKEN;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac = format!("{frac:08}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

/// Renders a remote base-unit amount (the API returns these as numbers)
/// as a decimal token amount.
pub fn format_remote_amount(amount: f64) -> String {
    let scaled = amount / 1e8;
    let s = format!("{scaled:.8}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts() {
        assert_eq!(parse_base_units("1"), Some(100_000_000));
        assert_eq!(parse_base_units("5"), Some(500_000_000));
        assert_eq!(parse_base_units(" 42 "), Some(4_200_000_000));
    }

    #[test]
    fn fractional_amounts() {
        assert_eq!(parse_base_units("1.5"), Some(150_000_000));
        assert_eq!(parse_base_units("2.25"), Some(225_000_000));
        assert_eq!(parse_base_units("1.00000001"), Some(100_000_001));
        assert_eq!(parse_base_units(".5"), Some(50_000_000));
    }

    #[test]
    fn rounds_half_up_past_eight_places() {
        assert_eq!(parse_base_units("1.000000005"), Some(100_000_001));
        assert_eq!(parse_base_units("1.000000004"), Some(100_000_000));
    }

    #[test]
    fn precision_survives_where_floats_would_not() {
        // 0.1 + 0.2 style inputs encode exactly.
        assert_eq!(parse_base_units("0.3"), Some(30_000_000));
        assert_eq!(parse_base_units("123456789.12345678"),
            Some(12_345_678_912_345_678));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_base_units(""), None);
        assert_eq!(parse_base_units("."), None);
        assert_eq!(parse_base_units("-1"), None);
        assert_eq!(parse_base_units("1.2.3"), None);
        assert_eq!(parse_base_units("abc"), None);
        assert_eq!(parse_base_units("1e8"), None);
    }

    #[test]
    fn format_roundtrip() {
        assert_eq!(format_base_units(500_000_000), "5");
        assert_eq!(format_base_units(150_000_000), "1.5");
        assert_eq!(format_base_units(100_000_001), "1.00000001");
    }

    #[test]
    fn format_remote() {
        assert_eq!(format_remote_amount(500_000_000.0), "5");
        assert_eq!(format_remote_amount(150_000_000.0), "1.5");
        assert_eq!(format_remote_amount(0.0), "0");
    }
}
