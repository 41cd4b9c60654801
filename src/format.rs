//! Human-readable money strings for chart labels and the ranking table.

/// Scale a value to billions / millions / thousands with two decimals,
/// prefixed with `$`.  Thresholds are checked on the absolute value.
pub fn format_dynamic(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("${}B", fixed2(value / 1e9))
    } else if magnitude >= 1e6 {
        format!("${}M", fixed2(value / 1e6))
    } else if magnitude >= 1e3 {
        format!("${}K", fixed2(value / 1e3))
    } else {
        format!("${}", fixed2(value))
    }
}

/// Two decimals; non-finite values spelled `nan`, `inf`, `-inf`.
fn fixed2(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Two decimals with `,` between thousands groups: `1234567.891` →
/// `"1,234,567.89"`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return fixed2(value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Brazilian-style currency: `1234.5` → `"US$ 1.234,50"`.
///
/// Formats with `,` groups and `.` decimals, then swaps the two through a
/// placeholder character.
pub fn format_currency_br(value: f64) -> String {
    format!("US$ {}", format_grouped(value))
        .replace(',', "X")
        .replace('.', ",")
        .replace('X', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_thresholds() {
        assert_eq!(format_dynamic(999.0), "$999.00");
        assert_eq!(format_dynamic(1500.0), "$1.50K");
        assert_eq!(format_dynamic(2_300_000.0), "$2.30M");
        assert_eq!(format_dynamic(4_100_000_000.0), "$4.10B");
    }

    #[test]
    fn test_dynamic_edges() {
        assert_eq!(format_dynamic(0.0), "$0.00");
        assert_eq!(format_dynamic(1000.0), "$1.00K");
        assert_eq!(format_dynamic(-2500.0), "$-2.50K");
        assert_eq!(format_dynamic(1e12), "$1000.00B");
    }

    #[test]
    fn test_dynamic_non_finite_matches_grouped() {
        assert_eq!(format_dynamic(f64::NAN), "$nan");
        assert_eq!(format_dynamic(f64::INFINITY), "$infB");
        assert_eq!(format_dynamic(f64::NEG_INFINITY), "$-infB");
        assert_eq!(format_grouped(f64::NAN), "nan");
        assert_eq!(format_grouped(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(0.0), "0.00");
        assert_eq!(format_grouped(999.999), "1,000.00");
        assert_eq!(format_grouped(1234567.891), "1,234,567.89");
        assert_eq!(format_grouped(-1234.5), "-1,234.50");
        assert_eq!(format_grouped(-0.001), "-0.00");
    }

    #[test]
    fn test_currency_swap() {
        assert_eq!(format_currency_br(1234.5), "US$ 1.234,50");
        assert_eq!(format_currency_br(12.0), "US$ 12,00");
        assert_eq!(format_currency_br(1e20), "US$ 100.000.000.000.000.000.000,00");
        assert_eq!(format_currency_br(f64::NAN), "US$ nan");
    }
}
