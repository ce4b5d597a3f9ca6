// Formatting and rounding helpers shared by the report builders and the
// console output.
//
// Amounts are stored in the smallest reporting unit (taka); display code
// either groups them with thousands separators or scales them to crore.
use num_format::{Locale, ToFormattedString};

/// One crore, the unit used on compact axis ticks.
pub const CRORE: f64 = 1e7;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Table cells and console counts (e.g. `3,041,934,000`).
    n.to_formatted_string(&Locale::en)
}

/// Axis tick in crore: two decimals at most, trailing zeros dropped (`1.5 CR`).
pub fn format_crore(amount: u64) -> String {
    let s = format!("{:.2}", amount as f64 / CRORE);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{} CR", s)
}

/// Month label as shown on a narrow screen: its first three letters.
pub fn short_month_label(month: &str) -> String {
    month.chars().take(3).collect()
}

/// `2024-2025` becomes `2024-25`; any other shape is returned unchanged.
pub fn short_year_label(label: &str) -> String {
    match label.split_once('-') {
        Some((start, end))
            if start.len() == 4 && end.len() == 4 && end.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{}-{}", start, &end[2..])
        }
        _ => label.to_string(),
    }
}
