// Utility functions
use chrono::{Duration, NaiveDate};

/// Parses a supplier delivery label into a calendar date.
///
/// Accepts ISO dates (`2025-03-14`), dotted dates anywhere in the text
/// (`"ожидается 14.03.2025"`) and the words "сегодня"/"завтра" relative to `today`.
pub fn parse_delivery_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    if lower.contains("завтра") || lower.contains("tomorrow") {
        return today.checked_add_signed(Duration::days(1));
    }
    if lower.contains("сегодня") || lower.contains("today") {
        return Some(today);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    text.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|token| token.len() >= 10)
        .find_map(|token| NaiveDate::parse_from_str(&token[..10], "%d.%m.%Y").ok())
}

/// Lowercase letters and digits of `text`, everything else dropped.
pub fn compact_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parses the leading integer of a stock label such as `"12"`, `">10"` or `"5 шт"`.
pub fn parse_quantity(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .trim_start_matches(['>', '<', '+', '~', '='])
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Runs too long for u64 are still "a lot of stock".
    let quantity = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(quantity.min(u64::from(u32::MAX)) as u32)
}
