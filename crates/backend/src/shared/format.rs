/// Форматирует целое число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Форматирует дробное число с разделителями тысяч и `decimals` знаками
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut result = String::new();
    // Без "-0"
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.push('-');
    }
    result.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    result
}

/// Процент с двумя знаками: `3.25%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234567.0, 0), "1,234,567");
        assert_eq!(format_decimal(1234.5, 2), "1,234.50");
        assert_eq!(format_decimal(-98765.432, 1), "-98,765.4");
        assert_eq!(format_decimal(-0.001, 2), "0.00");
        assert_eq!(format_decimal(0.0, 0), "0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(3.254), "3.25%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
