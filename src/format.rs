//! Display formatting for amounts

/// Currency with thousands separators and up to three fraction digits,
/// trailing zeros dropped: `48250` -> `$48,250`, `51230.5` -> `$51,230.5`
pub fn money_grouped(value: f64) -> String {
    format!("${}", grouped(value))
}

/// Currency with exactly two decimals: `123.4` -> `$123.40`
pub fn money_fixed(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{value:.2}");
    // "-0.00" reads oddly in a bill
    if text == "-0.00" {
        "$0.00".to_string()
    } else {
        format!("${text}")
    }
}

pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.3}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    let digits = whole.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*digit as char);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// `itemized_bill` -> `itemized bill`; only the first underscore is replaced
pub fn bill_type_label(bill_type: &str) -> String {
    bill_type.replacen('_', " ", 1)
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Fallback for blank strings
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "—" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_amounts() {
        assert_eq!(money_grouped(48250.0), "$48,250");
        assert_eq!(money_grouped(51230.5), "$51,230.5");
        assert_eq!(money_grouped(1234567.891), "$1,234,567.891");
        assert_eq!(money_grouped(999.0), "$999");
        assert_eq!(money_grouped(0.0), "$0");
        assert_eq!(money_grouped(-2980.5), "$-2,980.5");
        assert_eq!(money_grouped(0.12345), "$0.123");
    }

    #[test]
    fn fixed_amounts() {
        assert_eq!(money_fixed(123.4), "$123.40");
        assert_eq!(money_fixed(1500.0), "$1500.00");
        assert_eq!(money_fixed(f64::NAN), "$0.00");
        assert_eq!(money_fixed(-0.001), "$0.00");
    }

    #[test]
    fn bill_type_replaces_first_underscore() {
        assert_eq!(bill_type_label("itemized_bill"), "itemized bill");
        assert_eq!(bill_type_label("final_itemized_bill"), "final itemized_bill");
        assert_eq!(bill_type_label("pharmacy"), "pharmacy");
    }
}
