/// Group the integer part in thousands with a plain space
fn group_thousands(units: i64) -> String {
    let digits = units.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(' ');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a euro amount the French way: `12 345,67 €`
pub fn format_currency(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as i64;
    let euros = cents_total / 100;
    let cents = cents_total % 100;
    let sign = if value < 0.0 && cents_total > 0 { "-" } else { "" };
    format!("{sign}{},{cents:02} €", group_thousands(euros))
}

/// Format a euro amount without cents (shorter format for tight columns)
pub fn format_currency_short(value: f64) -> String {
    let euros = value.abs().round() as i64;
    let sign = if value < 0.0 && euros > 0 { "-" } else { "" };
    format!("{sign}{} €", group_thousands(euros))
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.2} %", value * 100.0)
}

/// Format a signed difference, always showing the sign
pub fn format_signed_currency(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// Format a euro amount in compact form (e.g., 2.1 M€, 450 k€, 50 €)
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{}{:.1} M€", sign, abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{}{:.0} k€", sign, abs_value / 1_000.0)
    } else {
        format!("{}{:.0} €", sign, abs_value)
    }
}
