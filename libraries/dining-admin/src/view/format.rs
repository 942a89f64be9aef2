//! Text formatting shared by the renderers.

use chrono::{DateTime, Utc};
use dining_core::parse_timestamp;

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Group digits in threes: `1250` -> `"1,250"`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Naira amount with two decimals (`"₦4,500.00"`), or `N/A`.
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return "N/A".to_string();
    };
    let sign = if price < 0.0 { "-" } else { "" };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let kobo = (price.abs() * 100.0).round() as u64;
    format!("{}₦{}.{:02}", sign, format_number(kobo / 100), kobo % 100)
}

/// Calendar date of a timestamp, or `fallback` when absent or unparseable.
pub fn format_date(raw: Option<&str>, fallback: &str) -> String {
    format_timestamp(raw, "%Y-%m-%d", fallback)
}

/// Date and time of a timestamp, or `fallback`.
pub fn format_datetime(raw: Option<&str>, fallback: &str) -> String {
    format_timestamp(raw, "%Y-%m-%d %H:%M", fallback)
}

fn format_timestamp(raw: Option<&str>, pattern: &str, fallback: &str) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt: DateTime<Utc>| dt.format(pattern).to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// First `max` characters followed by `...`; empty for no text.
pub fn excerpt(text: Option<&str>, max: usize) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => {
            let head: String = t.chars().take(max).collect();
            format!("{}...", head)
        }
        None => String::new(),
    }
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("Mama Put"), "Mama Put");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(4500.0)), "₦4,500.00");
        assert_eq!(format_price(Some(1200.5)), "₦1,200.50");
        assert_eq!(format_price(Some(0.0)), "₦0.00");
        assert_eq!(format_price(Some(-15.0)), "-₦15.00");
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_price(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date(Some("2024-03-05T10:20:00Z"), "N/A"), "2024-03-05");
        assert_eq!(format_date(Some("garbage"), "N/A"), "N/A");
        assert_eq!(format_datetime(Some("2024-03-05T10:20:00Z"), "-"), "2024-03-05 10:20");
        assert_eq!(format_datetime(None, "Just now"), "Just now");
    }

    #[test]
    fn test_excerpt() {
        let long = "a".repeat(80);
        assert_eq!(excerpt(Some(&long), 50), format!("{}...", "a".repeat(50)));
        assert_eq!(excerpt(Some("Spicy"), 50), "Spicy...");
        assert_eq!(excerpt(None, 50), "");
        assert_eq!(excerpt(Some("  "), 50), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("restaurant"), "Restaurant");
        assert_eq!(capitalize(""), "");
    }
}
