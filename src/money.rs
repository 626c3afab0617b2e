//! Cents-to-display helpers. Amounts live as integer cents everywhere;
//! floats only appear at the rendering edge.

/// Render cents as a dollar string, always with two decimals.
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    let whole = abs / 100;
    let frac = abs % 100;
    format!("{sign}${whole}.{frac:02}")
}

/// Parse a user-entered dollar amount into cents.
///
/// Accepts an optional `$` prefix, comma or dot as the decimal mark and
/// at most two fractional digits. Negative amounts are rejected; rates
/// and claims never go below zero.
pub fn parse_amount_to_cents(input: &str) -> Option<i64> {
    let mut s = input.trim().to_string();
    if let Some(rest) = s.strip_prefix('$') {
        s = rest.trim().to_string();
    }
    if s.is_empty() {
        return None;
    }
    if s.starts_with('-') {
        return None;
    }
    s = s.replace(',', ".");
    let mut parts = s.split('.');
    let whole_str = parts.next()?;
    let frac_str = parts.next();
    if parts.next().is_some() {
        return None;
    }
    let whole: i64 = whole_str.parse().ok()?;
    let frac = match frac_str {
        None => 0,
        Some(frac) => {
            if frac.len() > 2 {
                return None;
            }
            let mut padded = frac.to_string();
            while padded.len() < 2 {
                padded.push('0');
            }
            padded.parse::<i64>().ok()?
        }
    };
    Some(whole * 100 + frac)
}
