//! Numeric text conversions.
//!
//! Every number the compiler stores or prints goes through
//! [`format_number`], which produces the shortest text that parses back to
//! the same `f64`.  Plain decimal notation is used for decimal exponents in
//! `-4..6`; outside that range the value is written in exponent form with a
//! signed two-digit exponent (`1e+06`, `2.5e-07`), the layout downstream
//! deck readers expect.

/// Format `v` as canonical shortest round-trip text.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.25e-7", "1e6".
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        format!("{v}")
    }
}

/// Format with exactly two decimals (curve and line coordinates of braces).
pub fn format_fixed2(v: f64) -> String {
    format!("{v:.2}")
}

/// Parse a token as a number.
///
/// Accepts an optional sign, decimal digits with optional fraction and
/// exponent, and the words `inf`/`infinity`/`nan` in any case.
pub fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
