//! Decimal-string arithmetic for staked wei values.
//!
//! Wei amounts routinely exceed 64-bit range (1 ETH = 10^18 wei), so totals
//! are computed digit-wise on decimal strings instead of through a fixed
//! width parse. Formatting divides by 10^18 and rounds half-up to two
//! decimal places; it is display-only and never feeds back into arithmetic.

/// Number of decimal digits between wei and the display unit.
pub const UNIT_DECIMALS: usize = 18;

/// Default display unit label.
pub const DEFAULT_UNIT: &str = "ETH";

/// True when `value` is a plain non-negative decimal integer.
pub fn is_wei_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Adds two non-negative decimal integers given as digit strings.
///
/// Inputs must satisfy [`is_wei_integer`]; the result carries no leading
/// zeros unless it is exactly "0".
pub fn add_decimal(a: &str, b: &str) -> String {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut digits = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0u8;
    let mut i = a.len();
    let mut j = b.len();

    while i > 0 || j > 0 || carry > 0 {
        let mut sum = carry;
        if i > 0 {
            i -= 1;
            sum += a[i] - b'0';
        }
        if j > 0 {
            j -= 1;
            sum += b[j] - b'0';
        }
        digits.push(b'0' + sum % 10);
        carry = sum / 10;
    }

    if digits.is_empty() {
        return "0".to_string();
    }

    let text: String = digits.iter().rev().map(|&d| d as char).collect();
    strip_leading_zeros(&text).to_string()
}

/// Sums wei values, returning `None` when any value is not a plain decimal
/// integer. A single malformed stake poisons the whole total; the caller
/// renders that as `NaN` rather than guessing.
pub fn sum_wei<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = "0".to_string();
    for value in values {
        if !is_wei_integer(value) {
            return None;
        }
        total = add_decimal(&total, value);
    }
    Some(total)
}

/// Renders a wei amount as display units with exactly two decimal places,
/// e.g. `format_wei("3500000000000000000", "ETH")` gives `"3.50 ETH"`.
///
/// Rounding is half-up on the third decimal digit, matching the surface this
/// board is modeled on. Malformed input renders as `NaN <unit>`.
pub fn format_wei(value: &str, unit: &str) -> String {
    match format_units(value) {
        Some(amount) => format!("{amount} {unit}"),
        None => format!("NaN {unit}"),
    }
}

fn format_units(value: &str) -> Option<String> {
    if !is_wei_integer(value) {
        return None;
    }

    let digits = strip_leading_zeros(value);

    // Scale down to hundredths of a unit, then round on the discarded tail.
    let cut = digits.len().saturating_sub(UNIT_DECIMALS - 2);
    let (kept, tail) = digits.split_at(cut);
    let mut cents = if kept.is_empty() {
        "0".to_string()
    } else {
        kept.to_string()
    };
    if round_up(tail) {
        cents = add_decimal(&cents, "1");
    }

    let padded = format!("{cents:0>3}");
    let (whole, frac) = padded.split_at(padded.len() - 2);
    Some(format!("{whole}.{frac}"))
}

// Half-up: the discarded tail holds at most UNIT_DECIMALS - 2 digits, so it
// reaches half a cent only at full width with a leading digit of 5 or more.
// A shorter tail is below 10^15 wei and always rounds down.
fn round_up(tail: &str) -> bool {
    tail.len() == UNIT_DECIMALS - 2
        && matches!(tail.bytes().next(), Some(first) if first >= b'5')
}

fn strip_leading_zeros(value: &str) -> &str {
    let trimmed = value.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}
