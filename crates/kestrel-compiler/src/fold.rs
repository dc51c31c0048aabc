//! Compile-time evaluation of foldable reserved globals.
//!
//! Only literal arguments are folded; anything else is left to the runtime.
//! Conversions follow the scripting language's rules (`Number("")` is `0`,
//! `parseInt("0x1f")` is `31`, `isNaN(undefined)` is `true`).

use kestrel_ast::{Argument, LiteralKind};
use kestrel_registry::FoldOp;

use crate::hir::Constant;

/// Fold `op` over `args`, if every argument is a literal.
pub fn try_fold(op: FoldOp, args: &[Argument<'_>]) -> Option<Constant> {
    let literals = args
        .iter()
        .map(|arg| arg.value.as_literal().copied())
        .collect::<Option<Vec<_>>>()?;
    let first = literals.first();

    let folded = match op {
        FoldOp::ParseInt => {
            let text = first.map_or_else(|| "undefined".to_string(), to_string);
            let radix = literals.get(1).map(to_number);
            Constant::number(parse_int(&text, radix))
        }
        FoldOp::ParseFloat => {
            let text = first.map_or_else(|| "undefined".to_string(), to_string);
            Constant::number(parse_float(&text))
        }
        FoldOp::ToNumber => Constant::number(first.map_or(0.0, to_number)),
        FoldOp::ToString => Constant::string(first.map_or_else(String::new, to_string)),
        FoldOp::ToBoolean => Constant::Bool(first.is_some_and(to_boolean)),
        FoldOp::IsNaN => Constant::Bool(first.map_or(f64::NAN, to_number).is_nan()),
        FoldOp::IsFinite => Constant::Bool(first.map_or(f64::NAN, to_number).is_finite()),
    };
    Some(folded)
}

// ============================================================================
// Conversions
// ============================================================================

pub fn to_number(lit: &LiteralKind<'_>) -> f64 {
    match lit {
        LiteralKind::Number(n) => *n,
        LiteralKind::String(s) => string_to_number(s),
        LiteralKind::Bool(b) => f64::from(u8::from(*b)),
        LiteralKind::Null => 0.0,
        LiteralKind::Undefined | LiteralKind::Regex { .. } => f64::NAN,
    }
}

pub fn to_string(lit: &LiteralKind<'_>) -> String {
    match lit {
        LiteralKind::Number(n) => number_to_string(*n),
        LiteralKind::String(s) => s.to_string(),
        LiteralKind::Bool(b) => b.to_string(),
        LiteralKind::Null => "null".to_string(),
        LiteralKind::Undefined => "undefined".to_string(),
        LiteralKind::Regex { pattern, flags } => format!("/{}/{}", pattern, flags),
    }
}

pub fn to_boolean(lit: &LiteralKind<'_>) -> bool {
    match lit {
        LiteralKind::Number(n) => *n != 0.0 && !n.is_nan(),
        LiteralKind::String(s) => !s.is_empty(),
        LiteralKind::Bool(b) => *b,
        LiteralKind::Null | LiteralKind::Undefined => false,
        LiteralKind::Regex { .. } => true,
    }
}

/// Shortest round-trip digits, placed as the runtime prints numbers: plain
/// notation for decimal exponents in `-7..21`, exponent form otherwise.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e-7`.
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let (lead, rest) = digits.split_at(1);
        let sign = if point > 0 { '+' } else { '-' };
        let fraction = if rest.is_empty() { String::new() } else { format!(".{}", rest) };
        format!("{}{}e{}{}", lead, fraction, sign, (point - 1).abs())
    };
    if n < 0.0 { format!("-{}", body) } else { body }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64);
        }
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust also accepts "inf" and "nan", which are not numbers here.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

fn parse_int(text: &str, radix: Option<f64>) -> f64 {
    let mut s = text.trim_start();
    let negative = s.starts_with('-');
    if negative || s.starts_with('+') {
        s = &s[1..];
    }

    let mut radix = match radix {
        None => 0,
        Some(r) if r.is_nan() || r.is_infinite() => 0,
        Some(r) => r.trunc() as i64,
    };
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    if radix == 0 || radix == 16 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let digits: Vec<u32> = s
        .chars()
        .map_while(|c| c.to_digit(radix as u32))
        .collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    let value = digits
        .iter()
        .fold(0.0, |acc, &d| acc * radix as f64 + f64::from(d));
    if negative { -value } else { value }
}

fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    if body.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    // Longest prefix of the form digits[.digits][e[+-]digits].
    let bytes = body.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > digits_start {
            end = exp;
        }
    }
    body[..end].parse::<f64>().map_or(f64::NAN, |v| sign * v)
}
