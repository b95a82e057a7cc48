//! BER encoded real values.
//!
//! A REAL value is decoded into an `f64`. The content octets come in one of
//! three forms selected by the two most significant bits of the first
//! octet:
//!
//! * `1x`: the binary form, where the first octet carries the sign, the
//!   base, a scaling factor, and the format of the exponent octets, followed
//!   by a two’s complement exponent and an unsigned mantissa,
//! * `00`: the decimal form, where the remaining octets are an ISO 6093
//!   number in one of the forms NR1, NR2, or NR3,
//! * `01`: a special value such as infinity.
//!
//! Empty content octets encode plus zero.

use crate::decode::{DecodeError, Pos};


//------------ from_content --------------------------------------------------

/// Decodes the content octets of a REAL value.
///
/// The position is the start of the content octets and only used for
/// errors.
pub fn from_content(
    content: &[u8], pos: impl Into<Pos>
) -> Result<f64, DecodeError> {
    let pos = pos.into();
    let (&first, tail) = match content.split_first() {
        Some(some) => some,
        None => return Ok(0.)
    };
    if first & 0x80 != 0 {
        binary(first, tail, pos)
    }
    else if first & 0x40 == 0 {
        decimal(first, tail, pos)
    }
    else {
        special(first, tail, pos)
    }
}


//------------ Binary Form ---------------------------------------------------

/// Decodes the binary form.
///
/// The value is `S × N × 2^F × B^E` where `B` is one of 2, 8, or 16.
fn binary(first: u8, tail: &[u8], pos: Pos) -> Result<f64, DecodeError> {
    let negative = first & 0x40 != 0;
    let base_bits: i64 = match (first & 0x30) >> 4 {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => {
            return Err(DecodeError::unsupported(
                "reserved base in real value", pos
            ))
        }
    };
    let scale = i64::from((first & 0x0C) >> 2);

    let (exp_len, tail) = match first & 0x03 {
        0 => (1, tail),
        1 => (2, tail),
        2 => (3, tail),
        _ => {
            match tail.split_first() {
                Some((&len, tail)) => (usize::from(len), tail),
                None => {
                    return Err(DecodeError::malformed(
                        "missing exponent length in real value", pos
                    ))
                }
            }
        }
    };
    if exp_len == 0 || tail.len() < exp_len {
        return Err(DecodeError::malformed(
            "invalid exponent in real value", pos
        ))
    }
    if exp_len > 8 {
        return Err(DecodeError::unsupported(
            "exponent of real value too large", pos
        ))
    }
    let (exp_octets, mantissa_octets) = tail.split_at(exp_len);

    let mut exp: i64 = if exp_octets[0] & 0x80 != 0 { -1 } else { 0 };
    for &octet in exp_octets {
        exp = (exp << 8) | i64::from(octet);
    }

    if mantissa_octets.is_empty() {
        return Err(DecodeError::malformed(
            "missing mantissa in real value", pos
        ))
    }
    if mantissa_octets.len() > 8 {
        return Err(DecodeError::unsupported(
            "mantissa of real value too large", pos
        ))
    }
    let mut mantissa = 0u64;
    for &octet in mantissa_octets {
        mantissa = (mantissa << 8) | u64::from(octet);
    }

    let exp = exp.saturating_mul(base_bits).saturating_add(scale);
    let res = scale_by_power_of_two(mantissa as f64, exp);
    Ok(if negative { -res } else { res })
}

/// Returns `value × 2^exp`.
///
/// Applies the exponent in steps so that large mantissas with very small
/// exponents don’t underflow prematurely.
fn scale_by_power_of_two(mut value: f64, mut exp: i64) -> f64 {
    const STEP: i64 = 1000;
    if value == 0. {
        return value
    }
    while exp != 0 && value != 0. && value.is_finite() {
        let step = exp.clamp(-STEP, STEP);
        value *= 2f64.powi(step as i32);
        exp -= step;
    }
    value
}


//------------ Decimal Form --------------------------------------------------

/// Decodes the decimal form.
fn decimal(first: u8, tail: &[u8], pos: Pos) -> Result<f64, DecodeError> {
    if !matches!(first & 0x3F, 1..=3) {
        return Err(DecodeError::unsupported(
            "unknown decimal form of real value", pos
        ))
    }
    let text = std::str::from_utf8(tail).map_err(|_| {
        DecodeError::malformed("invalid decimal real value", pos)
    })?;
    let text = text.trim_matches(' ').replace(',', ".");
    let valid = !text.is_empty() && text.chars().all(|ch| {
        ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')
    });
    if !valid {
        return Err(DecodeError::malformed(
            "invalid decimal real value", pos
        ))
    }
    text.parse().map_err(|_| {
        DecodeError::malformed("invalid decimal real value", pos)
    })
}


//------------ Special Values ------------------------------------------------

/// Decodes a special real value.
fn special(first: u8, tail: &[u8], pos: Pos) -> Result<f64, DecodeError> {
    if !tail.is_empty() {
        return Err(DecodeError::malformed(
            "special real value with trailing octets", pos
        ))
    }
    match first {
        0x40 => Ok(f64::INFINITY),
        0x41 => Ok(f64::NEG_INFINITY),
        0x42 => Ok(f64::NAN),
        0x43 => Ok(-0.),
        _ => {
            Err(DecodeError::unsupported(
                "unknown special real value", pos
            ))
        }
    }
}


//============ Tests =========================================================
