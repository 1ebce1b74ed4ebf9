//! IEEE-754 binary128 conversions for the extended real token.
//!
//! Rust has no stable 128-bit float, so extended reals travel as raw bits.
//! Widening an `f64` is exact; narrowing rounds to nearest, ties to even.

use crate::ErrorKind;

const F128_EXP_MAX: u128 = 0x7FFF;
const F128_BIAS: i32 = 16383;
const F128_MANT_BITS: u32 = 112;
const F128_MANT_MASK: u128 = (1 << F128_MANT_BITS) - 1;

const F64_BIAS: i32 = 1023;
const F64_MANT_BITS: u32 = 52;
const F64_MANT_MASK: u64 = (1 << F64_MANT_BITS) - 1;

/// Widens an `f64` to binary128 bits.
pub(crate) fn from_f64(value: f64) -> u128 {
    let bits = value.to_bits();
    let sign = u128::from(bits >> 63) << 127;
    let exp = ((bits >> F64_MANT_BITS) & 0x7FF) as i32;
    let mant = bits & F64_MANT_MASK;

    let shift = F128_MANT_BITS - F64_MANT_BITS;
    if exp == 0x7FF {
        return sign | (F128_EXP_MAX << F128_MANT_BITS) | (u128::from(mant) << shift);
    }
    if exp == 0 {
        if mant == 0 {
            return sign;
        }
        // Subnormal f64: normalize so the leading bit becomes implicit.
        let lead = 63 - mant.leading_zeros() as i32;
        let exponent = lead - 1074 + F128_BIAS;
        let fraction = (u128::from(mant) << (F128_MANT_BITS - lead as u32)) & F128_MANT_MASK;
        return sign | ((exponent as u128) << F128_MANT_BITS) | fraction;
    }
    let exponent = (exp - F64_BIAS + F128_BIAS) as u128;
    sign | (exponent << F128_MANT_BITS) | (u128::from(mant) << shift)
}

/// Narrows binary128 bits to the nearest `f64`.
///
/// Finite values beyond the `f64` range fail with [`ErrorKind::Overflow`];
/// values below the smallest subnormal round to signed zero.
pub(crate) fn to_f64(bits: u128) -> Result<f64, ErrorKind> {
    let sign = ((bits >> 127) as u64) << 63;
    let exp = (bits >> F128_MANT_BITS) & F128_EXP_MAX;
    let mant = bits & F128_MANT_MASK;

    if exp == F128_EXP_MAX {
        let payload = (mant >> (F128_MANT_BITS - F64_MANT_BITS)) as u64;
        // Keep NaNs NaN even when the payload lives only in the low bits.
        let payload = if mant != 0 && payload == 0 { 1 << 51 } else { payload };
        return Ok(f64::from_bits(sign | (0x7FF << F64_MANT_BITS) | payload));
    }
    if exp == 0 {
        // Zero, or a binary128 subnormal far below the f64 range
        return Ok(f64::from_bits(sign));
    }

    let mut exponent = exp as i32 - F128_BIAS;
    if exponent > F64_BIAS {
        return Err(ErrorKind::Overflow);
    }
    let significand = mant | (1 << F128_MANT_BITS);

    if exponent >= 1 - F64_BIAS {
        let mut m = round_shift(significand, F128_MANT_BITS - F64_MANT_BITS);
        if m == 1 << (F64_MANT_BITS + 1) {
            m >>= 1;
            exponent += 1;
            if exponent > F64_BIAS {
                return Err(ErrorKind::Overflow);
            }
        }
        let biased = (exponent + F64_BIAS) as u64;
        return Ok(f64::from_bits(
            sign | (biased << F64_MANT_BITS) | (m as u64 & F64_MANT_MASK),
        ));
    }

    // Subnormal result: the value is m * 2^-1074
    let shift = (F128_MANT_BITS as i32 - 1074) - exponent;
    if shift >= 128 {
        return Ok(f64::from_bits(sign));
    }
    let m = round_shift(significand, shift as u32) as u64;
    Ok(f64::from_bits(sign | m))
}

/// Shifts right by `shift` bits, rounding to nearest with ties to even.
fn round_shift(value: u128, shift: u32) -> u128 {
    if shift == 0 {
        return value;
    }
    let kept = value >> shift;
    let rest = value & ((1 << shift) - 1);
    let half = 1 << (shift - 1);
    if rest > half || (rest == half && kept & 1 == 1) {
        kept + 1
    } else {
        kept
    }
}
