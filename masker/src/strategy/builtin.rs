//! Built-in masking strategies.
//!
//! These are registered by `Masker::new()` under the names below. They are
//! public so they can be registered again under other names.
//!
//! All string strategies count Unicode scalar values, never bytes.

use rand::Rng;
use sha1::{Digest, Sha1};

use super::{Primitive, StrategyContext, StrategyFn, StrategyRegistry};
use crate::error::StrategyFailure;

pub const HASH: &str = "hash";
pub const FIXED: &str = "fixed";
pub const FILLED: &str = "filled";
pub const RANDOM: &str = "random";
pub const ZERO: &str = "zero";
pub const PRESERVE_ENDS: &str = "preserveEnds";

/// Length of the output of [`fixed`].
pub const FIXED_LENGTH: usize = 8;

/// Default number of leading and trailing characters kept by [`preserve_ends`].
pub const PRESERVE_ENDS_DEFAULT: usize = 3;

/// Values this short are fully masked by [`preserve_ends`] when the kept ends
/// would cover them.
const PRESERVE_ENDS_MIN_VISIBLE: usize = 3;

pub(crate) fn register_builtins(registry: &mut StrategyRegistry) {
    registry.register(HASH, StrategyFn::string(hash));
    registry.register(FIXED, StrategyFn::string(fixed));
    registry.register(FILLED, StrategyFn::string(filled));
    registry.register(PRESERVE_ENDS, StrategyFn::string(preserve_ends));
    registry.register(RANDOM, StrategyFn::int(random_int));
    registry.register(RANDOM, StrategyFn::uint(random_uint));
    registry.register(RANDOM, StrategyFn::float(random_float));
    registry.register(ZERO, StrategyFn::any(zero));
}

/// SHA-1 digest of the value, as lowercase hex.
///
/// Equal inputs give equal outputs, so masked values can still be correlated.
pub fn hash(_ctx: &StrategyContext<'_>, value: &str) -> Result<String, StrategyFailure> {
    let digest = Sha1::digest(value.as_bytes());
    Ok(format!("{digest:x}"))
}

/// Replaces the value with [`FIXED_LENGTH`] mask characters, hiding its length.
pub fn fixed(ctx: &StrategyContext<'_>, _value: &str) -> Result<String, StrategyFailure> {
    Ok(ctx.mask(FIXED_LENGTH))
}

/// Replaces every character with the mask character.
///
/// A positive integer argument overrides the output length.
pub fn filled(ctx: &StrategyContext<'_>, value: &str) -> Result<String, StrategyFailure> {
    let count = match ctx.argument().trim().parse::<usize>() {
        Ok(count) if count > 0 => count,
        _ => value.chars().count(),
    };
    Ok(ctx.mask(count))
}

/// Uniform random integer in `[0, argument)`.
pub fn random_int(ctx: &StrategyContext<'_>, _value: i64) -> Result<i64, StrategyFailure> {
    let bound: i64 = parse_bound(ctx.argument())?;
    if bound <= 0 {
        return Err(StrategyFailure::invalid_argument(
            "upper bound must be greater than zero",
        ));
    }
    Ok(rand::thread_rng().gen_range(0..bound))
}

/// Uniform random unsigned integer in `[0, argument)`.
pub fn random_uint(ctx: &StrategyContext<'_>, _value: u64) -> Result<u64, StrategyFailure> {
    let bound: u64 = parse_bound(ctx.argument())?;
    if bound == 0 {
        return Err(StrategyFailure::invalid_argument(
            "upper bound must be greater than zero",
        ));
    }
    Ok(rand::thread_rng().gen_range(0..bound))
}

/// Uniform random float in `[0.0, argument)`.
pub fn random_float(ctx: &StrategyContext<'_>, _value: f64) -> Result<f64, StrategyFailure> {
    let bound: f64 = parse_bound(ctx.argument())?;
    if !(bound.is_finite() && bound > 0.0) {
        return Err(StrategyFailure::invalid_argument(
            "upper bound must be a finite number greater than zero",
        ));
    }
    Ok(rand::thread_rng().gen_range(0.0..bound))
}

/// The zero value of the runtime type of `value`.
pub fn zero(_ctx: &StrategyContext<'_>, value: Primitive) -> Result<Primitive, StrategyFailure> {
    Ok(value.zeroed())
}

/// Keeps the first `start` and last `end` characters and masks the middle.
///
/// The argument is `start,end`, optionally parenthesised. Each part that is
/// missing or not a non-negative integer falls back to
/// [`PRESERVE_ENDS_DEFAULT`]. When the kept ends would cover the whole value,
/// values of up to three characters are fully masked and longer values keep
/// one character at each end.
pub fn preserve_ends(ctx: &StrategyContext<'_>, value: &str) -> Result<String, StrategyFailure> {
    let mut chars: Vec<char> = value.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Ok(String::new());
    }

    let (mut start, mut end) = parse_ends(ctx.argument());
    if start.saturating_add(end) >= total {
        if total <= PRESERVE_ENDS_MIN_VISIBLE {
            return Ok(ctx.mask(total));
        }
        start = 1;
        end = 1;
    }

    for ch in &mut chars[start..total - end] {
        *ch = ctx.mask_char();
    }
    Ok(chars.into_iter().collect())
}

fn parse_bound<T: std::str::FromStr>(argument: &str) -> Result<T, StrategyFailure> {
    let argument = argument.trim();
    if argument.is_empty() {
        return Err(StrategyFailure::invalid_argument(
            "an upper bound argument is required",
        ));
    }
    argument
        .parse()
        .map_err(|_| StrategyFailure::invalid_argument(format!("`{argument}` is not a number")))
}

fn parse_ends(argument: &str) -> (usize, usize) {
    let inner = argument
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let mut parts = inner.split(',');
    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) => (
            start.trim().parse().unwrap_or(PRESERVE_ENDS_DEFAULT),
            end.trim().parse().unwrap_or(PRESERVE_ENDS_DEFAULT),
        ),
        _ => (PRESERVE_ENDS_DEFAULT, PRESERVE_ENDS_DEFAULT),
    }
}
