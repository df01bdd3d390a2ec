//! Environment-driven defaults for [`CleanConfig::from_env`](crate::CleanConfig::from_env).
//!
//! Values are read once per process. Unparseable values fall back to the
//! built-in default.

use crate::pipeline::Strategy;
use crate::utils::binarization::DEFAULT_INTEGRAL_FACTOR;
use crate::utils::window::DEFAULT_HALF_WINDOW;
use std::sync::OnceLock;

/// Accepted range for `IMGCLEAN_HALF_WINDOW`.
const HALF_WINDOW_RANGE: (usize, usize) = (1, 255);
/// Accepted range for `IMGCLEAN_INTEGRAL_FACTOR`.
const INTEGRAL_FACTOR_RANGE: (f32, f32) = (0.0, 2.0);

fn parse_usize(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_f32(value: Option<&str>, default: f32) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_bool_u8(value: Option<&str>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_strategy(value: Option<&str>) -> Strategy {
    value
        .and_then(|v| v.parse::<Strategy>().ok())
        .unwrap_or_default()
}

fn parse_half_window(value: Option<&str>) -> usize {
    let (lo, hi) = HALF_WINDOW_RANGE;
    parse_usize(value, DEFAULT_HALF_WINDOW).clamp(lo, hi)
}

fn parse_integral_factor(value: Option<&str>) -> f32 {
    let (lo, hi) = INTEGRAL_FACTOR_RANGE;
    parse_f32(value, DEFAULT_INTEGRAL_FACTOR).clamp(lo, hi)
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

static STRATEGY: OnceLock<Strategy> = OnceLock::new();

pub(crate) fn strategy() -> Strategy {
    *STRATEGY.get_or_init(|| parse_strategy(env("IMGCLEAN_STRATEGY").as_deref()))
}

static HALF_WINDOW: OnceLock<usize> = OnceLock::new();

pub(crate) fn half_window() -> usize {
    *HALF_WINDOW.get_or_init(|| parse_half_window(env("IMGCLEAN_HALF_WINDOW").as_deref()))
}

static INTEGRAL_FACTOR: OnceLock<f32> = OnceLock::new();

pub(crate) fn integral_factor() -> f32 {
    *INTEGRAL_FACTOR
        .get_or_init(|| parse_integral_factor(env("IMGCLEAN_INTEGRAL_FACTOR").as_deref()))
}

static PARALLEL: OnceLock<bool> = OnceLock::new();

pub(crate) fn parallel() -> bool {
    *PARALLEL.get_or_init(|| parse_bool_u8(env("IMGCLEAN_PARALLEL").as_deref(), true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_values_use_defaults() {
        assert_eq!(parse_strategy(None), Strategy::Integral);
        assert_eq!(parse_half_window(None), 7);
        assert_eq!(parse_integral_factor(None), 0.85);
        assert!(parse_bool_u8(None, true));
    }

    #[test]
    fn test_half_window_clamped() {
        assert_eq!(parse_half_window(Some(" 12 ")), 12);
        assert_eq!(parse_half_window(Some("0")), 1);
        assert_eq!(parse_half_window(Some("1000")), 255);
        assert_eq!(parse_half_window(Some("-3")), 7);
        assert_eq!(parse_half_window(Some("wide")), 7);
    }

    #[test]
    fn test_integral_factor_clamped_and_finite() {
        assert_eq!(parse_integral_factor(Some("0.5")), 0.5);
        assert_eq!(parse_integral_factor(Some("3.5")), 2.0);
        assert_eq!(parse_integral_factor(Some("-1")), 0.0);
        assert_eq!(parse_integral_factor(Some("inf")), 0.85);
        assert_eq!(parse_integral_factor(Some("NaN")), 0.85);
        assert_eq!(parse_integral_factor(Some("")), 0.85);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(parse_strategy(Some("adaptive")), Strategy::Adaptive);
        assert_eq!(parse_strategy(Some(" Integral ")), Strategy::Integral);
        assert_eq!(parse_strategy(Some("otsu")), Strategy::Integral);
    }

    #[test]
    fn test_parallel_flag() {
        assert!(!parse_bool_u8(Some("0"), true));
        assert!(parse_bool_u8(Some("1"), false));
        assert!(parse_bool_u8(Some("yes"), true));
        assert!(!parse_bool_u8(Some("256"), false));
    }
}
