//! Ticket analysis passes.
//!
//! Each pass reads the same prepared batch and fills one section of the
//! report. The engine ties them together.

pub mod categorical;
pub mod duration;
pub mod engine;
pub mod insights;
pub mod timeliness;

pub use engine::{analyze, analyze_at};

/// Share of `part` in `whole` as a percentage; zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(0, 4), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
        assert!((percentage(1, 3) - 33.333_333_333_333_336).abs() < 1e-12);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(6.0), 6.0);
        assert_eq!(round2(1.234_56), 1.23);
        assert_eq!(round2(0.416_666), 0.42);
        assert_eq!(round2(-2.5), -2.5);
    }
}
