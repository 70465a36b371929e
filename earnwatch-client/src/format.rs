//! Presentation formatting for backtest results.
//!
//! Pure, stateless helpers; color/styling decisions stay in the front end,
//! which maps `Polarity` to whatever its medium supports.

use crate::types::SessionFlag;

/// Visual polarity of a percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Up,
    Down,
    Flat,
}

impl Polarity {
    /// Classify a fractional change.
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Format a market capitalization as an abbreviated currency string.
///
/// Thresholds: `$X.XXT` at 1e12, `$X.XXB` at 1e9, `$X.XXM` at 1e6; below
/// that the raw dollar amount with no decimals.
pub fn format_market_cap(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${:.0}", value)
    }
}

/// Format a fractional price change as a signed two-decimal percent.
pub fn format_pct_change(change: f64) -> String {
    format!("{:+.2}%", change * 100.0)
}

/// Human-readable label for an announcement session flag.
pub fn session_label(flag: Option<SessionFlag>) -> &'static str {
    match flag {
        Some(SessionFlag::Bmo) => "Before Open (BMO)",
        Some(SessionFlag::Amc) => "After Close (AMC)",
        None => "—",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_cap_thresholds() {
        assert_eq!(format_market_cap(3_200_000_000_000.0), "$3.20T");
        assert_eq!(format_market_cap(1_000_000_000_000.0), "$1.00T");
        assert_eq!(format_market_cap(999_000_000_000.0), "$999.00B");
        assert_eq!(format_market_cap(1_500_000_000.0), "$1.50B");
        assert_eq!(format_market_cap(850_000_000.0), "$850.00M");
        assert_eq!(format_market_cap(1_000_000.0), "$1.00M");
        assert_eq!(format_market_cap(999_999.0), "$999999");
        assert_eq!(format_market_cap(0.0), "$0");
    }

    #[test]
    fn test_market_cap_monotonic_across_thresholds() {
        // Spot-check ordering of formatted magnitudes around each boundary:
        // a value just below a threshold must not format as a larger unit.
        assert!(format_market_cap(999_999_999_999.0).ends_with('B'));
        assert!(format_market_cap(1_000_000_000_000.0).ends_with('T'));
        assert!(format_market_cap(999_999_999.0).ends_with('M'));
        assert!(format_market_cap(1_000_000_000.0).ends_with('B'));
    }

    #[test]
    fn test_pct_change_signed_two_decimals() {
        assert_eq!(format_pct_change(0.0992), "+9.92%");
        assert_eq!(format_pct_change(-0.125), "-12.50%");
        assert_eq!(format_pct_change(0.0), "+0.00%");
        assert_eq!(format_pct_change(0.123456), "+12.35%");
    }

    #[test]
    fn test_polarity() {
        assert_eq!(Polarity::of(0.05), Polarity::Up);
        assert_eq!(Polarity::of(-0.05), Polarity::Down);
        assert_eq!(Polarity::of(0.0), Polarity::Flat);
    }

    #[test]
    fn test_session_labels() {
        assert_eq!(session_label(Some(SessionFlag::Bmo)), "Before Open (BMO)");
        assert_eq!(session_label(Some(SessionFlag::Amc)), "After Close (AMC)");
        assert_eq!(session_label(None), "—");
    }
}
