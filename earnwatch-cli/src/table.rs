//! Result table rendering.

use console::style;
use earnwatch_client::format::{format_market_cap, format_pct_change, session_label, Polarity};
use earnwatch_client::types::{BacktestResult, HistoryRecord};

/// Render a result set as an aligned table with polarity-colored changes.
pub fn render_results(results: &[BacktestResult]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }

    println!(
        "{:<8} {:<28} {:>10} {:>12} {:<18} {:>10} {:>10} {:>9}  {}",
        "Symbol", "Company", "Mkt Cap", "Earnings", "Session", "Before", "After", "Change", "Window"
    );
    println!("{}", "-".repeat(120));

    for r in results {
        let change = format_pct_change(r.price_change_pct);
        let colored_change = match Polarity::of(r.price_change_pct) {
            Polarity::Up => style(change).green(),
            Polarity::Down => style(change).red(),
            Polarity::Flat => style(change).dim(),
        };

        let company = truncate(&r.company_name, 28);

        println!(
            "{:<8} {:<28} {:>10} {:>12} {:<18} {:>10.2} {:>10.2} {:>9}  {} → {}",
            r.symbol,
            company,
            format_market_cap(r.market_cap),
            r.earnings_date.to_string(),
            session_label(r.earnings_time),
            r.price_before,
            r.price_after,
            colored_change,
            r.date_before,
            r.date_after,
        );
    }

    println!();
    println!("{} result(s)", results.len());
}

/// Render the history index listing.
pub fn render_history(records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("No saved queries.");
        return;
    }

    println!(
        "{:<44} {:<8} {:<14} {:>8} {}",
        "Identifier", "Type", "Key", "Size", "Last Modified"
    );
    println!("{}", "-".repeat(100));

    for record in records {
        println!(
            "{:<44} {:<8} {:<14} {:>8} {}",
            truncate(&record.object_name, 44),
            record.query_type,
            record.query_key.as_deref().unwrap_or("-"),
            record.size,
            record.last_modified,
        );
    }

    println!();
    println!("{} entr{}", records.len(), if records.len() == 1 { "y" } else { "ies" });
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a very long company name", 10), "a very lo…");
    }
}
