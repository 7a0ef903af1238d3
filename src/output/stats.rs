//! Statistics display for a finished crawl

use crate::crawler::CrawlStats;

/// Renders statistics as a human-readable block
pub fn format_statistics(stats: &CrawlStats) -> String {
    let succeeded = stats.pages_fetched.saturating_sub(stats.fetch_failures);
    let success_rate = if stats.pages_fetched > 0 {
        succeeded as f64 / stats.pages_fetched as f64 * 100.0
    } else {
        0.0
    };

    let mut out = String::from("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    out.push_str(&format!("  Pages emitted: {}\n", stats.pages_emitted));
    out.push_str(&format!("  Failed fetches: {}\n", stats.fetch_failures));
    out.push_str(&format!("  Links enqueued: {}\n", stats.links_enqueued));
    out.push_str(&format!("  Skipped (too deep): {}\n", stats.skipped_depth));
    out.push_str(&format!("  Deepest level: {}\n", stats.deepest_level));
    out.push_str(&format!(
        "\nSuccess Rate: {:.1}% ({} / {} fetches succeeded)\n",
        success_rate, succeeded, stats.pages_fetched
    ));

    out
}

/// Prints statistics to stderr, keeping stdout free for the corpus
pub fn print_statistics(stats: &CrawlStats) {
    eprint!("{}", format_statistics(stats));
}
