//! End-of-run statistics

use std::collections::BTreeMap;

/// Aggregated counters for one crawl run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Detail pages attempted
    pub processed: u64,

    /// Records written to the sink
    pub saved: u64,

    /// Records dropped by the signal or district filters
    pub skipped: u64,

    /// Content-level misses (challenge timeouts, failed refetches)
    pub misses: u64,

    /// Network-level fetch failures, tallied separately from misses
    pub fetch_failures: u64,

    /// Saved counts keyed by `city/district` scope label
    pub saved_by_scope: BTreeMap<String, u64>,
}

impl RunSummary {
    pub fn record_saved(&mut self, scope_label: &str) {
        self.saved += 1;
        *self.saved_by_scope.entry(scope_label.to_string()).or_insert(0) += 1;
    }
}

/// Prints a human-readable run summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    println!("\n=== Crawl Summary ===");
    println!("Pages processed:  {}", summary.processed);
    println!("Records saved:    {}", summary.saved);
    println!("Records skipped:  {}", summary.skipped);
    println!("Misses:           {}", summary.misses);
    println!("Fetch failures:   {}", summary.fetch_failures);

    if !summary.saved_by_scope.is_empty() {
        println!("\nSaved by scope:");
        for (scope, count) in &summary.saved_by_scope {
            println!("  {scope}: {count}");
        }
    }
    println!();
}
