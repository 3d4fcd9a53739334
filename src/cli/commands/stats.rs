//! Usage statistics command

use moyenne::config::Config;
use moyenne::counter::{FileUsageCounter, UsageCounter};

/// Print the completed-session count.
pub fn run(config: &Config) {
    let counter = FileUsageCounter::open(config.counter_path());
    println!("Completed sessions: {}", counter.total());
}
