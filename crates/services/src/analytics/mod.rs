mod domains;
mod report;

// Public API of the analytics subsystem.
pub use domains::{averaged_domains, domain_percentages, latest_weakest_domain};
pub use report::{
    PerformanceReport, RECENT_WINDOW, Recommendation, TOTAL_EXAM_DOMAINS, Trend, WeaknessSeverity,
};
