use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    analyses: AtomicU64,
    analysis_warnings: AtomicU64,
    suspicious_digits: AtomicU64,
    chart_failures: AtomicU64,
    dataset_reloads: AtomicU64,
    dataset_reload_errors: AtomicU64,
}

impl Metrics {
    pub fn record_analysis(&self, suspicious_digits: usize) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        self.suspicious_digits
            .fetch_add(suspicious_digits as u64, Ordering::Relaxed);
    }

    pub fn record_analysis_warning(&self) {
        self.analysis_warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chart_failure(&self) {
        self.chart_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dataset_reload(&self) {
        self.dataset_reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dataset_reload_error(&self) {
        self.dataset_reload_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn analyses(&self) -> u64 {
        self.analyses.load(Ordering::Relaxed)
    }

    pub fn analysis_warnings(&self) -> u64 {
        self.analysis_warnings.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let analyses = self.analyses.load(Ordering::Relaxed);
        let warnings = self.analysis_warnings.load(Ordering::Relaxed);
        let suspicious = self.suspicious_digits.load(Ordering::Relaxed);
        let chart_failures = self.chart_failures.load(Ordering::Relaxed);
        let reloads = self.dataset_reloads.load(Ordering::Relaxed);
        let reload_errors = self.dataset_reload_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE tenderscope_benford_analyses_total counter\n\
tenderscope_benford_analyses_total {}\n\
# TYPE tenderscope_benford_warnings_total counter\n\
tenderscope_benford_warnings_total {}\n\
# TYPE tenderscope_benford_suspicious_digits_total counter\n\
tenderscope_benford_suspicious_digits_total {}\n\
# TYPE tenderscope_chart_failures_total counter\n\
tenderscope_chart_failures_total {}\n\
# TYPE tenderscope_dataset_reloads_total counter\n\
tenderscope_dataset_reloads_total {}\n\
# TYPE tenderscope_dataset_reload_errors_total counter\n\
tenderscope_dataset_reload_errors_total {}\n",
            analyses, warnings, suspicious, chart_failures, reloads, reload_errors
        )
    }
}
