use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared with handlers through `web::Data`
#[derive(Debug, Default)]
pub struct AppMetrics {
    file_server_hits: AtomicU64,
}

impl AppMetrics {
    pub fn record_hit(&self) {
        self.file_server_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.file_server_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.file_server_hits.store(0, Ordering::Relaxed);
    }
}
