use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// The three platform calls the workflow makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    CreateAssistant,
    PurchaseNumber,
    AssociateNumber,
}

impl RemoteOperation {
    pub const ALL: [RemoteOperation; 3] = [
        RemoteOperation::CreateAssistant,
        RemoteOperation::PurchaseNumber,
        RemoteOperation::AssociateNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteOperation::CreateAssistant => "create_assistant",
            RemoteOperation::PurchaseNumber => "purchase_number",
            RemoteOperation::AssociateNumber => "associate_number",
        }
    }

    fn index(&self) -> usize {
        match self {
            RemoteOperation::CreateAssistant => 0,
            RemoteOperation::PurchaseNumber => 1,
            RemoteOperation::AssociateNumber => 2,
        }
    }
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform API usage metrics
#[derive(Debug, Default)]
pub struct RemoteApiMetrics {
    requests: [AtomicU64; 3],
    errors: [AtomicU64; 3],
}

impl RemoteApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, operation: RemoteOperation) {
        self.requests[operation.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, operation: RemoteOperation) {
        self.errors[operation.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> RemoteApiStats {
        let load = |counters: &[AtomicU64; 3]| {
            RemoteOperation::ALL.map(|op| (op, counters[op.index()].load(Ordering::Relaxed)))
        };
        RemoteApiStats {
            requests: load(&self.requests),
            errors: load(&self.errors),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            total_requests = stats.total_requests(),
            total_errors = stats.total_errors(),
            requests = ?stats.requests,
            errors = ?stats.errors,
            "Platform API metrics"
        );
    }
}

#[derive(Debug, Clone)]
pub struct RemoteApiStats {
    pub requests: [(RemoteOperation, u64); 3],
    pub errors: [(RemoteOperation, u64); 3],
}

impl RemoteApiStats {
    pub fn total_requests(&self) -> u64 {
        self.requests.iter().map(|(_, n)| n).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.errors.iter().map(|(_, n)| n).sum()
    }

    pub fn requests_for(&self, operation: RemoteOperation) -> u64 {
        self.requests[operation.index()].1
    }

    pub fn errors_for(&self, operation: RemoteOperation) -> u64 {
        self.errors[operation.index()].1
    }
}

/// Global metrics instance
static REMOTE_METRICS: std::sync::LazyLock<RemoteApiMetrics> =
    std::sync::LazyLock::new(RemoteApiMetrics::new);

pub fn remote_metrics() -> &'static RemoteApiMetrics {
    &REMOTE_METRICS
}
