use std::sync::atomic::{AtomicU64, Ordering};

/// Returns a process-unique id for correlating a connection's log lines.
pub fn next_conn_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
