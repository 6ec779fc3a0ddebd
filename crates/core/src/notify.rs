//! Anomaly notification contract.

/// Side channel warning a user about a suspicious refresh attempt.
///
/// Implementations enqueue and return immediately: the request path must
/// never await delivery, and delivery failures must never propagate back
/// into the refresh response.
pub trait AnomalyNotifier: Send + Sync {
    /// Dispatch an origin-mismatch warning to the given address.
    fn notify_origin_mismatch(&self, email: &str);
}
