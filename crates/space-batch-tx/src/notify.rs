use tracing::info;

/// Fire-and-forget sink for user-facing summaries
///
/// The client calls this once per high-level action and never waits on or
/// inspects the result.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!(target: "space_batch_tx::notify", "{}", message);
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
}
