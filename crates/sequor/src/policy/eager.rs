use super::interface::SyncPolicy;

/// Flushes after every issued value.
///
/// Trades the hot path's network-free guarantee for a zero-value loss
/// window; useful where the coordination service is close and cheap.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerSyncPolicy;

impl SyncPolicy for EagerSyncPolicy {
    fn should_flush(&self, _local: i64, _persisted: i64) -> bool {
        true
    }
}
