/// Result of probing the coordination service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Health {
    /// Whether the coordination service answered the probe.
    pub connected: bool,

    /// Number of sequence keys known to the coordination service at probe
    /// time. Zero when disconnected.
    pub total_keys: usize,
}
