use thiserror::Error;

/// Why a channel could not be created.
///
/// Runtime backpressure (no space, no data, timeout) is never an error; those
/// calls report `0` bytes transferred instead.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CreateError {
    #[error("failed to allocate {bytes} bytes of channel storage")]
    Alloc { bytes: usize },

    #[error("trigger level {trigger_level} exceeds capacity {capacity}")]
    TriggerLevel { trigger_level: usize, capacity: usize },

    #[error("capacity {capacity} is too small; framing needs more than {required} bytes")]
    TooSmall { capacity: usize, required: usize },
}
