//! Utility helpers for AniAnglia.

mod format;
mod gpu;
mod options;
mod poll;

pub use format::*;
pub use gpu::{check_gpu_support, probe_gpu, GpuError, GpuInterface};
pub use options::*;
pub use poll::{fallback, poll_with_interval, PollOutcome, POLL_INTERVAL};
