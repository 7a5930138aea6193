//! Queue timing constants.

use std::time::Duration;

/// Quiet period before a pending re-scan runs. Rapid successive edits
/// within this window collapse into a single re-detection.
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Worker wake-up interval while waiting for deadlines.
pub const TICK: Duration = Duration::from_millis(10);
