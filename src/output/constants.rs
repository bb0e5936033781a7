//---------------------------------------------------------------------------------------------------- Use
use std::time::Duration;

//---------------------------------------------------------------------------------------------------- Constants
/// The most any built-in backend's `wait()` blocks for.
pub(crate) const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Where the `disk` backend writes to, if not configured.
pub(crate) const DISK_DEFAULT_FILE: &str = "audiodev.raw";

/// How long the `disk` backend sleeps per buffer, if not configured.
pub(crate) const DISK_DEFAULT_DELAY: Duration = Duration::from_millis(150);
