//! Configuration for [`Audio`](crate::Audio).
//!
//! [`Config`] is an environment-style key/value configuration
//! resolved once when the device is opened. Any value left unset
//! falls through to the defaults in [`spec`](crate::spec).

mod config;
pub use config::Config;

mod constants;
pub use constants::{
	ENV_DRIVER,
	ENV_FREQUENCY,
	ENV_FORMAT,
	ENV_CHANNELS,
	ENV_SAMPLES,
	ENV_DISK_FILE,
	ENV_DISK_DELAY,
	DEFAULT_MAX_BACKEND_FAILURES,
};
