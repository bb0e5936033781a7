//! Audio output backends.
//!
//! [`Backend`] is the interface every output implements,
//! [`Registry`] is the list of [`Driver`]s a backend is picked from.

mod constants;

mod output;
pub use output::{Backend,DeviceBuffer,Drive};

mod registry;
pub use registry::{Driver,Registry};

pub use crate::actor::Fill;

mod dummy;
mod disk;

cfg_if::cfg_if! {
	if #[cfg(feature = "cpal")] {
		mod cpal;
	}
}
