//! Audio stream specifications.
//!
//! [`DesiredSpec`] is what the application asks for,
//! [`AudioSpec`] is what was actually negotiated.

mod spec;
pub use spec::AudioSpec;

mod desired;
pub use desired::DesiredSpec;

mod callback;
pub use callback::AudioCallback;

mod constants;
pub use constants::{
	DEFAULT_FREQUENCY,
	DEFAULT_CHANNELS,
	DEFAULT_BUFFER_MILLISECONDS,
	MAX_SAMPLES,
	SUPPORTED_CHANNELS,
};
pub(crate) use constants::default_samples;
