//! Device state shared between the application and the mixing thread.

mod device_state;
pub(crate) use device_state::DeviceState;

mod status;
pub use status::AudioStatus;
