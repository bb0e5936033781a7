//! Closing the device.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	audio::Audio,
	macros::{debug2,error2,info2},
};

//---------------------------------------------------------------------------------------------------- Audio Impl
impl Audio {
	#[cold]
	#[inline(never)]
	/// Close the device.
	///
	/// This stops the callback, waits for the mixing thread to exit
	/// (bounded by the backend's wait timeout, around 1 second) and
	/// closes the backend. Calling this with no device open does nothing.
	///
	/// The backend stays selected, the device can be opened again.
	pub fn close(&mut self) {
		let Some(device) = self.device.take() else {
			return;
		};

		info2!("Audio - closing device...");
		self.state.disable();

		if let Some(mixer) = device.mixer {
			debug2!("Audio - joining the mixing thread...");
			match mixer.join() {
				Ok(Some(backend)) => self.backend = Some(backend),
				Ok(None) => error2!("Audio - mixing thread exited without its backend"),
				Err(_) => error2!("Audio - mixing thread panicked, the backend is lost"),
			}
		}

		if let Some(backend) = self.backend.as_mut() {
			backend.close();
		}

		// The lock goes last, nothing can be running the callback anymore.
		drop(device.lock);
		info2!("Audio - device closed");
	}
}

//---------------------------------------------------------------------------------------------------- Drop
impl Drop for Audio {
	#[cold]
	#[inline(never)]
	fn drop(&mut self) {
		self.quit();
	}
}
