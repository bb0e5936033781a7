//! Opening the device.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	actor::mixer::{InitArgs,Mixer},
	audio::{Audio,audio::OpenDevice},
	convert::AudioCvt,
	error::OpenError,
	format::AudioFormat,
	lock::AudioLock,
	macros::{debug2,error2,info2},
	output::{Drive,Fill},
	spec::{
		AudioCallback,AudioSpec,DesiredSpec,
		DEFAULT_CHANNELS,DEFAULT_FREQUENCY,SUPPORTED_CHANNELS,
		default_samples,
	},
};
use std::sync::Arc;

//---------------------------------------------------------------------------------------------------- Audio Impl
impl Audio {
	#[cold]
	#[inline(never)]
	/// Open the device.
	///
	/// Every unset (or zero) field of `desired` is filled in from
	/// [`Config`](crate::config::Config), then from the defaults.
	///
	/// If the backend can't do exactly what was asked for, audio is
	/// converted: the callback always gets buffers in the format,
	/// channel count and frequency of the returned spec.
	///
	/// The device opens paused, see [`Audio::pause`].
	///
	/// # Errors
	/// See [`OpenError`]. On error nothing stays allocated and
	/// the device can be opened again.
	pub fn open(&mut self, desired: DesiredSpec) -> Result<AudioSpec, OpenError> {
		self.open_inner(desired, false)
	}

	#[cold]
	#[inline(never)]
	/// Open the device, accepting whatever the backend opened.
	///
	/// No conversion happens, the callback writes in the backend's
	/// format directly. The returned spec is what the backend opened.
	///
	/// # Errors
	/// Same as [`Audio::open`].
	pub fn open_obtained(&mut self, desired: DesiredSpec) -> Result<AudioSpec, OpenError> {
		self.open_inner(desired, true)
	}

	/// Fill in, validate, and open.
	fn open_inner(&mut self, desired: DesiredSpec, obtained_only: bool) -> Result<AudioSpec, OpenError> {
		info2!("Audio - opening device...");
		debug2!("Audio - desired: {desired:?}, obtained only: {obtained_only}");

		if self.device.is_some() {
			return Err(OpenError::AlreadyOpen);
		}

		if self.backend.is_none() {
			let name = self.config.driver.clone();
			self.select(name.as_deref())?;
		}

		let spec = self.resolve(&desired)?;
		let Some(callback) = desired.callback else {
			return Err(OpenError::MissingCallback);
		};

		let Some(backend) = self.backend.as_mut() else {
			return Err(OpenError::NoAvailableDevice);
		};

		let lock = Arc::new(AudioLock::new(backend.device_lock()));

		let mut obtained = spec;
		self.state.enable();
		let drive = match backend.open(&mut obtained) {
			Ok(drive) => drive,
			Err(e) => {
				error2!("Audio - backend failed to open: {e}");
				self.state.disable();
				return Err(OpenError::BackendRejected(e));
			},
		};
		obtained.calculate();

		debug2!("Audio - backend opened: {obtained:?}, drive: {drive}");

		// From here on `close()` rolls everything back.
		self.device = Some(OpenDevice {
			drive,
			obtained,
			spec,
			lock: Arc::clone(&lock),
			mixer: None,
		});

		match self.start(callback, spec, obtained, drive, lock, obtained_only) {
			Ok(spec) => {
				info2!("Audio - device opened: {spec:?}");
				Ok(spec)
			},
			Err(e) => {
				error2!("Audio - open failed, rolling back: {e}");
				self.close();
				Err(e)
			},
		}
	}

	/// Fill in `desired` and validate it.
	fn resolve(&self, desired: &DesiredSpec) -> Result<AudioSpec, OpenError> {
		let config = &self.config;

		let frequency = desired.frequency
			.filter(|f| *f != 0)
			.or(config.frequency)
			.unwrap_or(DEFAULT_FREQUENCY);

		let channels = desired.channels
			.filter(|c| *c != 0)
			.or(config.channels)
			.unwrap_or(DEFAULT_CHANNELS);

		if !SUPPORTED_CHANNELS.contains(&channels) {
			return Err(OpenError::UnsupportedChannels(channels));
		}

		let format = match desired.format {
			Some(format) => format,
			None => config
				.parsed_format()
				.map_err(|e| OpenError::UnsupportedFormat(e.0))?
				.unwrap_or(AudioFormat::DEFAULT),
		};

		let samples = desired.samples
			.filter(|s| *s != 0)
			.or(config.samples)
			.unwrap_or_else(|| default_samples(frequency));

		Ok(AudioSpec::new(frequency, format, channels, samples))
	}

	/// Everything after the backend opened.
	///
	/// The caller closes the device if this fails.
	fn start(
		&mut self,
		callback: Box<dyn AudioCallback>,
		mut spec: AudioSpec,
		obtained: AudioSpec,
		drive: Drive,
		lock: Arc<AudioLock>,
		obtained_only: bool,
	) -> Result<AudioSpec, OpenError> {
		// A backend changing the buffer size is accepted.
		if spec.samples != obtained.samples {
			spec.samples = obtained.samples;
			spec.calculate();
		}

		let mut fallback = Vec::new();
		fallback.try_reserve_exact(obtained.size as usize).map_err(|_| OpenError::OutOfMemory)?;
		fallback.resize(obtained.size as usize, obtained.silence);

		let differs = spec.format != obtained.format
			|| spec.channels != obtained.channels
			|| spec.frequency != obtained.frequency;

		let cvt = if obtained_only {
			spec = obtained;
			None
		} else if differs {
			let mut cvt = AudioCvt::build(&spec, &obtained)?;

			// The callback is asked for exactly `cvt.len()` bytes,
			// which has to fit the returned spec.
			let frames = cvt.len() / spec.frame_size();
			spec.samples = u16::try_from(frames).map_err(|_| OpenError::UnsupportedFormat(format!(
				"converting {}Hz into {}Hz needs {frames} frames per callback, more than {}",
				spec.frequency, obtained.frequency, u16::MAX,
			)))?;
			spec.calculate();
			cvt.allocate()?;

			info2!("Audio - converting {} {}ch {}Hz -> {} {}ch {}Hz",
				spec.format, spec.channels, spec.frequency,
				obtained.format, obtained.channels, obtained.frequency,
			);
			Some(cvt)
		} else {
			None
		};

		let fill = Fill::new(callback, lock, Arc::clone(&self.state), &obtained, fallback, cvt);

		match drive {
			Drive::Thread => {
				let Some(backend) = self.backend.take() else {
					return Err(OpenError::NoAvailableDevice);
				};

				let args = InitArgs {
					backend,
					fill,
					spec: obtained,
					realtime: self.config.realtime_priority,
					max_failures: self.config.max_backend_failures,
				};

				match Mixer::init(args) {
					Ok(handle) => {
						if let Some(device) = self.device.as_mut() {
							device.mixer = Some(handle);
						}
					},
					Err((e, args)) => {
						error2!("Audio - failed to spawn the mixing thread: {e}");
						self.backend = Some(args.backend);
						return Err(OpenError::OutOfMemory);
					},
				}
			},

			Drive::SelfDriven => {
				let Some(backend) = self.backend.as_mut() else {
					return Err(OpenError::NoAvailableDevice);
				};
				backend.start(fill)?;
			},
		}

		if let Some(device) = self.device.as_mut() {
			device.spec = spec;
		}
		Ok(spec)
	}
}
