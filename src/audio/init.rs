//! Creating an [`Audio`] and selecting its backend.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	audio::Audio,
	config::Config,
	error::OpenError,
	macros::{debug2,info2,warn2},
	output::Registry,
	state::DeviceState,
};
use std::sync::Arc;

//---------------------------------------------------------------------------------------------------- Audio Impl
impl Audio {
	#[cold]
	#[inline(never)]
	/// Create an `Audio` with the built-in drivers.
	///
	/// A backend is selected right away, by [`Config::driver`] if set,
	/// else by probing every driver in priority order.
	///
	/// Failing to find a backend is not fatal here, selection
	/// is tried again by [`Audio::open`] (which then fails).
	pub fn init(config: Config) -> Self {
		Self::with_registry(Registry::default(), config)
	}

	#[cold]
	#[inline(never)]
	/// [`Audio::init`] with [`Config::from_env`].
	pub fn from_env() -> Self {
		Self::init(Config::from_env())
	}

	#[cold]
	#[inline(never)]
	/// Create an `Audio` selecting from a custom [`Registry`].
	pub fn with_registry(registry: Registry, config: Config) -> Self {
		info2!("Audio - initializing...");
		debug2!("Audio - config: {config:#?}");

		let mut this = Self {
			registry,
			config,
			state: Arc::new(DeviceState::DEFAULT),
			driver: None,
			backend: None,
			device: None,
		};

		let name = this.config.driver.clone();
		if let Err(e) = this.select(name.as_deref()) {
			warn2!("Audio - no backend selected: {e}");
		}

		this
	}

	#[cold]
	#[inline(never)]
	/// Select a backend, by name or by probing.
	///
	/// Any open device is closed and the previously selected
	/// backend is released first, even if selection then fails.
	///
	/// # Errors
	/// See [`Registry::select`].
	pub fn select(&mut self, name: Option<&str>) -> Result<&str, OpenError> {
		self.quit();

		let (driver, backend) = self.registry.select(name, &self.config)?;
		let name = driver.name().to_string();

		info2!("Audio - using driver: {name}");
		self.backend = Some(backend);
		Ok(self.driver.insert(name).as_str())
	}

	#[cold]
	#[inline(never)]
	/// Close any open device and release the backend.
	///
	/// The next [`Audio::open`] selects a backend again.
	pub fn quit(&mut self) {
		self.close();

		if let Some(driver) = self.driver.take() {
			debug2!("Audio - releasing driver: {driver}");
		}
		self.backend = None;
	}
}
