//! Backend discovery and selection.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	config::Config,
	error::{OpenError,OutputError},
	macros::{debug2,info2,warn2},
	output::Backend,
};
use std::{
	borrow::Cow,
	fmt,
	sync::Arc,
};

//---------------------------------------------------------------------------------------------------- Driver
/// Is this driver usable right now?
type Available = Arc<dyn Fn(&Config) -> bool + Send + Sync>;
/// Create a fresh backend instance.
type Create = Arc<dyn Fn(&Config) -> Result<Box<dyn Backend>, OutputError> + Send + Sync>;

/// A registered backend: its name and how to make one.
#[derive(Clone)]
pub struct Driver {
	name: Cow<'static, str>,
	description: Cow<'static, str>,
	available: Available,
	create: Create,
}

impl Driver {
	#[must_use]
	/// Register a backend.
	///
	/// - `available` is a cheap probe, e.g. "does the device node exist"
	/// - `create` makes a new, un-opened backend
	///
	/// ```rust
	/// # use hwaudio::output::*;
	/// let driver = Driver::new(
	///     "silent",
	///     "Discards everything",
	///     |_config| true,
	///     |config| Driver::dummy().create(config),
	/// );
	/// assert_eq!(driver.name(), "silent");
	/// ```
	pub fn new<N, D, A, C>(name: N, description: D, available: A, create: C) -> Self
	where
		N: Into<Cow<'static, str>>,
		D: Into<Cow<'static, str>>,
		A: Fn(&Config) -> bool + Send + Sync + 'static,
		C: Fn(&Config) -> Result<Box<dyn Backend>, OutputError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			description: description.into(),
			available: Arc::new(available),
			create: Arc::new(create),
		}
	}

	#[must_use]
	/// The `dummy` driver.
	///
	/// Always available, plays nothing, but keeps the
	/// callback running at the device's pace.
	pub fn dummy() -> Self {
		Self::new(
			"dummy",
			"Silent output, paced by a timer",
			|_| true,
			|_| Ok(Box::new(crate::output::dummy::Dummy::new())),
		)
	}

	#[must_use]
	/// The `disk` driver.
	///
	/// Writes raw PCM to a file, only available when
	/// explicitly requested with [`Config::driver`].
	pub fn disk() -> Self {
		Self::new(
			"disk",
			"Raw PCM written to a file",
			|config| config.driver_is("disk"),
			|config| Ok(Box::new(crate::output::disk::Disk::new(config))),
		)
	}

	#[cfg(feature = "cpal")]
	#[must_use]
	/// The `cpal` driver, the system's default output device.
	pub fn cpal() -> Self {
		Self::new(
			"cpal",
			"System default output device",
			|_| crate::output::cpal::Cpal::available(),
			|_| Ok(Box::new(crate::output::cpal::Cpal::new())),
		)
	}

	#[inline]
	#[must_use]
	/// The driver's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	#[inline]
	#[must_use]
	/// A human readable description.
	pub fn description(&self) -> &str {
		&self.description
	}

	#[must_use]
	/// Probe whether this driver is usable.
	pub fn available(&self, config: &Config) -> bool {
		(self.available)(config)
	}

	/// Create a backend instance.
	///
	/// # Errors
	/// Whatever the driver fails with.
	pub fn create(&self, config: &Config) -> Result<Box<dyn Backend>, OutputError> {
		(self.create)(config)
	}
}

impl fmt::Debug for Driver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Driver")
			.field("name", &self.name)
			.field("description", &self.description)
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- Registry
/// The priority-ordered list of drivers.
#[derive(Clone,Debug)]
pub struct Registry {
	drivers: Vec<Driver>,
}

impl Default for Registry {
	/// The compiled-in drivers, in order:
	/// `cpal` (with the `cpal` feature), `disk`, `dummy`.
	fn default() -> Self {
		let mut drivers = Vec::with_capacity(3);

		#[cfg(feature = "cpal")]
		drivers.push(Driver::cpal());

		drivers.push(Driver::disk());
		drivers.push(Driver::dummy());

		Self { drivers }
	}
}

impl Registry {
	#[must_use]
	/// A registry with exactly these drivers, highest priority first.
	pub fn new(drivers: Vec<Driver>) -> Self {
		Self { drivers }
	}

	#[must_use]
	/// All registered drivers, highest priority first.
	pub fn drivers(&self) -> &[Driver] {
		&self.drivers
	}

	#[cold]
	#[inline(never)]
	/// Pick a backend.
	///
	/// With a `name`, only the driver with that (case-insensitive)
	/// name is considered and it must be available.
	///
	/// Without one, drivers are tried in priority order and the
	/// first that is available and creates successfully wins.
	///
	/// # Errors
	/// - [`OpenError::NoSuchDevice`] if `name` doesn't exist, isn't available or fails to create
	/// - [`OpenError::NoAvailableDevice`] if no driver worked
	pub fn select(
		&self,
		name: Option<&str>,
		config: &Config,
	) -> Result<(&Driver, Box<dyn Backend>), OpenError> {
		if let Some(name) = name {
			let Some(driver) = self.drivers.iter().find(|d| d.name.eq_ignore_ascii_case(name)) else {
				warn2!("Registry - no driver named `{name}`");
				return Err(OpenError::NoSuchDevice(name.into()));
			};

			if !driver.available(config) {
				warn2!("Registry - driver `{name}` is not available");
				return Err(OpenError::NoSuchDevice(name.into()));
			}

			return match driver.create(config) {
				Ok(backend) => {
					info2!("Registry - selected driver: {}", driver.name);
					Ok((driver, backend))
				},
				Err(e) => {
					warn2!("Registry - driver `{name}` failed to create: {e}");
					Err(OpenError::NoSuchDevice(name.into()))
				},
			};
		}

		for driver in &self.drivers {
			if !driver.available(config) {
				debug2!("Registry - skipping unavailable driver: {}", driver.name);
				continue;
			}

			match driver.create(config) {
				Ok(backend) => {
					info2!("Registry - selected driver: {}", driver.name);
					return Ok((driver, backend));
				},
				Err(e) => warn2!("Registry - driver `{}` failed to create: {e}", driver.name),
			}
		}

		Err(OpenError::NoAvailableDevice)
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::{TestBackend,TestStats};
	use pretty_assertions::assert_eq;

	fn test_driver(name: &'static str, available: bool, creates: bool) -> Driver {
		Driver::new(
			name,
			"test",
			move |_| available,
			move |_| if creates {
				Ok(Box::new(TestBackend::new(TestStats::new())))
			} else {
				Err(OutputError::DeviceUnavailable)
			},
		)
	}

	#[test]
	fn default_order() {
		let registry = Registry::default();
		let names: Vec<&str> = registry.drivers().iter().map(Driver::name).collect();

		#[cfg(feature = "cpal")]
		assert_eq!(names, ["cpal", "disk", "dummy"]);
		#[cfg(not(feature = "cpal"))]
		assert_eq!(names, ["disk", "dummy"]);
	}

	#[test]
	fn unnamed_skips_unavailable_and_failing() {
		let registry = Registry::new(vec![
			test_driver("a", false, true),
			test_driver("b", true, false),
			test_driver("c", true, true),
			test_driver("d", true, true),
		]);
		let (driver, _) = registry.select(None, &Config::DEFAULT).unwrap();
		assert_eq!(driver.name(), "c");
	}

	#[test]
	fn unnamed_none_usable() {
		let registry = Registry::new(vec![
			test_driver("a", false, true),
			test_driver("b", true, false),
		]);
		assert!(matches!(
			registry.select(None, &Config::DEFAULT),
			Err(OpenError::NoAvailableDevice)
		));
		assert!(matches!(
			Registry::new(vec![]).select(None, &Config::DEFAULT),
			Err(OpenError::NoAvailableDevice)
		));
	}

	#[test]
	fn named_is_case_insensitive() {
		let registry = Registry::new(vec![
			test_driver("first", true, true),
			test_driver("Second", true, true),
		]);
		let (driver, _) = registry.select(Some("SECOND"), &Config::DEFAULT).unwrap();
		assert_eq!(driver.name(), "Second");
	}

	#[test]
	fn named_errors() {
		let registry = Registry::new(vec![
			test_driver("off", false, true),
			test_driver("broken", true, false),
		]);

		for name in ["off", "broken", "missing"] {
			match registry.select(Some(name), &Config::DEFAULT) {
				Err(OpenError::NoSuchDevice(n)) => assert_eq!(n, name),
				other => panic!("{name}: {:?}", other.map(|(d, _)| d.name().to_string())),
			}
		}
	}

	#[test]
	fn disk_only_when_requested() {
		let registry = Registry::new(vec![Driver::disk(), Driver::dummy()]);

		let (driver, _) = registry.select(None, &Config::DEFAULT).unwrap();
		assert_eq!(driver.name(), "dummy");

		let config = Config { driver: Some("disk".into()), ..Config::DEFAULT };
		let (driver, _) = registry.select(None, &config).unwrap();
		assert_eq!(driver.name(), "disk");

		assert!(matches!(
			registry.select(Some("disk"), &Config::DEFAULT),
			Err(OpenError::NoSuchDevice(_))
		));
	}
}
