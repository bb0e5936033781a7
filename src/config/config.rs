//! Environment-style configuration.

//---------------------------------------------------------------------------------------------------- use
use std::{
	path::PathBuf,
	str::FromStr,
	time::Duration,
};
use crate::{
	config::constants::{
		ENV_DRIVER,
		ENV_FREQUENCY,
		ENV_FORMAT,
		ENV_CHANNELS,
		ENV_SAMPLES,
		ENV_DISK_FILE,
		ENV_DISK_DELAY,
		DEFAULT_MAX_BACKEND_FAILURES,
	},
	error::ParseFormatError,
	format::AudioFormat,
	macros::warn2,
};

#[allow(unused_imports)] // docs
use crate::{Audio,spec::DesiredSpec};

//---------------------------------------------------------------------------------------------------- Config
/// Configuration for [`Audio`].
///
/// The `frequency`, `format`, `channels` and `samples` fields
/// only fill in what the [`DesiredSpec`] left unset.
///
/// This is usually read from the environment with [`Config::from_env`],
/// but can be built by hand (or from any key/value source with
/// [`Config::from_vars`]) as well.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Config {
	//------------------------------------------ Backend
	/// Name of the backend to select.
	///
	/// `None` picks the first available backend.
	pub driver: Option<String>,

	//------------------------------------------ Desired spec fallbacks
	/// Sample rate.
	pub frequency: Option<u32>,
	/// Sample format string, `[U|S]<8|16>[LSB|MSB|SYS]`.
	///
	/// This is kept as a string and only parsed when the
	/// device is opened, a malformed string fails the open.
	pub format: Option<String>,
	/// Channel count.
	pub channels: Option<u8>,
	/// Frames per buffer.
	pub samples: Option<u16>,

	//------------------------------------------ Mixing thread
	/// Try to promote the mixing thread to real-time priority.
	///
	/// This needs the `realtime` feature, without it this is ignored.
	pub realtime_priority: bool,

	/// How many consecutive backend failures the mixing
	/// thread tolerates before it disables the device.
	///
	/// A backend reporting the device as unavailable
	/// disables the device immediately regardless.
	pub max_backend_failures: u32,

	//------------------------------------------ `disk` backend
	/// File the `disk` backend writes raw audio into.
	pub disk_file: Option<PathBuf>,
	/// How long the `disk` backend waits after each buffer.
	pub disk_delay: Option<Duration>,
}

impl Config {
	/// The default [`Config`], nothing is set.
	///
	/// ```rust
	/// # use hwaudio::config::*;
	/// Config {
	///     driver:               None,
	///     frequency:            None,
	///     format:               None,
	///     channels:             None,
	///     samples:              None,
	///     realtime_priority:    false,
	///     max_backend_failures: DEFAULT_MAX_BACKEND_FAILURES,
	///     disk_file:            None,
	///     disk_delay:           None,
	/// };
	/// ```
	pub const DEFAULT: Self = Self {
		driver:               None,
		frequency:            None,
		format:               None,
		channels:             None,
		samples:              None,
		realtime_priority:    false,
		max_backend_failures: DEFAULT_MAX_BACKEND_FAILURES,
		disk_file:            None,
		disk_delay:           None,
	};

	#[cold]
	#[must_use]
	/// Read the configuration from the process environment.
	///
	/// See [`Config::from_vars`] for the keys.
	pub fn from_env() -> Self {
		Self::from_vars(
			std::env::vars_os()
				.filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
		)
	}

	#[cold]
	#[must_use]
	/// Read the configuration from key/value pairs.
	///
	/// | Key | Field |
	/// |-----|-------|
	/// | `AUDIODEV_DRIVER`     | `driver`
	/// | `AUDIODEV_FREQUENCY`  | `frequency`
	/// | `AUDIODEV_FORMAT`     | `format`
	/// | `AUDIODEV_CHANNELS`   | `channels`
	/// | `AUDIODEV_SAMPLES`    | `samples`
	/// | `AUDIODEV_DISK_FILE`  | `disk_file`
	/// | `AUDIODEV_DISK_DELAY` | `disk_delay` (milliseconds)
	///
	/// Unknown keys are ignored. Empty values, numbers that
	/// don't parse, and zeros are treated as unset.
	///
	/// ```rust
	/// # use hwaudio::config::*;
	/// let config = Config::from_vars([
	///     ("AUDIODEV_FREQUENCY", "44100"),
	///     ("AUDIODEV_CHANNELS", "0"),
	///     ("AUDIODEV_FORMAT", "U8"),
	/// ]);
	/// assert_eq!(config.frequency, Some(44_100));
	/// assert_eq!(config.channels, None);
	/// assert_eq!(config.format.as_deref(), Some("U8"));
	/// ```
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut this = Self::DEFAULT;

		for (key, value) in vars {
			let (key, value) = (key.as_ref(), value.as_ref().trim());
			if value.is_empty() {
				continue;
			}

			match key {
				ENV_DRIVER     => this.driver     = Some(value.to_string()),
				ENV_FORMAT     => this.format     = Some(value.to_string()),
				ENV_FREQUENCY  => this.frequency  = parse_non_zero(key, value),
				ENV_CHANNELS   => this.channels   = parse_non_zero(key, value),
				ENV_SAMPLES    => this.samples    = parse_non_zero(key, value),
				ENV_DISK_FILE  => this.disk_file  = Some(PathBuf::from(value)),
				ENV_DISK_DELAY => this.disk_delay = parse_non_zero(key, value).map(Duration::from_millis),
				_ => (),
			}
		}

		this
	}

	/// Parse the configured format string, if any.
	///
	/// # Errors
	/// Returns the malformed string if it doesn't follow the format grammar.
	pub fn parsed_format(&self) -> Result<Option<AudioFormat>, ParseFormatError> {
		self.format
			.as_deref()
			.map(str::parse)
			.transpose()
	}

	#[must_use]
	/// Is `name` the configured driver (case-insensitive)?
	pub fn driver_is(&self, name: &str) -> bool {
		self.driver.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(name))
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::DEFAULT
	}
}

//---------------------------------------------------------------------------------------------------- Free functions
/// Parse a number, treating zero and garbage as unset.
fn parse_non_zero<T>(key: &str, value: &str) -> Option<T>
where
	T: FromStr + Default + PartialEq,
{
	match value.parse::<T>() {
		Ok(t) if t == T::default() => None,
		Ok(t) => Some(t),
		Err(_) => {
			warn2!("Config - ignoring {key}={value:?}, not a valid number");
			None
		},
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn default_is_unset() {
		assert_eq!(Config::default(), Config::DEFAULT);
		assert_eq!(Config::from_vars(Vec::<(String, String)>::new()), Config::DEFAULT);
	}

	#[test]
	fn from_vars() {
		let config = Config::from_vars([
			(ENV_DRIVER,     "disk"),
			(ENV_FREQUENCY,  "48000"),
			(ENV_FORMAT,     "S16MSB"),
			(ENV_CHANNELS,   " 6 "),
			(ENV_SAMPLES,    "512"),
			(ENV_DISK_FILE,  "/tmp/out.raw"),
			(ENV_DISK_DELAY, "20"),
			("PATH",         "/usr/bin"),
		]);

		assert_eq!(config.driver.as_deref(), Some("disk"));
		assert_eq!(config.frequency, Some(48_000));
		assert_eq!(config.parsed_format(), Ok(Some(AudioFormat::S16MSB)));
		assert_eq!(config.channels, Some(6));
		assert_eq!(config.samples, Some(512));
		assert_eq!(config.disk_file, Some(PathBuf::from("/tmp/out.raw")));
		assert_eq!(config.disk_delay, Some(Duration::from_millis(20)));
		assert!(config.driver_is("DISK"));
		assert!(!config.driver_is("dummy"));
	}

	#[test]
	fn garbage_is_unset() {
		let config = Config::from_vars([
			(ENV_FREQUENCY, "fast"),
			(ENV_CHANNELS,  "300"),
			(ENV_SAMPLES,   "-1"),
			(ENV_DRIVER,    "   "),
			(ENV_DISK_DELAY, "0"),
		]);
		assert_eq!(config, Config::DEFAULT);
	}

	#[test]
	fn malformed_format_is_kept_until_parsed() {
		let config = Config::from_vars([(ENV_FORMAT, "S24LSB")]);
		assert_eq!(config.format.as_deref(), Some("S24LSB"));
		assert_eq!(config.parsed_format(), Err(ParseFormatError("S24LSB".into())));
	}
}
