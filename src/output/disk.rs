//! Disk audio output.
//!
//! Writes the raw PCM stream, exactly as the mixing thread
//! hands it over, to a file. Useful for capturing what an
//! application plays, or for testing without hardware.
//!
//! Only available when requested by name (`AUDIODEV_DRIVER=disk`).

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	config::Config,
	error::OutputError,
	macros::{debug2,error2,info2},
	output::{
		Backend,DeviceBuffer,Drive,
		constants::{DISK_DEFAULT_DELAY,DISK_DEFAULT_FILE},
	},
	spec::AudioSpec,
};
use std::{
	fs::File,
	io::{self,BufWriter,Write},
	path::PathBuf,
	time::Duration,
};

//---------------------------------------------------------------------------------------------------- Disk
#[derive(Debug)]
pub(crate) struct Disk {
	path: PathBuf,
	/// Slept in every `wait()`.
	delay: Duration,
	file: Option<BufWriter<File>>,
	/// The mix buffer handed out by `buffer()`.
	buf: Vec<u8>,
}

impl Disk {
	pub(crate) fn new(config: &Config) -> Self {
		Self {
			path: config.disk_file.clone().unwrap_or_else(|| PathBuf::from(DISK_DEFAULT_FILE)),
			delay: config.disk_delay.unwrap_or(DISK_DEFAULT_DELAY),
			file: None,
			buf: Vec::new(),
		}
	}
}

//---------------------------------------------------------------------------------------------------- `Backend` Impl
impl Backend for Disk {
	#[cold]
	#[inline(never)]
	fn open(&mut self, spec: &mut AudioSpec) -> Result<Drive, OutputError> {
		let file = File::create(&self.path)?;
		info2!("Disk - writing audio to: {}", self.path.display());
		debug2!("Disk - spec: {spec:?}, delay: {:?}", self.delay);

		let size = spec.size as usize;
		let mut buf = Vec::new();
		buf.try_reserve_exact(size).map_err(|_| OutputError::Unknown("out of memory".into()))?;
		buf.resize(size, spec.silence);

		self.file = Some(BufWriter::new(file));
		self.buf = buf;
		Ok(Drive::Thread)
	}

	fn buffer(&mut self) -> DeviceBuffer<'_> {
		DeviceBuffer::Real(&mut self.buf)
	}

	fn play(&mut self) -> Result<(), OutputError> {
		let Some(file) = self.file.as_mut() else {
			return Err(OutputError::DeviceUnavailable);
		};

		file.write_all(&self.buf).map_err(|e| {
			error2!("Disk - write failed: {e}");
			write_error(&e)
		})
	}

	fn wait(&mut self) -> Result<(), OutputError> {
		std::thread::sleep(self.delay);
		Ok(())
	}

	fn wait_done(&mut self) {
		if let Some(Err(e)) = self.file.as_mut().map(Write::flush) {
			error2!("Disk - flush failed: {e}");
		}
	}

	#[cold]
	#[inline(never)]
	fn close(&mut self) {
		debug2!("Disk - close()");
		if let Some(mut file) = self.file.take() {
			if let Err(e) = file.flush() {
				error2!("Disk - flush failed: {e}");
			}
		}
		self.buf = Vec::new();
	}
}

//---------------------------------------------------------------------------------------------------- Free functions
/// Short or interrupted writes may go through next time,
/// anything else means the file is gone for good.
fn write_error(error: &io::Error) -> OutputError {
	match error.kind() {
		io::ErrorKind::WriteZero | io::ErrorKind::Interrupted => OutputError::Write,
		_ => OutputError::DeviceUnavailable,
	}
}
