//! Errors that can occur.
//!
//! Only [`Audio::open`](crate::Audio::open) is fallible from the
//! application's point of view, everything it can fail with is an
//! [`OpenError`]. Backends report their own failures as [`OutputError`].

mod open;
pub use open::OpenError;

mod output;
pub use output::OutputError;

mod format;
pub use format::ParseFormatError;
