//---------------------------------------------------------------------------------------------------- Use
#[allow(unused_imports)] // docs
use crate::format::AudioFormat;

//---------------------------------------------------------------------------------------------------- ParseFormatError
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid audio format string: `{0}`, expected `[U|S]<8|16>[LSB|MSB|SYS]`")]
/// Error returned when parsing an [`AudioFormat`] from a `str` fails.
///
/// The invalid input is kept for the error message.
pub struct ParseFormatError(pub String);
