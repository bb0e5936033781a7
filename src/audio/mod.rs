//! The [`Audio`] context.
//!
//! `audio.rs` holds the type and its simple accessors, the
//! lifecycle is split across `init.rs`, `open.rs` and `close.rs`.

mod audio;
pub use audio::Audio;

mod handle;
pub use handle::AudioHandle;

mod init;
mod open;
mod close;
