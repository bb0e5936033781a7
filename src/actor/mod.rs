//! The threads (or callback contexts) that produce audio.
//!
//! [`fill`] is the per-buffer pipeline shared by both kinds of backends,
//! [`mixer`] is the thread that drives backends that can't drive themselves.

mod fill;
pub use fill::Fill;

pub(crate) mod mixer;
