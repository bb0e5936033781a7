//! Sample formats and format negotiation.
//!
//! [`AudioFormat`] is one of the 6 base PCM formats the core knows about.
//!
//! [`FormatCandidates`] is the ordered fallback sequence a backend walks
//! when its hardware doesn't accept the exact format that was asked for.

mod format;
pub use format::AudioFormat;

mod candidates;
pub use candidates::FormatCandidates;
