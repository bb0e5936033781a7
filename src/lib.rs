//! Audio output device core.
//!
//! `hwaudio` opens one audio output device, negotiates its format with
//! a pluggable backend, and keeps it fed from a dedicated mixing thread
//! that repeatedly calls an application-supplied fill callback.
//!
//! The pieces:
//! - [`Audio`] is the device: backend selection, open, pause, lock, close
//! - [`spec`] holds what is asked for ([`spec::DesiredSpec`]) and what was obtained ([`spec::AudioSpec`])
//! - [`format`] holds the sample formats and their negotiation order
//! - [`output`] holds the [`output::Backend`] interface and the built-in drivers
//! - [`convert`] converts between what the callback writes and what the device plays
//! - [`lock`] keeps the application and the callback out of each other's way
//!
//! ```rust,no_run
//! use hwaudio::{Audio, config::Config, spec::DesiredSpec};
//!
//! let mut audio = Audio::init(Config::from_env());
//!
//! let mut phase = 0_u8;
//! let spec = audio.open(
//!     DesiredSpec::new()
//!         .frequency(44_100)
//!         .channels(1)
//!         .format(hwaudio::format::AudioFormat::U8)
//!         .callback(move |stream: &mut [u8]| {
//!             for byte in stream {
//!                 *byte = phase;
//!                 phase = phase.wrapping_add(4);
//!             }
//!         }),
//! ).unwrap();
//!
//! println!("opened: {spec:?}");
//! audio.pause(false);
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! audio.close();
//! ```

//---------------------------------------------------------------------------------------------------- Lints
#![allow(
    clippy::len_zero,
    clippy::type_complexity,
    clippy::module_inception,
)]

#![deny(
    nonstandard_style,
    deprecated,
    missing_docs,
)]

#![forbid(
    unused_mut,
    unused_unsafe,
    future_incompatible,
    break_with_label_and_loop,
    coherence_leak_check,
    duplicate_macro_attributes,
    exported_private_dependencies,
    for_loops_over_fallibles,
    large_assignments,
    overlapping_range_endpoints,
    semicolon_in_expressions_from_macros,
    redundant_semicolons,
    unconditional_recursion,
    unreachable_patterns,
    unused_allocation,
    unused_braces,
    unused_comparisons,
    unused_doc_comments,
    unused_parens,
    unused_labels,
    while_true,
    keyword_idents,
    non_ascii_idents,
    noop_method_call,
	unreachable_pub,
    single_use_lifetimes,
	// variant_size_differences,
)]

//---------------------------------------------------------------------------------------------------- Public API
mod audio;
pub use audio::{Audio,AudioHandle};

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod lock;
pub mod output;
pub mod spec;
pub mod state;

//---------------------------------------------------------------------------------------------------- Private Usage
mod actor;
mod macros;
