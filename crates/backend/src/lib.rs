//! Backend crate: kernel dispatch primitives for the adler workspace.
//!
//! - **Dispatch**: cached runtime kernel selection ([`dispatch`])
//! - **Caching**: `no_std`-friendly one-shot cache ([`cache`])
//! - **Capabilities**: re-exported from `platform`
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s.
//! Use the [`candidates!`] macro for concise syntax:
//!
//! ```ignore
//! use backend::dispatch::{Selected, select};
//! use platform::caps::{Caps, x86};
//!
//! fn select_adler32() -> Selected<fn(u32, &[u8]) -> u32> {
//!   select(platform::caps(), backend::candidates![fn(u32, &[u8]) -> u32;
//!     "x86_64/avx512-vnni" => x86::AVX512_VNNI_READY => vnni_kernel,
//!     "portable/lanes"     => Caps::NONE             => portable_kernel,
//!   ])
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;

pub use cache::OnceCache;
pub use dispatch::{Candidate, Dispatcher, Selected, select};
// Re-export platform types for convenience.
pub use platform;
