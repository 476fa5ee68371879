//! Adler-32 checksum with SIMD acceleration.
//!
//! # Hardware Acceleration
//!
//! | Platform | Kernel | Sub-block |
//! |----------|--------|-----------|
//! | x86_64 + AVX-512 VNNI | `x86_64/avx512-vnni` | 64 B |
//! | x86_64 + AVX2 | `x86_64/avx2` | 32 B |
//! | x86_64 + SSE4.1 | `x86_64/sse41` | 16 B |
//! | aarch64 | `aarch64/neon` | 16 B |
//! | everything else | `portable/lanes` | 32 B (emulated) |
//!
//! Selection happens once per process and is cached. Set `ADLER32_FORCE`
//! (`auto`, `portable`, `scalar`, `narrow`) to override it.
//!
//! # Example
//!
//! ```rust
//! use adler::{Adler32, Checksum, ChecksumCombine};
//!
//! // One-shot computation
//! let data = b"Wikipedia";
//! let sum = Adler32::checksum(data);
//! assert_eq!(sum, 0x11E6_0398);
//!
//! // Streaming computation
//! let mut hasher = Adler32::new();
//! hasher.update(b"Wiki");
//! hasher.update(b"pedia");
//! assert_eq!(hasher.finalize(), sum);
//!
//! // Combine independently computed halves
//! let (a, b) = data.split_at(4);
//! let joined = <Adler32 as ChecksumCombine>::combine(Adler32::checksum(a), Adler32::checksum(b), b.len());
//! assert_eq!(joined, sum);
//! ```
//!
//! # no_std Support
//!
//! Disable the `std` feature for embedded use. Without `std`, SIMD kernels
//! are only selected when enabled at compile time (`-C target-feature`).

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod adler32;
mod introspect;

pub use adler32::{Adler32, Adler32Config, Adler32Fn, Adler32Force, Kernel, adler32, combine};
pub use introspect::{DispatchInfo, KernelIntrospect, kernel_for};
pub use traits::{Checksum, ChecksumCombine};

/// Effective Adler-32 configuration (force mode after clamping to caps).
#[inline]
#[must_use]
pub fn config() -> Adler32Config {
  adler32::config::get()
}

#[doc(hidden)]
pub mod __internal {
  #[cfg(feature = "alloc")]
  pub use crate::adler32::kernel_test::{
    KernelEntry, KernelResult, available_kernels, get_kernel, run_all_kernels, verify_kernels,
  };
  pub use crate::adler32::reference::adler32_bytewise;
}
