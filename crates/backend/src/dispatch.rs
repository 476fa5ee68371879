//! Kernel dispatch: selection and caching.
//!
//! This module provides the core dispatch primitives:
//!
//! - [`Candidate`]: A kernel with capability requirements
//! - [`Selected`]: The result of kernel selection
//! - [`select`]: Choose the best kernel from a candidate list
//! - [`Dispatcher`]: A static, lazily selected kernel
//!
//! # Design
//!
//! Selection runs once per process. The dispatcher detects CPU features on
//! first use and caches the selected kernel; subsequent calls are a single
//! indirect call.
//!
//! # Usage
//!
//! ```ignore
//! use backend::dispatch::{Dispatcher, Selected, select};
//! use platform::caps::{Caps, x86};
//!
//! type Adler32Fn = fn(u32, &[u8]) -> u32;
//!
//! fn select_adler32() -> Selected<Adler32Fn> {
//!   select(platform::caps(), backend::candidates![Adler32Fn;
//!     "x86_64/avx2"    => x86::AVX2_READY => avx2_kernel,
//!     "portable/lanes" => Caps::NONE      => portable_kernel,
//!   ])
//! }
//!
//! static DISPATCH: Dispatcher<Adler32Fn> = Dispatcher::new(select_adler32);
//! ```

use platform::{Caps, CpuCaps};

use crate::cache::OnceCache;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/avx2").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`. If
/// none is satisfied, the last candidate is returned; lists therefore end
/// with a portable kernel (`requires = Caps::NONE`).
///
/// # Panics
///
/// Panics if `candidates` is empty.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: CpuCaps, candidates: &[Candidate<F>]) -> Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return Selected::new(candidate.name, candidate.func);
    }
  }

  match candidates.last() {
    Some(last) => Selected::new(last.name, last.func),
    None => panic!("no kernel candidates registered"),
  }
}

/// Build a `&[Candidate<_>]` list.
///
/// The optional leading type pins the function-pointer type so that distinct
/// `fn` items coerce to it.
///
/// ```ignore
/// candidates![Adler32Fn;
///   "x86_64/sse41"   => x86::SSE41_READY => sse41_kernel,
///   "portable/lanes" => Caps::NONE       => portable_kernel,
/// ]
/// ```
#[macro_export]
macro_rules! candidates {
  ($ty:ty; $($name:expr => $req:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::<$ty>::new($name, $req, $func)),+]
  };
  ($($name:expr => $req:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $req, $func)),+]
  };
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// A lazily selected kernel, suitable for a `static`.
///
/// The selector runs once on first access (per-call on targets without
/// atomics). Under `std` the cache is a `OnceLock`.
pub struct Dispatcher<F: Copy + 'static> {
  cache: OnceCache<Selected<F>>,
  selector: fn() -> Selected<F>,
}

impl<F: Copy + 'static> Dispatcher<F> {
  /// Create a new dispatcher with the given selector function.
  #[must_use]
  pub const fn new(selector: fn() -> Selected<F>) -> Self {
    Self {
      cache: OnceCache::new(),
      selector,
    }
  }

  /// Get the selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<F> {
    self.cache.get_or_init(self.selector)
  }

  /// Get the name of the selected backend.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }

  /// Whether selection has already run and been cached.
  #[inline]
  #[must_use]
  pub fn is_selected(&self) -> bool {
    self.cache.get().is_some()
  }
}
