//! Kernel dispatch introspection.
//!
//! Inspect which kernel is selected on the current machine without touching
//! the hot path.
//!
//! ```
//! use adler::{Adler32, DispatchInfo, kernel_for};
//!
//! // Platform-level info
//! let info = DispatchInfo::current();
//! println!("{info}");
//!
//! // Per-length kernel selection
//! println!("Adler-32 backend: {}", Adler32::backend_name());
//! println!("Adler-32 @ 4KB: {}", kernel_for::<Adler32>(4096));
//! ```

use core::fmt;

use crate::adler32::Adler32Config;

/// Information about the current dispatch configuration.
///
/// A zero-allocation view of the detected CPU capabilities and the Adler-32
/// configuration in effect.
#[derive(Clone, Copy)]
pub struct DispatchInfo {
  platform: platform::Description,
  config: Adler32Config,
}

impl DispatchInfo {
  /// Returns dispatch info for the current platform.
  ///
  /// Detection and configuration are cached after the first call.
  #[inline]
  #[must_use]
  pub fn current() -> Self {
    Self {
      platform: platform::describe(),
      config: crate::adler32::config::get(),
    }
  }

  /// Returns the platform description (architecture and features).
  #[inline]
  #[must_use]
  pub fn platform(&self) -> platform::Description {
    self.platform
  }

  /// Returns the requested and effective force modes.
  #[inline]
  #[must_use]
  pub fn config(&self) -> Adler32Config {
    self.config
  }
}

impl fmt::Display for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.platform)?;
    if self.config.effective_force != crate::Adler32Force::Auto {
      write!(f, " (force={})", self.config.effective_force.as_str())?;
    }
    Ok(())
  }
}

impl fmt::Debug for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchInfo")
      .field("platform", &format_args!("{}", self.platform))
      .field("requested_force", &self.config.requested_force)
      .field("effective_force", &self.config.effective_force)
      .finish()
  }
}

/// Returns the kernel name selected for a buffer of `len` bytes.
///
/// Useful for verifying size-based kernel transitions.
///
/// ```
/// use adler::{Adler32, kernel_for};
///
/// assert_eq!(kernel_for::<Adler32>(0), "portable/scalar");
/// let large = kernel_for::<Adler32>(65536);
/// println!("Large buffers: {large}");
/// ```
#[inline]
#[must_use]
pub fn kernel_for<T: KernelIntrospect>(len: usize) -> &'static str {
  T::kernel_name_for_len(len)
}

/// Trait for checksum types that support kernel introspection.
pub trait KernelIntrospect {
  /// Returns the kernel name that processes a buffer of `len` bytes, e.g.:
  /// - `"x86_64/avx512-vnni"` for large buffers on Ice Lake and later
  /// - `"x86_64/sse41"` for 16..32 byte buffers on the same machine
  /// - `"portable/scalar"` for anything shorter than 16 bytes
  fn kernel_name_for_len(len: usize) -> &'static str;

  /// Returns the currently selected backend name.
  fn backend_name() -> &'static str;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dispatch_info_display_not_empty() {
    let info = DispatchInfo::current();
    let s = alloc::format!("{info}");
    assert!(!s.is_empty());
  }

  #[test]
  fn dispatch_info_debug_not_empty() {
    let info = DispatchInfo::current();
    let s = alloc::format!("{info:?}");
    assert!(s.contains("DispatchInfo"));
    assert!(s.contains("effective_force"));
  }

  #[test]
  fn kernel_for_matches_hasher() {
    use crate::Adler32;

    for len in [0, 1, 16, 32, 64, 4096] {
      assert_eq!(kernel_for::<Adler32>(len), Adler32::kernel_name_for_len(len));
    }
  }
}
