//! CPU feature detection.
//!
//! This module provides the unified [`get()`] function. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via `is_x86_feature_detected!` / `is_aarch64_feature_detected!`, `std` only)
//! - Caching (`OnceLock` with `std`, an atomic state machine without)
//! - User-supplied overrides for bare metal and testing
//! - Miri fallback (always returns portable caps)
//!
//! # Overrides
//!
//! ```ignore
//! // Must run before the first `platform::get()`.
//! platform::set_override(Some(CpuCaps::NONE));
//! ```

use core::fmt;

use crate::caps::{Arch, Caps, CpuCaps};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure to install a capability override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OverrideError {
  /// Detection already ran and its result is cached for the process lifetime.
  AlreadyInitialized,
  /// The target has no storage for an override (no `std`, no 64-bit atomics).
  Unsupported,
}

impl fmt::Display for OverrideError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AlreadyInitialized => f.write_str("capability override set after detection was cached"),
      Self::Unsupported => f.write_str("capability overrides are not supported on this target"),
    }
  }
}

impl core::error::Error for OverrideError {}

// ─────────────────────────────────────────────────────────────────────────────
// Public Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Get detected CPU capabilities (cached).
///
/// An override installed with [`set_override`] takes precedence over detection.
#[inline]
#[must_use]
pub fn get() -> CpuCaps {
  #[cfg(miri)]
  {
    CpuCaps::NONE
  }

  #[cfg(all(not(miri), feature = "std"))]
  {
    *std_cache::CACHE.get_or_init(detect_with_override)
  }

  #[cfg(all(not(miri), not(feature = "std"), target_has_atomic = "64"))]
  {
    atomic_cache::get_or_init(detect_with_override)
  }

  #[cfg(all(not(miri), not(feature = "std"), not(target_has_atomic = "64")))]
  {
    detect_uncached()
  }
}

/// Detect capabilities without caching and without consulting overrides.
#[inline]
#[must_use]
pub fn detect_uncached() -> CpuCaps {
  #[cfg(target_arch = "x86_64")]
  {
    detect_x86_64()
  }

  #[cfg(target_arch = "aarch64")]
  {
    detect_aarch64()
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    CpuCaps::NONE
  }
}

/// Capabilities known at compile time (`-C target-feature` / `-C target-cpu`).
#[inline]
#[must_use]
pub const fn caps_static() -> Caps {
  #[allow(unused_mut)]
  let mut bits = Caps::NONE;

  #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
  {
    use crate::caps::x86;

    if cfg!(target_feature = "sse2") {
      bits = bits.union(x86::SSE2);
    }
    if cfg!(target_feature = "ssse3") {
      bits = bits.union(x86::SSSE3);
    }
    if cfg!(target_feature = "sse4.1") {
      bits = bits.union(x86::SSE41);
    }
    if cfg!(target_feature = "avx") {
      bits = bits.union(x86::AVX);
    }
    if cfg!(target_feature = "avx2") {
      bits = bits.union(x86::AVX2);
    }
    if cfg!(target_feature = "avx512f") {
      bits = bits.union(x86::AVX512F);
    }
    if cfg!(target_feature = "avx512bw") {
      bits = bits.union(x86::AVX512BW);
    }
    if cfg!(target_feature = "avx512vl") {
      bits = bits.union(x86::AVX512VL);
    }
    if cfg!(target_feature = "avx512vnni") {
      bits = bits.union(x86::AVX512VNNI);
    }
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;

    if cfg!(target_feature = "neon") {
      bits = bits.union(aarch64::NEON);
    }
    if cfg!(target_feature = "dotprod") {
      bits = bits.union(aarch64::DOTPROD);
    }
  }

  bits
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Architecture Detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
fn detect_x86_64() -> CpuCaps {
  #[allow(unused_mut)]
  let mut bits = caps_static();

  #[cfg(feature = "std")]
  {
    bits = bits.union(runtime_x86_64());
  }

  CpuCaps {
    arch: Arch::X86_64,
    bits,
  }
}

/// Runtime detected x86_64 features.
///
/// `is_x86_feature_detected!` already checks XCR0, so AVX/AVX-512 bits are only
/// reported when the OS saves the extended register state.
#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime_x86_64() -> Caps {
  use crate::caps::x86;

  let mut bits = Caps::NONE;

  if std::arch::is_x86_feature_detected!("sse2") {
    bits |= x86::SSE2;
  }
  if std::arch::is_x86_feature_detected!("ssse3") {
    bits |= x86::SSSE3;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    bits |= x86::SSE41;
  }
  if std::arch::is_x86_feature_detected!("avx") {
    bits |= x86::AVX;
  }
  if std::arch::is_x86_feature_detected!("avx2") {
    bits |= x86::AVX2;
  }
  if std::arch::is_x86_feature_detected!("avx512f") {
    bits |= x86::AVX512F;
  }
  if std::arch::is_x86_feature_detected!("avx512bw") {
    bits |= x86::AVX512BW;
  }
  if std::arch::is_x86_feature_detected!("avx512vl") {
    bits |= x86::AVX512VL;
  }
  if std::arch::is_x86_feature_detected!("avx512vnni") {
    bits |= x86::AVX512VNNI;
  }

  // AVX-512 without its foundation is not usable.
  if !bits.has(x86::AVX512F) {
    bits = bits.difference(x86::AVX512_ALL);
  }

  bits
}

#[cfg(target_arch = "aarch64")]
fn detect_aarch64() -> CpuCaps {
  #[allow(unused_mut)]
  let mut bits = caps_static();

  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("neon") {
      bits |= crate::caps::aarch64::NEON;
    }
    if std::arch::is_aarch64_feature_detected!("dotprod") {
      bits |= crate::caps::aarch64::DOTPROD;
    }
  }

  CpuCaps {
    arch: Arch::Aarch64,
    bits,
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Override System
// ─────────────────────────────────────────────────────────────────────────────

/// Set detection override.
///
/// # Panics
///
/// Panics if detection has already been cached. Use [`try_set_override`] to
/// handle that case.
#[cold]
pub fn set_override(value: Option<CpuCaps>) {
  if let Err(err) = try_set_override(value) {
    panic!("platform::set_override failed: {err}");
  }
}

/// Try to set detection override.
///
/// Contract: pre-init only. Once [`get()`] has cached a result, this returns
/// [`OverrideError::AlreadyInitialized`].
#[cold]
pub fn try_set_override(value: Option<CpuCaps>) -> Result<(), OverrideError> {
  #[cfg(feature = "std")]
  {
    std_cache::try_set_override(value)
  }

  #[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
  {
    atomic_cache::try_set_override(value)
  }

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "64")))]
  {
    let _ = value;
    Err(OverrideError::Unsupported)
  }
}

/// Clear detection override.
#[cold]
pub fn clear_override() {
  set_override(None);
}

/// Check if an override is set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  #[cfg(feature = "std")]
  {
    std_cache::get_override().is_some()
  }

  #[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
  {
    atomic_cache::get_override().is_some()
  }

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "64")))]
  {
    false
  }
}

#[cold]
#[cfg(any(feature = "std", target_has_atomic = "64"))]
fn detect_with_override() -> CpuCaps {
  #[cfg(feature = "std")]
  let ov = std_cache::get_override();
  #[cfg(not(feature = "std"))]
  let ov = atomic_cache::get_override();

  ov.unwrap_or_else(detect_uncached)
}

#[cfg(feature = "std")]
mod std_cache {
  use std::sync::{OnceLock, RwLock};

  use super::{CpuCaps, OverrideError};

  pub(super) static CACHE: OnceLock<CpuCaps> = OnceLock::new();
  static OVERRIDE: RwLock<Option<CpuCaps>> = RwLock::new(None);

  pub(super) fn try_set_override(value: Option<CpuCaps>) -> Result<(), OverrideError> {
    if CACHE.get().is_some() {
      return Err(OverrideError::AlreadyInitialized);
    }
    match OVERRIDE.write() {
      Ok(mut guard) => {
        *guard = value;
        Ok(())
      }
      Err(_) => Err(OverrideError::Unsupported),
    }
  }

  pub(super) fn get_override() -> Option<CpuCaps> {
    OVERRIDE.read().ok().and_then(|guard| *guard)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomic Cache (no_std with 64-bit atomics)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
mod atomic_cache {
  use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

  use super::{Arch, Caps, CpuCaps, OverrideError};

  const STATE_UNINIT: u8 = 0;
  const STATE_INITING: u8 = 1;
  const STATE_READY: u8 = 2;

  static STATE: AtomicU8 = AtomicU8::new(STATE_UNINIT);
  static BITS: [AtomicU64; 2] = [AtomicU64::new(0), AtomicU64::new(0)];
  static ARCH: AtomicU8 = AtomicU8::new(0);

  static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
  static OVERRIDE_BITS: [AtomicU64; 2] = [AtomicU64::new(0), AtomicU64::new(0)];
  static OVERRIDE_ARCH: AtomicU8 = AtomicU8::new(0);

  pub(super) fn get_or_init(f: fn() -> CpuCaps) -> CpuCaps {
    if STATE.load(Ordering::Acquire) == STATE_READY {
      return load(&BITS, &ARCH);
    }

    match STATE.compare_exchange(STATE_UNINIT, STATE_INITING, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let caps = f();
        store(&BITS, &ARCH, caps);
        STATE.store(STATE_READY, Ordering::Release);
        caps
      }
      Err(_) => {
        while STATE.load(Ordering::Acquire) != STATE_READY {
          core::hint::spin_loop();
        }
        load(&BITS, &ARCH)
      }
    }
  }

  pub(super) fn try_set_override(value: Option<CpuCaps>) -> Result<(), OverrideError> {
    if STATE.load(Ordering::Acquire) != STATE_UNINIT {
      return Err(OverrideError::AlreadyInitialized);
    }
    match value {
      Some(caps) => {
        store(&OVERRIDE_BITS, &OVERRIDE_ARCH, caps);
        OVERRIDE_SET.store(true, Ordering::Release);
      }
      None => OVERRIDE_SET.store(false, Ordering::Release),
    }
    Ok(())
  }

  pub(super) fn get_override() -> Option<CpuCaps> {
    if OVERRIDE_SET.load(Ordering::Acquire) {
      Some(load(&OVERRIDE_BITS, &OVERRIDE_ARCH))
    } else {
      None
    }
  }

  fn store(bits: &[AtomicU64; 2], arch: &AtomicU8, caps: CpuCaps) {
    bits[0].store(caps.bits.0[0], Ordering::Release);
    bits[1].store(caps.bits.0[1], Ordering::Release);
    arch.store(arch_to_u8(caps.arch), Ordering::Release);
  }

  fn load(bits: &[AtomicU64; 2], arch: &AtomicU8) -> CpuCaps {
    CpuCaps {
      arch: arch_from_u8(arch.load(Ordering::Acquire)),
      bits: Caps([bits[0].load(Ordering::Acquire), bits[1].load(Ordering::Acquire)]),
    }
  }

  fn arch_to_u8(arch: Arch) -> u8 {
    match arch {
      Arch::X86_64 => 1,
      Arch::X86 => 2,
      Arch::Aarch64 => 3,
      Arch::Other => 0,
    }
  }

  fn arch_from_u8(v: u8) -> Arch {
    match v {
      1 => Arch::X86_64,
      2 => Arch::X86,
      3 => Arch::Aarch64,
      _ => Arch::Other,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Description
// ─────────────────────────────────────────────────────────────────────────────

/// Human-readable summary of the detected platform.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Description {
  caps: CpuCaps,
}

impl Description {
  #[inline]
  #[must_use]
  pub const fn new(caps: CpuCaps) -> Self {
    Self { caps }
  }

  #[inline]
  #[must_use]
  pub const fn caps(&self) -> CpuCaps {
    self.caps
  }
}

impl fmt::Display for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.caps.arch, self.caps.bits)
  }
}

impl fmt::Debug for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Description")
      .field("arch", &self.caps.arch)
      .field("caps", &self.caps.bits)
      .finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString};

  use super::*;

  #[test]
  #[cfg(not(miri))]
  fn test_get_matches_target_arch() {
    let caps = get();

    #[cfg(target_arch = "x86_64")]
    assert_eq!(caps.arch, Arch::X86_64);

    #[cfg(target_arch = "aarch64")]
    assert_eq!(caps.arch, Arch::Aarch64);

    let _ = caps;
  }

  #[test]
  fn test_detect_uncached_consistent() {
    assert_eq!(detect_uncached(), detect_uncached());
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn test_x86_64_baseline() {
    // SSE2 is part of the x86_64 baseline.
    assert!(get().has(crate::caps::x86::SSE2));
  }

  #[test]
  #[cfg(all(target_arch = "aarch64", not(miri)))]
  fn test_aarch64_baseline() {
    assert!(get().has(crate::caps::aarch64::NEON));
  }

  #[test]
  fn test_static_caps_are_detected() {
    let detected = detect_uncached();
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    assert!(detected.bits.has(caps_static()));
    let _ = detected;
  }

  #[test]
  #[cfg(not(miri))]
  fn test_override_rejected_after_init() {
    let _ = get();
    assert_eq!(
      try_set_override(Some(CpuCaps::NONE)),
      Err(OverrideError::AlreadyInitialized)
    );
    assert!(!has_override());
  }

  #[test]
  fn test_override_error_display() {
    assert_eq!(
      OverrideError::AlreadyInitialized.to_string(),
      "capability override set after detection was cached"
    );
    assert!(!OverrideError::Unsupported.to_string().is_empty());
  }

  #[test]
  fn test_description_display() {
    let desc = Description::new(CpuCaps::NONE);
    assert_eq!(desc.to_string(), "other Caps(none)");
    assert!(format!("{desc:?}").contains("Description"));
  }
}
