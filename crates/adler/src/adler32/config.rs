//! Adler-32 runtime configuration (kernel overrides).
//!
//! `ADLER32_FORCE` selects a kernel family instead of the automatic choice:
//!
//! | Value | Kernel |
//! |-------|--------|
//! | `auto` | best kernel for the detected CPU (default) |
//! | `portable`, `lanes` | `portable/lanes` |
//! | `scalar`, `reference` | `portable/scalar` |
//! | `narrow`, `avx2`, `sse41`, `neon` | best kernel without AVX-512 |
//!
//! Safety note: forced modes are always clamped to detected CPU capabilities.

use platform::CpuCaps;

/// Forced kernel selection for Adler-32.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Adler32Force {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Force the portable lane processor.
  Portable,
  /// Force the scalar kernel.
  Scalar,
  /// Cap selection at the 16/32-byte SIMD tier (no AVX-512).
  Narrow,
}

impl Adler32Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Scalar => "scalar",
      Self::Narrow => "narrow",
    }
  }

  /// Parse a force mode (case-insensitive, surrounding whitespace ignored).
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
      return Some(Self::Auto);
    }
    if value.eq_ignore_ascii_case("portable") || value.eq_ignore_ascii_case("lanes") {
      return Some(Self::Portable);
    }
    if value.eq_ignore_ascii_case("scalar") || value.eq_ignore_ascii_case("reference") {
      return Some(Self::Scalar);
    }
    if value.eq_ignore_ascii_case("narrow")
      || value.eq_ignore_ascii_case("avx2")
      || value.eq_ignore_ascii_case("sse41")
      || value.eq_ignore_ascii_case("neon")
    {
      return Some(Self::Narrow);
    }
    None
  }
}

/// Full Adler-32 runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adler32Config {
  /// Requested force mode (environment).
  pub requested_force: Adler32Force,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Adler32Force,
}

#[cfg(feature = "std")]
fn read_env_force() -> Adler32Force {
  std::env::var("ADLER32_FORCE")
    .ok()
    .and_then(|value| Adler32Force::parse(&value))
    .unwrap_or_default()
}

#[cfg(feature = "std")]
fn requested_force() -> Adler32Force {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Adler32Force> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested_force() -> Adler32Force {
  Adler32Force::Auto
}

/// Clamp a requested mode to what `caps` can run.
#[inline]
#[must_use]
#[allow(unused_variables)] // `caps` only used on x86_64/aarch64
pub(crate) fn clamp_force_to_caps(requested: Adler32Force, caps: CpuCaps) -> Adler32Force {
  match requested {
    Adler32Force::Auto | Adler32Force::Portable | Adler32Force::Scalar => requested,
    Adler32Force::Narrow => {
      #[cfg(target_arch = "x86_64")]
      {
        if caps.has(platform::caps::x86::SSE41_READY) {
          return Adler32Force::Narrow;
        }
      }
      #[cfg(target_arch = "aarch64")]
      {
        if caps.has(platform::caps::aarch64::NEON_READY) {
          return Adler32Force::Narrow;
        }
      }
      Adler32Force::Auto
    }
  }
}

/// Get the effective Adler-32 configuration for the current platform.
#[inline]
#[must_use]
pub fn get() -> Adler32Config {
  let requested_force = requested_force();
  Adler32Config {
    requested_force,
    effective_force: clamp_force_to_caps(requested_force, platform::caps()),
  }
}

#[cfg(test)]
mod tests {
  use platform::Caps;

  use super::*;

  #[test]
  fn parse_accepts_aliases() {
    assert_eq!(Adler32Force::parse("auto"), Some(Adler32Force::Auto));
    assert_eq!(Adler32Force::parse(" LANES "), Some(Adler32Force::Portable));
    assert_eq!(Adler32Force::parse("Scalar"), Some(Adler32Force::Scalar));
    assert_eq!(Adler32Force::parse("avx2"), Some(Adler32Force::Narrow));
    assert_eq!(Adler32Force::parse(""), None);
    assert_eq!(Adler32Force::parse("avx10"), None);
  }

  #[test]
  fn as_str_round_trips() {
    for force in [
      Adler32Force::Auto,
      Adler32Force::Portable,
      Adler32Force::Scalar,
      Adler32Force::Narrow,
    ] {
      assert_eq!(Adler32Force::parse(force.as_str()), Some(force));
    }
  }

  #[test]
  fn narrow_without_simd_clamps_to_auto() {
    let none = CpuCaps::new(Caps::NONE);
    assert_eq!(clamp_force_to_caps(Adler32Force::Narrow, none), Adler32Force::Auto);
    assert_eq!(clamp_force_to_caps(Adler32Force::Scalar, none), Adler32Force::Scalar);
    assert_eq!(clamp_force_to_caps(Adler32Force::Portable, none), Adler32Force::Portable);
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn narrow_kept_with_sse41() {
    let caps = CpuCaps::new(platform::caps::x86::SSE41_READY);
    assert_eq!(clamp_force_to_caps(Adler32Force::Narrow, caps), Adler32Force::Narrow);
  }

  #[test]
  fn get_is_consistent() {
    let cfg = get();
    assert_eq!(cfg.effective_force, clamp_force_to_caps(cfg.requested_force, platform::caps()));
  }
}
