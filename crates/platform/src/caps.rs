//! CPU capability representation.
//!
//! This module answers the question: "Which Adler-32 kernels may legally run on
//! this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 128-bit bitset. Each bit corresponds to one ISA extension.
//! The bits are architecture-specific but the API is uniform across targets.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let c = platform::caps();
//! if c.has(x86::AVX512_VNNI_READY) {
//!     // 64-byte dot-product kernel
//! } else if c.has(x86::AVX2_READY) {
//!     // 32-byte kernel
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 128-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 2]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 2]);

  /// Create a capability set from raw words.
  ///
  /// Only available with the `testing` feature or in test builds.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 2]) -> Self {
    Self(words)
  }

  /// Access the raw underlying words.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 2] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0] && (self.0[1] & required.0[1]) == required.0[1]
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([self.0[0] | other.0[0], self.0[1] | other.0[1]])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([self.0[0] & other.0[0], self.0[1] & other.0[1]])
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self([self.0[0] & !other.0[0], self.0[1] & !other.0[1]])
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones()
  }

  /// Create a capability set with a single bit set.
  ///
  /// Bits above 127 wrap into the aarch64 word; callers only use the
  /// predefined constants below.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let bit_in_word = bit % 64;
    if bit < 64 {
      Self([1u64 << bit_in_word, 0])
    } else {
      Self([0, 1u64 << bit_in_word])
    }
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    let word = if bit < 64 { self.0[0] } else { self.0[1] };
    (word & (1u64 << (bit % 64))) != 0
  }

  /// Iterate over the names of all features present.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    X86_FEATURES
      .iter()
      .chain(AARCH64_FEATURES.iter())
      .filter_map(move |(bit, name)| if self.has_bit(*bit) { Some(*name) } else { None })
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Caps(")?;
    let mut iter = self.feature_names().peekable();
    if iter.peek().is_none() {
      return write!(f, "none)");
    }
    let mut first = true;
    for name in iter {
      if !first {
        write!(f, ", ")?;
      }
      first = false;
      write!(f, "{name}")?;
    }
    write!(f, ")")
  }
}

impl core::fmt::Display for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Debug::fmt(self, f)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::X86_64
    } else if cfg!(target_arch = "x86") {
      Self::X86
    } else if cfg!(target_arch = "aarch64") {
      Self::Aarch64
    } else {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// Detected capabilities together with the architecture they belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuCaps {
  pub arch: Arch,
  pub bits: Caps,
}

impl CpuCaps {
  /// Portable-only capabilities.
  pub const NONE: Self = Self {
    arch: Arch::Other,
    bits: Caps::NONE,
  };

  /// Capabilities for the current architecture.
  #[inline]
  #[must_use]
  pub const fn new(bits: Caps) -> Self {
    Self {
      arch: Arch::current(),
      bits,
    }
  }

  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Caps) -> bool {
    self.bits.has(required)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 CPU features relevant to the byte-sum and dot-product kernels.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(1);
  pub const SSE41: Caps = Caps::bit(2);
  pub const AVX: Caps = Caps::bit(3);
  pub const AVX2: Caps = Caps::bit(4);
  pub const AVX512F: Caps = Caps::bit(5);
  pub const AVX512BW: Caps = Caps::bit(6);
  pub const AVX512VL: Caps = Caps::bit(7);
  pub const AVX512VNNI: Caps = Caps::bit(8);

  /// `psadbw` + `pmaddubsw` on 128-bit registers.
  pub const SSE41_READY: Caps = Caps([SSE2.0[0] | SSSE3.0[0] | SSE41.0[0], 0]);

  /// 256-bit kernel; delegates inputs under 32 bytes to the SSE4.1 kernel.
  pub const AVX2_READY: Caps = Caps([SSE41_READY.0[0] | AVX.0[0] | AVX2.0[0], 0]);

  /// 512-bit `vpdpbusd` kernel; delegates small inputs to both narrower tiers.
  pub const AVX512_VNNI_READY: Caps = Caps([AVX2_READY.0[0] | AVX512F.0[0] | AVX512BW.0[0] | AVX512VNNI.0[0], 0]);

  /// Every AVX-512 bit, cleared together when AVX-512 must be disabled.
  pub const AVX512_ALL: Caps = Caps([AVX512F.0[0] | AVX512BW.0[0] | AVX512VL.0[0] | AVX512VNNI.0[0], 0]);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features.
pub mod aarch64 {
  use super::Caps;

  /// Advanced SIMD, baseline on AArch64.
  pub const NEON: Caps = Caps::bit(64);
  pub const DOTPROD: Caps = Caps::bit(65);

  pub const NEON_READY: Caps = NEON;
}

type FeatureEntry = (u8, &'static str);

const X86_FEATURES: &[FeatureEntry] = &[
  (0, "sse2"),
  (1, "ssse3"),
  (2, "sse4.1"),
  (3, "avx"),
  (4, "avx2"),
  (5, "avx512f"),
  (6, "avx512bw"),
  (7, "avx512vl"),
  (8, "avx512vnni"),
];

const AARCH64_FEATURES: &[FeatureEntry] = &[(64, "neon"), (65, "dotprod")];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
