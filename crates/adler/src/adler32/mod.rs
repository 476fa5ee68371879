//! Adler-32 checksum (RFC 1950).
//!
//! Adler-32 keeps two sums modulo 65521: `sum1` (1 + every byte) and `sum2`
//! (the running total of `sum1`). The packed value is `sum2 << 16 | sum1`.
//!
//! # Usage
//!
//! ```
//! use adler::Adler32;
//!
//! // One-shot computation
//! let sum = Adler32::checksum(b"Wikipedia");
//! assert_eq!(sum, 0x11E6_0398);
//!
//! // Incremental computation
//! let mut hasher = Adler32::new();
//! hasher.update(b"Wiki");
//! hasher.update(b"pedia");
//! assert_eq!(hasher.finalize(), sum);
//! ```
//!
//! # Hardware Acceleration
//!
//! Every SIMD kernel turns the sequential recurrence into a position-weighted
//! batch reduction: for a `W`-byte sub-block starting at `sum1`,
//!
//! ```text
//! sum2 += W·sum1 + Σ (W − i)·c[i]
//! sum1 += Σ c[i]
//! ```
//!
//! - **x86_64**: AVX-512 VNNI (64 B) → AVX2 (32 B) → SSE4.1 (16 B) → portable
//! - **aarch64**: NEON (16 B) → portable

pub(crate) mod config;
pub(crate) mod consts;
pub(crate) mod portable;
pub mod reference;

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

use backend::dispatch::{Dispatcher, Selected, select};
use platform::Caps;
use traits::{Checksum, ChecksumCombine};

pub use self::config::{Adler32Config, Adler32Force};
use self::{
  config::Adler32Force as Force,
  consts::{BASE, INIT},
};

/// Kernel signature: packed state in, packed state out.
pub type Adler32Fn = fn(u32, &[u8]) -> u32;

// ─────────────────────────────────────────────────────────────────────────────
// Kernel Tiers
// ─────────────────────────────────────────────────────────────────────────────

/// Every Adler-32 kernel this crate can dispatch to.
///
/// Kernels delegate short inputs to narrower siblings; [`Kernel::fallback`]
/// and [`Kernel::min_len`] describe that chain so introspection reports the
/// code that actually runs for a given length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
  /// Byte loop with deferred modulo (also the `< W` tail of every kernel).
  Scalar,
  /// Width-generic lane processor, instantiated at 32 bytes.
  Portable,
  /// x86_64 SSE4.1, 16-byte sub-blocks.
  Sse41,
  /// x86_64 AVX2, 32-byte sub-blocks.
  Avx2,
  /// x86_64 AVX-512 VNNI, 64-byte sub-blocks.
  Avx512Vnni,
  /// aarch64 NEON, 16-byte sub-blocks.
  Neon,
}

impl Kernel {
  /// All kernels, narrowest first.
  pub const ALL: [Self; 6] = [
    Self::Scalar,
    Self::Portable,
    Self::Sse41,
    Self::Avx2,
    Self::Avx512Vnni,
    Self::Neon,
  ];

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Scalar => "portable/scalar",
      Self::Portable => "portable/lanes",
      Self::Sse41 => "x86_64/sse41",
      Self::Avx2 => "x86_64/avx2",
      Self::Avx512Vnni => "x86_64/avx512-vnni",
      Self::Neon => "aarch64/neon",
    }
  }

  /// Look a kernel up by its [`name`](Self::name).
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.name() == name)
  }

  /// Shortest input this kernel processes itself.
  #[must_use]
  pub const fn min_len(self) -> usize {
    match self {
      Self::Scalar => 0,
      Self::Sse41 | Self::Neon => 16,
      Self::Avx2 => 32,
      Self::Portable | Self::Avx512Vnni => 64,
    }
  }

  /// Kernel that handles inputs shorter than [`min_len`](Self::min_len).
  #[must_use]
  pub const fn fallback(self) -> Option<Self> {
    match self {
      Self::Scalar => None,
      Self::Portable | Self::Sse41 | Self::Neon => Some(Self::Scalar),
      Self::Avx2 => Some(Self::Sse41),
      Self::Avx512Vnni => Some(Self::Avx2),
    }
  }

  /// The kernel that ends up processing `len` bytes when `self` is called.
  #[must_use]
  pub const fn effective_for_len(self, len: usize) -> Self {
    let mut kernel = self;
    while len < kernel.min_len() {
      match kernel.fallback() {
        Some(next) => kernel = next,
        None => break,
      }
    }
    kernel
  }

  /// Capabilities required to run this kernel.
  #[must_use]
  pub const fn requires(self) -> Caps {
    match self {
      Self::Scalar | Self::Portable => Caps::NONE,
      Self::Sse41 => platform::caps::x86::SSE41_READY,
      Self::Avx2 => platform::caps::x86::AVX2_READY,
      Self::Avx512Vnni => platform::caps::x86::AVX512_VNNI_READY,
      Self::Neon => platform::caps::aarch64::NEON_READY,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
fn select_for_caps(caps: platform::CpuCaps) -> Selected<Adler32Fn> {
  select(
    caps,
    backend::candidates![Adler32Fn;
      Kernel::Avx512Vnni.name() => Kernel::Avx512Vnni.requires() => x86_64::avx512_vnni_runtime,
      Kernel::Avx2.name()       => Kernel::Avx2.requires()       => x86_64::avx2_runtime,
      Kernel::Sse41.name()      => Kernel::Sse41.requires()      => x86_64::sse41_runtime,
      Kernel::Portable.name()   => Caps::NONE                    => portable::lanes32,
    ],
  )
}

#[cfg(target_arch = "aarch64")]
fn select_for_caps(caps: platform::CpuCaps) -> Selected<Adler32Fn> {
  select(
    caps,
    backend::candidates![Adler32Fn;
      Kernel::Neon.name()     => Kernel::Neon.requires() => aarch64::neon_runtime,
      Kernel::Portable.name() => Caps::NONE              => portable::lanes32,
    ],
  )
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn select_for_caps(caps: platform::CpuCaps) -> Selected<Adler32Fn> {
  select(
    caps,
    backend::candidates![Adler32Fn; Kernel::Portable.name() => Caps::NONE => portable::lanes32],
  )
}

/// Pick the kernel for this process: force mode first, then capabilities.
fn select_adler32() -> Selected<Adler32Fn> {
  let mut caps = platform::caps();

  match config::get().effective_force {
    Force::Scalar => return Selected::new(Kernel::Scalar.name(), portable::scalar),
    Force::Portable => return Selected::new(Kernel::Portable.name(), portable::lanes32),
    Force::Narrow => {
      caps.bits = caps.bits.difference(platform::caps::x86::AVX512_ALL);
    }
    Force::Auto => {}
  }

  select_for_caps(caps)
}

static DISPATCH: Dispatcher<Adler32Fn> = Dispatcher::new(select_adler32);

/// Update a packed Adler-32 value with `data` using the fastest kernel.
///
/// An empty slice returns `adler` unchanged.
///
/// ```
/// assert_eq!(adler::adler32(1, b"Wikipedia"), 0x11E6_0398);
/// ```
#[inline]
#[must_use]
pub fn adler32(adler: u32, data: &[u8]) -> u32 {
  (DISPATCH.get().func)(adler, data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Combine
// ─────────────────────────────────────────────────────────────────────────────

/// Combine two checksums: `adler(A || B)` from `adler(A)`, `adler(B)`, `len(B)`.
///
/// Runs in O(1).
///
/// ```
/// use adler::{Adler32, combine};
///
/// let data = b"hello world";
/// let (a, b) = data.split_at(6);
/// assert_eq!(combine(Adler32::checksum(a), Adler32::checksum(b), b.len()), Adler32::checksum(data));
/// ```
#[must_use]
pub const fn combine(adler_a: u32, adler_b: u32, len_b: usize) -> u32 {
  let rem = (len_b % BASE as usize) as u32;

  let mut sum1 = adler_a & 0xFFFF;
  let mut sum2 = (rem * sum1) % BASE;

  sum1 += (adler_b & 0xFFFF) + BASE - 1;
  sum2 += (adler_a >> 16) + (adler_b >> 16) + BASE - rem;

  if sum1 >= BASE {
    sum1 -= BASE;
  }
  if sum1 >= BASE {
    sum1 -= BASE;
  }
  if sum2 >= BASE << 1 {
    sum2 -= BASE << 1;
  }
  if sum2 >= BASE {
    sum2 -= BASE;
  }

  sum1 | (sum2 << 16)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Adler-32 checksum.
///
/// # Thread Safety
///
/// `Adler32` is `Send` and `Sync`. Independent hashers can run on different
/// chunks and be joined with [`combine`](Self::combine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adler32 {
  /// Packed running value.
  state: u32,
  /// Value restored by `reset`.
  initial: u32,
}

impl Adler32 {
  /// Create a new hasher (packed value `1`).
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: INIT,
      initial: INIT,
    }
  }

  /// Create a hasher that resumes from a previous checksum.
  ///
  /// Both halves of `adler` are expected to be below 65521, which holds for
  /// any value produced by this crate.
  ///
  /// ```
  /// use adler::Adler32;
  ///
  /// let data = b"hello world";
  /// let (first, second) = data.split_at(6);
  ///
  /// let mut hasher = Adler32::resume(Adler32::checksum(first));
  /// hasher.update(second);
  /// assert_eq!(hasher.finalize(), Adler32::checksum(data));
  /// ```
  #[inline]
  #[must_use]
  pub const fn resume(adler: u32) -> Self {
    Self {
      state: adler,
      initial: adler,
    }
  }

  /// Create a hasher from its two component sums.
  #[inline]
  #[must_use]
  pub const fn from_parts(sum1: u16, sum2: u16) -> Self {
    Self::resume((sum1 as u32) | ((sum2 as u32) << 16))
  }

  /// Compute Adler-32 of `data` in one shot.
  ///
  /// ```
  /// use adler::Adler32;
  ///
  /// assert_eq!(Adler32::checksum(b""), 1);
  /// assert_eq!(Adler32::checksum(b"123456789"), 0x091E_01DE);
  /// ```
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    adler32(INIT, data)
  }

  /// Update the hasher with additional data.
  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = adler32(self.state, data);
  }

  /// Return the checksum of everything processed so far.
  ///
  /// This does not consume the hasher, allowing further updates.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.state
  }

  /// Reset the hasher to its initial state.
  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// `sum1`: one plus the sum of every byte, mod 65521.
  #[inline]
  #[must_use]
  pub const fn sum1(&self) -> u16 {
    self.state as u16
  }

  /// `sum2`: the sum of every intermediate `sum1`, mod 65521.
  #[inline]
  #[must_use]
  pub const fn sum2(&self) -> u16 {
    (self.state >> 16) as u16
  }

  /// Combine two checksums; see [`combine`](crate::combine).
  #[inline]
  #[must_use]
  pub const fn combine(adler_a: u32, adler_b: u32, len_b: usize) -> u32 {
    combine(adler_a, adler_b, len_b)
  }

  /// Name of the kernel selected for this machine.
  #[inline]
  #[must_use]
  pub fn backend_name() -> &'static str {
    DISPATCH.backend_name()
  }

  /// The kernel that processes a buffer of `len` bytes on this machine.
  #[must_use]
  pub fn kernel_name_for_len(len: usize) -> &'static str {
    let selected = DISPATCH.backend_name();
    match Kernel::from_name(selected) {
      Some(kernel) => kernel.effective_for_len(len).name(),
      None => selected,
    }
  }
}

impl Default for Adler32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Adler32 {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Adler32::new()
  }

  #[inline]
  fn with_initial(initial: Self::Output) -> Self {
    Adler32::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Adler32::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    Adler32::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Adler32::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> Self::Output {
    Adler32::checksum(data)
  }
}

impl ChecksumCombine for Adler32 {
  #[inline]
  fn combine(adler_a: Self::Output, adler_b: Self::Output, len_b: usize) -> Self::Output {
    combine(adler_a, adler_b, len_b)
  }
}

impl crate::introspect::KernelIntrospect for Adler32 {
  fn kernel_name_for_len(len: usize) -> &'static str {
    Adler32::kernel_name_for_len(len)
  }

  fn backend_name() -> &'static str {
    Adler32::backend_name()
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Adler32 {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;
  use crate::adler32::consts::NMAX;

  #[test]
  fn test_checksum() {
    assert_eq!(Adler32::checksum(b"Wikipedia"), 0x11E6_0398);
    assert_eq!(Adler32::checksum(b"hello"), 0x062C_0215);
    assert_eq!(Adler32::checksum(b"Adler-32"), 0x0C34_027B);
  }

  #[test]
  fn test_empty() {
    assert_eq!(Adler32::checksum(b""), 1);
    assert_eq!(adler32(0x1234_5678, &[]), 0x1234_5678);
  }

  #[test]
  fn test_saturated() {
    let data = alloc::vec![0xFFu8; 2 * NMAX];
    assert_eq!(Adler32::checksum(&data), reference::adler32_bytewise(1, &data));
  }

  #[test]
  fn test_incremental() {
    let mut hasher = Adler32::new();
    hasher.update(b"Wiki");
    hasher.update(b"");
    hasher.update(b"pedia");
    assert_eq!(hasher.finalize(), 0x11E6_0398);
    assert_eq!(hasher.sum1(), 0x0398);
    assert_eq!(hasher.sum2(), 0x11E6);
  }

  #[test]
  fn test_reset_and_resume() {
    let mut hasher = Adler32::resume(Adler32::checksum(b"Wiki"));
    hasher.update(b"pedia");
    assert_eq!(hasher.finalize(), 0x11E6_0398);

    hasher.reset();
    assert_eq!(hasher.finalize(), Adler32::checksum(b"Wiki"));
  }

  #[test]
  fn test_from_parts() {
    assert_eq!(Adler32::from_parts(1, 0), Adler32::new());
    assert_eq!(Adler32::from_parts(0x0398, 0x11E6).finalize(), 0x11E6_0398);
  }

  #[test]
  fn test_combine() {
    let data: Vec<u8> = (0..3 * NMAX as u32).map(|i| (i * 7 + 3) as u8).collect();
    for split in [0, 1, 63, 64, NMAX, data.len()] {
      let (a, b) = data.split_at(split);
      assert_eq!(
        combine(Adler32::checksum(a), Adler32::checksum(b), b.len()),
        Adler32::checksum(&data),
        "split={split}"
      );
    }
  }

  #[test]
  fn test_combine_identity() {
    let sum = Adler32::checksum(b"abc");
    assert_eq!(combine(sum, INIT, 0), sum);
    assert_eq!(combine(INIT, sum, 3), sum);
  }

  #[test]
  fn test_kernel_chain() {
    assert_eq!(Kernel::Avx512Vnni.effective_for_len(8), Kernel::Scalar);
    assert_eq!(Kernel::Avx512Vnni.effective_for_len(20), Kernel::Sse41);
    assert_eq!(Kernel::Avx512Vnni.effective_for_len(40), Kernel::Avx2);
    assert_eq!(Kernel::Avx512Vnni.effective_for_len(64), Kernel::Avx512Vnni);
    assert_eq!(Kernel::Avx2.effective_for_len(15), Kernel::Scalar);
    assert_eq!(Kernel::Portable.effective_for_len(63), Kernel::Scalar);
    assert_eq!(Kernel::Neon.effective_for_len(16), Kernel::Neon);
    assert_eq!(Kernel::Scalar.effective_for_len(0), Kernel::Scalar);
  }

  #[test]
  fn test_kernel_names_round_trip() {
    for kernel in Kernel::ALL {
      assert_eq!(Kernel::from_name(kernel.name()), Some(kernel));
    }
    assert_eq!(Kernel::from_name("x86_64/avx10"), None);
  }

  #[test]
  fn test_backend_is_known() {
    let name = Adler32::backend_name();
    assert!(Kernel::from_name(name).is_some(), "unexpected backend {name}");
    assert_eq!(Adler32::kernel_name_for_len(0), Kernel::Scalar.name());
  }

  #[test]
  fn test_trait_impl() {
    fn check_trait<T: Checksum>() {}
    fn check_combine<T: ChecksumCombine>() {}

    check_trait::<Adler32>();
    check_combine::<Adler32>();
  }

  #[test]
  #[cfg(feature = "std")]
  fn test_io_write() {
    use std::io::Write;

    let mut hasher = Adler32::new();
    hasher.write_all(b"Wikipedia").unwrap();
    hasher.flush().unwrap();
    assert_eq!(hasher.finalize(), 0x11E6_0398);
  }
}
