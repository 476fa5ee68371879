//! Adler-32 constants and weight tables.

/// Largest prime smaller than 2^16.
pub(crate) const BASE: u32 = 65521;

/// Largest `n` such that `255·n·(n+1)/2 + (n+1)·(BASE−1) ≤ 2^32 − 1`.
///
/// This many bytes can be accumulated into 32-bit sums before a modulo
/// reduction is required.
pub(crate) const NMAX: usize = 5552;

/// Packed value of the empty checksum (`sum1 = 1`, `sum2 = 0`).
pub(crate) const INIT: u32 = 1;

// NMAX is exactly the overflow bound: it fits and NMAX + 1 does not.
const _: () = {
  const fn worst_case(n: u64) -> u64 {
    255 * n * (n + 1) / 2 + (n + 1) * (BASE as u64 - 1)
  }
  assert!(worst_case(NMAX as u64) <= u32::MAX as u64);
  assert!(worst_case(NMAX as u64 + 1) > u32::MAX as u64);
  assert!(NMAX % 16 == 0);
};

/// Descending weights `W, W−1, …, 1`: byte offset `i` of a `W`-byte
/// sub-block contributes `(W − i)` times its value to `sum2`.
#[allow(clippy::indexing_slicing)]
pub(crate) const fn descending_weights<const W: usize>() -> [u8; W] {
  assert!(W > 0 && W <= 64);
  let mut out = [0u8; W];
  let mut i = 0;
  while i < W {
    out[i] = (W - i) as u8;
    i += 1;
  }
  out
}

/// Weights for 16-byte sub-blocks (SSE4.1, NEON).
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
pub(crate) static WEIGHTS_16: [u8; 16] = descending_weights::<16>();

/// Weights for 32-byte sub-blocks (AVX2).
#[cfg_attr(not(target_arch = "x86_64"), allow(dead_code))]
pub(crate) static WEIGHTS_32: [u8; 32] = descending_weights::<32>();

/// Weights for 64-byte sub-blocks (AVX-512 VNNI).
#[cfg_attr(not(target_arch = "x86_64"), allow(dead_code))]
pub(crate) static WEIGHTS_64: [u8; 64] = descending_weights::<64>();

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weights_descend_to_one() {
    assert_eq!(WEIGHTS_16.first(), Some(&16));
    assert_eq!(WEIGHTS_16.last(), Some(&1));
    assert_eq!(WEIGHTS_32.first(), Some(&32));
    assert_eq!(WEIGHTS_64.first(), Some(&64));
    assert_eq!(WEIGHTS_64.last(), Some(&1));
    assert!(WEIGHTS_64.windows(2).all(|w| w[0] == w[1] + 1));
  }

  #[test]
  fn weights_fit_signed_bytes() {
    // dpbusd / maddubs treat the weight operand as i8.
    assert!(WEIGHTS_64.iter().all(|&w| w <= i8::MAX as u8));
  }

  #[test]
  fn nmax_worst_case_is_tight() {
    let n = NMAX as u64;
    let worst = 255 * n * (n + 1) / 2 + (n + 1) * (u64::from(BASE) - 1);
    assert_eq!(worst, 4_294_690_200);
  }
}
