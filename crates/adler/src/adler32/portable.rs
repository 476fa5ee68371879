//! Portable Adler-32 kernels.
//!
//! Two implementations live here:
//!
//! - **Scalar** (`tail`, `scalar`): the byte-at-a-time definition, chunked so
//!   modulo reductions happen once per [`NMAX`] bytes. SIMD kernels hand their
//!   final `< W` bytes to [`tail`].
//! - **Lanes** (`lanes::<W>`): the position-weighted batch reduction used by
//!   every SIMD kernel, written over fixed lane arrays. It runs on targets
//!   without SIMD and pins down the algebra the vector kernels implement.

use super::consts::{BASE, NMAX};

// ─────────────────────────────────────────────────────────────────────────────
// State Packing
// ─────────────────────────────────────────────────────────────────────────────

/// Split a packed checksum into `(sum1, sum2)`.
#[inline(always)]
pub(crate) const fn unpack(adler: u32) -> (u32, u32) {
  (adler & 0xFFFF, adler >> 16)
}

/// Pack `(sum1, sum2)`; both must already be below 2^16.
#[inline(always)]
pub(crate) const fn pack(sum1: u32, sum2: u32) -> u32 {
  sum1 | (sum2 << 16)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar Tail
// ─────────────────────────────────────────────────────────────────────────────

/// Single-byte update.
#[inline]
pub(crate) fn len_1(mut sum1: u32, mut sum2: u32, byte: u8) -> u32 {
  sum1 += u32::from(byte);
  if sum1 >= BASE {
    sum1 -= BASE;
  }
  sum2 += sum1;
  if sum2 >= BASE {
    sum2 -= BASE;
  }
  pack(sum1, sum2)
}

#[inline(always)]
fn accumulate(mut sum1: u32, mut sum2: u32, data: &[u8]) -> (u32, u32) {
  let (blocks, rest) = data.as_chunks::<16>();
  for block in blocks {
    for &byte in block {
      sum1 += u32::from(byte);
      sum2 += sum1;
    }
  }
  for &byte in rest {
    sum1 += u32::from(byte);
    sum2 += sum1;
  }
  (sum1, sum2)
}

/// Update with fewer than [`NMAX`] bytes, reducing once at the end.
#[inline]
pub(crate) fn short(sum1: u32, sum2: u32, data: &[u8]) -> u32 {
  debug_assert!(data.len() < NMAX);
  let (mut sum1, sum2) = accumulate(sum1, sum2, data);

  // Fewer than 16 bytes cannot push sum1 past 2·BASE.
  if data.len() < 16 {
    if sum1 >= BASE {
      sum1 -= BASE;
    }
  } else {
    sum1 %= BASE;
  }
  pack(sum1, sum2 % BASE)
}

/// Finish a checksum over a short remainder.
///
/// `data.len()` must be below [`NMAX`]; every caller passes less than one
/// vector sub-block.
#[inline]
pub(crate) fn tail(sum1: u32, sum2: u32, data: &[u8]) -> u32 {
  match data {
    [] => pack(sum1, sum2),
    [byte] => len_1(sum1, sum2, *byte),
    _ => short(sum1, sum2, data),
  }
}

/// Full-length scalar kernel.
pub(crate) fn scalar(adler: u32, data: &[u8]) -> u32 {
  let (mut sum1, mut sum2) = unpack(adler);

  let (chunks, rest) = data.as_chunks::<NMAX>();
  for chunk in chunks {
    (sum1, sum2) = accumulate(sum1, sum2, chunk);
    sum1 %= BASE;
    sum2 %= BASE;
  }

  tail(sum1, sum2, rest)
}

// ─────────────────────────────────────────────────────────────────────────────
// Lane Processor
// ─────────────────────────────────────────────────────────────────────────────
//
// Lane layout of a `W`-byte register:
//   - byte sums: one lane per 8 bytes (what `psadbw` produces)
//   - weighted sums: one lane per 4 bytes (what `vpdpbusd` produces)
//
// Lanes wrap like hardware lanes; the NMAX bound keeps every lane exact.

const SAD_LANES: usize = 64 / 8;
const DOT_LANES: usize = 64 / 4;

/// Lane accumulators for one chunk.
struct Lanes {
  /// Byte-sum accumulator (`vs1`); lane 0 seeded with `sum1`.
  vs1: [u32; SAD_LANES],
  /// Weighted accumulator (`vs2`); lane 0 seeded with `sum2`.
  vs2: [u32; DOT_LANES],
  /// Second weighted accumulator for the odd sub-block of each pair.
  vs2_1: [u32; DOT_LANES],
  /// Carry accumulator (`vs3`): sum of `vs1` before each sub-block.
  vs3: [u32; SAD_LANES],
}

impl Lanes {
  fn seeded(sum1: u32, sum2: u32) -> Self {
    let mut vs1 = [0; SAD_LANES];
    let mut vs2 = [0; DOT_LANES];
    if let Some(lane) = vs1.first_mut() {
      *lane = sum1;
    }
    if let Some(lane) = vs2.first_mut() {
      *lane = sum2;
    }
    Self {
      vs1,
      vs2,
      vs2_1: [0; DOT_LANES],
      vs3: [0; SAD_LANES],
    }
  }

  /// Absorb one sub-block into `vs1`, the carry, and the chosen weighted accumulator.
  #[inline(always)]
  fn absorb(&mut self, block: &[u8], weights: &[u8], second: bool) {
    for (carry, lane) in self.vs3.iter_mut().zip(self.vs1.iter()) {
      *carry = carry.wrapping_add(*lane);
    }

    for (lane, group) in self.vs1.iter_mut().zip(block.chunks_exact(8)) {
      let sad: u32 = group.iter().map(|&b| u32::from(b)).sum();
      *lane = lane.wrapping_add(sad);
    }

    let vs2 = if second { &mut self.vs2_1 } else { &mut self.vs2 };
    for ((lane, group), w) in vs2.iter_mut().zip(block.chunks_exact(4)).zip(weights.chunks_exact(4)) {
      let dot: u32 = group.iter().zip(w).map(|(&c, &w)| u32::from(c) * u32::from(w)).sum();
      *lane = lane.wrapping_add(dot);
    }
  }

  /// Fold the carry into the weighted sum and reduce both sums.
  #[inline(always)]
  fn reduce(self, shift: u32) -> (u32, u32) {
    let sum1 = self.vs1.iter().fold(0u32, |acc, &x| acc.wrapping_add(x));
    let carry = self.vs3.iter().fold(0u32, |acc, &x| acc.wrapping_add(x << shift));
    let sum2 = self
      .vs2
      .iter()
      .chain(self.vs2_1.iter())
      .fold(carry, |acc, &x| acc.wrapping_add(x));
    (sum1 % BASE, sum2 % BASE)
  }
}

/// Lane-emulated kernel over `W`-byte sub-blocks.
///
/// Inputs shorter than 64 bytes go straight to the scalar tail.
pub(crate) fn lanes<const W: usize>(adler: u32, data: &[u8]) -> u32 {
  const { assert!(W == 16 || W == 32 || W == 64) };
  let weights = const { super::consts::descending_weights::<W>() };
  let shift = W.trailing_zeros();

  let (mut sum1, mut sum2) = unpack(adler);
  if data.len() < 64 {
    return tail(sum1, sum2, data);
  }

  let mut rest = data;
  while rest.len() >= W {
    let k = rest.len().min(NMAX) / W * W;
    let (chunk, after) = rest.split_at(k);
    rest = after;

    let mut lanes = Lanes::seeded(sum1, sum2);
    let (blocks, _) = chunk.as_chunks::<W>();

    // Peel one sub-block so the rest pairs up.
    let (peel, body) = blocks.split_at(blocks.len() % 2);
    for block in peel {
      lanes.absorb(block, &weights, false);
    }

    let (pairs, _) = body.as_chunks::<2>();
    for [b0, b1] in pairs {
      lanes.absorb(b0, &weights, false);
      lanes.absorb(b1, &weights, true);
    }

    (sum1, sum2) = lanes.reduce(shift);
  }

  tail(sum1, sum2, rest)
}

/// `lanes` at the AVX2 register width; the portable dispatch fallback.
#[inline]
pub(crate) fn lanes32(adler: u32, data: &[u8]) -> u32 {
  lanes::<32>(adler, data)
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;
  use crate::adler32::reference::adler32_bytewise;

  fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut x = seed | 1;
    for _ in 0..len {
      // xorshift64*
      x ^= x << 13;
      x ^= x >> 7;
      x ^= x << 17;
      out.push((x as u8).wrapping_add((x >> 8) as u8));
    }
    out
  }

  const STATES: [u32; 4] = [1, 0, 0xFFF0_FFF0, 0x1234_5678];

  #[test]
  fn len_1_matches_reference() {
    for state in STATES {
      let (s1, s2) = unpack(state);
      for byte in [0u8, 1, 0x7F, 0xFF] {
        assert_eq!(len_1(s1, s2, byte), adler32_bytewise(state, &[byte]));
      }
    }
  }

  #[test]
  fn tail_handles_every_short_length() {
    let data = gen_bytes(200, 7);
    for state in STATES {
      let (s1, s2) = unpack(state);
      for len in 0..200 {
        let slice = data.get(..len).unwrap();
        assert_eq!(tail(s1, s2, slice), adler32_bytewise(state, slice), "len={len}");
      }
    }
  }

  #[test]
  fn tail_of_empty_returns_state() {
    assert_eq!(tail(1, 0, &[]), 1);
    assert_eq!(tail(0xFFF0, 0xFFF0, &[]), 0xFFF0_FFF0);
  }

  #[test]
  fn scalar_crosses_nmax_boundaries() {
    let data = gen_bytes(3 * NMAX + 77, 11);
    for len in [0, 1, 15, 16, NMAX - 1, NMAX, NMAX + 1, 2 * NMAX + 1, 3 * NMAX + 77] {
      let slice = data.get(..len).unwrap();
      assert_eq!(scalar(1, slice), adler32_bytewise(1, slice), "len={len}");
    }
  }

  #[test]
  fn lanes_match_reference_for_every_width() {
    let data = gen_bytes(2 * NMAX + 300, 42);
    let lengths = [
      0,
      1,
      63,
      64,
      65,
      127,
      128,
      129,
      192,
      1000,
      NMAX - 1,
      NMAX,
      NMAX + 1,
      2 * NMAX + 1,
      2 * NMAX + 300,
    ];
    for state in STATES {
      for len in lengths {
        let slice = data.get(..len).unwrap();
        let expected = adler32_bytewise(state, slice);
        assert_eq!(lanes::<16>(state, slice), expected, "W=16 len={len}");
        assert_eq!(lanes::<32>(state, slice), expected, "W=32 len={len}");
        assert_eq!(lanes::<64>(state, slice), expected, "W=64 len={len}");
      }
    }
  }

  #[test]
  fn lanes_saturated_input_reduces() {
    let data = alloc::vec![0xFFu8; 2 * NMAX];
    let expected = adler32_bytewise(1, &data);
    assert_eq!(lanes::<64>(1, &data), expected);
    assert_eq!(lanes::<32>(1, &data), expected);
    assert_eq!(scalar(1, &data), expected);
  }

  #[test]
  fn single_sub_block_weighting() {
    // One 64-byte block from (1, 0): sum2 = 64·1 + Σ (64 − i)·c_i.
    let data: Vec<u8> = (0..64u8).collect();
    let sum1 = 1 + (0..64u32).sum::<u32>();
    let sum2 = 64 + (0..64u32).map(|i| (64 - i) * i).sum::<u32>();
    assert_eq!(lanes::<64>(1, &data), pack(sum1 % BASE, sum2 % BASE));
  }
}
