//! aarch64 Adler-32 kernel (NEON, 16-byte sub-blocks).
//!
//! Byte sums use pairwise widening adds (`uaddlp`/`uadalp`); weighted sums use
//! widening multiply-accumulate (`umull`/`umlal2`) against weights `16..1`
//! followed by a pairwise widening accumulate into 32-bit lanes.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]

use core::arch::aarch64::*;

use super::{
  consts::{BASE, NMAX, WEIGHTS_16},
  portable::{tail, unpack},
};

/// Weighted products of one block, as eight u16 lanes.
///
/// Each lane holds two products, at most `255·16 + 255·8`.
#[inline]
#[target_feature(enable = "neon")]
fn weighted(v: uint8x16_t, weights: uint8x16_t) -> uint16x8_t {
  let lo = vmull_u8(vget_low_u8(v), vget_low_u8(weights));
  vmlal_high_u8(lo, v, weights)
}

/// NEON kernel.
///
/// # Safety
///
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn neon_unchecked(adler: u32, data: &[u8]) -> u32 {
  let (mut sum1, mut sum2) = unpack(adler);
  if data.len() < 16 {
    return tail(sum1, sum2, data);
  }

  // SAFETY: WEIGHTS_16 is 16 readable bytes.
  let weights = unsafe { vld1q_u8(WEIGHTS_16.as_ptr()) };

  let mut rest = data;
  while rest.len() >= 16 {
    let k = rest.len().min(NMAX) / 16 * 16;
    let (chunk, after) = rest.split_at(k);
    rest = after;

    let mut vs1 = vsetq_lane_u32::<0>(sum1, vdupq_n_u32(0));
    let mut vs2 = vsetq_lane_u32::<0>(sum2, vdupq_n_u32(0));
    let mut vs2_1 = vdupq_n_u32(0);
    let mut vs3 = vdupq_n_u32(0);

    let (blocks, _) = chunk.as_chunks::<16>();
    let (peel, body) = blocks.split_at(blocks.len() % 2);

    for block in peel {
      // SAFETY: `block` is 16 readable bytes.
      let v = unsafe { vld1q_u8(block.as_ptr()) };
      vs3 = vaddq_u32(vs3, vs1);
      vs1 = vpadalq_u16(vs1, vpaddlq_u8(v));
      vs2 = vpadalq_u16(vs2, weighted(v, weights));
    }

    let (pairs, _) = body.as_chunks::<2>();
    for [b0, b1] in pairs {
      // SAFETY: each block is 16 readable bytes.
      let (v0, v1) = unsafe { (vld1q_u8(b0.as_ptr()), vld1q_u8(b1.as_ptr())) };

      vs3 = vaddq_u32(vs3, vs1);
      vs1 = vpadalq_u16(vs1, vpaddlq_u8(v0));
      vs2 = vpadalq_u16(vs2, weighted(v0, weights));

      vs3 = vaddq_u32(vs3, vs1);
      vs1 = vpadalq_u16(vs1, vpaddlq_u8(v1));
      vs2_1 = vpadalq_u16(vs2_1, weighted(v1, weights));
    }

    vs3 = vshlq_n_u32::<4>(vs3);
    vs2 = vaddq_u32(vaddq_u32(vs2, vs2_1), vs3);

    sum1 = vaddvq_u32(vs1) % BASE;
    sum2 = vaddvq_u32(vs2) % BASE;
  }

  tail(sum1, sum2, rest)
}

#[inline]
pub(crate) fn neon_runtime(adler: u32, data: &[u8]) -> u32 {
  // SAFETY: registered only behind `aarch64::NEON_READY`.
  unsafe { neon_unchecked(adler, data) }
}
