//! x86_64 Adler-32 kernels.
//!
//! | Kernel | Sub-block | Byte sums | Weighted sums |
//! |--------|-----------|-----------|---------------|
//! | SSE4.1 | 16 B | `psadbw` | `pmaddubsw` + `pmaddwd` |
//! | AVX2 | 32 B | `vpsadbw` | `vpmaddubsw` + `vpmaddwd` |
//! | AVX-512 VNNI | 64 B | `vpsadbw` | `vpdpbusd` |
//!
//! Every kernel processes `min(len, NMAX)` bytes per chunk (rounded down to a
//! whole number of sub-blocks), two sub-blocks per iteration after peeling one
//! when the count is odd, and finishes the `< W` byte remainder in the scalar
//! tail.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The `*_runtime` wrappers are only registered behind the matching
//!   `*_READY` capability mask.

#![allow(unsafe_code)]

use core::arch::x86_64::*;

use super::{
  consts::{BASE, NMAX, WEIGHTS_16, WEIGHTS_32, WEIGHTS_64},
  portable::{len_1, tail, unpack},
};

// ─────────────────────────────────────────────────────────────────────────────
// SSE4.1 (16-byte sub-blocks)
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "sse2,ssse3")]
fn weighted_16(v: __m128i, weights: __m128i, ones: __m128i) -> __m128i {
  // u8 × i8 pairs stay below 2·255·16, so the i16 stage never saturates.
  _mm_madd_epi16(_mm_maddubs_epi16(v, weights), ones)
}

#[inline]
#[target_feature(enable = "sse2")]
fn hsum_128(v: __m128i) -> u32 {
  let v = _mm_add_epi32(v, _mm_shuffle_epi32::<0b01_00_11_10>(v));
  let v = _mm_add_epi32(v, _mm_shuffle_epi32::<0b10_11_00_01>(v));
  _mm_cvtsi128_si32(v) as u32
}

/// SSE4.1 kernel.
///
/// # Safety
///
/// Caller must ensure the CPU supports `sse4.1` (and therefore `ssse3`).
#[target_feature(enable = "sse2,ssse3,sse4.1")]
pub(crate) unsafe fn sse41_unchecked(adler: u32, data: &[u8]) -> u32 {
  let (mut sum1, mut sum2) = unpack(adler);
  if let [byte] = data {
    return len_1(sum1, sum2, *byte);
  }
  if data.len() < 16 {
    return tail(sum1, sum2, data);
  }

  // SAFETY: WEIGHTS_16 is 16 readable bytes.
  let weights = unsafe { _mm_loadu_si128(WEIGHTS_16.as_ptr().cast()) };
  let ones = _mm_set1_epi16(1);
  let zero = _mm_setzero_si128();

  let mut rest = data;
  while rest.len() >= 16 {
    let k = rest.len().min(NMAX) / 16 * 16;
    let (chunk, after) = rest.split_at(k);
    rest = after;

    let mut vs1 = _mm_cvtsi32_si128(sum1 as i32);
    let mut vs2 = _mm_cvtsi32_si128(sum2 as i32);
    let mut vs2_1 = zero;
    let mut vs3 = zero;

    let (blocks, _) = chunk.as_chunks::<16>();
    let (peel, body) = blocks.split_at(blocks.len() % 2);

    for block in peel {
      // SAFETY: `block` is 16 readable bytes.
      let v = unsafe { _mm_loadu_si128(block.as_ptr().cast()) };
      vs3 = _mm_add_epi32(vs3, vs1);
      vs1 = _mm_add_epi32(vs1, _mm_sad_epu8(v, zero));
      vs2 = _mm_add_epi32(vs2, weighted_16(v, weights, ones));
    }

    let (pairs, _) = body.as_chunks::<2>();
    for [b0, b1] in pairs {
      // SAFETY: each block is 16 readable bytes.
      let (v0, v1) = unsafe { (_mm_loadu_si128(b0.as_ptr().cast()), _mm_loadu_si128(b1.as_ptr().cast())) };

      vs3 = _mm_add_epi32(vs3, vs1);
      vs1 = _mm_add_epi32(vs1, _mm_sad_epu8(v0, zero));
      vs2 = _mm_add_epi32(vs2, weighted_16(v0, weights, ones));

      vs3 = _mm_add_epi32(vs3, vs1);
      vs1 = _mm_add_epi32(vs1, _mm_sad_epu8(v1, zero));
      vs2_1 = _mm_add_epi32(vs2_1, weighted_16(v1, weights, ones));
    }

    vs3 = _mm_slli_epi32::<4>(vs3);
    vs2 = _mm_add_epi32(_mm_add_epi32(vs2, vs2_1), vs3);

    sum1 = hsum_128(vs1) % BASE;
    sum2 = hsum_128(vs2) % BASE;
  }

  tail(sum1, sum2, rest)
}

#[inline]
pub(crate) fn sse41_runtime(adler: u32, data: &[u8]) -> u32 {
  // SAFETY: registered only behind `x86::SSE41_READY`.
  unsafe { sse41_unchecked(adler, data) }
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX2 (32-byte sub-blocks)
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "avx2")]
fn weighted_32(v: __m256i, weights: __m256i, ones: __m256i) -> __m256i {
  _mm256_madd_epi16(_mm256_maddubs_epi16(v, weights), ones)
}

#[inline]
#[target_feature(enable = "avx2")]
fn hsum_256(v: __m256i) -> u32 {
  let lo = _mm256_castsi256_si128(v);
  let hi = _mm256_extracti128_si256::<1>(v);
  hsum_128(_mm_add_epi32(lo, hi))
}

/// AVX2 kernel.
///
/// # Safety
///
/// Caller must ensure the CPU supports `avx2` and `sse4.1`.
#[target_feature(enable = "avx2,sse4.1")]
pub(crate) unsafe fn avx2_unchecked(adler: u32, data: &[u8]) -> u32 {
  let (mut sum1, mut sum2) = unpack(adler);
  if data.len() < 16 {
    return tail(sum1, sum2, data);
  }
  if data.len() < 32 {
    // SAFETY: AVX2_READY includes SSE41_READY.
    return unsafe { sse41_unchecked(adler, data) };
  }

  // SAFETY: WEIGHTS_32 is 32 readable bytes.
  let weights = unsafe { _mm256_loadu_si256(WEIGHTS_32.as_ptr().cast()) };
  let ones = _mm256_set1_epi16(1);
  let zero = _mm256_setzero_si256();

  let mut rest = data;
  while rest.len() >= 32 {
    let k = rest.len().min(NMAX) / 32 * 32;
    let (chunk, after) = rest.split_at(k);
    rest = after;

    let mut vs1 = _mm256_zextsi128_si256(_mm_cvtsi32_si128(sum1 as i32));
    let mut vs2 = _mm256_zextsi128_si256(_mm_cvtsi32_si128(sum2 as i32));
    let mut vs2_1 = zero;
    let mut vs3 = zero;

    let (blocks, _) = chunk.as_chunks::<32>();
    let (peel, body) = blocks.split_at(blocks.len() % 2);

    for block in peel {
      // SAFETY: `block` is 32 readable bytes.
      let v = unsafe { _mm256_loadu_si256(block.as_ptr().cast()) };
      vs3 = _mm256_add_epi32(vs3, vs1);
      vs1 = _mm256_add_epi32(vs1, _mm256_sad_epu8(v, zero));
      vs2 = _mm256_add_epi32(vs2, weighted_32(v, weights, ones));
    }

    let (pairs, _) = body.as_chunks::<2>();
    for [b0, b1] in pairs {
      // SAFETY: each block is 32 readable bytes.
      let (v0, v1) = unsafe {
        (
          _mm256_loadu_si256(b0.as_ptr().cast()),
          _mm256_loadu_si256(b1.as_ptr().cast()),
        )
      };

      vs3 = _mm256_add_epi32(vs3, vs1);
      vs1 = _mm256_add_epi32(vs1, _mm256_sad_epu8(v0, zero));
      vs2 = _mm256_add_epi32(vs2, weighted_32(v0, weights, ones));

      vs3 = _mm256_add_epi32(vs3, vs1);
      vs1 = _mm256_add_epi32(vs1, _mm256_sad_epu8(v1, zero));
      vs2_1 = _mm256_add_epi32(vs2_1, weighted_32(v1, weights, ones));
    }

    vs3 = _mm256_slli_epi32::<5>(vs3);
    vs2 = _mm256_add_epi32(_mm256_add_epi32(vs2, vs2_1), vs3);

    sum1 = hsum_256(vs1) % BASE;
    sum2 = hsum_256(vs2) % BASE;
  }

  tail(sum1, sum2, rest)
}

#[inline]
pub(crate) fn avx2_runtime(adler: u32, data: &[u8]) -> u32 {
  // SAFETY: registered only behind `x86::AVX2_READY`.
  unsafe { avx2_unchecked(adler, data) }
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX-512 VNNI (64-byte sub-blocks)
// ─────────────────────────────────────────────────────────────────────────────

/// Sum of the 64-bit lanes of a `psadbw`-shaped accumulator.
///
/// Only the low half of each 64-bit lane is populated, so the 64-bit
/// reduction equals the full 32-bit one at half the shuffle work.
#[inline]
#[target_feature(enable = "avx512f")]
fn partial_hsum_512(v: __m512i) -> u32 {
  _mm512_reduce_add_epi64(v) as u32
}

/// AVX-512 VNNI kernel.
///
/// Inputs below 32 bytes go to the SSE4.1 kernel and below 64 bytes to the
/// AVX2 kernel. Each chunk is then processed in 64-byte sub-blocks:
///
/// ```text
/// vs1 = sum1 + Σ c[i]
/// vs2 = sum2 + 64·Σ(vs1 before each sub-block) + Σ (64 − i)·c[i]
/// ```
///
/// # Safety
///
/// Caller must ensure the CPU supports `avx512f`, `avx512bw`, `avx512vnni`
/// (and therefore `avx2` and `sse4.1`).
#[target_feature(enable = "avx512f,avx512bw,avx512vnni,avx2,sse4.1")]
pub(crate) unsafe fn avx512_vnni_unchecked(adler: u32, data: &[u8]) -> u32 {
  if data.len() < 32 {
    // SAFETY: AVX512_VNNI_READY includes SSE41_READY.
    return unsafe { sse41_unchecked(adler, data) };
  }
  if data.len() < 64 {
    // SAFETY: AVX512_VNNI_READY includes AVX2_READY.
    return unsafe { avx2_unchecked(adler, data) };
  }

  let (mut sum1, mut sum2) = unpack(adler);

  // SAFETY: WEIGHTS_64 is 64 readable bytes.
  let weights = unsafe { _mm512_loadu_epi8(WEIGHTS_64.as_ptr().cast()) };
  let zero = _mm512_setzero_si512();

  let mut rest = data;
  while rest.len() >= 64 {
    let k = rest.len().min(NMAX) / 64 * 64;
    let (chunk, after) = rest.split_at(k);
    rest = after;

    // Seed lane 0, which lines up with the first `psadbw` lane.
    let mut vs1 = _mm512_zextsi128_si512(_mm_cvtsi32_si128(sum1 as i32));
    let mut vs2 = _mm512_zextsi128_si512(_mm_cvtsi32_si128(sum2 as i32));
    let mut vs2_1 = zero;
    let mut vs3 = zero;

    let (blocks, _) = chunk.as_chunks::<64>();
    let (peel, body) = blocks.split_at(blocks.len() % 2);

    for block in peel {
      // SAFETY: `block` is 64 readable bytes.
      let v = unsafe { _mm512_loadu_epi8(block.as_ptr().cast()) };
      vs3 = _mm512_add_epi32(vs3, vs1);
      vs1 = _mm512_add_epi32(vs1, _mm512_sad_epu8(v, zero));
      vs2 = _mm512_dpbusd_epi32(vs2, v, weights);
    }

    let (pairs, _) = body.as_chunks::<2>();
    for [b0, b1] in pairs {
      // SAFETY: each block is 64 readable bytes.
      let (v0, v1) = unsafe {
        (
          _mm512_loadu_epi8(b0.as_ptr().cast()),
          _mm512_loadu_epi8(b1.as_ptr().cast()),
        )
      };

      vs3 = _mm512_add_epi32(vs3, vs1);
      vs1 = _mm512_add_epi32(vs1, _mm512_sad_epu8(v0, zero));
      vs2 = _mm512_dpbusd_epi32(vs2, v0, weights);

      vs3 = _mm512_add_epi32(vs3, vs1);
      vs1 = _mm512_add_epi32(vs1, _mm512_sad_epu8(v1, zero));
      vs2_1 = _mm512_dpbusd_epi32(vs2_1, v1, weights);
    }

    vs3 = _mm512_slli_epi32::<6>(vs3);
    vs2 = _mm512_add_epi32(vs2, vs3);
    vs2 = _mm512_add_epi32(vs2, vs2_1);

    sum1 = partial_hsum_512(vs1) % BASE;
    sum2 = (_mm512_reduce_add_epi32(vs2) as u32) % BASE;
  }

  tail(sum1, sum2, rest)
}

#[inline]
pub(crate) fn avx512_vnni_runtime(adler: u32, data: &[u8]) -> u32 {
  // SAFETY: registered only behind `x86::AVX512_VNNI_READY`.
  unsafe { avx512_vnni_unchecked(adler, data) }
}
