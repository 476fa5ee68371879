//! Property-based tests for Adler-32.
//!
//! These tests verify invariants that must hold for all inputs, not just
//! specific test vectors. Uses proptest for randomized input generation.

use adler::{Adler32, Checksum, ChecksumCombine, __internal::adler32_bytewise, adler32};
use proptest::prelude::*;

// Test Strategies

/// Generate arbitrary byte vectors up to 16KB (covers several NMAX chunks).
fn arb_data() -> impl Strategy<Value = Vec<u8>> {
  prop::collection::vec(any::<u8>(), 0..16_384)
}

/// Generate a valid packed state (both halves below 65521).
fn arb_state() -> impl Strategy<Value = u32> {
  (0u32..65521, 0u32..65521).prop_map(|(sum1, sum2)| (sum2 << 16) | sum1)
}

/// Generate multiple split points for chunked testing.
fn arb_splits(len: usize, count: usize) -> impl Strategy<Value = Vec<usize>> {
  prop::collection::vec(0..=len, count).prop_map(move |mut splits| {
    splits.sort();
    splits.push(len);
    splits.dedup();
    splits
  })
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(1000))]

  #[test]
  fn matches_bytewise_reference(state in arb_state(), data in arb_data()) {
    prop_assert_eq!(adler32(state, &data), adler32_bytewise(state, &data));
  }

  #[test]
  fn output_halves_stay_reduced(state in arb_state(), data in arb_data()) {
    let out = adler32(state, &data);
    prop_assert!(out & 0xFFFF < 65521);
    prop_assert!(out >> 16 < 65521);
  }

  #[test]
  fn multi_incremental(data in arb_data(), splits in arb_splits(16_384, 5)) {
    let mut hasher = Adler32::new();
    let mut prev = 0;
    for split in splits {
      let split = split.min(data.len());
      if split > prev {
        hasher.update(&data[prev..split]);
        prev = split;
      }
    }
    hasher.update(&data[prev..]);
    prop_assert_eq!(hasher.finalize(), Adler32::checksum(&data));
  }

  #[test]
  fn resume_correctness(data in arb_data(), split in 0..16_384usize) {
    let split = split.min(data.len());
    let (a, b) = data.split_at(split);

    let mut resumed = Adler32::resume(Adler32::checksum(a));
    resumed.update(b);
    prop_assert_eq!(resumed.finalize(), Adler32::checksum(&data));
  }

  #[test]
  fn reset_works(state in arb_state(), data in arb_data()) {
    let mut hasher = <Adler32 as Checksum>::with_initial(state);
    hasher.update(&data);
    hasher.reset();
    hasher.update(&data);
    prop_assert_eq!(hasher.finalize(), adler32(state, &data));
  }

  #[test]
  fn combine_correctness(data in arb_data(), split in 0..16_384usize) {
    let split = split.min(data.len());
    let (a, b) = data.split_at(split);

    let combined = <Adler32 as ChecksumCombine>::combine(Adler32::checksum(a), Adler32::checksum(b), b.len());
    prop_assert_eq!(combined, Adler32::checksum(&data));
  }

  #[test]
  fn combine_associative(data in arb_data(), split1 in 0..8192usize, split2 in 0..8192usize) {
    let split1 = split1.min(data.len());
    let split2 = (split1 + split2).min(data.len());

    let a = &data[..split1];
    let b = &data[split1..split2];
    let c = &data[split2..];

    let ab = adler::combine(Adler32::checksum(a), Adler32::checksum(b), b.len());
    let abc = adler::combine(ab, Adler32::checksum(c), c.len());
    prop_assert_eq!(abc, Adler32::checksum(&data));
  }
}
