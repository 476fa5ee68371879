//! Cross-kernel equivalence fuzzing for Adler-32.
//!
//! Verifies that every kernel available on the current platform produces the
//! bytewise reference value for any input and any valid starting state.
//!
//! The oracle is the bytewise reference, which reduces after every byte and
//! is correct by inspection.

#![no_main]

use adler::__internal::{run_all_kernels, verify_kernels};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  sum1: u16,
  sum2: u16,
  data: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let state = ((u32::from(input.sum2) % 65521) << 16) | (u32::from(input.sum1) % 65521);
  let data = &input.data;

  let results = run_all_kernels(state, data);
  let expected = results[0].checksum;
  for result in &results[1..] {
    assert_eq!(
      result.checksum, expected,
      "Adler-32 kernel mismatch: {} produced 0x{:08X}, but {} produced 0x{:08X}, state=0x{:08X}, len={}",
      result.name, result.checksum, results[0].name, expected, state, data.len()
    );
  }

  verify_kernels(state, data).expect("Adler-32 kernel verification failed");
});
