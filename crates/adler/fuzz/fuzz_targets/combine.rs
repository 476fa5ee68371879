//! Fuzz target for Adler-32 combine.

#![no_main]

use adler::{Adler32, combine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, usize)| {
  let (data, split) = input;
  let split = if data.is_empty() { 0 } else { split % (data.len() + 1) };
  let (a, b) = data.split_at(split);

  let combined = combine(Adler32::checksum(a), Adler32::checksum(b), b.len());
  assert_eq!(combined, Adler32::checksum(&data), "combine mismatch at split={split}");
});
