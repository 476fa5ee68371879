//! Differential fuzzing against the `adler2` crate.

#![no_main]

use adler::Adler32;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let ours = Adler32::checksum(data);
  let theirs = adler2::adler32_slice(data);
  assert_eq!(ours, theirs, "adler2 mismatch: ours=0x{ours:08X} theirs=0x{theirs:08X} len={}", data.len());
});
