//! Basic Adler-32 usage: one-shot, streaming, resume and combine.
//!
//! Run with: `cargo run --example basic -p adler`

use adler::{Adler32, combine};

fn main() {
  println!("=== Adler-32 Basic Examples ===\n");

  one_shot_example();
  streaming_example();
  resume_example();
  combine_example();
}

/// One-shot computation: fastest when you have all data in memory.
fn one_shot_example() {
  println!("--- One-Shot Computation ---\n");

  let sum = Adler32::checksum(b"123456789");
  println!("Adler-32 (123456789): 0x{sum:08X}");
  assert_eq!(sum, 0x091E_01DE);

  // zlib stream trailers use the same value
  let wiki = Adler32::checksum(b"Wikipedia");
  println!("Adler-32 (Wikipedia): 0x{wiki:08X}");
  assert_eq!(wiki, 0x11E6_0398);

  println!();
}

/// Streaming computation: process data in chunks.
fn streaming_example() {
  println!("--- Streaming Computation ---\n");

  let mut hasher = Adler32::new();
  hasher.update(b"1234");
  hasher.update(b"56789");
  let sum = hasher.finalize();

  println!("Streaming: 0x{sum:08X} (sum1=0x{:04X}, sum2=0x{:04X})", hasher.sum1(), hasher.sum2());
  assert_eq!(sum, Adler32::checksum(b"123456789"));

  // finalize() is non-consuming
  hasher.update(b"...");
  println!("Extended:  0x{:08X}", hasher.finalize());

  hasher.reset();
  assert_eq!(hasher.finalize(), 1);

  println!();
}

/// Resume computation from a saved checksum.
fn resume_example() {
  println!("--- Resume from Saved State ---\n");

  let part1 = b"first part of data";
  let part2 = b" and the second part";

  let saved = Adler32::checksum(part1);
  println!("Saved state after part1: 0x{saved:08X}");

  let mut resumed = Adler32::resume(saved);
  resumed.update(part2);
  let sum = resumed.finalize();
  println!("Final after resume:      0x{sum:08X}");

  assert_eq!(sum, Adler32::checksum(b"first part of data and the second part"));
  println!("Verified: matches full computation");

  println!();
}

/// Combine checksums of independently processed pieces.
fn combine_example() {
  println!("--- Combine ---\n");

  let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
  let (left, right) = data.split_at(37_000);

  let joined = combine(Adler32::checksum(left), Adler32::checksum(right), right.len());
  println!("Combined: 0x{joined:08X}");
  assert_eq!(joined, Adler32::checksum(&data));
  println!("Verified: matches one-shot");

  println!();
}
