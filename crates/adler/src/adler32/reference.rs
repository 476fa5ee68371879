//! Bytewise Adler-32 reference.
//!
//! Reduces after every byte, so it is correct by inspection. Used as the
//! oracle for kernel cross-checks and never dispatched.

use super::consts::BASE;

/// Adler-32 of `data`, starting from the packed state `adler`.
#[must_use]
pub fn adler32_bytewise(adler: u32, data: &[u8]) -> u32 {
  let mut sum1 = adler & 0xFFFF;
  let mut sum2 = adler >> 16;
  for &byte in data {
    sum1 = (sum1 + u32::from(byte)) % BASE;
    sum2 = (sum2 + sum1) % BASE;
  }
  sum1 | (sum2 << 16)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_vectors() {
    assert_eq!(adler32_bytewise(1, b""), 1);
    assert_eq!(adler32_bytewise(1, b"a"), 0x0062_0062);
    assert_eq!(adler32_bytewise(1, b"Wikipedia"), 0x11E6_0398);
    assert_eq!(adler32_bytewise(1, b"123456789"), 0x091E_01DE);
  }

  #[test]
  fn resumes_across_split() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let (a, b) = data.split_at(17);
    assert_eq!(adler32_bytewise(adler32_bytewise(1, a), b), adler32_bytewise(1, data));
  }
}
