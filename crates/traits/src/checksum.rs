//! Non-cryptographic checksum traits.
//!
//! - **Streaming**: incremental updates for large data
//! - **Parallelism**: combine operation for independently processed chunks

use core::fmt::Debug;

/// Non-cryptographic checksum algorithm.
///
/// # Usage
///
/// ```rust,ignore
/// use adler::{Adler32, Checksum};
///
/// // One-shot
/// let sum = Adler32::checksum(b"hello world");
///
/// // Streaming
/// let mut hasher = Adler32::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), sum);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent
/// - `reset()` must restore the hasher to its initial state
pub trait Checksum: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  /// The checksum output type.
  type Output: Copy + Eq + Debug + Default;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a new hasher with a custom initial value.
  ///
  /// Useful for resuming a checksum computation.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Update the hasher with multiple non-contiguous buffers.
  ///
  /// Semantics are identical to calling [`update`](Self::update) on each buffer
  /// in order.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Update the hasher with `std::io::IoSlice` buffers.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Return the checksum of everything processed so far.
  ///
  /// Does not consume the hasher; further updates continue from the same state.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the checksum of data in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Compute the checksum of multiple buffers in one shot.
  #[inline]
  #[must_use]
  fn checksum_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }
}

/// Checksums that can be joined without re-reading data.
///
/// `combine(sum(A), sum(B), len(B)) == sum(A || B)`, which lets callers
/// checksum chunks independently (e.g. on several threads) and merge.
///
/// ```rust,ignore
/// use adler::{Adler32, Checksum, ChecksumCombine};
///
/// let data = b"hello world";
/// let (a, b) = data.split_at(6);
///
/// let joined = Adler32::combine(Adler32::checksum(a), Adler32::checksum(b), b.len());
/// assert_eq!(joined, Adler32::checksum(data));
/// ```
pub trait ChecksumCombine: Checksum {
  /// Given `a = sum(A)` and `b = sum(B)`, compute `sum(A || B)`.
  #[must_use]
  fn combine(a: Self::Output, b: Self::Output, len_b: usize) -> Self::Output;
}
