use std::sync::Once;

use adler::{Adler32, DispatchInfo, kernel_for};

pub const CASES: &[(&str, usize)] = &[
  ("xs", 64),
  ("s", 256),
  ("m", 4 * 1024),
  ("l", 64 * 1024),
  ("xl", 1024 * 1024),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Alignment {
  /// A regular `Vec<u8>` buffer (baseline).
  Vec,
  /// A slice starting one byte past a 64B-aligned address.
  Odd,
  /// A slice starting at a 64B-aligned address.
  A64,
}

impl Alignment {
  #[inline]
  #[must_use]
  pub const fn label(self) -> &'static str {
    match self {
      Self::Vec => "vec",
      Self::Odd => "odd",
      Self::A64 => "a64",
    }
  }
}

pub struct BenchData {
  alignment: Alignment,
  backing: Vec<u8>,
  offset: usize,
  len: usize,
}

impl BenchData {
  #[must_use]
  pub fn from_vec(data: Vec<u8>) -> Self {
    let len = data.len();
    Self {
      alignment: Alignment::Vec,
      backing: data,
      offset: 0,
      len,
    }
  }

  #[must_use]
  pub fn aligned_copy(src: &[u8], alignment: Alignment) -> Self {
    let skew = match alignment {
      Alignment::Vec => return Self::from_vec(src.to_vec()),
      Alignment::Odd => 1,
      Alignment::A64 => 0,
    };

    let len = src.len();
    let mut backing = vec![0u8; len + 128];

    let misalignment = (backing.as_ptr() as usize) % 64;
    let offset = (64 - misalignment) % 64 + skew;
    backing[offset..offset + len].copy_from_slice(src);

    Self {
      alignment,
      backing,
      offset,
      len,
    }
  }

  #[inline]
  #[must_use]
  pub fn alignment(&self) -> Alignment {
    self.alignment
  }

  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    &self.backing[self.offset..self.offset + self.len]
  }
}

#[must_use]
pub fn make_data(len: usize) -> Vec<u8> {
  (0..len)
    .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i >> 8) as u8))
    .collect()
}

#[must_use]
pub fn make_alignment_variants(src: Vec<u8>) -> Vec<BenchData> {
  let odd = BenchData::aligned_copy(&src, Alignment::Odd);
  let a64 = BenchData::aligned_copy(&src, Alignment::A64);
  vec![BenchData::from_vec(src), odd, a64]
}

#[inline]
#[must_use]
pub fn bench_param_label(size_label: &str, alignment: Alignment) -> String {
  format!("{size_label}@{}", alignment.label())
}

/// Print platform detection info once at benchmark start.
pub fn print_platform_info() {
  static ONCE: Once = Once::new();
  ONCE.call_once(|| {
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║                   PLATFORM DETECTION INFO                    ║");
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!("║ Platform: {}", DispatchInfo::current());
    eprintln!("║ Backend: {}", Adler32::backend_name());
    eprintln!("║ Bench alignments: vec, odd, a64");
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!("║ Kernel selection by size:");
    for &(label, size) in CASES {
      eprintln!("║   {:>3} ({:>7} B): adler32={}", label, size, kernel_for::<Adler32>(size));
    }
    eprintln!("╚══════════════════════════════════════════════════════════════╝");
  });
}
