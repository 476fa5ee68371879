//! The portable kernels must produce correct results no matter which SIMD
//! kernel the dispatcher picked on this machine.

use adler::{Adler32, Kernel, __internal::run_all_kernels, kernel_for};

const CHECK: &[u8] = b"123456789";
const CHECK_VALUE: u32 = 0x091E_01DE;

#[test]
fn portable_kernels_report_check_value() {
  for result in run_all_kernels(1, CHECK) {
    assert_eq!(
      result.checksum, CHECK_VALUE,
      "{} produced 0x{:08X}, expected 0x{:08X}",
      result.name, result.checksum, CHECK_VALUE
    );
  }
}

#[test]
fn portable_kernels_always_run() {
  let names: Vec<&str> = run_all_kernels(1, CHECK).iter().map(|r| r.name).collect();
  for expected in ["reference", "portable/scalar", "portable/lanes"] {
    assert!(names.contains(&expected), "missing {expected} in {names:?}");
  }
}

#[test]
fn selected_backend_is_a_known_kernel() {
  let backend = Adler32::backend_name();
  let kernel = Kernel::from_name(backend);
  assert!(kernel.is_some(), "unknown backend {backend}");
  assert_eq!(kernel_for::<Adler32>(0), Kernel::Scalar.name());
  assert_eq!(kernel_for::<Adler32>(1 << 20), backend);
}

#[test]
fn selected_backend_is_runnable_here() {
  let caps = platform::caps();
  let backend = Adler32::backend_name();
  if let Some(kernel) = Kernel::from_name(backend) {
    assert!(caps.has(kernel.requires()), "{backend} selected without {:?}", kernel.requires());
  }
}
