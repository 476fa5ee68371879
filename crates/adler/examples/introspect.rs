//! Kernel introspection: verify which optimizations are active.
//!
//! Run with: `cargo run --example introspect -p adler`
//! Try: `ADLER32_FORCE=scalar cargo run --example introspect -p adler`

use adler::{Adler32, DispatchInfo, Kernel, kernel_for};

fn main() {
  let info = DispatchInfo::current();
  println!("Platform: {info}");
  println!("Config:   {:?}", adler::config());
  println!("Backend:  {}", Adler32::backend_name());
  println!();

  println!("Kernel by buffer size:");
  for len in [0usize, 1, 15, 16, 31, 32, 63, 64, 4096, 1 << 20] {
    println!("  {len:>8} B -> {}", kernel_for::<Adler32>(len));
  }
  println!();

  println!("Kernel chain:");
  for kernel in Kernel::ALL {
    let supported = if platform::caps().has(kernel.requires()) { "yes" } else { "no" };
    let fallback = kernel.fallback().map_or("-", Kernel::name);
    println!(
      "  {:<20} min_len={:<3} fallback={:<16} supported={supported}",
      kernel.name(),
      kernel.min_len(),
      fallback
    );
  }
}
