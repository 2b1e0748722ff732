//! A minimal fallback device tree blob for when no `--dtb` is given.
//!
//! This is not a complete flattened device tree — it carries only the two
//! fixed slots the core's reset sentinel contract reads: the RAM-size cell
//! at offset `0x13c`, pre-seeded with the sentinel the core looks for, and
//! the command-line slot at `0xc0`. A guest kernel that actually parses the
//! device tree needs a real one passed via `--dtb`.

const DTB_LEN: usize = 512;
const SENTINEL_OFFSET: usize = 0x13c;
const SENTINEL_BYTES: [u8; 4] = [0x00, 0xc0, 0xff, 0x03];

/// Returns a freshly built minimal DTB with the sentinel pre-seeded.
#[must_use]
pub fn builtin_minimal_dtb() -> Vec<u8> {
    let mut dtb = vec![0u8; DTB_LEN];
    dtb[SENTINEL_OFFSET..SENTINEL_OFFSET + 4].copy_from_slice(&SENTINEL_BYTES);
    dtb
}
