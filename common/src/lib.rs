pub mod error;
pub mod group;
pub mod polynomial;
pub mod random;
pub mod ristretto;
pub mod secret_sharing;
#[cfg(any(test, feature = "test_helpers"))]
pub mod testing;
pub mod utils;

// Party indices are encoded as u32 on the wire, but anything past u16 is far
// beyond what a single key ceremony can use.
pub const MAX_PARTIES: usize = u16::MAX as usize;

// pub const BENCH_K_N: [(usize, usize); 6] = [
//     (3, 5),
//     (7, 16),
//     (15, 32),
//     (31, 64),
//     (63, 128),
//     (127, 256),
// ];
pub const BENCH_K_N: [(usize, usize); 3] = [
    (3, 5),
    (7, 16),
    // (15, 32),
    // (31, 64),
    (63, 128),
];
