//! Helpers shared by the test suites of this workspace.

use rand::{TryCryptoRng, TryRngCore};

/// A randomness source that always fails.
pub struct FailingRng;

impl TryRngCore for FailingRng {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(std::io::Error::other("entropy pool drained"))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(std::io::Error::other("entropy pool drained"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(std::io::Error::other("entropy pool drained"))
    }
}

impl TryCryptoRng for FailingRng {}
