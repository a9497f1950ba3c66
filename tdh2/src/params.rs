use common::{
    MAX_PARTIES,
    error::{Error, ErrorKind::InvalidParameters},
};

/// Threshold configuration of a key: any `k` of the `n` parties can decrypt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Params {
    k: usize,
    n: usize,
}

impl Params {
    pub fn new(k: usize, n: usize) -> Result<Self, Error> {
        if k >= 1 && k <= n && n <= MAX_PARTIES {
            Ok(Self { k, n })
        } else {
            Err(InvalidParameters(k, n).into())
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= 1 && index <= self.n
    }
}
