use std::collections::BTreeMap;

use tracing::debug;

use common::{
    error::{
        Error,
        ErrorKind::{InsufficientShares, InvalidShareIndex},
    },
    group::Group,
    secret_sharing::reconstruct_secret_exponent,
};

use crate::{
    ciphertext::Ciphertext,
    keys::PublicKey,
    party::{DecryptionShare, verify_share_proof},
    symmetric::SymmetricKey,
};

/// Recovers the plaintext from decryption shares that have already been
/// verified. Duplicated indices count once (first occurrence wins) and the
/// k smallest indices are used, so the result does not depend on the order
/// of `shares`.
pub fn combine<G: Group>(
    public_key: &PublicKey<G>,
    ciphertext: &Ciphertext<G>,
    shares: &[DecryptionShare<G>],
) -> Result<Vec<u8>, Error> {
    let mut distinct: BTreeMap<usize, &G::Element> = BTreeMap::new();
    for share in shares {
        if !public_key.params.contains(share.index) {
            return Err(InvalidShareIndex(share.index, public_key.n()).into());
        }
        distinct.entry(share.index).or_insert(&share.partial);
    }

    combine_distinct(public_key, ciphertext, &distinct)
}

fn combine_distinct<G: Group>(
    public_key: &PublicKey<G>,
    ciphertext: &Ciphertext<G>,
    distinct: &BTreeMap<usize, &G::Element>,
) -> Result<Vec<u8>, Error> {
    let k = public_key.k();
    if distinct.len() < k {
        return Err(InsufficientShares(distinct.len(), k).into());
    }

    let qualified_set: Vec<(usize, G::Element)> = distinct
        .iter()
        .take(k)
        .map(|(index, partial)| (*index, **partial))
        .collect();
    debug!(
        indices = ?qualified_set.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        "combining decryption shares"
    );

    // R = Σ λ_i·U^s_i = U^a_0 = h^r
    let shared = reconstruct_secret_exponent::<G>(&qualified_set)?;
    SymmetricKey::derive::<G>(&shared, &ciphertext.label)
        .open(&ciphertext.payload, &ciphertext.label)
}

/// Collects decryption shares for one ciphertext as they arrive, keeping
/// only those whose proof verifies.
pub struct Combiner<'a, G: Group> {
    public_key: &'a PublicKey<G>,
    ciphertext: &'a Ciphertext<G>,
    shares: BTreeMap<usize, DecryptionShare<G>>,
}

impl<'a, G: Group> Combiner<'a, G> {
    /// Fails with `MalformedCiphertext` if the ciphertext does not verify
    /// under `public_key`.
    pub fn new(
        public_key: &'a PublicKey<G>,
        ciphertext: &'a Ciphertext<G>,
    ) -> Result<Self, Error> {
        ciphertext.verify(public_key)?;
        Ok(Self {
            public_key,
            ciphertext,
            shares: BTreeMap::new(),
        })
    }

    /// Returns `Ok(false)` if a share for this index is already held.
    pub fn add_share(&mut self, share: DecryptionShare<G>) -> Result<bool, Error> {
        if self.shares.contains_key(&share.index) {
            return Ok(false);
        }
        verify_share_proof(self.public_key, self.ciphertext, &share)?;
        self.shares.insert(share.index, share);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.shares.len() >= self.public_key.k()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.shares.keys().copied().collect()
    }

    pub fn combine(&self) -> Result<Vec<u8>, Error> {
        let distinct: BTreeMap<usize, &G::Element> = self
            .shares
            .iter()
            .map(|(index, share)| (*index, &share.partial))
            .collect();
        combine_distinct(self.public_key, self.ciphertext, &distinct)
    }
}
