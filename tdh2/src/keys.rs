use std::fmt;

use rand::TryCryptoRng;
use zeroize::Zeroize;

use common::{
    error::{
        Error,
        ErrorKind::{InvalidEncoding, InvalidShareIndex},
    },
    group::Group,
    random::random_scalar,
    secret_sharing::{verify_share, verify_verification_keys},
};

use crate::params::Params;

/// Public half of a threshold key.
///
/// `commitment` is h = G^a_0. `verification_keys[i - 1]` is V_i = G^s_i and
/// `coefficient_commitments[j]` is C_j = G^a_j, with C_0 = h.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<G: Group> {
    pub(crate) params: Params,
    pub(crate) commitment: G::Element,
    pub(crate) verification_keys: Vec<G::Element>,
    pub(crate) coefficient_commitments: Vec<G::Element>,
}

impl<G: Group> PublicKey<G> {
    pub fn group_name(&self) -> &'static str {
        G::NAME
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn k(&self) -> usize {
        self.params.k()
    }

    pub fn n(&self) -> usize {
        self.params.n()
    }

    pub fn commitment(&self) -> &G::Element {
        &self.commitment
    }

    pub fn verification_keys(&self) -> &[G::Element] {
        &self.verification_keys
    }

    pub fn coefficient_commitments(&self) -> &[G::Element] {
        &self.coefficient_commitments
    }

    pub fn verification_key(&self, index: usize) -> Result<&G::Element, Error> {
        if !self.params.contains(index) {
            return Err(InvalidShareIndex(index, self.n()).into());
        }
        Ok(&self.verification_keys[index - 1])
    }

    /// Feldman check of a party's share: G^s_i must equal both V_i and
    /// Σ_j i^j·C_j.
    pub fn verify_private_share(&self, share: &PrivateShare<G>) -> bool {
        match self.verification_key(share.index) {
            Ok(vk) => {
                share.n == self.n()
                    && G::mul_base(&share.secret) == *vk
                    && verify_share::<G>(&self.coefficient_commitments, share.index, &share.secret)
            }
            Err(_) => false,
        }
    }

    /// Structural and Feldman consistency of the key material.
    pub fn validate(&self) -> Result<(), Error> {
        if self.verification_keys.len() != self.n() {
            return Err(InvalidEncoding(format!(
                "expected {} verification keys, got {}",
                self.n(),
                self.verification_keys.len()
            ))
            .into());
        }
        if self.coefficient_commitments.len() != self.k() {
            return Err(InvalidEncoding(format!(
                "expected {} coefficient commitments, got {}",
                self.k(),
                self.coefficient_commitments.len()
            ))
            .into());
        }
        if self.coefficient_commitments[0] != self.commitment {
            return Err(
                InvalidEncoding("commitment does not match C_0".to_string()).into(),
            );
        }

        let bad = verify_verification_keys::<G>(
            &self.coefficient_commitments,
            &self.verification_keys,
        );
        if !bad.is_empty() {
            return Err(InvalidEncoding(format!(
                "verification keys {bad:?} are inconsistent with the commitments"
            ))
            .into());
        }
        Ok(())
    }
}

/// A party's share of the decryption key.
#[derive(Clone)]
pub struct PrivateShare<G: Group> {
    pub(crate) index: usize,
    pub(crate) n: usize,
    pub(crate) secret: G::Scalar,
}

impl<G: Group> PrivateShare<G> {
    pub(crate) fn new(index: usize, n: usize, secret: G::Scalar) -> Self {
        Self { index, n, secret }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// V_i for this share.
    pub fn verification_key(&self) -> G::Element {
        G::mul_base(&self.secret)
    }
}

impl<G: Group> fmt::Debug for PrivateShare<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateShare")
            .field("index", &self.index)
            .field("n", &self.n)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl<G: Group> Drop for PrivateShare<G> {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// The dealt secret a_0. Only needed to re-deal a key under new parameters.
#[derive(Clone)]
pub struct MasterSecret<G: Group> {
    pub(crate) secret: G::Scalar,
}

impl<G: Group> MasterSecret<G> {
    pub fn random<R>(rng: &mut R) -> Result<Self, Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        Ok(Self {
            secret: random_scalar::<G, R>(rng)?,
        })
    }

    pub fn from_scalar(secret: G::Scalar) -> Self {
        Self { secret }
    }

    /// h = G^a_0
    pub fn commitment(&self) -> G::Element {
        G::mul_base(&self.secret)
    }
}

impl<G: Group> fmt::Debug for MasterSecret<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

impl<G: Group> Drop for MasterSecret<G> {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
