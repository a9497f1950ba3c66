use std::marker::PhantomData;

use rand::TryCryptoRng;
use tracing::debug;
use zeroize::Zeroize;

use common::{
    error::{Error, ErrorKind::InvalidParameters},
    group::Group,
    secret_sharing::{generate_shares, verification_keys},
};

use crate::{
    keys::{MasterSecret, PrivateShare, PublicKey},
    params::Params,
};

/// Trusted dealer for one (k, n) configuration.
pub struct Dealer<G: Group> {
    pub params: Params,
    _group: PhantomData<G>,
}

impl<G: Group> Dealer<G> {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            _group: PhantomData,
        }
    }

    pub fn k(&self) -> usize {
        self.params.k()
    }

    pub fn n(&self) -> usize {
        self.params.n()
    }

    /// Samples a fresh master secret and shares it.
    pub fn deal<R>(
        &self,
        rng: &mut R,
    ) -> Result<(MasterSecret<G>, PublicKey<G>, Vec<PrivateShare<G>>), Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        let secret = MasterSecret::<G>::random(rng)?;
        let (public_key, shares) = self.deal_secret(&secret, rng)?;
        Ok((secret, public_key, shares))
    }

    pub fn deal_secret<R>(
        &self,
        secret: &MasterSecret<G>,
        rng: &mut R,
    ) -> Result<(PublicKey<G>, Vec<PrivateShare<G>>), Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        let (k, n) = (self.k(), self.n());
        let (f, mut evals) = generate_shares::<G, R>(rng, n, k, &secret.secret)?;

        let coefficient_commitments = f.commit();
        drop(f);

        let public_key = PublicKey {
            params: self.params,
            commitment: coefficient_commitments[0],
            verification_keys: verification_keys::<G>(&evals),
            coefficient_commitments,
        };

        let shares = evals
            .iter()
            .enumerate()
            .map(|(i, s)| PrivateShare::new(i + 1, n, *s))
            .collect();
        evals.zeroize();

        debug!(k, n, group = G::NAME, "dealt threshold key");
        Ok((public_key, shares))
    }

    /// Re-shares the master secret behind `public_key` under this dealer's
    /// parameters. The commitment h is unchanged, so ciphertexts produced for
    /// `public_key` decrypt with the new shares.
    pub fn redeal<R>(
        &self,
        public_key: &PublicKey<G>,
        secret: &MasterSecret<G>,
        rng: &mut R,
    ) -> Result<(PublicKey<G>, Vec<PrivateShare<G>>), Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        if secret.commitment() != public_key.commitment {
            return Err(InvalidParameters(self.k(), self.n()).into());
        }

        debug!(
            from_k = public_key.k(),
            from_n = public_key.n(),
            to_k = self.k(),
            to_n = self.n(),
            "re-dealing threshold key"
        );
        self.deal_secret(secret, rng)
    }
}
