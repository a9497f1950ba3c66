//! Non-interactive Chaum-Pedersen proofs of discrete-log equality.
//!
//! A [`DleqProof`] shows knowledge of x with h1 = g1^x and h2 = g2^x. The
//! challenge is e = H(domain, context, g2, h1, h2, A, B) with A = g1^t,
//! B = g2^t, and the response is f = t + e·x. Verification rebuilds
//! A = g1^f - e·h1 and B = g2^f - e·h2 and recomputes e.

use rand::TryCryptoRng;
use zeroize::Zeroize;

use common::{error::Error, group::Group, random::random_scalar};

/// Proof that the ciphertext envelope (U, Ū) uses one exponent.
pub const CIPHERTEXT_DOMAIN: &str = "tdh2 2024-06 ciphertext proof";
/// Proof that a partial decryption U^s_i matches V_i.
pub const SHARE_DOMAIN: &str = "tdh2 2024-06 decryption share proof";

/// The statement being proven: log_{g1} h1 = log_{g2} h2.
pub struct Statement<'a, G: Group> {
    pub g1: &'a G::Element,
    pub h1: &'a G::Element,
    pub g2: &'a G::Element,
    pub h2: &'a G::Element,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DleqProof<G: Group> {
    pub e: G::Scalar,
    pub f: G::Scalar,
}

impl<G: Group> DleqProof<G> {
    pub fn prove<R>(
        domain: &str,
        context: &[&[u8]],
        statement: &Statement<'_, G>,
        witness: &G::Scalar,
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        let mut t = random_scalar::<G, R>(rng)?;
        let a = G::mul(&t, statement.g1);
        let b = G::mul(&t, statement.g2);

        let e = challenge::<G>(domain, context, statement, &a, &b);
        let f = G::scalar_add(&t, &G::scalar_mul(&e, witness));
        t.zeroize();

        Ok(Self { e, f })
    }

    pub fn verify(&self, domain: &str, context: &[&[u8]], statement: &Statement<'_, G>) -> bool {
        let a = G::sub(&G::mul(&self.f, statement.g1), &G::mul(&self.e, statement.h1));
        let b = G::sub(&G::mul(&self.f, statement.g2), &G::mul(&self.e, statement.h2));

        challenge::<G>(domain, context, statement, &a, &b) == self.e
    }
}

fn challenge<G: Group>(
    domain: &str,
    context: &[&[u8]],
    statement: &Statement<'_, G>,
    a: &G::Element,
    b: &G::Element,
) -> G::Scalar {
    let points: Vec<Vec<u8>> = [statement.g2, statement.h1, statement.h2, a, b]
        .into_iter()
        .map(G::encode_element)
        .collect();

    let mut parts: Vec<&[u8]> = Vec::with_capacity(context.len() + points.len());
    parts.extend_from_slice(context);
    parts.extend(points.iter().map(Vec::as_slice));

    G::hash_to_scalar(domain, &parts)
}
