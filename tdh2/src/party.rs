use rand::TryCryptoRng;
use rayon::prelude::*;
use tracing::warn;

use common::{
    error::{
        Error,
        ErrorKind::{InvalidShareIndex, InvalidShareProof},
    },
    group::Group,
};

use crate::{
    ciphertext::Ciphertext,
    keys::{PrivateShare, PublicKey},
    proof::{DleqProof, SHARE_DOMAIN, Statement},
};

/// Party i's contribution U^s_i to decrypting one ciphertext, with a proof
/// that log_U partial = log_G V_i.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptionShare<G: Group> {
    pub(crate) index: usize,
    pub(crate) partial: G::Element,
    pub(crate) proof: DleqProof<G>,
}

impl<G: Group> DecryptionShare<G> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn partial(&self) -> &G::Element {
        &self.partial
    }

    pub fn proof(&self) -> &DleqProof<G> {
        &self.proof
    }
}

/// Produces party `share.index()`'s decryption share. Refuses to touch
/// ciphertexts whose envelope proof fails under `public_key`.
pub fn create_share<G, R>(
    public_key: &PublicKey<G>,
    share: &PrivateShare<G>,
    ciphertext: &Ciphertext<G>,
    rng: &mut R,
) -> Result<DecryptionShare<G>, Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    ciphertext.verify(public_key)?;
    if share.index == 0 || share.index > share.n {
        return Err(InvalidShareIndex(share.index, share.n).into());
    }

    let g = G::generator();
    let vk = G::mul_base(&share.secret);
    let partial = G::mul(&share.secret, &ciphertext.u);
    let statement = Statement::<G> {
        g1: &g,
        h1: &vk,
        g2: &ciphertext.u,
        h2: &partial,
    };

    let index = index_bytes(share.index);
    let context = [ciphertext.label.as_slice(), index.as_slice()];
    let proof = DleqProof::prove(SHARE_DOMAIN, &context, &statement, &share.secret, rng)?;

    Ok(DecryptionShare {
        index: share.index,
        partial,
        proof,
    })
}

/// Full public check of a decryption share: index range, the ciphertext's
/// envelope proof and the share proof against V_i.
pub fn verify_share<G: Group>(
    public_key: &PublicKey<G>,
    ciphertext: &Ciphertext<G>,
    share: &DecryptionShare<G>,
) -> Result<(), Error> {
    public_key.verification_key(share.index)?;
    ciphertext.verify(public_key)?;
    verify_share_proof(public_key, ciphertext, share)
}

/// Verifies many shares for one ciphertext on the rayon pool. The ciphertext
/// is checked once; the result holds the positions in `shares` that passed.
pub fn verify_shares<G: Group>(
    public_key: &PublicKey<G>,
    ciphertext: &Ciphertext<G>,
    shares: &[DecryptionShare<G>],
) -> Result<Vec<usize>, Error> {
    ciphertext.verify(public_key)?;

    Ok(shares
        .par_iter()
        .enumerate()
        .filter(|(_, share)| verify_share_proof(public_key, ciphertext, share).is_ok())
        .map(|(position, _)| position)
        .collect())
}

// Assumes the ciphertext has been verified.
pub(crate) fn verify_share_proof<G: Group>(
    public_key: &PublicKey<G>,
    ciphertext: &Ciphertext<G>,
    share: &DecryptionShare<G>,
) -> Result<(), Error> {
    let vk = public_key.verification_key(share.index)?;
    let g = G::generator();
    let statement = Statement::<G> {
        g1: &g,
        h1: vk,
        g2: &ciphertext.u,
        h2: &share.partial,
    };

    let index = index_bytes(share.index);
    let context = [ciphertext.label.as_slice(), index.as_slice()];
    if share.proof.verify(SHARE_DOMAIN, &context, &statement) {
        Ok(())
    } else {
        warn!(index = share.index, "rejected decryption share with invalid proof");
        Err(InvalidShareProof(share.index).into())
    }
}

// Indices are bounded by MAX_PARTIES, so the u32 cast is lossless.
fn index_bytes(index: usize) -> [u8; 4] {
    (index as u32).to_be_bytes()
}
