use rand::TryCryptoRng;
use tracing::warn;
use zeroize::Zeroize;

use common::{
    error::{
        Error,
        ErrorKind::{EncryptionFailed, EntropyFailure, MalformedCiphertext},
    },
    group::Group,
    random::random_scalar,
};

use crate::{
    encoding::MAX_FIELD_LEN,
    keys::PublicKey,
    proof::{CIPHERTEXT_DOMAIN, DleqProof, Statement},
    symmetric::{SymmetricKey, TAG_LEN},
};

/// Hybrid ciphertext: the envelope (U, Ū) = (G^r, Ḡ^r), the AES-256-GCM
/// payload, the public label and a proof that U and Ū share the exponent r.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext<G: Group> {
    pub(crate) u: G::Element,
    pub(crate) u_bar: G::Element,
    pub(crate) payload: Vec<u8>,
    pub(crate) label: Vec<u8>,
    pub(crate) proof: DleqProof<G>,
}

impl<G: Group> Ciphertext<G> {
    pub fn u(&self) -> &G::Element {
        &self.u
    }

    pub fn u_bar(&self) -> &G::Element {
        &self.u_bar
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn proof(&self) -> &DleqProof<G> {
        &self.proof
    }

    /// Checks the envelope proof against the key the ciphertext was made
    /// for. Only the commitment h is bound, so a re-dealt key accepts the
    /// ciphertexts of its predecessor.
    pub fn verify(&self, public_key: &PublicKey<G>) -> Result<(), Error> {
        let g = G::generator();
        let g_bar = G::second_generator();
        let statement = Statement::<G> {
            g1: &g,
            h1: &self.u,
            g2: &g_bar,
            h2: &self.u_bar,
        };

        let commitment = G::encode_element(&public_key.commitment);
        let context = [
            commitment.as_slice(),
            self.label.as_slice(),
            self.payload.as_slice(),
        ];
        if self.proof.verify(CIPHERTEXT_DOMAIN, &context, &statement) {
            Ok(())
        } else {
            warn!(label_len = self.label.len(), "rejected ciphertext with invalid proof");
            Err(MalformedCiphertext(
                "envelope proof does not verify under this public key".to_string(),
            )
            .into())
        }
    }
}

/// Encrypts `plaintext` to `public_key`, binding `label` into the proof, the
/// key derivation and the AEAD tag.
pub fn encrypt<G, R>(
    public_key: &PublicKey<G>,
    label: &[u8],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Ciphertext<G>, Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    if label.len() > MAX_FIELD_LEN || plaintext.len() > MAX_FIELD_LEN - TAG_LEN {
        return Err(EncryptionFailed(format!(
            "label and payload are limited to {MAX_FIELD_LEN} bytes"
        ))
        .into());
    }
    let mut r = random_scalar::<G, R>(rng).map_err(entropy_to_encryption)?;

    let g = G::generator();
    let g_bar = G::second_generator();
    let u = G::mul_base(&r);
    let u_bar = G::mul(&r, &g_bar);

    let payload = match SymmetricKey::derive::<G>(&G::mul(&r, &public_key.commitment), label)
        .seal(plaintext, label)
    {
        Ok(payload) => payload,
        Err(e) => {
            r.zeroize();
            return Err(e);
        }
    };

    let statement = Statement::<G> {
        g1: &g,
        h1: &u,
        g2: &g_bar,
        h2: &u_bar,
    };
    let commitment = G::encode_element(&public_key.commitment);
    let context = [commitment.as_slice(), label, payload.as_slice()];
    let proof = DleqProof::prove(CIPHERTEXT_DOMAIN, &context, &statement, &r, rng);
    r.zeroize();

    Ok(Ciphertext {
        u,
        u_bar,
        payload,
        label: label.to_vec(),
        proof: proof.map_err(entropy_to_encryption)?,
    })
}

fn entropy_to_encryption(e: Error) -> Error {
    match e.kind() {
        EntropyFailure(msg) => EncryptionFailed(format!("randomness source failed: {msg}")).into(),
        _ => e,
    }
}
