use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use blake3::Hasher;
use zeroize::Zeroize;

use common::{
    error::{
        Error,
        ErrorKind::{AuthenticationFailed, EncryptionFailed},
    },
    group::Group,
};

pub const KDF_DOMAIN: &str = "tdh2 2024-06 aes-256-gcm key";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
/// GCM authentication tag appended to every payload.
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key and nonce derived from the shared element W = h^r.
/// W is fresh per ciphertext, so a (key, nonce) pair is never reused.
pub struct SymmetricKey {
    key: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
}

impl SymmetricKey {
    pub fn derive<G: Group>(shared: &G::Element, label: &[u8]) -> Self {
        let mut hasher = Hasher::new_derive_key(KDF_DOMAIN);
        hasher.update(G::NAME.as_bytes());
        hasher.update(&G::encode_element(shared));
        hasher.update(&(label.len() as u64).to_be_bytes());
        hasher.update(label);

        let mut buf = [0u8; KEY_LEN + NONCE_LEN];
        hasher.finalize_xof().fill(&mut buf);

        let mut key = [0u8; KEY_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        key.copy_from_slice(&buf[..KEY_LEN]);
        nonce.copy_from_slice(&buf[KEY_LEN..]);
        buf.zeroize();

        Self { key, nonce }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    pub fn seal(&self, plaintext: &[u8], label: &[u8]) -> Result<Vec<u8>, Error> {
        self.cipher()
            .encrypt(
                Nonce::from_slice(&self.nonce),
                Payload {
                    msg: plaintext,
                    aad: label,
                },
            )
            .map_err(|e| EncryptionFailed(format!("aes-256-gcm: {e}")).into())
    }

    pub fn open(&self, payload: &[u8], label: &[u8]) -> Result<Vec<u8>, Error> {
        self.cipher()
            .decrypt(
                Nonce::from_slice(&self.nonce),
                Payload {
                    msg: payload,
                    aad: label,
                },
            )
            .map_err(|_| AuthenticationFailed.into())
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
    }
}
