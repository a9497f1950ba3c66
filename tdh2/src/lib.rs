//! (k, n)-threshold hybrid encryption in the style of Shoup-Gennaro TDH2.
//!
//! A dealer splits a decryption key among n parties. Anyone can encrypt to
//! the public key; decrypting needs k parties to each publish a
//! [`DecryptionShare`] carrying a proof of correctness, after which anyone
//! can [`combine`] the shares into the plaintext.

pub mod ciphertext;
pub mod combiner;
pub mod dealer;
pub mod encoding;
pub mod keys;
pub mod params;
pub mod party;
pub mod proof;
pub mod symmetric;

use rand::TryCryptoRng;

pub use common::{error, group::Group, ristretto::Ristretto};

pub use crate::{
    ciphertext::{Ciphertext, encrypt},
    combiner::{Combiner, combine},
    dealer::Dealer,
    encoding::Encode,
    keys::{MasterSecret, PrivateShare, PublicKey},
    params::Params,
    party::{DecryptionShare, create_share, verify_share, verify_shares},
};

/// Deals a fresh threshold key. The master secret is dropped (and wiped);
/// use [`Dealer::deal`] to keep it for re-dealing.
pub fn generate_keys<G, R>(
    k: usize,
    n: usize,
    rng: &mut R,
) -> Result<(PublicKey<G>, Vec<PrivateShare<G>>), error::Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    let (_, public_key, shares) = Dealer::<G>::new(Params::new(k, n)?).deal(rng)?;
    Ok((public_key, shares))
}
