use rand::TryCryptoRng;
use zeroize::Zeroize;

use crate::{
    error::{Error, ErrorKind::EntropyFailure},
    group::Group,
};

pub fn random_scalar<G, R>(rng: &mut R) -> Result<G::Scalar, Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    let mut bytes = [0u8; 64];
    if let Err(e) = rng.try_fill_bytes(&mut bytes) {
        bytes.zeroize();
        return Err(EntropyFailure(e.to_string()).into());
    }
    let scalar = G::scalar_from_wide(&bytes);
    bytes.zeroize();
    Ok(scalar)
}

pub fn random_scalars<G, R>(rng: &mut R, n: usize) -> Result<Vec<G::Scalar>, Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    (0..n).map(|_| random_scalar::<G, R>(&mut *rng)).collect()
}
