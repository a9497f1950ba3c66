use rand::TryCryptoRng;
use rayon::prelude::*;

use crate::{
    error::{Error, ErrorKind::InvalidParameters},
    group::{Group, evaluate_in_exponent},
    polynomial::Polynomial,
    utils::compute_lagrange_bases,
};

/// Shares a secret with a random degree-(k-1) polynomial, returning the
/// polynomial and its evaluations at x = 1..=n.
pub fn generate_shares<G, R>(
    rng: &mut R,
    n: usize,
    k: usize,
    secret: &G::Scalar,
) -> Result<(Polynomial<G>, Vec<G::Scalar>), Error>
where
    G: Group,
    R: TryCryptoRng + ?Sized,
{
    if k == 0 || k > n {
        return Err(InvalidParameters(k, n).into());
    }
    let polynomial = Polynomial::<G>::sample_set_f0(k - 1, rng, secret)?;
    let evals = polynomial.evaluate_range(1, n);
    Ok((polynomial, evals))
}

/// V_i = G^{share_i}
pub fn verification_keys<G: Group>(shares: &[G::Scalar]) -> Vec<G::Element> {
    shares.par_iter().map(G::mul_base).collect()
}

/// Feldman check of a single share against the coefficient commitments.
pub fn verify_share<G: Group>(commitments: &[G::Element], index: usize, share: &G::Scalar) -> bool {
    G::mul_base(share) == evaluate_in_exponent::<G>(commitments, &G::scalar_from_u64(index as u64))
}

/// Checks V_i = Σ_j i^j·C_j for every party. Returns the (1-based) indices
/// whose verification key is inconsistent with the commitments.
pub fn verify_verification_keys<G: Group>(
    commitments: &[G::Element],
    verification_keys: &[G::Element],
) -> Vec<usize> {
    verification_keys
        .par_iter()
        .enumerate()
        .filter_map(|(i, vk)| {
            let expected =
                evaluate_in_exponent::<G>(commitments, &G::scalar_from_u64((i + 1) as u64));
            if expected == *vk { None } else { Some(i + 1) }
        })
        .collect()
}

pub fn reconstruct_secret<G: Group>(
    qualified_set: &[(usize, G::Scalar)],
) -> Result<G::Scalar, Error> {
    let indices: Vec<usize> = qualified_set.iter().map(|(index, _)| *index).collect();
    let lambdas = compute_lagrange_bases::<G>(&indices)?;

    Ok(qualified_set
        .iter()
        .zip(lambdas.iter())
        .fold(G::scalar_zero(), |acc, ((_, share), lambda)| {
            G::scalar_add(&acc, &G::scalar_mul(lambda, share))
        }))
}

/// Interpolates G^{f(0)} (or U^{f(0)}) from points (i, U^{f(i)}).
pub fn reconstruct_secret_exponent<G: Group>(
    qualified_set: &[(usize, G::Element)],
) -> Result<G::Element, Error> {
    let indices: Vec<usize> = qualified_set.iter().map(|(index, _)| *index).collect();
    let lambdas = compute_lagrange_bases::<G>(&indices)?;
    let points: Vec<G::Element> = qualified_set.iter().map(|(_, point)| *point).collect();

    Ok(G::multiscalar_mul(&lambdas, &points))
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::{
        MAX_PARTIES,
        group::Group,
        random::random_scalar,
        ristretto::Ristretto,
        secret_sharing::{
            generate_shares, reconstruct_secret, reconstruct_secret_exponent, verification_keys,
            verify_share, verify_verification_keys,
        },
    };

    #[test]
    fn gen_shares() {
        let n = 32;
        let k = 12;
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let secret = random_scalar::<Ristretto, _>(&mut rng).unwrap();

        let (f, shares) = generate_shares::<Ristretto, _>(&mut rng, n, k, &secret).unwrap();
        assert_eq!(f.len(), k);
        assert_eq!(shares.len(), n);

        // first k and last k parties
        let head: Vec<_> = (1..=k).map(|i| (i, shares[i - 1])).collect();
        let tail: Vec<_> = (n - k + 1..=n).map(|i| (i, shares[i - 1])).collect();

        assert_eq!(secret, reconstruct_secret::<Ristretto>(&head).unwrap());
        assert_eq!(secret, reconstruct_secret::<Ristretto>(&tail).unwrap());

        // k - 1 points interpolate to something else
        assert_ne!(secret, reconstruct_secret::<Ristretto>(&head[1..]).unwrap());
    }

    #[test]
    fn gen_shares_exponent() {
        let n = 16;
        let k = 5;
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let secret = random_scalar::<Ristretto, _>(&mut rng).unwrap();
        let (_, shares) = generate_shares::<Ristretto, _>(&mut rng, n, k, &secret).unwrap();

        let vks = verification_keys::<Ristretto>(&shares);
        let qualified_set: Vec<_> = [2usize, 9, 11, 15, 16]
            .iter()
            .map(|i| (*i, vks[*i - 1]))
            .collect();

        assert_eq!(
            Ristretto::mul_base(&secret),
            reconstruct_secret_exponent::<Ristretto>(&qualified_set).unwrap()
        );
    }

    #[test]
    fn feldman_verification() {
        let n = 10;
        let k = 4;
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let secret = random_scalar::<Ristretto, _>(&mut rng).unwrap();
        let (f, shares) = generate_shares::<Ristretto, _>(&mut rng, n, k, &secret).unwrap();
        let commitments = f.commit();

        for (i, share) in shares.iter().enumerate() {
            assert!(verify_share::<Ristretto>(&commitments, i + 1, share));
        }
        assert!(!verify_share::<Ristretto>(&commitments, 2, &shares[0]));

        let mut vks = verification_keys::<Ristretto>(&shares);
        assert!(verify_verification_keys::<Ristretto>(&commitments, &vks).is_empty());

        vks.swap(3, 6);
        assert_eq!(
            verify_verification_keys::<Ristretto>(&commitments, &vks),
            vec![4, 7]
        );
    }

    #[test]
    fn gen_shares_for_the_largest_committee() {
        let n = MAX_PARTIES;
        let k = 16;
        let mut rng = ChaCha20Rng::seed_from_u64(6);

        let secret = random_scalar::<Ristretto, _>(&mut rng).unwrap();
        let (f, shares) = generate_shares::<Ristretto, _>(&mut rng, n, k, &secret).unwrap();
        assert_eq!(shares.len(), n);

        for i in [1, 2, 4096, n - 1, n] {
            assert_eq!(shares[i - 1], f.evaluate(i));
        }

        let tail: Vec<_> = (n - k + 1..=n).map(|i| (i, shares[i - 1])).collect();
        assert_eq!(secret, reconstruct_secret::<Ristretto>(&tail).unwrap());
    }
}
