use rayon::prelude::*;

use crate::{
    MAX_PARTIES,
    error::{
        Error,
        ErrorKind::{DuplicateShareIndex, InvalidShareIndex},
    },
    group::Group,
};

/// λ_i = Π_{j ∈ S, j ≠ i} j / (j - i) for every i in the qualified set S,
/// i.e. the weights that interpolate at x = 0.
pub fn compute_lagrange_bases<G: Group>(qualified_set: &[usize]) -> Result<Vec<G::Scalar>, Error> {
    check_qualified_set(qualified_set)?;

    Ok(qualified_set
        .par_iter()
        .map(|i| compute_lagrange_basis::<G>(*i, qualified_set))
        .collect())
}

// Indices must be distinct and non-zero, see check_qualified_set.
pub fn compute_lagrange_basis<G: Group>(i: usize, qualified_set: &[usize]) -> G::Scalar {
    let zq_i = G::scalar_from_u64(i as u64);

    let (num, denom) = qualified_set.iter().filter(|j| **j != i).fold(
        (G::scalar_one(), G::scalar_one()),
        |(num, denom), j| {
            let zq_j = G::scalar_from_u64(*j as u64);
            (
                G::scalar_mul(&num, &zq_j),
                G::scalar_mul(&denom, &G::scalar_sub(&zq_j, &zq_i)),
            )
        },
    );

    // one inversion per basis; denom is non-zero for distinct indices
    match G::scalar_invert(&denom) {
        Some(denom_inv) => G::scalar_mul(&num, &denom_inv),
        None => G::scalar_zero(),
    }
}

pub fn check_qualified_set(qualified_set: &[usize]) -> Result<(), Error> {
    let mut seen = qualified_set.to_vec();
    seen.sort_unstable();

    if let Some(i) = seen.iter().find(|i| **i == 0 || **i > MAX_PARTIES) {
        return Err(InvalidShareIndex(*i, MAX_PARTIES).into());
    }
    match seen.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(DuplicateShareIndex(pair[0]).into()),
        None => Ok(()),
    }
}

pub fn batch_decode_elements<G: Group>(encoded: &[&[u8]]) -> Result<Vec<G::Element>, Error> {
    encoded
        .par_iter()
        .map(|bytes| G::decode_element(bytes))
        .collect()
}

#[cfg(test)]
mod test {
    use crate::{
        error::ErrorKind,
        group::Group,
        ristretto::Ristretto,
        utils::{batch_decode_elements, compute_lagrange_bases},
    };

    #[test]
    fn lagrange_bases_for_small_set() {
        // S = {1, 2, 3}: λ_1 = 3, λ_2 = -3, λ_3 = 1
        let lambdas = compute_lagrange_bases::<Ristretto>(&[1, 2, 3]).unwrap();

        assert_eq!(lambdas[0], Ristretto::scalar_from_u64(3));
        assert_eq!(
            lambdas[1],
            Ristretto::scalar_sub(&Ristretto::scalar_zero(), &Ristretto::scalar_from_u64(3))
        );
        assert_eq!(lambdas[2], Ristretto::scalar_one());
    }

    #[test]
    fn lagrange_bases_sum_to_one() {
        // interpolating the constant polynomial 1 at zero
        let lambdas = compute_lagrange_bases::<Ristretto>(&[2, 5, 7, 11]).unwrap();
        let sum = lambdas
            .iter()
            .fold(Ristretto::scalar_zero(), |acc, l| Ristretto::scalar_add(&acc, l));

        assert_eq!(sum, Ristretto::scalar_one());
    }

    #[test]
    fn rejects_zero_and_duplicate_indices() {
        assert!(matches!(
            compute_lagrange_bases::<Ristretto>(&[0, 1]).unwrap_err().kind(),
            ErrorKind::InvalidShareIndex(0, _)
        ));
        assert!(matches!(
            compute_lagrange_bases::<Ristretto>(&[3, 1, 3]).unwrap_err().kind(),
            ErrorKind::DuplicateShareIndex(3)
        ));
    }

    #[test]
    fn batch_decode() {
        let points: Vec<_> = (1..=4u64)
            .map(|x| Ristretto::mul_base(&Ristretto::scalar_from_u64(x)))
            .collect();
        let encoded: Vec<Vec<u8>> = points.iter().map(Ristretto::encode_element).collect();

        let slices: Vec<&[u8]> = encoded.iter().map(|e| e.as_slice()).collect();
        assert_eq!(batch_decode_elements::<Ristretto>(&slices).unwrap(), points);

        let mut broken = slices.clone();
        broken[2] = &[0xff; 32];
        assert!(batch_decode_elements::<Ristretto>(&broken).is_err());
    }
}
