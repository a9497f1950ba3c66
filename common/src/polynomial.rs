use rand::TryCryptoRng;
use rayon::prelude::*;
use zeroize::Zeroize;

use crate::{
    error::Error,
    group::Group,
    random::random_scalar,
};

/// Dense polynomial over the scalar field of `G`. Coefficients are secret
/// (a_0 is the dealt secret), so they are wiped when the polynomial drops.
pub struct Polynomial<G: Group> {
    pub coefficients: Vec<G::Scalar>,
}

impl<G: Group> Polynomial<G> {
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn from_coefficients(coefs: Vec<G::Scalar>) -> Self {
        Self {
            coefficients: coefs,
        }
    }

    pub fn sample_set_f0<R>(degree: usize, rng: &mut R, f0: &G::Scalar) -> Result<Self, Error>
    where
        R: TryCryptoRng + ?Sized,
    {
        let mut coefs: Vec<G::Scalar> = Vec::with_capacity(degree + 1);
        coefs.push(*f0);
        for _ in 0..degree {
            match random_scalar::<G, R>(rng) {
                Ok(coef) => coefs.push(coef),
                Err(e) => {
                    coefs.zeroize();
                    return Err(e);
                }
            }
        }

        Ok(Polynomial {
            coefficients: coefs,
        })
    }

    pub fn evaluate(&self, x: usize) -> G::Scalar {
        let x = G::scalar_from_u64(x as u64);

        // Horner
        self.coefficients
            .iter()
            .rev()
            .fold(G::scalar_zero(), |acc, coef| {
                G::scalar_add(&G::scalar_mul(&acc, &x), coef)
            })
    }

    /// f(from), ..., f(to), one Horner pass per point. Memory stays linear in
    /// the number of points.
    pub fn evaluate_range(&self, from: usize, to: usize) -> Vec<G::Scalar> {
        (from..=to)
            .into_par_iter()
            .map(|i| self.evaluate(i))
            .collect()
    }

    /// Feldman commitments C_j = G^{a_j}.
    pub fn commit(&self) -> Vec<G::Element> {
        self.coefficients.par_iter().map(G::mul_base).collect()
    }
}

impl<G: Group> Drop for Polynomial<G> {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}
