//! Prime-order group abstraction.
//!
//! Everything above this module is written against [`Group`] only, so a
//! backend is a capability set: element arithmetic, scalar arithmetic modulo
//! the group order, canonical fixed-length encodings and hashing into scalars
//! and elements. Backends with a cofactor must reject non-subgroup points in
//! [`Group::decode_element`].

use std::fmt::Debug;

use blake3::Hasher;
use zeroize::Zeroize;

use crate::error::Error;

/// Domain separator for [`Group::second_generator`].
pub const SECOND_GENERATOR_DOMAIN: &str = "tdh2 2024-06 second generator";

pub trait Group: Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    type Scalar: Copy + Clone + Eq + Debug + Send + Sync + Zeroize;
    type Element: Copy + Clone + Eq + Debug + Send + Sync;

    /// Identifier written into every encoding.
    const NAME: &'static str;
    const SCALAR_LEN: usize;
    const ELEMENT_LEN: usize;

    fn generator() -> Self::Element;
    fn identity() -> Self::Element;

    fn add(a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(s: &Self::Scalar, p: &Self::Element) -> Self::Element;

    fn mul_base(s: &Self::Scalar) -> Self::Element {
        Self::mul(s, &Self::generator())
    }

    /// Σ s_i·P_i. Only ever called on public inputs, so backends may use a
    /// variable-time algorithm.
    fn multiscalar_mul(scalars: &[Self::Scalar], points: &[Self::Element]) -> Self::Element {
        scalars
            .iter()
            .zip(points)
            .fold(Self::identity(), |acc, (s, p)| Self::add(&acc, &Self::mul(s, p)))
    }

    fn scalar_zero() -> Self::Scalar;
    fn scalar_one() -> Self::Scalar;
    fn scalar_from_u64(x: u64) -> Self::Scalar;
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    /// `None` for zero.
    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar>;

    /// Reduces 512 uniformly random bits modulo the group order.
    fn scalar_from_wide(bytes: &[u8; 64]) -> Self::Scalar;
    /// Maps 512 uniformly random bits onto a group element with unknown
    /// discrete log.
    fn element_from_uniform(bytes: &[u8; 64]) -> Self::Element;

    fn encode_element(p: &Self::Element) -> Vec<u8>;
    fn decode_element(bytes: &[u8]) -> Result<Self::Element, Error>;
    fn encode_scalar(s: &Self::Scalar) -> Vec<u8>;
    fn decode_scalar(bytes: &[u8]) -> Result<Self::Scalar, Error>;

    /// Fiat-Shamir challenge derivation. Every part is length-prefixed so
    /// distinct transcripts never hash the same byte stream.
    fn hash_to_scalar(domain: &str, parts: &[&[u8]]) -> Self::Scalar {
        let mut buf = [0u8; 64];
        absorb(domain, parts).finalize_xof().fill(&mut buf);

        let s = Self::scalar_from_wide(&buf);
        buf.zeroize();
        s
    }

    fn hash_to_element(domain: &str, parts: &[&[u8]]) -> Self::Element {
        let mut buf = [0u8; 64];
        absorb(domain, parts).finalize_xof().fill(&mut buf);
        Self::element_from_uniform(&buf)
    }

    /// Ḡ: a generator independent of [`Group::generator`], derived by hashing
    /// the group name into the group.
    fn second_generator() -> Self::Element {
        Self::hash_to_element(SECOND_GENERATOR_DOMAIN, &[Self::NAME.as_bytes()])
    }
}

fn absorb(domain: &str, parts: &[&[u8]]) -> Hasher {
    let mut hasher = Hasher::new_derive_key(domain);
    parts.iter().for_each(|part| {
        hasher.update(&(part.len() as u64).to_be_bytes());
        hasher.update(part);
    });
    hasher
}

/// Σ x^j·C_j, i.e. the committed polynomial evaluated "in the exponent".
pub fn evaluate_in_exponent<G: Group>(commitments: &[G::Element], x: &G::Scalar) -> G::Element {
    let mut x_pow = G::scalar_one();
    let mut x_pows = Vec::with_capacity(commitments.len());
    for _ in 0..commitments.len() {
        x_pows.push(x_pow);
        x_pow = G::scalar_mul(&x_pow, x);
    }
    G::multiscalar_mul(&x_pows, commitments)
}
