use curve25519_dalek::{
    RistrettoPoint, Scalar,
    ristretto::CompressedRistretto,
    traits::{Identity, VartimeMultiscalarMul},
};

use crate::{
    error::{Error, ErrorKind::InvalidEncoding},
    group::Group,
};

/// Ristretto255 over Curve25519. The group has prime order, so a successful
/// decompression is already a full membership check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ristretto;

impl Group for Ristretto {
    type Scalar = Scalar;
    type Element = RistrettoPoint;

    const NAME: &'static str = "ristretto255";
    const SCALAR_LEN: usize = 32;
    const ELEMENT_LEN: usize = 32;

    fn generator() -> RistrettoPoint {
        curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT
    }

    fn identity() -> RistrettoPoint {
        RistrettoPoint::identity()
    }

    fn add(a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a + b
    }

    fn sub(a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a - b
    }

    fn mul(s: &Scalar, p: &RistrettoPoint) -> RistrettoPoint {
        s * p
    }

    fn mul_base(s: &Scalar) -> RistrettoPoint {
        RistrettoPoint::mul_base(s)
    }

    fn multiscalar_mul(scalars: &[Scalar], points: &[RistrettoPoint]) -> RistrettoPoint {
        RistrettoPoint::vartime_multiscalar_mul(scalars, points)
    }

    fn scalar_zero() -> Scalar {
        Scalar::ZERO
    }

    fn scalar_one() -> Scalar {
        Scalar::ONE
    }

    fn scalar_from_u64(x: u64) -> Scalar {
        Scalar::from(x)
    }

    fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        a + b
    }

    fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
        a - b
    }

    fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
        a * b
    }

    fn scalar_invert(s: &Scalar) -> Option<Scalar> {
        if *s == Scalar::ZERO {
            None
        } else {
            Some(s.invert())
        }
    }

    fn scalar_from_wide(bytes: &[u8; 64]) -> Scalar {
        Scalar::from_bytes_mod_order_wide(bytes)
    }

    fn element_from_uniform(bytes: &[u8; 64]) -> RistrettoPoint {
        RistrettoPoint::from_uniform_bytes(bytes)
    }

    fn encode_element(p: &RistrettoPoint) -> Vec<u8> {
        p.compress().to_bytes().to_vec()
    }

    fn decode_element(bytes: &[u8]) -> Result<RistrettoPoint, Error> {
        let compressed = CompressedRistretto::from_slice(bytes).map_err(|_| {
            Error::from_kind(InvalidEncoding(format!(
                "ristretto point must be {} bytes, got {}",
                Self::ELEMENT_LEN,
                bytes.len()
            )))
        })?;
        decompress_ristretto_point(compressed)
    }

    fn encode_scalar(s: &Scalar) -> Vec<u8> {
        s.to_bytes().to_vec()
    }

    fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
        let repr: [u8; 32] = bytes.try_into().map_err(|_| {
            Error::from_kind(InvalidEncoding(format!(
                "scalar must be {} bytes, got {}",
                Self::SCALAR_LEN,
                bytes.len()
            )))
        })?;
        Option::from(Scalar::from_canonical_bytes(repr))
            .ok_or_else(|| InvalidEncoding("non-canonical scalar".to_string()).into())
    }
}

pub fn decompress_ristretto_point(
    compressed_point: CompressedRistretto,
) -> Result<RistrettoPoint, Error> {
    match compressed_point.decompress() {
        Some(decompressed_point) => Ok(decompressed_point),
        None => Err(Error::from_kind(InvalidEncoding(format!(
            "invalid ristretto point {compressed_point:?}",
        )))),
    }
}
