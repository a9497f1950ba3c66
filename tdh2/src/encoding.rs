//! Versioned binary encodings.
//!
//! Every entity starts with a tag byte, a version byte and the
//! length-prefixed group name. Integers are big-endian u32 and variable
//! byte strings carry a u32 length prefix. Elements and scalars use the
//! group's fixed-length canonical encodings.
//!
//! | entity          | body                                             |
//! |-----------------|--------------------------------------------------|
//! | PublicKey       | k, n, h, V_1..V_n, C_0..C_{k-1}                  |
//! | PrivateShare    | index, n, s_i                                    |
//! | MasterSecret    | a_0                                              |
//! | Ciphertext      | U, Ū, e, f, label, payload                       |
//! | DecryptionShare | index, partial, e_i, f_i                         |

use zeroize::Zeroize;

use common::{
    MAX_PARTIES,
    error::{Error, ErrorKind::InvalidEncoding},
    group::Group,
    utils::batch_decode_elements,
};

use crate::{
    ciphertext::Ciphertext,
    keys::{MasterSecret, PrivateShare, PublicKey},
    params::Params,
    party::DecryptionShare,
    proof::DleqProof,
};

pub const VERSION: u8 = 1;

/// Longest label or payload a length prefix can describe.
pub const MAX_FIELD_LEN: usize = u32::MAX as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    PublicKey = 0x01,
    PrivateShare = 0x02,
    Ciphertext = 0x03,
    DecryptionShare = 0x04,
    MasterSecret = 0x05,
}

pub trait Encode: Sized {
    fn to_bytes(&self) -> Vec<u8>;
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>;
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new<G: Group>(tag: Tag) -> Self {
        let mut w = Self {
            buf: vec![tag as u8, VERSION],
        };
        w.bytes(G::NAME.as_bytes());
        w
    }

    // Callers only pass indices, thresholds and lengths bounded by
    // MAX_PARTIES or MAX_FIELD_LEN.
    fn u32(&mut self, value: usize) {
        self.buf.extend_from_slice(&(value as u32).to_be_bytes());
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.u32(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    fn element<G: Group>(&mut self, element: &G::Element) {
        self.buf.extend_from_slice(&G::encode_element(element));
    }

    fn scalar<G: Group>(&mut self, scalar: &G::Scalar) {
        let mut encoded = G::encode_scalar(scalar);
        self.buf.extend_from_slice(&encoded);
        encoded.zeroize();
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new<G: Group>(bytes: &'a [u8], tag: Tag) -> Result<Self, Error> {
        let mut r = Self { bytes, pos: 0 };

        let header = r.take(2)?;
        if header[0] != tag as u8 {
            return Err(malformed(format!(
                "expected tag {:#04x} ({tag:?}), got {:#04x}",
                tag as u8, header[0]
            )));
        }
        if header[1] != VERSION {
            return Err(malformed(format!("unsupported version {}", header[1])));
        }

        let name = r.bytes()?;
        if name != G::NAME.as_bytes() {
            return Err(malformed(format!(
                "group {:?} does not match {}",
                String::from_utf8_lossy(name),
                G::NAME
            )));
        }
        Ok(r)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let remaining = self.bytes.len() - self.pos;
        if len > remaining {
            return Err(malformed(format!(
                "truncated input: need {len} bytes at offset {}, {remaining} left",
                self.pos
            )));
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn u32(&mut self) -> Result<usize, Error> {
        let raw = self.take(4)?;
        Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
    }

    fn bytes(&mut self) -> Result<&'a [u8], Error> {
        let len = self.u32()?;
        self.take(len)
    }

    fn index(&mut self) -> Result<usize, Error> {
        let index = self.u32()?;
        if index == 0 || index > MAX_PARTIES {
            return Err(malformed(format!("party index {index} out of range")));
        }
        Ok(index)
    }

    fn element<G: Group>(&mut self) -> Result<G::Element, Error> {
        G::decode_element(self.take(G::ELEMENT_LEN)?)
    }

    fn elements<G: Group>(&mut self, count: usize) -> Result<Vec<G::Element>, Error> {
        let raw = self.take(count * G::ELEMENT_LEN)?;
        let chunks: Vec<&[u8]> = raw.chunks_exact(G::ELEMENT_LEN).collect();
        batch_decode_elements::<G>(&chunks)
    }

    fn scalar<G: Group>(&mut self) -> Result<G::Scalar, Error> {
        G::decode_scalar(self.take(G::SCALAR_LEN)?)
    }

    fn proof<G: Group>(&mut self) -> Result<DleqProof<G>, Error> {
        Ok(DleqProof {
            e: self.scalar::<G>()?,
            f: self.scalar::<G>()?,
        })
    }

    fn finish(self) -> Result<(), Error> {
        match self.bytes.len() - self.pos {
            0 => Ok(()),
            extra => Err(malformed(format!("{extra} trailing bytes"))),
        }
    }
}

fn malformed(msg: String) -> Error {
    InvalidEncoding(msg).into()
}

impl<G: Group> Encode for PublicKey<G> {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new::<G>(Tag::PublicKey);
        w.u32(self.k());
        w.u32(self.n());
        w.element::<G>(&self.commitment);
        self.verification_keys.iter().for_each(|v| w.element::<G>(v));
        self.coefficient_commitments.iter().for_each(|c| w.element::<G>(c));
        w.finish()
    }

    /// Also runs [`PublicKey::validate`], so a decoded key is always
    /// Feldman-consistent.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new::<G>(bytes, Tag::PublicKey)?;
        let (k, n) = (r.u32()?, r.u32()?);
        let params = Params::new(k, n).map_err(|e| malformed(e.to_string()))?;

        let commitment = r.element::<G>()?;
        let verification_keys = r.elements::<G>(n)?;
        let coefficient_commitments = r.elements::<G>(k)?;
        r.finish()?;

        let public_key = PublicKey {
            params,
            commitment,
            verification_keys,
            coefficient_commitments,
        };
        public_key.validate()?;
        Ok(public_key)
    }
}

impl<G: Group> Encode for PrivateShare<G> {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new::<G>(Tag::PrivateShare);
        w.u32(self.index);
        w.u32(self.n);
        w.scalar::<G>(&self.secret);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new::<G>(bytes, Tag::PrivateShare)?;
        let index = r.index()?;
        let n = r.u32()?;
        if index > n || n > MAX_PARTIES {
            return Err(malformed(format!("share index {index} outside of [1, {n}]")));
        }
        let secret = r.scalar::<G>()?;
        r.finish()?;

        Ok(PrivateShare::new(index, n, secret))
    }
}

impl<G: Group> Encode for MasterSecret<G> {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new::<G>(Tag::MasterSecret);
        w.scalar::<G>(&self.secret);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new::<G>(bytes, Tag::MasterSecret)?;
        let secret = r.scalar::<G>()?;
        r.finish()?;

        Ok(MasterSecret::from_scalar(secret))
    }
}

impl<G: Group> Encode for Ciphertext<G> {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new::<G>(Tag::Ciphertext);
        w.element::<G>(&self.u);
        w.element::<G>(&self.u_bar);
        w.scalar::<G>(&self.proof.e);
        w.scalar::<G>(&self.proof.f);
        w.bytes(&self.label);
        w.bytes(&self.payload);
        w.finish()
    }

    /// Structural decoding only; call [`Ciphertext::verify`] for the proof.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new::<G>(bytes, Tag::Ciphertext)?;
        let u = r.element::<G>()?;
        let u_bar = r.element::<G>()?;
        let proof = r.proof::<G>()?;
        let label = r.bytes()?.to_vec();
        let payload = r.bytes()?.to_vec();
        r.finish()?;

        Ok(Ciphertext {
            u,
            u_bar,
            payload,
            label,
            proof,
        })
    }
}

impl<G: Group> Encode for DecryptionShare<G> {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new::<G>(Tag::DecryptionShare);
        w.u32(self.index);
        w.element::<G>(&self.partial);
        w.scalar::<G>(&self.proof.e);
        w.scalar::<G>(&self.proof.f);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new::<G>(bytes, Tag::DecryptionShare)?;
        let index = r.index()?;
        let partial = r.element::<G>()?;
        let proof = r.proof::<G>()?;
        r.finish()?;

        Ok(DecryptionShare {
            index,
            partial,
            proof,
        })
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use common::{error::ErrorKind, ristretto::Ristretto};

    use crate::{
        ciphertext::{Ciphertext, encrypt},
        combiner::combine,
        dealer::Dealer,
        encoding::{Encode, Tag, VERSION},
        keys::{MasterSecret, PrivateShare, PublicKey},
        params::Params,
        party::{DecryptionShare, create_share, verify_share},
    };

    // tag, version, u32 length, "ristretto255"
    const HEADER_LEN: usize = 2 + 4 + 12;

    fn is_invalid_encoding<T>(result: Result<T, common::error::Error>) -> bool {
        matches!(result.err().map(|e| e.0), Some(ErrorKind::InvalidEncoding(_)))
    }

    #[test]
    fn entities_survive_encoding() {
        let mut rng = ChaCha20Rng::seed_from_u64(70);
        let (secret, pk, shares) = Dealer::<Ristretto>::new(Params::new(3, 5).unwrap())
            .deal(&mut rng)
            .unwrap();
        let ct = encrypt(&pk, b"wire", b"over the wire", &mut rng).unwrap();

        let pk2 = PublicKey::<Ristretto>::from_bytes(&pk.to_bytes()).unwrap();
        assert_eq!(pk, pk2);
        assert_eq!(pk.to_bytes().len(), HEADER_LEN + 8 + 32 * (1 + 5 + 3));

        let ct2 = Ciphertext::<Ristretto>::from_bytes(&ct.to_bytes()).unwrap();
        assert_eq!(ct, ct2);
        ct2.verify(&pk2).unwrap();

        let secret2 = MasterSecret::<Ristretto>::from_bytes(&secret.to_bytes()).unwrap();
        assert_eq!(secret2.commitment(), *pk.commitment());

        let shares2: Vec<_> = shares
            .iter()
            .map(|s| PrivateShare::<Ristretto>::from_bytes(&s.to_bytes()).unwrap())
            .collect();
        let decryption_shares: Vec<_> = shares2
            .iter()
            .map(|s| {
                assert!(pk2.verify_private_share(s));
                let ds = create_share(&pk2, s, &ct2, &mut rng).unwrap();
                DecryptionShare::<Ristretto>::from_bytes(&ds.to_bytes()).unwrap()
            })
            .collect();

        for ds in &decryption_shares {
            verify_share(&pk2, &ct2, ds).unwrap();
        }
        assert_eq!(
            combine(&pk2, &ct2, &decryption_shares[2..]).unwrap(),
            b"over the wire"
        );
    }

    #[test]
    fn header_is_checked() {
        let mut rng = ChaCha20Rng::seed_from_u64(71);
        let secret = MasterSecret::<Ristretto>::random(&mut rng).unwrap();
        let bytes = secret.to_bytes();
        assert_eq!(bytes[0], Tag::MasterSecret as u8);
        assert_eq!(bytes[1], VERSION);

        // a master secret is not a private share
        assert!(is_invalid_encoding(PrivateShare::<Ristretto>::from_bytes(&bytes)));

        let mut bad_version = bytes.clone();
        bad_version[1] = VERSION + 1;
        assert!(is_invalid_encoding(MasterSecret::<Ristretto>::from_bytes(&bad_version)));

        let mut bad_group = bytes.clone();
        bad_group[6] = b'R';
        assert!(is_invalid_encoding(MasterSecret::<Ristretto>::from_bytes(&bad_group)));

        assert!(is_invalid_encoding(MasterSecret::<Ristretto>::from_bytes(&[])));
    }

    #[test]
    fn length_errors_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(72);
        let (_, pk, _) = Dealer::<Ristretto>::new(Params::new(2, 3).unwrap())
            .deal(&mut rng)
            .unwrap();
        let ct = encrypt(&pk, b"label", b"msg", &mut rng).unwrap();
        let bytes = ct.to_bytes();

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(is_invalid_encoding(Ciphertext::<Ristretto>::from_bytes(&trailing)));

        for cut in [1, 16, bytes.len() - 1] {
            assert!(is_invalid_encoding(Ciphertext::<Ristretto>::from_bytes(
                &bytes[..cut]
            )));
        }

        let pk_bytes = pk.to_bytes();
        assert!(is_invalid_encoding(PublicKey::<Ristretto>::from_bytes(
            &pk_bytes[..pk_bytes.len() - 32]
        )));
    }

    #[test]
    fn invalid_group_data_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(73);
        let (_, pk, shares) = Dealer::<Ristretto>::new(Params::new(2, 3).unwrap())
            .deal(&mut rng)
            .unwrap();
        let ct = encrypt(&pk, b"label", b"msg", &mut rng).unwrap();

        // U is the first field after the header
        let mut bad_point = ct.to_bytes();
        bad_point[HEADER_LEN..HEADER_LEN + 32].copy_from_slice(&[0xff; 32]);
        assert!(is_invalid_encoding(Ciphertext::<Ristretto>::from_bytes(&bad_point)));

        // s_i follows index and n
        let mut bad_scalar = shares[0].to_bytes();
        bad_scalar[HEADER_LEN + 8..].copy_from_slice(&[0xff; 32]);
        assert!(is_invalid_encoding(PrivateShare::<Ristretto>::from_bytes(&bad_scalar)));

        let mut zero_index = shares[0].to_bytes();
        zero_index[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&0u32.to_be_bytes());
        assert!(is_invalid_encoding(PrivateShare::<Ristretto>::from_bytes(&zero_index)));

        let mut index_past_n = shares[0].to_bytes();
        index_past_n[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&4u32.to_be_bytes());
        assert!(is_invalid_encoding(PrivateShare::<Ristretto>::from_bytes(&index_past_n)));
    }

    #[test]
    fn public_key_decoding_validates() {
        let mut rng = ChaCha20Rng::seed_from_u64(74);
        let (_, pk, _) = Dealer::<Ristretto>::new(Params::new(2, 3).unwrap())
            .deal(&mut rng)
            .unwrap();
        let bytes = pk.to_bytes();

        // swap V_1 and V_2
        let v1 = HEADER_LEN + 8 + 32;
        let mut swapped = bytes.clone();
        swapped[v1..v1 + 32].copy_from_slice(&bytes[v1 + 32..v1 + 64]);
        swapped[v1 + 32..v1 + 64].copy_from_slice(&bytes[v1..v1 + 32]);
        assert!(is_invalid_encoding(PublicKey::<Ristretto>::from_bytes(&swapped)));

        // k > n
        let mut bad_params = bytes.clone();
        bad_params[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&4u32.to_be_bytes());
        assert!(is_invalid_encoding(PublicKey::<Ristretto>::from_bytes(&bad_params)));
    }
}
