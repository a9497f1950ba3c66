use error_chain::error_chain;

use crate::MAX_PARTIES;

error_chain! {
    errors{
        InvalidParameters(k: usize, n: usize) {
            description("Invalid Parameter Set")
            display("Invalid Parameter Set: k = {}, n = {}.\n Valid params: 1 <= k <= n <= {}", k, n, MAX_PARTIES)
        }
        InvalidEncoding(t: String) {
            description("Unable to decode value")
            display("Unable to decode value: '{}'", t)
        }
        MalformedCiphertext(t: String) {
            description("Ciphertext failed its well-formedness check")
            display("Ciphertext failed its well-formedness check: {}", t)
        }
        InvalidShareIndex(index: usize, n: usize) {
            description("Share index is outside of the party range")
            display("Share index {} is outside of the party range [1, {}]", index, n)
        }
        DuplicateShareIndex(index: usize) {
            description("Share index appears more than once in an interpolation set")
            display("Share index {} appears more than once in an interpolation set", index)
        }
        InvalidShareProof(index: usize) {
            description("Invalid Decryption Share Proof")
            display("Invalid Decryption Share Proof from party {}", index)
        }
        InsufficientShares(count: usize, k: usize){
            description("The number of distinct validated shares is less than the threshold.")
            display("The number of distinct validated shares is {count}. This is less than the required k = {k} shares.")
        }
        AuthenticationFailed {
            description("Payload authentication failed")
            display("Payload authentication failed after combining shares")
        }
        EncryptionFailed(t: String) {
            description("Encryption failed")
            display("Encryption failed: {}", t)
        }
        EntropyFailure(t: String) {
            description("The randomness source failed")
            display("The randomness source failed: {}", t)
        }
    }
}
