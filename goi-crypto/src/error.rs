use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntoSecretKeyError {
    #[error("invalid secret key length, expected 32 bytes")]
    InvalidSliceLength,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AeadError {
    #[error("malformed cipher field, expected `aes-256-gcm:<fingerprint>:<payload>`")]
    MalformedField,
    #[error("cipher field fingerprint `{0}` does not match the configured encryption key")]
    FingerprintMismatch(String),
    #[error("base64 decoding failed")]
    Base64,
    #[error("ciphertext shorter than iv+tag")]
    Truncated,
    #[error("AEAD decryption failed, wrong key or corrupted field")]
    Decrypt,
}
