// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// `spec.md` §4.1, §7: envelope round-trip and lookup failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvelopeError {
    #[error("malformed UR string: {0}")]
    InvalidEncoding(String),
    #[error("multibase decode failed: {0}")]
    Multibase(#[from] multibase::Error),
    #[error("cbor encode failed: {0}")]
    CborEncode(String),
    #[error("cbor decode failed: {0}")]
    CborDecode(String),
    #[error("assertion index {0} out of range")]
    NoSuchAssertion(usize),
}
