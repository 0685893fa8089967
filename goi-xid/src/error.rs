// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// `spec.md` §4.3, §7: XID document CRUD and (de)serialisation failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XidError {
    #[error("removing the inception key would leave no key with All permission")]
    RotationWouldOrphan,
    #[error("the inception key has already been rotated away once")]
    AlreadyRotated,
    #[error("key is referenced by service {0:?} and cannot be removed")]
    KeyInUse(String),
    #[error("no such key")]
    NoSuchKey,
    #[error("service references a key or delegate that does not exist in this document")]
    DanglingReference,
    #[error("envelope encoding failed: {0}")]
    Envelope(#[from] goi_envelope::EnvelopeError),
    #[error("envelope is missing the {0} assertion")]
    MissingAssertion(&'static str),
    #[error("envelope signature failed inception verification policy")]
    SignatureInvalid,
    #[error("document has no provenance mark to advance")]
    NoGenerator,
}
