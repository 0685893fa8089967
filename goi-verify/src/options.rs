// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::PublicKey;

/// `spec.md` §4.6's verifier inputs. `strict` enables Layer 4 governance
/// checks; `allowed_signers`, if non-empty, additionally restricts Layer 1
/// signature acceptance regardless of `strict`.
#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
    pub provenance_path: String,
    pub allowed_signers: Vec<PublicKey>,
    pub strict: bool,
    pub expected_mark_identifier: Option<String>,
}

impl VerifyOptions {
    pub fn new(provenance_path: impl Into<String>) -> Self {
        Self {
            provenance_path: provenance_path.into(),
            allowed_signers: Vec::new(),
            strict: false,
            expected_mark_identifier: None,
        }
    }
}
