// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::SecretKey;

/// Controls how private-key material appears in a serialized envelope
/// (`spec.md` §4.3).
pub enum PrivateKeyOptions {
    /// Private keys are not written at all; changes the root digest
    /// relative to `Include`/`Elide`.
    Omit,
    /// Private keys are written in full.
    Include,
    /// Private keys are replaced by their digest; preserves the root
    /// digest relative to `Include`.
    Elide,
    /// Private keys are AES-256-GCM encrypted under a password-derived key.
    Encrypt { password: String },
}

/// Whether the provenance-mark generator state is embedded in the
/// serialized envelope (`spec.md` §4.3). Default `Omit` — the generator
/// lives in a separate, uncommitted file.
pub enum GeneratorOptions {
    Omit,
    Include,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions::Omit
    }
}

/// Whether the serialized envelope is wrapped in a signed container
/// (`spec.md` §4.3).
pub enum SigningOptions {
    None,
    Inception,
    WithKey(SecretKey),
}

/// Whether `fromEnvelope` must verify a signature (`spec.md` §4.3).
pub enum VerifyPolicy {
    None,
    Inception,
}
