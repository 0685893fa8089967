// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Engine facade (`spec.md` §4.7): wires `goi-vcs`, `goi-xid`,
//! `goi-ledger`, and `goi-verify` into the four operations a caller
//! actually needs — bootstrap, rotate, reset, verify — without hand
//! wiring each crate. Mirrors `librad`'s role relative to
//! `link-crypto`/`link-identities`: orchestration, not new domain logic.

mod bootstrap;
mod error;
mod provenance;
mod reset;
mod rotate;
mod verify;

#[cfg(test)]
mod tests;

pub use bootstrap::{bootstrap, Bootstrapped};
pub use error::EngineError;
pub use provenance::INCEPTION_DOCUMENT_PATH;
pub use reset::create_trust_root;
pub use rotate::rotate;
pub use verify::{verify, verify_document};

/// Namespaced re-export of the four operations, for callers that prefer
/// `Engine::bootstrap(..)` over a bare function import.
pub struct Engine;

impl Engine {
    pub fn bootstrap(
        adapter: &mut impl goi_vcs::VcsAdapter,
        signing_key: &goi_crypto::SecretKey,
        author_name: &str,
        author_email: &str,
        resolution: goi_mark::Resolution,
        source: goi_mark::Source,
        date: goi_mark::MarkDate,
        timestamp: i64,
    ) -> Result<Bootstrapped, EngineError> {
        bootstrap::bootstrap(adapter, signing_key, author_name, author_email, resolution, source, date, timestamp)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rotate(
        adapter: &mut impl goi_vcs::VcsAdapter,
        ledger: &mut goi_ledger::Ledger,
        document: &mut goi_xid::XidDocument,
        new_key: &goi_crypto::SecretKey,
        author_name: &str,
        author_email: &str,
        parent: &str,
        date: goi_mark::MarkDate,
        timestamp: i64,
    ) -> Result<String, EngineError> {
        rotate::rotate(adapter, ledger, document, new_key, author_name, author_email, parent, date, timestamp)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_trust_root(
        adapter: &mut impl goi_vcs::VcsAdapter,
        ledger: &mut goi_ledger::Ledger,
        document: &mut goi_xid::XidDocument,
        signing_key: &goi_crypto::SecretKey,
        author_name: &str,
        author_email: &str,
        parent: &str,
        resolution: goi_mark::Resolution,
        source: goi_mark::Source,
        date: goi_mark::MarkDate,
        timestamp: i64,
    ) -> Result<String, EngineError> {
        reset::create_trust_root(adapter, ledger, document, signing_key, author_name, author_email, parent, resolution, source, date, timestamp)
    }

    pub fn verify(adapter: &impl goi_vcs::VcsAdapter, head: &str, options: &goi_verify::VerifyOptions) -> Result<goi_verify::RepositoryReport, EngineError> {
        verify::verify(adapter, head, options)
    }

    pub fn verify_document(
        adapter: &impl goi_vcs::VcsAdapter,
        head: &str,
        path: &str,
        options: &goi_verify::VerifyOptions,
    ) -> Result<goi_verify::DocumentReport, EngineError> {
        verify::verify_document(adapter, head, path, options)
    }
}
