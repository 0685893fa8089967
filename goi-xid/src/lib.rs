// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! XID identity document (`spec.md` §2, §3, §4.3): a keyed identity with a
//! stable identifier, signing keys, delegates, services, and at most one
//! active provenance mark.

mod delegate;
mod document;
mod error;
mod key;
mod options;
mod permissions;
mod service;
mod xid;

pub use delegate::Delegate;
pub use document::XidDocument;
pub use error::XidError;
pub use key::Key;
pub use options::{GeneratorOptions, PrivateKeyOptions, SigningOptions, VerifyPolicy};
pub use permissions::Permissions;
pub use service::Service;
pub use xid::Xid;
