// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::PublicKey;

use crate::{permissions::Permissions, xid::Xid};

/// An endpoint advertised by an XID document, scoped to a subset of its
/// keys and delegates (`spec.md` §3). References are by identifier, same
/// discipline as [`crate::Delegate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    pub uri: String,
    pub name: Option<String>,
    pub capabilities: Vec<String>,
    pub key_refs: Vec<PublicKey>,
    pub delegate_refs: Vec<Xid>,
    pub permissions: Permissions,
}

impl Service {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            capabilities: Vec::new(),
            key_refs: Vec::new(),
            delegate_refs: Vec::new(),
            permissions: Permissions::empty(),
        }
    }

    pub fn references_key(&self, key: &PublicKey) -> bool {
        self.key_refs.contains(key)
    }
}
