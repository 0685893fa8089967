// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::fmt;

use goi_crypto::PublicKey;

/// 4-byte stable identifier derived from a document's inception signing
/// key; immutable across every revision of the document (`spec.md` §3,
/// invariant (i)).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Xid([u8; 4]);

impl Xid {
    pub fn from_inception_key(key: &PublicKey) -> Self {
        Self(key.xid_prefix())
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XID({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goi_crypto::SecretKey;

    #[test]
    fn derived_from_inception_key_prefix() {
        let sk = SecretKey::from_seed([9; 32]);
        let xid = Xid::from_inception_key(&sk.public());
        assert_eq!(xid.as_bytes(), &sk.public().xid_prefix());
    }

    #[test]
    fn display_is_hex_wrapped_in_xid() {
        let sk = SecretKey::from_seed([1; 32]);
        let xid = Xid::from_inception_key(&sk.public());
        assert!(xid.to_string().starts_with("XID("));
        assert!(xid.to_string().ends_with(')'));
    }
}
