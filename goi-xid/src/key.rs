// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::PublicKey;

use crate::permissions::Permissions;

/// One signing key registered in an XID document (`spec.md` §3).
/// `private_key` is only ever populated by a caller restoring a document
/// they minted themselves; the engine never invents key material.
#[derive(Clone, Debug)]
pub struct Key {
    pub public_key: PublicKey,
    pub private_key: Option<Vec<u8>>,
    pub nickname: Option<String>,
    pub permissions: Permissions,
    pub endpoints: Vec<String>,
    pub is_inception: bool,
}

impl Key {
    pub fn new(public_key: PublicKey, permissions: Permissions) -> Self {
        Self {
            public_key,
            private_key: None,
            nickname: None,
            permissions,
            endpoints: Vec::new(),
            is_inception: false,
        }
    }

    pub fn inception(public_key: PublicKey) -> Self {
        Self {
            is_inception: true,
            ..Self::new(public_key, Permissions::ALL)
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_private_key(mut self, bytes: Vec<u8>) -> Self {
        self.private_key = Some(bytes);
        self
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for Key {}

#[cfg(test)]
mod tests {
    use super::*;
    use goi_crypto::SecretKey;

    #[test]
    fn inception_key_carries_all_permission() {
        let pk = SecretKey::from_seed([1; 32]).public();
        let k = Key::inception(pk);
        assert!(k.is_inception);
        assert!(k.permissions.contains(Permissions::ALL));
    }

    #[test]
    fn equality_is_by_public_key_only() {
        let pk = SecretKey::from_seed([2; 32]).public();
        let a = Key::new(pk, Permissions::SIGN).with_nickname("a");
        let b = Key::new(pk, Permissions::AUTH).with_nickname("b");
        assert_eq!(a, b);
    }
}
