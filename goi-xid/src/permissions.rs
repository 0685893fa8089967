// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use bitflags::bitflags;

bitflags! {
    /// A key's or delegate's privilege bitmap (`spec.md` §3: `permissions`
    /// is a bitmap over `{All, Auth, Sign, Encrypt, Elide, Issue, Access,
    /// Verify, Delegate, Transfer, Revoke, …}`).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Permissions: u32 {
        const AUTH     = 1 << 0;
        const SIGN     = 1 << 1;
        const ENCRYPT  = 1 << 2;
        const ELIDE    = 1 << 3;
        const ISSUE    = 1 << 4;
        const ACCESS   = 1 << 5;
        const VERIFY   = 1 << 6;
        const DELEGATE = 1 << 7;
        const TRANSFER = 1 << 8;
        const REVOKE   = 1 << 9;
        const ALL      = u32::MAX;
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

/// A [`Delegate`](crate::Delegate)'s permissions may only narrow those of
/// the referrer (`spec.md` §3).
pub fn narrows(narrower: Permissions, referrer: Permissions) -> bool {
    referrer.contains(narrower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_named_flag() {
        assert!(Permissions::ALL.contains(Permissions::SIGN));
        assert!(Permissions::ALL.contains(Permissions::REVOKE));
    }

    #[test]
    fn narrowing_rule() {
        let referrer = Permissions::SIGN | Permissions::AUTH;
        assert!(narrows(Permissions::SIGN, referrer));
        assert!(!narrows(Permissions::ENCRYPT, referrer));
    }
}
