// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use crate::{permissions::Permissions, xid::Xid};

/// A reference to another XID document with a narrowed permission set
/// (`spec.md` §3). The referenced document is held by identifier only —
/// never by owning reference — so the delegation graph cannot cycle
/// through shared ownership (`spec.md` §9, "avoiding cyclic ownership").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delegate {
    pub referenced_xid: Xid,
    pub permissions: Permissions,
}

impl Delegate {
    pub fn new(referenced_xid: Xid, permissions: Permissions) -> Self {
        Self {
            referenced_xid,
            permissions,
        }
    }
}
