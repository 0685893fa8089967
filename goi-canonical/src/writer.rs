// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

/// A small append-only byte buffer that always writes length-prefixed
/// fields, so the concatenation of two fields can never be confused with a
/// single differently-split field (see the `digest_distinguishes_type`
/// test in `lib.rs`).
#[derive(Default)]
pub struct Writer(Vec<u8>);

impl Writer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a length-prefixed (u64 big-endian) byte field.
    pub fn bytes(&mut self, field: &[u8]) -> &mut Self {
        self.0.extend_from_slice(&(field.len() as u64).to_be_bytes());
        self.0.extend_from_slice(field);
        self
    }

    /// Append a single un-prefixed tag byte, used to domain-separate
    /// structurally different node kinds before their fields follow.
    pub fn tag(&mut self, tag: u8) -> &mut Self {
        self.0.push(tag);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_then_fields_differ_by_tag() {
        let mut a = Writer::new();
        a.tag(0).bytes(b"x");

        let mut b = Writer::new();
        b.tag(1).bytes(b"x");

        assert_ne!(a.into_bytes(), b.into_bytes());
    }
}
