// Copyright © 2021 The Radicle Link Contributors
// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

use crate::{writer::Writer, Canonical};

/// An NFC-normalised string. Two strings that render identically but
/// decompose differently (combining characters vs. precomposed glyphs) must
/// not produce different digests; normalising before hashing closes that
/// gap, the same concern `radicle-link`'s `link-canonical::Cstring`
/// addresses for canonical JSON text.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cstring(String);

impl Cstring {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cstring {
    fn from(s: &str) -> Self {
        Cstring(s.nfc().collect())
    }
}

impl From<String> for Cstring {
    fn from(s: String) -> Self {
        Cstring::from(s.as_str())
    }
}

impl fmt::Display for Cstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Canonical for Cstring {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.bytes(self.0.as_bytes());
        w.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_combining_characters() {
        let precomposed = Cstring::from("é");
        let decomposed = Cstring::from("e\u{0301}");
        assert_eq!(precomposed, decomposed);
        assert_eq!(precomposed.canonical_bytes(), decomposed.canonical_bytes());
    }
}
