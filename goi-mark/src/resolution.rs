// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

/// The fixed byte-length of a mark's chain id / key / commitment fields
/// (`spec.md` §3: "fixed resolution (low/medium/quartile/high)").
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    Low,
    Medium,
    Quartile,
    High,
}

impl Resolution {
    pub fn link_len(self) -> usize {
        match self {
            Resolution::Low => 4,
            Resolution::Medium => 8,
            Resolution::Quartile => 16,
            Resolution::High => 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolutions_strictly_increase_in_size() {
        assert!(Resolution::Low.link_len() < Resolution::Medium.link_len());
        assert!(Resolution::Medium.link_len() < Resolution::Quartile.link_len());
        assert!(Resolution::Quartile.link_len() < Resolution::High.link_len());
    }
}
