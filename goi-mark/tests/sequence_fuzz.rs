// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `spec.md` §8: fuzz the mark-sequence validator with random permutations
//! of a valid chain; exactly one permutation — the identity — is accepted.

use goi_mark::{validate, Generator, MarkDate, ProvenanceMark, Resolution, Source};
use proptest::prelude::*;

fn valid_chain(len: u32) -> Vec<ProvenanceMark> {
    let mut gen = Generator::genesis(Resolution::Low, Source::SeedBytes(vec![42; 32]));
    (0..len)
        .map(|i| gen.next(MarkDate::new(2024, 1, 1 + i as u8)))
        .collect()
}

proptest! {
    #[test]
    fn only_the_identity_permutation_validates(perm_seed in 0u64..10_000) {
        let marks = valid_chain(6);
        prop_assert!(validate(&marks).is_valid());

        let mut permuted = marks.clone();
        let mut state = perm_seed.wrapping_add(1);
        for i in (1..permuted.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let j = (state >> 33) as usize % (i + 1);
            permuted.swap(i, j);
        }

        if permuted == marks {
            prop_assert!(validate(&permuted).is_valid());
        } else {
            prop_assert!(!validate(&permuted).is_valid());
        }
    }
}
