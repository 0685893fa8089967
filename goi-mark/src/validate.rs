// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Sequence validation for a published mark chain (`spec.md` §4.2): a
//! verifier holding the full run of marks, but not the generator's seed,
//! checks chain-continuity purely from the public `precedes` relation.

use crate::{error::MarkError, mark::ProvenanceMark};

/// One finding against a specific position in the chain. `index` is the
/// position of the mark the issue was raised against (the second of the
/// pair, for link-continuity issues), so a caller can point a user at the
/// exact offending mark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkIssue {
    pub index: usize,
    pub error: MarkError,
}

/// The result of validating a mark chain end to end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<MarkIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// `spec.md` §4.2 `isSequenceValid`: true iff `marks[0]` is a genesis mark
/// and every adjacent pair chain-continues via [`ProvenanceMark::precedes`].
/// The empty sequence is trivially valid; a single genesis mark is valid.
pub fn is_sequence_valid(marks: &[ProvenanceMark]) -> bool {
    validate(marks).is_valid()
}

/// Validate a candidate mark sequence, collecting every issue rather than
/// stopping at the first one, so a caller can report the whole chain's
/// health in a single pass.
pub fn validate(marks: &[ProvenanceMark]) -> ValidationReport {
    let mut issues = Vec::new();

    if let Some(first) = marks.first() {
        if !first.is_genesis() {
            issues.push(MarkIssue {
                index: 0,
                error: MarkError::SeqRegression {
                    expected: 0,
                    found: first.seq,
                },
            });
        }
    }

    for (i, pair) in marks.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let index = i + 1;

        if next.chain_id != prev.chain_id {
            issues.push(MarkIssue {
                index,
                error: MarkError::ChainIdMismatch,
            });
            continue;
        }

        if next.seq != prev.seq + 1 {
            issues.push(MarkIssue {
                index,
                error: MarkError::SeqRegression {
                    expected: prev.seq + 1,
                    found: next.seq,
                },
            });
            continue;
        }

        if next.date < prev.date {
            issues.push(MarkIssue {
                index,
                error: MarkError::DateRegression,
            });
        }

        if !prev.precedes(next) {
            issues.push(MarkIssue {
                index,
                error: MarkError::SequenceBroken(next.seq),
            });
        }
    }

    ValidationReport { issues }
}
