// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use sha2::{Digest, Sha256};

use crate::{error::EnvelopeError, leaf::Leaf, node::Node};

/// One `(predicate, object)` edge out of an envelope's subject
/// (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assertion {
    pub predicate: Node,
    pub object: Node,
}

impl Assertion {
    pub fn new(predicate: impl Into<Node>, object: impl Into<Node>) -> Self {
        Self {
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// `SHA256(digest(predicate) ++ digest(object))` (`SPEC_FULL.md` §3.1).
    pub fn digest(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.predicate.digest());
        buf.extend_from_slice(&self.object.digest());
        Sha256::digest(&buf).into()
    }
}

/// A content-addressed, Merkle-digested `{subject, [assertion]*}` tree
/// (`spec.md` §2, §3, §4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub subject: Node,
    pub assertions: Vec<Assertion>,
}

/// Which part of an envelope an elision targets (`spec.md` §4.1's elision
/// invariant, generalised to any addressable subtree).
#[derive(Clone, Copy, Debug)]
pub enum Part {
    Subject,
    Predicate(usize),
    Object(usize),
}

impl Envelope {
    pub fn new(subject: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            assertions: Vec::new(),
        }
    }

    /// Pure functional update: returns a new envelope whose root digest
    /// differs from `self`'s; `self` is unchanged (`spec.md` §4.1).
    pub fn add_assertion(&self, predicate: impl Into<Node>, object: impl Into<Node>) -> Envelope {
        let mut assertions = self.assertions.clone();
        assertions.push(Assertion::new(predicate, object));
        Envelope {
            subject: self.subject.clone(),
            assertions,
        }
    }

    /// Objects in insertion order for every assertion whose predicate is
    /// the text leaf `pred`; duplicates are all returned (`spec.md` §4.1).
    pub fn assertions_with_predicate(&self, pred: &str) -> Vec<&Node> {
        self.assertions
            .iter()
            .filter(|a| a.predicate.as_text() == Some(pred))
            .map(|a| &a.object)
            .collect()
    }

    /// `SHA256(0x00 ++ digest(subject) ++ 0x01 ++ digest(a0) ++ …)`
    /// (`SPEC_FULL.md` §3.1's domain-separated digest algorithm).
    pub fn digest(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        buf.push(0x00);
        buf.extend_from_slice(&self.subject.digest());
        for assertion in &self.assertions {
            buf.push(0x01);
            buf.extend_from_slice(&assertion.digest());
        }
        Sha256::digest(&buf).into()
    }

    /// Replace the subtree named by `part` with its digest, leaving the
    /// root digest unchanged (`spec.md` §4.1's elision invariant).
    pub fn elide(&self, part: Part) -> Result<Envelope, EnvelopeError> {
        let mut out = self.clone();
        match part {
            Part::Subject => out.subject = out.subject.elide(),
            Part::Predicate(i) => {
                let a = out
                    .assertions
                    .get_mut(i)
                    .ok_or(EnvelopeError::NoSuchAssertion(i))?;
                a.predicate = a.predicate.elide();
            }
            Part::Object(i) => {
                let a = out
                    .assertions
                    .get_mut(i)
                    .ok_or(EnvelopeError::NoSuchAssertion(i))?;
                a.object = a.object.elide();
            }
        }
        Ok(out)
    }

    /// `spec.md` §4.1 `urString()`.
    pub fn ur_string(&self) -> Result<String, EnvelopeError> {
        crate::ur::to_ur_string(self)
    }

    /// `spec.md` §4.1 `fromUrString(s)`.
    pub fn from_ur_string(s: &str) -> Result<Envelope, EnvelopeError> {
        crate::ur::from_ur_string(s)
    }

    /// A human-readable dump, one line per assertion, in the shape the
    /// provenance document's comment block embeds (`spec.md` §6).
    pub fn human_readable(&self) -> String {
        let mut lines = Vec::with_capacity(self.assertions.len() + 1);
        lines.push(format!("subject: {}", describe(&self.subject)));
        for a in &self.assertions {
            lines.push(format!(
                "{}: {}",
                describe(&a.predicate),
                describe(&a.object)
            ));
        }
        lines.join("\n")
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::Leaf(Leaf::Text(s)) => s.to_string(),
        Node::Leaf(Leaf::Bytes(b)) => format!("Bytes({})", hex::encode(b)),
        Node::Leaf(Leaf::Int(n)) => n.to_string(),
        Node::Elided(d) => format!("ELIDED({})", hex::encode(d)),
        Node::Sub(env) => format!("Envelope({})", hex::encode(env.digest())),
    }
}
