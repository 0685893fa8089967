// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Content-addressed assertion-tree envelope (`spec.md` §2, §3, §4.1): a
//! recursive `{subject, [assertion]*}` structure with an elision-preserving
//! digest and a compact UR string encoding.

mod envelope;
mod error;
mod leaf;
mod node;
mod ur;

pub use envelope::{Assertion, Envelope, Part};
pub use error::EnvelopeError;
pub use leaf::Leaf;
pub use node::Node;
pub use ur::{from_ur_string, to_ur_string};

/// `spec.md` §3's well-known predicate strings, the complete integration
/// surface between the authoring and verification paths (`spec.md` §9).
pub mod predicate {
    pub const SIGNING_KEY: &str = "GordianOpenIntegrity.SigningKey";
    pub const REPOSITORY_IDENTIFIER: &str = "GordianOpenIntegrity.RepositoryIdentifier";
    pub const DOCUMENT: &str = "GordianOpenIntegrity.Document";
    pub const DOCUMENTS: &str = "GordianOpenIntegrity.Documents";
}
