// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Provenance marks (`spec.md` §3, §4.2): a linear, hash-linked chain of
//! fixed-resolution marks, one minted per XID document revision.

pub mod bytewords;
mod date;
mod error;
mod generator;
mod mark;
mod resolution;
pub mod validate;

pub use date::MarkDate;
pub use error::MarkError;
pub use generator::{Generator, Source};
pub use mark::ProvenanceMark;
pub use resolution::Resolution;
pub use validate::{validate, ValidationReport};
