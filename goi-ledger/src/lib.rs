// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! XID document ledger (`spec.md` §2, §4.4): an append-only sequence of
//! labelled revisions sharing one XID, with optional persistence of the
//! provenance document and generator state to disk.

mod error;
mod generator_state;
mod ledger;
mod options;
mod provenance_doc;
mod revision;

pub use error::LedgerError;
pub use generator_state::{read as read_generator_state, write as write_generator_state};
pub use ledger::{Ledger, LedgerReport};
pub use options::LedgerOptions;
pub use provenance_doc::{parse_header as parse_provenance_header, render as render_provenance_doc, ParsedHeader, ProvenanceDoc};
pub use revision::Revision;
