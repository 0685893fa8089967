// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Provenance document file format (`spec.md` §6): a machine-read header
//! block (`envelope:`, `mark:`) terminated by a bare `---` line, followed by
//! an advisory human-readable comment block the parser never reads back.

use goi_envelope::Envelope;
use goi_mark::ProvenanceMark;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub struct ProvenanceDoc {
    pub envelope: Envelope,
    pub mark: ProvenanceMark,
    pub repository_did: Option<String>,
    pub inception_mark: Option<ProvenanceMark>,
    pub contract: Option<String>,
}

/// The `$schema`/`$defs` pointers `spec.md` §6 requires at the top of the
/// header block, naming the wire formats `envelope:`/`mark:` conform to.
#[derive(Serialize, Deserialize, Default)]
struct SchemaRef {
    #[serde(rename = "$ref")]
    reference: String,
}

#[derive(Serialize, Deserialize, Default)]
struct Defs {
    envelope: SchemaRef,
    mark: SchemaRef,
}

/// The machine-read header block (`spec.md` §6), rendered and parsed with
/// `serde_yaml` rather than hand-rolled line splitting. `$schema`/`$defs`
/// default to empty when absent so older header blocks without them still
/// parse — only `envelope`/`mark` are load-bearing.
#[derive(Serialize, Deserialize)]
struct Header {
    #[serde(rename = "$schema", default)]
    schema: String,
    #[serde(rename = "$defs", default)]
    defs: Defs,
    envelope: String,
    mark: String,
}

fn schema_defs() -> Defs {
    Defs {
        envelope: SchemaRef { reference: "https://datatracker.ietf.org/doc/draft-mcnally-envelope/".to_string() },
        mark: SchemaRef { reference: "https://github.com/BlockchainCommons/Research/blob/master/papers/bcr-2025-001-provenance-mark.md".to_string() },
    }
}

/// Render the full file: header block, `---`, then the advisory comment
/// block. Only the header block is re-parsed by [`parse_header`].
pub fn render(doc: &ProvenanceDoc) -> Result<String, LedgerError> {
    let ur = doc.envelope.ur_string()?;
    let mark_id = doc.mark.identifier_hex();

    let header = Header {
        schema: "https://json-schema.org/draft/2020-12/schema".to_string(),
        defs: schema_defs(),
        envelope: ur,
        mark: mark_id,
    };
    let header_yaml = serde_yaml::to_string(&header)?;
    let header_yaml = header_yaml.strip_prefix("---\n").unwrap_or(&header_yaml);

    let mut out = String::new();
    out.push_str(header_yaml);
    out.push_str("---\n");

    if let Some(did) = &doc.repository_did {
        out.push_str(&format!("# Repository DID: {did}\n"));
    }
    out.push_str(&format!(
        "# Current Mark: {} ({})\n",
        doc.mark.identifier_hex(),
        doc.mark.identifier_bytewords()
    ));
    if let Some(inception) = &doc.inception_mark {
        out.push_str(&format!(
            "# Inception Mark: {} ({})\n",
            inception.identifier_hex(),
            inception.identifier_bytewords()
        ));
    }
    for line in doc.envelope.human_readable().lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    if let Some(contract) = &doc.contract {
        for line in contract.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

/// The machine-read subset of a provenance document: `envelope:` and
/// `mark:`, taken from the YAML header block before `\n---`.
pub struct ParsedHeader {
    pub envelope_ur: String,
    pub mark_identifier: String,
}

pub fn parse_header(text: &str) -> Option<ParsedHeader> {
    let header = text.split("\n---").next().unwrap_or(text);
    let parsed: Header = serde_yaml::from_str(header).ok()?;
    Some(ParsedHeader {
        envelope_ur: parsed.envelope,
        mark_identifier: parsed.mark,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use goi_envelope::Envelope;
    use goi_mark::{Generator, MarkDate, Resolution, Source};

    #[test]
    fn renders_and_reparses_header() {
        let mut gen = Generator::genesis(Resolution::Low, Source::SeedBytes(vec![1; 16]));
        let mark = gen.next(MarkDate::new(2024, 1, 1));
        let envelope = Envelope::new("did:repo:abc").add_assertion("k", "v");
        let doc = ProvenanceDoc {
            envelope: envelope.clone(),
            mark: mark.clone(),
            repository_did: Some("did:repo:abc".into()),
            inception_mark: Some(mark.clone()),
            contract: Some("Sample contract text.".into()),
        };
        let text = render(&doc).unwrap();
        assert!(text.contains("\n---\n"));
        assert!(text.contains("# Repository DID: did:repo:abc"));

        let header = parse_header(&text).unwrap();
        assert_eq!(header.mark_identifier, mark.identifier_hex());
        let round_tripped = goi_envelope::from_ur_string(&header.envelope_ur).unwrap();
        assert_eq!(round_tripped.digest(), envelope.digest());
    }

    #[test]
    fn everything_after_separator_is_ignored() {
        let text = "envelope: \"ur:goi-envelope/x\"\nmark: \"deadbeef\"\n---\nnonsense: true\nenvelope: \"ur:goi-envelope/y\"\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.envelope_ur, "ur:goi-envelope/x");
        assert_eq!(header.mark_identifier, "deadbeef");
    }
}
