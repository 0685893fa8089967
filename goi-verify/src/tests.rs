// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::SecretKey;
use goi_ledger::ProvenanceDoc;
use goi_mark::{MarkDate, Resolution, Source};
use goi_vcs::{create_identifier, CreatedIdentifier, FileWrite, Identity, TestVcsAdapter, VcsAdapter};
use goi_xid::{GeneratorOptions, PrivateKeyOptions, SigningOptions, XidDocument};

use crate::{document::verify_document, options::VerifyOptions, verifier::verify};

const DOC_PATH: &str = ".o/GordianOpenIntegrity.yaml";
const SIGN_OFF: &str = "Signed-off-by: Alice <alice@example.com>";

fn write_provenance(adapter: &mut TestVcsAdapter, parent: &str, sk: &SecretKey, doc: &XidDocument, repository_did: &str, path: &str, timestamp: i64) -> String {
    let envelope = doc.to_envelope(&PrivateKeyOptions::Omit, &GeneratorOptions::Omit, &SigningOptions::None).unwrap();
    let mark = doc.current_mark().unwrap().clone();
    let rendered = goi_ledger::render_provenance_doc(&ProvenanceDoc {
        envelope,
        mark: mark.clone(),
        repository_did: Some(repository_did.to_string()),
        inception_mark: Some(mark),
        contract: None,
    })
    .unwrap();

    let message = format!("Update provenance\n\n{SIGN_OFF}");
    let identity = Identity { name: "Alice", email: "alice@example.com" };
    let commit = adapter
        .commit_files(parent, sk, identity, identity, &message, &[FileWrite { path, contents: rendered.as_bytes() }], timestamp)
        .unwrap();
    commit.oid
}

fn fresh_repo(key_seed: u8, mark_seed: u8) -> (TestVcsAdapter, SecretKey, CreatedIdentifier, String) {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([key_seed; 32]);
    let created = create_identifier(&mut adapter, &sk, "Alice", "alice@example.com", None, 1_700_000_000).unwrap();
    let after_identifier = adapter.head_oid().unwrap().unwrap();

    let doc = XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![mark_seed; 16]), MarkDate::new(2024, 1, 1));
    let head = write_provenance(&mut adapter, &after_identifier, &sk, &doc, &created.did, DOC_PATH, 1_700_000_200);
    (adapter, sk, created, head)
}

#[test]
fn fresh_repository_verifies_clean() {
    let (adapter, _sk, created, head) = fresh_repo(1, 2);
    let options = VerifyOptions::new(DOC_PATH);
    let report = verify(&adapter, &head, &options).unwrap();
    assert!(report.valid, "{:?}", report.issues);
    assert_eq!(report.did.as_deref(), Some(created.did.as_str()));
    assert!(report.marks_monotonic);
    assert!(report.xid_stable);
    assert_eq!(report.provenance_versions, 1);
    assert_eq!(report.invalid_signatures, 0);
}

#[test]
fn published_mark_is_checked_against_the_latest_entry() {
    let (adapter, _sk, _created, head) = fresh_repo(3, 4);
    let mut options = VerifyOptions::new(DOC_PATH);
    options.expected_mark_identifier = Some("not-the-real-mark".to_string());
    let report = verify(&adapter, &head, &options).unwrap();
    assert!(!report.valid);
    assert!(!report.mark_matches_latest);
}

#[test]
fn rotated_chain_with_dropped_mark_is_reported_as_not_monotonic() {
    let (mut adapter, sk, created, first_head) = fresh_repo(5, 6);

    // A second revision minted via a fresh genesis rather than
    // `advance_provenance`, simulating a dropped or corrupted mark.
    let doc = XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![6; 16]), MarkDate::new(2024, 1, 2));
    let second_head = write_provenance(&mut adapter, &first_head, &sk, &doc, &created.did, DOC_PATH, 1_700_000_300);

    let options = VerifyOptions::new(DOC_PATH);
    let report = verify(&adapter, &second_head, &options).unwrap();
    assert!(!report.valid);
    assert!(!report.marks_monotonic);
}

#[test]
fn marks_committed_out_of_order_are_reported_distinctly_from_a_broken_chain() {
    let (mut adapter, sk, created, first_head) = fresh_repo(14, 15);

    // One generator mints three chain-continuous marks; committing them to
    // VCS history out of `seq` order (0, 2, 1) must not be confused with a
    // dropped or duplicated mark — reordering them would yield a valid chain.
    let mut doc = XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![20; 16]), MarkDate::new(2024, 2, 1));
    let snap0 = doc.clone();
    doc.advance_provenance(MarkDate::new(2024, 2, 2)).unwrap();
    let snap1 = doc.clone();
    doc.advance_provenance(MarkDate::new(2024, 2, 3)).unwrap();
    let snap2 = doc.clone();

    let head_a = write_provenance(&mut adapter, &first_head, &sk, &snap0, &created.did, DOC_PATH, 1_700_000_700);
    let head_b = write_provenance(&mut adapter, &head_a, &sk, &snap2, &created.did, DOC_PATH, 1_700_000_800);
    let head_c = write_provenance(&mut adapter, &head_b, &sk, &snap1, &created.did, DOC_PATH, 1_700_000_900);

    let options = VerifyOptions::new(DOC_PATH);
    let report = verify(&adapter, &head_c, &options).unwrap();
    assert!(!report.valid);
    assert!(!report.marks_monotonic);
    assert!(report.issues.iter().any(|i| i.starts_with("MarksOutOfOrder")));
}

#[test]
fn unregistered_signer_is_flagged_even_without_strict_mode() {
    let (mut adapter, _sk, _created, head) = fresh_repo(12, 13);
    let rogue = SecretKey::from_seed([77; 32]);
    let identity = Identity { name: "Mallory", email: "mallory@example.com" };
    let message = format!("Rogue commit\n\n{SIGN_OFF}");
    let rogue_commit = adapter
        .commit_files(&head, &rogue, identity, identity, &message, &[FileWrite { path: "README.md", contents: b"hi" }], 1_700_000_600)
        .unwrap();

    let options = VerifyOptions::new(DOC_PATH);
    let report = verify(&adapter, &rogue_commit.oid, &options).unwrap();
    assert!(!report.valid);
    assert!(report.issues.iter().any(|i| i.contains("UnauthorizedSigner")));
}

#[test]
fn unauthorized_signer_is_flagged_when_an_allowed_set_is_supplied() {
    let (adapter, _sk, _created, head) = fresh_repo(7, 8);
    let mut options = VerifyOptions::new(DOC_PATH);
    options.allowed_signers = vec![SecretKey::from_seed([99; 32]).public()];
    let report = verify(&adapter, &head, &options).unwrap();
    assert!(!report.valid);
    assert!(report.issues.iter().any(|i| i.contains("UnauthorizedSigner")));
}

#[test]
fn child_document_is_verified_against_the_documents_map() {
    let (mut adapter, sk, created, inception_head) = fresh_repo(9, 10);

    let mut child = XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![11; 16]), MarkDate::new(2024, 1, 3));
    child.set_document_path("docs/child.yaml");
    let child_xid_hex = hex::encode(child.xid().as_bytes());

    let head_with_map = {
        let mut inception_doc = XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![10; 16]), MarkDate::new(2024, 1, 1));
        inception_doc.set_documents_map(format!("{{\"docs/child.yaml\":\"{child_xid_hex}\"}}"));
        write_provenance(&mut adapter, &inception_head, &sk, &inception_doc, &created.did, DOC_PATH, 1_700_000_400)
    };

    let final_head = write_provenance(&mut adapter, &head_with_map, &sk, &child, &created.did, "docs/child.yaml", 1_700_000_500);

    let options = VerifyOptions::new(DOC_PATH);
    let report = verify_document(&adapter, &final_head, "docs/child.yaml", &options).unwrap();
    assert!(report.self_reference_matches);
    assert!(report.listed_in_documents_map);
}
