// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! The six end-to-end scenarios (`spec.md` §8), each driving a
//! `TestVcsAdapter` through the facade's write path and `goi_verify`'s
//! read path.

use goi_crypto::SecretKey;
use goi_mark::{MarkDate, Resolution, Source};
use goi_vcs::{FileWrite, Identity, TestVcsAdapter, VcsAdapter};
use goi_verify::VerifyOptions;

use crate::{Engine, INCEPTION_DOCUMENT_PATH};

const ALICE: (&str, &str) = ("Alice", "alice@example.com");

#[test]
fn fresh_repo_verifies_clean_with_two_commits() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([1; 32]);
    let bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![1; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();

    assert!(bootstrapped.identifier.did.starts_with("did:repo:"));
    assert_eq!(bootstrapped.identifier.did.len(), 49);

    let options = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    let report = Engine::verify(&adapter, &bootstrapped.head, &options).unwrap();
    assert!(report.valid, "{:?}", report.issues);
    assert_eq!(report.total_commits, 2);
    assert_eq!(report.provenance_versions, 1);
    assert!(report.issues.is_empty());
}

#[test]
fn verify_with_published_mark_accepts_the_right_one_and_rejects_a_wrong_one() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([2; 32]);
    let bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![2; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();
    let m0 = bootstrapped.document.current_mark().unwrap().identifier_hex();

    let mut right = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    right.expected_mark_identifier = Some(m0);
    let report = Engine::verify(&adapter, &bootstrapped.head, &right).unwrap();
    assert!(report.valid);
    assert!(report.mark_matches_latest);

    let mut wrong = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    wrong.expected_mark_identifier = Some("wrong-mark".to_string());
    let report = Engine::verify(&adapter, &bootstrapped.head, &wrong).unwrap();
    assert!(!report.valid);
    assert!(!report.mark_matches_latest);
    assert!(report.issues.iter().any(|i| i.contains("does not match latest provenance mark")));
}

#[test]
fn key_rotation_preserves_identity() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([3; 32]);
    let mut bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![3; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();
    let m0 = bootstrapped.document.current_mark().unwrap().identifier_hex();

    let new_key = SecretKey::from_seed([4; 32]);
    let head_after_rotation = Engine::rotate(
        &mut adapter,
        &mut bootstrapped.ledger,
        &mut bootstrapped.document,
        &new_key,
        ALICE.0,
        ALICE.1,
        &bootstrapped.head,
        MarkDate::new(2024, 1, 2),
        1_700_000_100,
    )
    .unwrap();
    let m1 = bootstrapped.document.current_mark().unwrap().identifier_hex();
    assert_ne!(m0, m1);

    let options = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    let report = Engine::verify(&adapter, &head_after_rotation, &options).unwrap();
    assert!(report.valid, "{:?}", report.issues);
    assert_eq!(report.provenance_versions, 2);
    assert!(report.xid_stable);
    assert_eq!(report.valid_signatures, report.total_commits);

    let mut with_m0 = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    with_m0.expected_mark_identifier = Some(m0);
    assert!(!Engine::verify(&adapter, &head_after_rotation, &with_m0).unwrap().valid);

    let mut with_m1 = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    with_m1.expected_mark_identifier = Some(m1);
    assert!(Engine::verify(&adapter, &head_after_rotation, &with_m1).unwrap().valid);
}

#[test]
fn governance_violation_is_flagged() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([5; 32]);
    let bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![5; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();

    let rogue = SecretKey::from_seed([66; 32]);
    let identity = Identity { name: "Mallory", email: "mallory@example.com" };
    let message = "Rogue append\n\nSigned-off-by: Mallory <mallory@example.com>";
    let rogue_commit = adapter
        .commit_files(&bootstrapped.head, &rogue, identity, identity, message, &[FileWrite { path: "README.md", contents: b"hi" }], 1_700_000_200)
        .unwrap();

    let lax = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    let report = Engine::verify(&adapter, &rogue_commit.oid, &lax).unwrap();
    assert!(!report.valid);

    let mut strict = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    strict.strict = true;
    let report = Engine::verify(&adapter, &rogue_commit.oid, &strict).unwrap();
    assert!(!report.valid);
    assert!(report.issues.iter().any(|i| i.contains("not authorized") || i.contains("invalid")));
}

#[test]
fn child_document_introduction_and_missing_document() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([6; 32]);
    let bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![6; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();

    let child_path = ".o/decisions/policy-v1.yaml";
    let mut child = goi_xid::XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![7; 16]), MarkDate::new(2024, 1, 2));
    child.set_document_path(child_path);
    let child_xid_hex = hex::encode(child.xid().as_bytes());

    let mut inception_with_map = bootstrapped.document.clone();
    inception_with_map.set_documents_map(format!("{{\"{child_path}\":\"{child_xid_hex}\"}}"));
    let head_with_map = crate::provenance::commit_provenance_document(
        &mut adapter,
        &bootstrapped.head,
        &sk,
        ALICE.0,
        ALICE.1,
        "Register child document",
        INCEPTION_DOCUMENT_PATH,
        &inception_with_map,
        bootstrapped.document.repository_did(),
        Some(bootstrapped.document.current_mark().unwrap()),
        1_700_000_300,
    )
    .unwrap();

    let head_with_child = crate::provenance::commit_provenance_document(
        &mut adapter,
        &head_with_map,
        &sk,
        ALICE.0,
        ALICE.1,
        "Introduce policy-v1 document",
        child_path,
        &child,
        bootstrapped.document.repository_did(),
        Some(bootstrapped.document.current_mark().unwrap()),
        1_700_000_400,
    )
    .unwrap();

    let options = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    let report = Engine::verify_document(&adapter, &head_with_child, child_path, &options).unwrap();
    assert!(report.self_reference_matches);
    assert!(report.listed_in_documents_map);
    assert!(report.report.valid, "{:?}", report.report.issues);

    let missing_path = ".o/nonexistent.yaml";
    let report = Engine::verify_document(&adapter, &head_with_child, missing_path, &options).unwrap();
    assert!(!report.report.valid);
    assert!(report.report.issues.iter().any(|i| i == &format!("No provenance documents found at {missing_path}")));
}

#[test]
fn trust_root_reset_preserves_did_and_xid() {
    let mut adapter = TestVcsAdapter::new();
    let sk = SecretKey::from_seed([8; 32]);
    let mut bootstrapped = Engine::bootstrap(&mut adapter, &sk, ALICE.0, ALICE.1, Resolution::Low, Source::SeedBytes(vec![8; 16]), MarkDate::new(2024, 1, 1), 1_700_000_000).unwrap();

    let new_key = SecretKey::from_seed([9; 32]);
    let head_after_rotation = Engine::rotate(
        &mut adapter,
        &mut bootstrapped.ledger,
        &mut bootstrapped.document,
        &new_key,
        ALICE.0,
        ALICE.1,
        &bootstrapped.head,
        MarkDate::new(2024, 1, 2),
        1_700_000_100,
    )
    .unwrap();
    let m0_original = bootstrapped.document.current_mark().unwrap().identifier_hex();
    let did_before = bootstrapped.identifier.did.clone();

    let head_after_reset = Engine::create_trust_root(
        &mut adapter,
        &mut bootstrapped.ledger,
        &mut bootstrapped.document,
        &new_key,
        ALICE.0,
        ALICE.1,
        &head_after_rotation,
        Resolution::Low,
        Source::SeedBytes(vec![99; 16]),
        MarkDate::new(2024, 1, 3),
        1_700_000_200,
    )
    .unwrap();
    let new_mark = bootstrapped.document.current_mark().unwrap().identifier_hex();
    assert_ne!(new_mark, m0_original);
    assert_eq!(bootstrapped.document.repository_did(), Some(did_before.as_str()));

    let mut with_new_mark = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    with_new_mark.expected_mark_identifier = Some(new_mark);
    let report = Engine::verify(&adapter, &head_after_reset, &with_new_mark).unwrap();
    assert!(report.valid, "{:?}", report.issues);
    assert!(report.xid_stable);
    assert_eq!(report.valid_signatures, report.total_commits);

    let mut with_original_mark = VerifyOptions::new(INCEPTION_DOCUMENT_PATH);
    with_original_mark.expected_mark_identifier = Some(m0_original);
    assert!(!Engine::verify(&adapter, &head_after_reset, &with_original_mark).unwrap().valid);
}
