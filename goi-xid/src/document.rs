// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::convert::TryFrom;

use sha2::{Digest, Sha256};

use goi_crypto::{PublicKey, SecretKey, Signature};
use goi_envelope::{predicate, Envelope, Leaf, Node, Part};
use goi_mark::{Generator, MarkDate, ProvenanceMark, Resolution, Source};

use crate::{
    delegate::Delegate,
    error::XidError,
    key::Key,
    options::{GeneratorOptions, PrivateKeyOptions, SigningOptions, VerifyPolicy},
    permissions::Permissions,
    service::Service,
    xid::Xid,
};

/// A keyed identity bearing a stable [`Xid`], an ordered set of signing
/// keys, delegates, services, resolution methods, and at most one active
/// provenance mark (`spec.md` §2, §3, §4.3).
#[derive(Clone, Debug)]
pub struct XidDocument {
    xid: Xid,
    keys: Vec<Key>,
    delegates: Vec<Delegate>,
    services: Vec<Service>,
    resolution_methods: Vec<String>,
    generator: Option<Generator>,
    current_mark: Option<ProvenanceMark>,
    inception_rotated: bool,
    repository_did: Option<String>,
    document_path: Option<String>,
    documents_map: Option<String>,
}

impl XidDocument {
    /// A fresh document with only its inception key, no provenance mark
    /// yet. The XID is fixed here and never changes (`spec.md` invariant
    /// (i)).
    pub fn new(inception_key: PublicKey) -> Self {
        let xid = Xid::from_inception_key(&inception_key);
        Self {
            xid,
            keys: vec![Key::inception(inception_key)],
            delegates: Vec::new(),
            services: Vec::new(),
            resolution_methods: Vec::new(),
            generator: None,
            current_mark: None,
            inception_rotated: false,
            repository_did: None,
            document_path: None,
            documents_map: None,
        }
    }

    /// Starts the provenance-mark generator and mints the genesis mark in
    /// one step — the common inception path (`spec.md` §4.2).
    #[tracing::instrument(skip(self, source))]
    pub fn with_provenance(mut self, resolution: Resolution, source: Source, date: MarkDate) -> Self {
        let mut generator = Generator::genesis(resolution, source);
        let mark = generator.next(date);
        self.generator = Some(generator);
        self.current_mark = Some(mark);
        self
    }

    /// Mints a fresh genesis mark under a new chain ID, in place, leaving
    /// the XID untouched. The prior chain's marks remain individually
    /// valid under their own chain ID; this starts the segment that now
    /// governs verification (end-to-end scenario 6: trust-root reset).
    #[tracing::instrument(skip(self, source))]
    pub fn reset_provenance(&mut self, resolution: Resolution, source: Source, date: MarkDate) -> ProvenanceMark {
        let mut generator = Generator::genesis(resolution, source);
        let mark = generator.next(date);
        self.generator = Some(generator);
        self.current_mark = Some(mark.clone());
        tracing::info!(xid = %self.xid, "trust root reset");
        mark
    }

    pub fn xid(&self) -> Xid {
        self.xid
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn delegates(&self) -> &[Delegate] {
        &self.delegates
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn current_mark(&self) -> Option<&ProvenanceMark> {
        self.current_mark.as_ref()
    }

    pub fn set_repository_did(&mut self, did: impl Into<String>) {
        self.repository_did = Some(did.into());
    }

    pub fn set_document_path(&mut self, path: impl Into<String>) {
        self.document_path = Some(path.into());
    }

    pub fn set_documents_map(&mut self, json: impl Into<String>) {
        self.documents_map = Some(json.into());
    }

    pub fn repository_did(&self) -> Option<&str> {
        self.repository_did.as_deref()
    }

    pub fn document_path(&self) -> Option<&str> {
        self.document_path.as_deref()
    }

    pub fn documents_map(&self) -> Option<&str> {
        self.documents_map.as_deref()
    }

    pub fn add_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    pub fn add_resolution_method(&mut self, method: impl Into<String>) {
        self.resolution_methods.push(method.into());
    }

    /// Removes a non-inception key. Fails if any service still references
    /// it (`spec.md` invariant (ii)); inception-key removal goes through
    /// [`XidDocument::remove_inception_key`] instead.
    pub fn remove_key(&mut self, public_key: &PublicKey) -> Result<(), XidError> {
        let index = self
            .keys
            .iter()
            .position(|k| &k.public_key == public_key)
            .ok_or(XidError::NoSuchKey)?;
        if self.keys[index].is_inception {
            return self.remove_inception_key();
        }
        if let Some(service) = self
            .services
            .iter()
            .find(|s| s.references_key(public_key))
        {
            return Err(XidError::KeyInUse(service.uri.clone()));
        }
        self.keys.remove(index);
        Ok(())
    }

    /// `spec.md` §4.3's key rotation algorithm, step 2+3: removes the
    /// inception key exactly once, provided at least one other
    /// `All`-permissioned key remains.
    #[tracing::instrument(skip(self))]
    pub fn remove_inception_key(&mut self) -> Result<(), XidError> {
        if self.inception_rotated {
            return Err(XidError::AlreadyRotated);
        }
        let index = self
            .keys
            .iter()
            .position(|k| k.is_inception)
            .ok_or(XidError::NoSuchKey)?;
        if let Some(service) = self
            .services
            .iter()
            .find(|s| s.references_key(&self.keys[index].public_key))
        {
            return Err(XidError::KeyInUse(service.uri.clone()));
        }
        let survives_with_all = self
            .keys
            .iter()
            .enumerate()
            .any(|(i, k)| i != index && k.permissions.contains(Permissions::ALL));
        if !survives_with_all {
            return Err(XidError::RotationWouldOrphan);
        }
        self.keys.remove(index);
        self.inception_rotated = true;
        tracing::debug!(xid = %self.xid, "removed inception key after rotation");
        Ok(())
    }

    /// `spec.md` §4.3's key rotation algorithm in full: add `new_key` with
    /// `All`, then remove the inception key. The XID is unchanged since it
    /// is derived from the original inception key's bytes, retained in
    /// `self.xid` independently of the `Key` object.
    pub fn rotate(&mut self, new_key: PublicKey) -> Result<(), XidError> {
        self.add_key(Key::new(new_key, Permissions::ALL));
        self.remove_inception_key()
    }

    /// Registers a service, after checking its key and delegate references
    /// resolve within this document (`spec.md` §3: "referenced keys and
    /// delegates must exist").
    pub fn add_service(&mut self, service: Service) -> Result<(), XidError> {
        for key_ref in &service.key_refs {
            if !self.keys.iter().any(|k| &k.public_key == key_ref) {
                return Err(XidError::DanglingReference);
            }
        }
        for delegate_ref in &service.delegate_refs {
            if !self
                .delegates
                .iter()
                .any(|d| &d.referenced_xid == delegate_ref)
            {
                return Err(XidError::DanglingReference);
            }
        }
        self.services.push(service);
        Ok(())
    }

    pub fn add_delegate(&mut self, delegate: Delegate) {
        self.delegates.push(delegate);
    }

    /// `spec.md` §4.2's `generator.next(date)`, invoked by the ledger on
    /// every commit.
    #[tracing::instrument(skip(self))]
    pub fn advance_provenance(&mut self, date: MarkDate) -> Result<ProvenanceMark, XidError> {
        let generator = self.generator.as_mut().ok_or(XidError::NoGenerator)?;
        let mark = generator.next(date);
        self.current_mark = Some(mark.clone());
        Ok(mark)
    }

    /// The key the envelope's `GordianOpenIntegrity.SigningKey` assertion
    /// names: the most recently added key, which is the current signing
    /// key both before and after a rotation (`spec.md` §3).
    pub fn signing_key(&self) -> Option<&Key> {
        self.keys.last()
    }

    /// The mark generator driving [`XidDocument::advance_provenance`], for
    /// the ledger to persist across process restarts (`spec.md` §6's
    /// generator state file).
    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    /// Installs a generator restored from a persisted state file, so a
    /// reopened document can keep minting marks from where it left off.
    pub fn restore_generator(&mut self, generator: Generator) {
        self.generator = Some(generator);
    }

    /// `spec.md` §4.3 `toEnvelope`.
    pub fn to_envelope(
        &self,
        priv_opts: &PrivateKeyOptions,
        gen_opts: &GeneratorOptions,
        signing_opts: &SigningOptions,
    ) -> Result<Envelope, XidError> {
        let mut env = Envelope::new(Leaf::text(hex::encode(self.xid.as_bytes())));

        if let Some(signing_key) = self.signing_key() {
            env = env.add_assertion(predicate::SIGNING_KEY, signing_key.public_key.to_string());
        }
        if let Some(did) = &self.repository_did {
            env = env.add_assertion(predicate::REPOSITORY_IDENTIFIER, did.as_str());
        }
        if let Some(path) = &self.document_path {
            env = env.add_assertion(predicate::DOCUMENT, path.as_str());
        }
        if let Some(map) = &self.documents_map {
            env = env.add_assertion(predicate::DOCUMENTS, map.as_str());
        }

        for key in &self.keys {
            env = env.add_assertion("key", Node::Sub(Box::new(key_to_envelope(key, priv_opts))));
        }
        for delegate in &self.delegates {
            env = env.add_assertion("delegate", Node::Sub(Box::new(delegate_to_envelope(delegate))));
        }
        for service in &self.services {
            env = env.add_assertion("service", Node::Sub(Box::new(service_to_envelope(service))));
        }
        for method in &self.resolution_methods {
            env = env.add_assertion("resolutionMethod", method.as_str());
        }

        if let Some(mark) = &self.current_mark {
            env = env.add_assertion("mark", Node::Sub(Box::new(mark_to_envelope(mark))));
        }
        if matches!(gen_opts, GeneratorOptions::Include) {
            if let Some(generator) = &self.generator {
                env = env.add_assertion("generatorChainId", hex::encode(generator.chain_id()));
                env = env.add_assertion("generatorNextSeq", Leaf::Int(generator.next_seq() as i64));
            }
        }

        match signing_opts {
            SigningOptions::None => Ok(env),
            SigningOptions::Inception => {
                let signer = self
                    .keys
                    .iter()
                    .find(|k| k.is_inception && k.private_key.is_some())
                    .ok_or(XidError::MissingAssertion("inception private key"))?;
                let secret = SecretKey::try_from(signer.private_key.as_deref().unwrap())
                    .map_err(|_| XidError::SignatureInvalid)?;
                Ok(sign_envelope(env, &secret))
            }
            SigningOptions::WithKey(secret) => Ok(sign_envelope(env, secret)),
        }
    }

    /// `spec.md` §4.3 `fromEnvelope`.
    pub fn from_envelope(
        env: &Envelope,
        password: Option<&str>,
        verify_policy: VerifyPolicy,
    ) -> Result<Self, XidError> {
        let inner = match verify_policy {
            VerifyPolicy::None => env.clone(),
            VerifyPolicy::Inception => verify_inception_signature(env)?,
        };

        let xid_hex = inner
            .subject
            .as_text()
            .ok_or(XidError::MissingAssertion("xid"))?;
        let xid_bytes = hex::decode(xid_hex).map_err(|_| XidError::MissingAssertion("xid"))?;
        if xid_bytes.len() != 4 {
            return Err(XidError::MissingAssertion("xid"));
        }
        let mut xid_arr = [0u8; 4];
        xid_arr.copy_from_slice(&xid_bytes);

        let mut doc = XidDocument {
            xid: xid_from_bytes(xid_arr),
            keys: Vec::new(),
            delegates: Vec::new(),
            services: Vec::new(),
            resolution_methods: Vec::new(),
            generator: None,
            current_mark: None,
            inception_rotated: false,
            repository_did: None,
            document_path: None,
            documents_map: None,
        };

        for assertion in &inner.assertions {
            let pred = assertion.predicate.as_text().unwrap_or_default();
            match pred {
                predicate::REPOSITORY_IDENTIFIER => {
                    doc.repository_did = assertion.object.as_text().map(String::from);
                }
                predicate::DOCUMENT => {
                    doc.document_path = assertion.object.as_text().map(String::from);
                }
                predicate::DOCUMENTS => {
                    doc.documents_map = assertion.object.as_text().map(String::from);
                }
                "key" => {
                    if let Node::Sub(sub) = &assertion.object {
                        doc.keys.push(key_from_envelope(sub, password)?);
                    }
                }
                "delegate" => {
                    if let Node::Sub(sub) = &assertion.object {
                        doc.delegates.push(delegate_from_envelope(sub)?);
                    }
                }
                "service" => {
                    if let Node::Sub(sub) = &assertion.object {
                        doc.services.push(service_from_envelope(sub)?);
                    }
                }
                "resolutionMethod" => {
                    if let Some(m) = assertion.object.as_text() {
                        doc.resolution_methods.push(m.to_string());
                    }
                }
                "mark" => {
                    if let Node::Sub(sub) = &assertion.object {
                        doc.current_mark = Some(mark_from_envelope(sub)?);
                    }
                }
                _ => {}
            }
        }

        doc.inception_rotated = !doc.keys.iter().any(|k| k.is_inception);

        Ok(doc)
    }
}

fn xid_from_bytes(bytes: [u8; 4]) -> Xid {
    // `Xid` only constructs from a `PublicKey` prefix publicly; reuse that
    // path via a throwaway key whose first four bytes are the ones we
    // parsed back out of the envelope.
    let mut seed = [0u8; 32];
    seed[0..4].copy_from_slice(&bytes);
    let key = PublicKey::from_slice(&seed).expect("32-byte slice is a valid key");
    Xid::from_inception_key(&key)
}

fn sign_envelope(inner: Envelope, secret: &SecretKey) -> Envelope {
    let digest = inner.digest();
    let sig = secret.sign(&digest);
    Envelope::new(Node::Sub(Box::new(inner)))
        .add_assertion("signer", secret.public().to_string())
        .add_assertion("signature", Leaf::Bytes(sig.to_bytes().to_vec()))
}

fn verify_inception_signature(env: &Envelope) -> Result<Envelope, XidError> {
    let inner = match &env.subject {
        Node::Sub(sub) => (**sub).clone(),
        _ => return Err(XidError::MissingAssertion("signed envelope subject")),
    };
    let signer_text = env
        .assertions_with_predicate("signer")
        .first()
        .and_then(|n| n.as_text())
        .ok_or(XidError::MissingAssertion("signer"))?;
    let signature_bytes = env
        .assertions_with_predicate("signature")
        .into_iter()
        .find_map(|n| match n {
            Node::Leaf(Leaf::Bytes(b)) => Some(b.clone()),
            _ => None,
        })
        .ok_or(XidError::MissingAssertion("signature"))?;

    let (_, pk_bytes) =
        multibase::decode(signer_text).map_err(|_| XidError::SignatureInvalid)?;
    let signer = PublicKey::from_slice(&pk_bytes).ok_or(XidError::SignatureInvalid)?;
    let signature = Signature::from_bytes(&signature_bytes).ok_or(XidError::SignatureInvalid)?;

    if !signer.verify(&inner.digest(), &signature) {
        return Err(XidError::SignatureInvalid);
    }

    let claimed_xid_hex = inner.subject.as_text().unwrap_or_default();
    let claimed_xid =
        hex::decode(claimed_xid_hex).map_err(|_| XidError::SignatureInvalid)?;
    if claimed_xid != signer.xid_prefix() {
        return Err(XidError::SignatureInvalid);
    }

    Ok(inner)
}

fn key_to_envelope(key: &Key, priv_opts: &PrivateKeyOptions) -> Envelope {
    let mut env = Envelope::new(Leaf::text(key.public_key.to_string()))
        .add_assertion("permissions", Leaf::Int(key.permissions.bits() as i64))
        .add_assertion("isInception", Leaf::Int(key.is_inception as i64));
    if let Some(nickname) = &key.nickname {
        env = env.add_assertion("nickname", nickname.as_str());
    }
    if !key.endpoints.is_empty() {
        env = env.add_assertion("endpoints", key.endpoints.join(","));
    }
    if let Some(private) = &key.private_key {
        let object_index = match priv_opts {
            PrivateKeyOptions::Omit => None,
            PrivateKeyOptions::Include => Some(Node::Leaf(Leaf::Bytes(private.clone()))),
            PrivateKeyOptions::Elide => {
                Some(Node::Leaf(Leaf::Bytes(private.clone())).elide())
            }
            PrivateKeyOptions::Encrypt { password } => {
                let key_bytes = Sha256::digest(password.as_bytes());
                let mut key_arr = [0u8; 32];
                key_arr.copy_from_slice(&key_bytes);
                let cipher = goi_crypto::aead::encrypt_field(&key_arr, &hex::encode(private));
                Some(Node::Leaf(Leaf::text(cipher)))
            }
        };
        if let Some(object) = object_index {
            env.assertions
                .push(goi_envelope::Assertion::new("privateKey", object));
        }
    }
    env
}

fn key_from_envelope(env: &Envelope, password: Option<&str>) -> Result<Key, XidError> {
    let pk_text = env
        .subject
        .as_text()
        .ok_or(XidError::MissingAssertion("key subject"))?;
    let (_, pk_bytes) = multibase::decode(pk_text).map_err(|_| XidError::MissingAssertion("key"))?;
    let public_key = PublicKey::from_slice(&pk_bytes).ok_or(XidError::MissingAssertion("key"))?;

    let mut permissions = Permissions::empty();
    let mut is_inception = false;
    let mut nickname = None;
    let mut endpoints = Vec::new();
    let mut private_key = None;

    for assertion in &env.assertions {
        match assertion.predicate.as_text().unwrap_or_default() {
            "permissions" => {
                if let Node::Leaf(Leaf::Int(bits)) = &assertion.object {
                    permissions = Permissions::from_bits_truncate(*bits as u32);
                }
            }
            "isInception" => {
                if let Node::Leaf(Leaf::Int(v)) = &assertion.object {
                    is_inception = *v != 0;
                }
            }
            "nickname" => nickname = assertion.object.as_text().map(String::from),
            "endpoints" => {
                if let Some(text) = assertion.object.as_text() {
                    endpoints = text.split(',').map(String::from).collect();
                }
            }
            "privateKey" => match &assertion.object {
                Node::Leaf(Leaf::Bytes(b)) => private_key = Some(b.clone()),
                Node::Leaf(Leaf::Text(t)) => {
                    if let Some(password) = password {
                        let key_bytes = Sha256::digest(password.as_bytes());
                        let mut key_arr = [0u8; 32];
                        key_arr.copy_from_slice(&key_bytes);
                        if let Ok(hex_str) = goi_crypto::aead::decrypt_field(&key_arr, t.as_str()) {
                            private_key = hex::decode(hex_str).ok();
                        }
                    }
                }
                Node::Elided(_) => {}
                _ => {}
            },
            _ => {}
        }
    }

    Ok(Key {
        public_key,
        private_key,
        nickname,
        permissions,
        endpoints,
        is_inception,
    })
}

fn delegate_to_envelope(delegate: &Delegate) -> Envelope {
    Envelope::new(Leaf::text(hex::encode(delegate.referenced_xid.as_bytes())))
        .add_assertion("permissions", Leaf::Int(delegate.permissions.bits() as i64))
}

fn delegate_from_envelope(env: &Envelope) -> Result<Delegate, XidError> {
    let xid_hex = env
        .subject
        .as_text()
        .ok_or(XidError::MissingAssertion("delegate subject"))?;
    let bytes = hex::decode(xid_hex).map_err(|_| XidError::MissingAssertion("delegate"))?;
    if bytes.len() != 4 {
        return Err(XidError::MissingAssertion("delegate"));
    }
    let mut arr = [0u8; 4];
    arr.copy_from_slice(&bytes);
    let permissions = env
        .assertions_with_predicate("permissions")
        .into_iter()
        .find_map(|n| match n {
            Node::Leaf(Leaf::Int(bits)) => Some(Permissions::from_bits_truncate(*bits as u32)),
            _ => None,
        })
        .unwrap_or_else(Permissions::empty);
    Ok(Delegate::new(xid_from_bytes(arr), permissions))
}

fn service_to_envelope(service: &Service) -> Envelope {
    let mut env = Envelope::new(Leaf::text(service.uri.clone()))
        .add_assertion("permissions", Leaf::Int(service.permissions.bits() as i64));
    if let Some(name) = &service.name {
        env = env.add_assertion("name", name.as_str());
    }
    if !service.capabilities.is_empty() {
        env = env.add_assertion("capabilities", service.capabilities.join(","));
    }
    for key_ref in &service.key_refs {
        env = env.add_assertion("keyRef", key_ref.to_string());
    }
    for delegate_ref in &service.delegate_refs {
        env = env.add_assertion("delegateRef", hex::encode(delegate_ref.as_bytes()));
    }
    env
}

fn service_from_envelope(env: &Envelope) -> Result<Service, XidError> {
    let uri = env
        .subject
        .as_text()
        .ok_or(XidError::MissingAssertion("service subject"))?
        .to_string();
    let mut service = Service::new(uri);
    for assertion in &env.assertions {
        match assertion.predicate.as_text().unwrap_or_default() {
            "permissions" => {
                if let Node::Leaf(Leaf::Int(bits)) = &assertion.object {
                    service.permissions = Permissions::from_bits_truncate(*bits as u32);
                }
            }
            "name" => service.name = assertion.object.as_text().map(String::from),
            "capabilities" => {
                if let Some(text) = assertion.object.as_text() {
                    service.capabilities = text.split(',').map(String::from).collect();
                }
            }
            "keyRef" => {
                if let Some(text) = assertion.object.as_text() {
                    if let Ok((_, bytes)) = multibase::decode(text) {
                        if let Some(pk) = PublicKey::from_slice(&bytes) {
                            service.key_refs.push(pk);
                        }
                    }
                }
            }
            "delegateRef" => {
                if let Some(text) = assertion.object.as_text() {
                    if let Ok(bytes) = hex::decode(text) {
                        if bytes.len() == 4 {
                            let mut arr = [0u8; 4];
                            arr.copy_from_slice(&bytes);
                            service.delegate_refs.push(xid_from_bytes(arr));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(service)
}

fn mark_to_envelope(mark: &ProvenanceMark) -> Envelope {
    let resolution = match mark.resolution {
        Resolution::Low => "low",
        Resolution::Medium => "medium",
        Resolution::Quartile => "quartile",
        Resolution::High => "high",
    };
    Envelope::new(Leaf::text(mark.identifier_hex()))
        .add_assertion("resolution", resolution)
        .add_assertion("chainId", hex::encode(&mark.chain_id))
        .add_assertion("seq", Leaf::Int(mark.seq as i64))
        .add_assertion("date", mark.date.to_string())
        .add_assertion("key", hex::encode(&mark.key))
        .add_assertion("nextKeyHash", hex::encode(&mark.next_key_hash))
        .add_assertion("payload", hex::encode(&mark.payload))
}

fn mark_from_envelope(env: &Envelope) -> Result<ProvenanceMark, XidError> {
    let mut resolution = Resolution::Low;
    let mut chain_id = Vec::new();
    let mut seq = 0u32;
    let mut date = MarkDate::new(1970, 1, 1);
    let mut key = Vec::new();
    let mut next_key_hash = Vec::new();
    let mut payload = Vec::new();

    for assertion in &env.assertions {
        let text = assertion.object.as_text();
        match assertion.predicate.as_text().unwrap_or_default() {
            "resolution" => {
                resolution = match text {
                    Some("medium") => Resolution::Medium,
                    Some("quartile") => Resolution::Quartile,
                    Some("high") => Resolution::High,
                    _ => Resolution::Low,
                };
            }
            "chainId" => chain_id = text.and_then(|t| hex::decode(t).ok()).unwrap_or_default(),
            "seq" => {
                if let Node::Leaf(Leaf::Int(n)) = &assertion.object {
                    seq = *n as u32;
                }
            }
            "date" => {
                if let Some(t) = text {
                    date = parse_date(t).unwrap_or(date);
                }
            }
            "key" => key = text.and_then(|t| hex::decode(t).ok()).unwrap_or_default(),
            "nextKeyHash" => {
                next_key_hash = text.and_then(|t| hex::decode(t).ok()).unwrap_or_default()
            }
            "payload" => payload = text.and_then(|t| hex::decode(t).ok()).unwrap_or_default(),
            _ => {}
        }
    }

    Ok(ProvenanceMark {
        resolution,
        chain_id,
        seq,
        date,
        key,
        next_key_hash,
        payload,
    })
}

fn parse_date(s: &str) -> Option<MarkDate> {
    let mut parts = s.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some(MarkDate::new(year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goi_crypto::SecretKey;

    fn inception() -> (SecretKey, XidDocument) {
        let sk = SecretKey::from_seed([1; 32]);
        let doc = XidDocument::new(sk.public()).with_provenance(
            Resolution::Low,
            Source::SeedBytes(vec![2; 32]),
            MarkDate::new(2024, 1, 1),
        );
        (sk, doc)
    }

    #[test]
    fn xid_is_stable_across_rotation() {
        let (_sk, mut doc) = inception();
        let xid_before = doc.xid();
        let new_key = SecretKey::from_seed([9; 32]).public();
        doc.rotate(new_key).unwrap();
        assert_eq!(doc.xid(), xid_before);
        assert!(!doc.keys().iter().any(|k| k.is_inception));
    }

    #[test]
    fn rotation_without_new_all_key_orphans() {
        let (_sk, mut doc) = inception();
        assert!(matches!(
            doc.remove_inception_key(),
            Err(XidError::RotationWouldOrphan)
        ));
    }

    #[test]
    fn inception_key_can_only_rotate_once() {
        let (_sk, mut doc) = inception();
        doc.rotate(SecretKey::from_seed([9; 32]).public()).unwrap();
        assert!(matches!(
            doc.remove_inception_key(),
            Err(XidError::AlreadyRotated)
        ));
    }

    #[test]
    fn key_in_use_by_service_cannot_be_removed() {
        let (_sk, mut doc) = inception();
        let pk = doc.keys()[0].public_key;
        doc.add_service(Service {
            key_refs: vec![pk],
            ..Service::new("https://example.com")
        })
        .unwrap();
        assert!(matches!(doc.remove_key(&pk), Err(XidError::KeyInUse(_))));
    }

    #[test]
    fn envelope_round_trip_preserves_xid_and_keys() {
        let (_sk, doc) = inception();
        let env = doc
            .to_envelope(&PrivateKeyOptions::Omit, &GeneratorOptions::Omit, &SigningOptions::None)
            .unwrap();
        let back = XidDocument::from_envelope(&env, None, VerifyPolicy::None).unwrap();
        assert_eq!(doc.xid(), back.xid());
        assert_eq!(doc.keys().len(), back.keys().len());
    }

    #[test]
    fn elided_private_key_preserves_root_digest() {
        let (_sk, mut doc) = inception();
        doc.keys[0] = doc.keys[0].clone().with_private_key(vec![1u8; 32]);
        let included = doc
            .to_envelope(&PrivateKeyOptions::Include, &GeneratorOptions::Omit, &SigningOptions::None)
            .unwrap();
        let elided = doc
            .to_envelope(&PrivateKeyOptions::Elide, &GeneratorOptions::Omit, &SigningOptions::None)
            .unwrap();
        assert_eq!(included.digest(), elided.digest());
    }

    #[test]
    fn private_key_round_trips_when_included() {
        let (_sk, mut doc) = inception();
        doc.keys[0] = doc.keys[0].clone().with_private_key(vec![7u8; 32]);
        let env = doc
            .to_envelope(&PrivateKeyOptions::Include, &GeneratorOptions::Omit, &SigningOptions::None)
            .unwrap();
        let back = XidDocument::from_envelope(&env, None, VerifyPolicy::None).unwrap();
        assert_eq!(back.keys()[0].private_key, Some(vec![7u8; 32]));
    }

    #[test]
    fn encrypted_private_key_round_trips_with_password() {
        let (_sk, mut doc) = inception();
        doc.keys[0] = doc.keys[0].clone().with_private_key(vec![3u8; 32]);
        let opts = PrivateKeyOptions::Encrypt {
            password: "hunter2".to_string(),
        };
        let env = doc
            .to_envelope(&opts, &GeneratorOptions::Omit, &SigningOptions::None)
            .unwrap();
        let back = XidDocument::from_envelope(&env, Some("hunter2"), VerifyPolicy::None).unwrap();
        assert_eq!(back.keys()[0].private_key, Some(vec![3u8; 32]));

        let wrong_password = XidDocument::from_envelope(&env, Some("wrong"), VerifyPolicy::None).unwrap();
        assert_eq!(wrong_password.keys()[0].private_key, None);
    }

    #[test]
    fn inception_signed_envelope_round_trips_and_verifies() {
        let (sk, doc) = inception();
        let signed = doc
            .to_envelope(
                &PrivateKeyOptions::Omit,
                &GeneratorOptions::Omit,
                &SigningOptions::WithKey(sk.clone()),
            )
            .unwrap();
        let back = XidDocument::from_envelope(&signed, None, VerifyPolicy::Inception).unwrap();
        assert_eq!(doc.xid(), back.xid());
    }
}
