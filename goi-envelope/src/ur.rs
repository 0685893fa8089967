// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `ur:goi-envelope/<multibase base32z of canonical CBOR bytes>`
//! (`SPEC_FULL.md` §3.1). The CBOR shape is not canonicalised the way
//! `goi-canonical` canonicalises digest input — it only needs to
//! round-trip — so it is encoded with plain `minicbor`, following the
//! wrapper-struct idiom `link-cbor` uses for its own `Encode`/`Decode`
//! adapters.

use std::convert::TryInto;

use minicbor::{
    decode::{self, Decoder},
    encode::{self, Encoder, Write},
};

use crate::{
    envelope::{Assertion, Envelope},
    error::EnvelopeError,
    leaf::Leaf,
    node::Node,
};

const UR_PREFIX: &str = "ur:goi-envelope/";

pub fn to_ur_string(env: &Envelope) -> Result<String, EnvelopeError> {
    let mut bytes = Vec::new();
    let mut enc = Encoder::new(&mut bytes);
    encode_envelope(&mut enc, env).map_err(|e| EnvelopeError::CborEncode(e.to_string()))?;
    let body = multibase::encode(multibase::Base::Base32Z, bytes);
    // `multibase::encode` prepends its own one-character base code; strip it
    // since the UR scheme supplies its own `ur:goi-envelope/` prefix.
    Ok(format!("{}{}", UR_PREFIX, &body[1..]))
}

pub fn from_ur_string(s: &str) -> Result<Envelope, EnvelopeError> {
    let body = s
        .strip_prefix(UR_PREFIX)
        .ok_or_else(|| EnvelopeError::InvalidEncoding(format!("missing {} prefix", UR_PREFIX)))?;
    let (_, bytes) = multibase::decode(format!("{}{}", multibase::Base::Base32Z.code(), body))?;
    let mut dec = Decoder::new(&bytes);
    decode_envelope(&mut dec).map_err(|e| EnvelopeError::CborDecode(e.to_string()))
}

fn encode_leaf<W: Write>(e: &mut Encoder<W>, leaf: &Leaf) -> Result<(), encode::Error<W::Error>> {
    match leaf {
        Leaf::Text(s) => {
            e.u8(0)?;
            e.str(s.as_str())?;
        }
        Leaf::Bytes(b) => {
            e.u8(1)?;
            e.bytes(b)?;
        }
        Leaf::Int(n) => {
            e.u8(2)?;
            e.i64(*n)?;
        }
    }
    Ok(())
}

fn decode_leaf(d: &mut Decoder) -> Result<Leaf, decode::Error> {
    match d.u8()? {
        0 => Ok(Leaf::text(d.str()?.to_owned())),
        1 => Ok(Leaf::Bytes(d.bytes()?.to_vec())),
        2 => Ok(Leaf::Int(d.i64()?)),
        other => Err(decode::Error::UnknownVariant(other as u32)),
    }
}

fn encode_node<W: Write>(e: &mut Encoder<W>, node: &Node) -> Result<(), encode::Error<W::Error>> {
    match node {
        Node::Leaf(leaf) => {
            e.array(2)?;
            e.u8(0)?;
            encode_leaf(e, leaf)?;
        }
        Node::Elided(digest) => {
            e.array(2)?;
            e.u8(1)?;
            e.bytes(digest)?;
        }
        Node::Sub(env) => {
            e.array(2)?;
            e.u8(2)?;
            encode_envelope(e, env)?;
        }
    }
    Ok(())
}

fn decode_node(d: &mut Decoder) -> Result<Node, decode::Error> {
    let len = d.array()?;
    if len != Some(2) {
        return Err(decode::Error::Message("expected a 2-element node array"));
    }
    match d.u8()? {
        0 => Ok(Node::Leaf(decode_leaf(d)?)),
        1 => {
            let bytes = d.bytes()?;
            let digest: [u8; 32] = bytes
                .try_into()
                .map_err(|_| decode::Error::Message("elided digest must be 32 bytes"))?;
            Ok(Node::Elided(digest))
        }
        2 => Ok(Node::Sub(Box::new(decode_envelope(d)?))),
        other => Err(decode::Error::UnknownVariant(other as u32)),
    }
}

fn encode_envelope<W: Write>(
    e: &mut Encoder<W>,
    env: &Envelope,
) -> Result<(), encode::Error<W::Error>> {
    e.array(2)?;
    encode_node(e, &env.subject)?;
    e.array(env.assertions.len() as u64)?;
    for a in &env.assertions {
        e.array(2)?;
        encode_node(e, &a.predicate)?;
        encode_node(e, &a.object)?;
    }
    Ok(())
}

fn decode_envelope(d: &mut Decoder) -> Result<Envelope, decode::Error> {
    let len = d.array()?;
    if len != Some(2) {
        return Err(decode::Error::Message("expected a 2-element envelope array"));
    }
    let subject = decode_node(d)?;
    let n = d
        .array()?
        .ok_or_else(|| decode::Error::Message("indefinite assertion array not supported"))?;
    let mut assertions = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let alen = d.array()?;
        if alen != Some(2) {
            return Err(decode::Error::Message("expected a 2-element assertion array"));
        }
        let predicate = decode_node(d)?;
        let object = decode_node(d)?;
        assertions.push(Assertion { predicate, object });
    }
    Ok(Envelope { subject, assertions })
}
