//! Keyed composites: Map and Header.
//!
//! The two differ only in how the per-entry key is framed on the wire:
//! a 4-byte little-endian integer for Map, a NUL-terminated string for
//! Header. One generic block parameterized over the key codec carries
//! both. Entries are held sorted by key, so encoding canonicalizes wire
//! order to ascending keys.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::marker::Kind;

/// Wire codec for a keyed block's per-entry key.
pub trait WireKey: Ord + Clone + fmt::Debug {
    /// The composite kind this key type frames.
    const KIND: Kind;

    /// Decode one key from the front of `buf`, returning the key and the
    /// number of bytes it occupied.
    fn read(buf: &[u8]) -> Result<(Self, usize)>;

    /// Append the wire form of this key.
    fn write(&self, buf: &mut Vec<u8>);

    /// Width of the wire form in bytes.
    fn encoded_len(&self) -> usize;
}

impl WireKey for u32 {
    const KIND: Kind = Kind::Map;

    fn read(buf: &[u8]) -> Result<(Self, usize)> {
        if buf.len() < 4 {
            return Err(Error::LengthTooShort {
                step: "map key",
                actual: buf.len(),
                expected: 4,
            });
        }
        Ok((LittleEndian::read_u32(buf), 4))
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }

    fn encoded_len(&self) -> usize {
        4
    }
}

impl WireKey for String {
    const KIND: Kind = Kind::Header;

    fn read(buf: &[u8]) -> Result<(Self, usize)> {
        let nul = buf
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::BadEncode("header key is not NUL-terminated".into()))?;
        let key = std::str::from_utf8(&buf[..nul])
            .map_err(|_| Error::BadEncode("header key is not valid UTF-8".into()))?;
        Ok((key.to_string(), nul + 1))
    }

    fn write(&self, buf: &mut Vec<u8>) {
        // A key with an interior NUL has no wire representation.
        debug_assert!(!self.as_bytes().contains(&0));
        buf.extend_from_slice(self.as_bytes());
        buf.push(0);
    }

    fn encoded_len(&self) -> usize {
        self.len() + 1
    }
}

/// An ordered key → record mapping.
///
/// Decoding reads entries in wire order with duplicate keys resolving
/// last-wins; encoding always emits ascending key order.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyed<K: WireKey> {
    children: BTreeMap<K, Ingredient<'static>>,
}

/// Integer-keyed mapping.
pub type Map = Keyed<u32>;

/// String-keyed mapping with NUL-terminated keys on the wire.
pub type Header = Keyed<String>;

impl<K: WireKey> Keyed<K> {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entries, sorted by key.
    pub fn children(&self) -> &BTreeMap<K, Ingredient<'static>> {
        &self.children
    }

    /// Mutable access for building and editing.
    pub fn children_mut(&mut self) -> &mut BTreeMap<K, Ingredient<'static>> {
        &mut self.children
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The record stored under `key`, or the shared Null sentinel when the
    /// key is absent. Use [`Keyed::contains_key`] to tell a stored Null
    /// from a miss.
    pub fn get<Q>(&self, key: &Q) -> &Ingredient<'static>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.children.get(key).unwrap_or(Ingredient::not_found())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.children.contains_key(key)
    }
}

impl<K: WireKey> Default for Keyed<K> {
    fn default() -> Self {
        Keyed {
            children: BTreeMap::new(),
        }
    }
}

impl<K: WireKey> From<BTreeMap<K, Ingredient<'static>>> for Keyed<K> {
    fn from(children: BTreeMap<K, Ingredient<'static>>) -> Self {
        Keyed { children }
    }
}

impl<K: WireKey> TryFrom<&Ingredient<'_>> for Keyed<K> {
    type Error = Error;

    fn try_from(raw: &Ingredient) -> Result<Self> {
        let mut children = BTreeMap::new();
        let mut rest = raw.payload();
        while !rest.is_empty() {
            let (key, key_len) = K::read(rest)?;
            rest = &rest[key_len..];
            let child = Ingredient::copy_from(rest)?;
            rest = &rest[child.size()..];
            children.insert(key, child);
        }
        Ok(Keyed { children })
    }
}

impl<K: WireKey> From<&Keyed<K>> for Ingredient<'static> {
    fn from(val: &Keyed<K>) -> Self {
        let payload_len: usize = val
            .children
            .iter()
            .map(|(k, v)| k.encoded_len() + v.size())
            .sum();
        let mut buf = Vec::with_capacity(payload_len + 9);
        Ingredient::frame(K::KIND, payload_len, &mut buf);
        for (key, child) in &val.children {
            key.write(&mut buf);
            buf.extend_from_slice(child.as_bytes());
        }
        Ingredient::from_vec(buf)
    }
}
