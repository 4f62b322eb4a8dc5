//! Compressed (Zip) blocks.
//!
//! A Zip record's payload is the raw-Snappy compression of exactly one
//! inner record's full byte image. Decoding restores and adopts the inner
//! record; encoding compresses into a `max_compress_len` buffer and shrinks
//! to the actual output before framing.

use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::marker::Kind;

/// One record stored Snappy-compressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Compressed {
    child: Ingredient<'static>,
}

impl Compressed {
    /// Wrap a record for compression.
    pub fn new(child: Ingredient<'static>) -> Compressed {
        Compressed { child }
    }

    /// The inner record.
    pub fn child(&self) -> &Ingredient<'static> {
        &self.child
    }

    /// Mutable access to the inner record.
    pub fn child_mut(&mut self) -> &mut Ingredient<'static> {
        &mut self.child
    }

    /// Unwrap to the inner record.
    pub fn into_inner(self) -> Ingredient<'static> {
        self.child
    }
}

impl Default for Compressed {
    fn default() -> Self {
        Compressed {
            child: Ingredient::null(),
        }
    }
}

impl From<Ingredient<'static>> for Compressed {
    fn from(child: Ingredient<'static>) -> Self {
        Compressed { child }
    }
}

impl TryFrom<&Ingredient<'_>> for Compressed {
    type Error = Error;

    /// Decompress a Zip record's payload and adopt the result. Fails if
    /// Snappy rejects the payload or the output is not a single valid
    /// record.
    fn try_from(raw: &Ingredient) -> Result<Self> {
        let src = raw.payload();
        let expected = snap::raw::decompress_len(src)?;
        let mut out = vec![0u8; expected];
        let len = snap::raw::Decoder::new().decompress(src, &mut out)?;
        out.truncate(len);
        Ok(Compressed {
            child: Ingredient::adopt(out)?,
        })
    }
}

impl From<&Compressed> for Ingredient<'static> {
    fn from(val: &Compressed) -> Self {
        let src = val.child.as_bytes();
        let mut compressed = vec![0u8; snap::raw::max_compress_len(src.len())];
        let len = snap::raw::Encoder::new()
            .compress(src, &mut compressed)
            .expect("snappy unexpectedly errored during compress");
        compressed.truncate(len);

        let mut buf = Vec::with_capacity(len + 9);
        Ingredient::frame(Kind::Zip, len, &mut buf);
        buf.extend_from_slice(&compressed);
        Ingredient::from_vec(buf)
    }
}
