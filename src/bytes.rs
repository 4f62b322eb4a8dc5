//! Binary blobs with a marshal hint.
//!
//! A Binary record's payload is a 4-byte little-endian subtype tag (the
//! marshal hint, opaque to this library) followed by the raw data. Like
//! [`Ingredient`], a `Bytes` either borrows its data or owns it.

use std::borrow::Cow;
use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::marker::Kind;

/// An opaque blob plus its 32-bit marshal hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bytes<'a> {
    marshal_hint: u32,
    data: Cow<'a, [u8]>,
}

impl Default for Bytes<'_> {
    fn default() -> Self {
        Bytes {
            marshal_hint: 0,
            data: Cow::Borrowed(&[]),
        }
    }
}

impl<'a> Bytes<'a> {
    /// An owned blob.
    pub fn new(marshal_hint: u32, data: Vec<u8>) -> Bytes<'static> {
        Bytes {
            marshal_hint,
            data: Cow::Owned(data),
        }
    }

    /// Borrow an existing buffer as blob data.
    pub fn view(marshal_hint: u32, data: &'a [u8]) -> Bytes<'a> {
        Bytes {
            marshal_hint,
            data: Cow::Borrowed(data),
        }
    }

    /// Decode a Binary record without copying the data.
    pub fn view_record(raw: &'a Ingredient<'_>) -> Result<Bytes<'a>> {
        let payload = raw.payload();
        if payload.len() < 4 {
            return Err(Error::LengthTooShort {
                step: "marshal hint",
                actual: payload.len(),
                expected: 4,
            });
        }
        Ok(Bytes {
            marshal_hint: LittleEndian::read_u32(&payload[..4]),
            data: Cow::Borrowed(&payload[4..]),
        })
    }

    /// The caller-interpreted subtype tag.
    pub fn marshal_hint(&self) -> u32 {
        self.marshal_hint
    }

    /// The blob data, hint excluded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the data alone; the 4-byte hint is not counted.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// An owned copy, detached from any borrowed buffer.
    pub fn to_owned(&self) -> Bytes<'static> {
        Bytes {
            marshal_hint: self.marshal_hint,
            data: Cow::Owned(self.data.to_vec()),
        }
    }

    /// Convert into an owned blob, copying only if still borrowed.
    pub fn into_owned(self) -> Bytes<'static> {
        Bytes {
            marshal_hint: self.marshal_hint,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

impl TryFrom<&Ingredient<'_>> for Bytes<'static> {
    type Error = Error;

    fn try_from(raw: &Ingredient) -> Result<Self> {
        Ok(Bytes::view_record(raw)?.to_owned())
    }
}

impl From<&Bytes<'_>> for Ingredient<'static> {
    fn from(val: &Bytes) -> Self {
        let payload_len = val.data.len() + 4;
        let mut buf = Vec::with_capacity(payload_len + 9);
        Ingredient::frame(Kind::Binary, payload_len, &mut buf);
        buf.extend_from_slice(&val.marshal_hint.to_le_bytes());
        buf.extend_from_slice(&val.data);
        Ingredient::from_vec(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BYTES: &[u8] = &[
        0x42, 0x20, // Binary, total 32
        0x01, 0x00, 0x00, 0x00, // marshal hint 1
        6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28,
        29, 30, 31,
    ];

    #[test]
    fn decode_hint_and_data() {
        let raw = Ingredient::view(TEST_BYTES).unwrap();
        let b = Bytes::try_from(&raw).unwrap();
        assert_eq!(b.marshal_hint(), 1);
        assert_eq!(b.len(), 26);
        assert_eq!(b.data(), &TEST_BYTES[6..]);
    }

    #[test]
    fn encode_round_trip() {
        let raw = Ingredient::view(TEST_BYTES).unwrap();
        let b = Bytes::try_from(&raw).unwrap();
        let enc = Ingredient::from(&b);
        assert_eq!(enc.as_bytes(), TEST_BYTES);
    }

    #[test]
    fn borrowed_view_then_owned() {
        let raw = Ingredient::view(TEST_BYTES).unwrap();
        let view = Bytes::view_record(&raw).unwrap();
        let owned = view.to_owned();
        assert_eq!(owned, Bytes::new(1, TEST_BYTES[6..].to_vec()));
    }

    #[test]
    fn empty_blob_is_hint_only() {
        let b = Bytes::new(0, Vec::new());
        let enc = Ingredient::from(&b);
        assert_eq!(enc.as_bytes(), &[0x42, 0x06, 0x00, 0x00, 0x00, 0x00]);

        let dec = Bytes::try_from(&enc).unwrap();
        assert_eq!(dec.marshal_hint(), 0);
        assert!(dec.is_empty());
    }

    #[test]
    fn payload_shorter_than_hint_is_an_error() {
        let bad = [0x42, 0x04, 0x01, 0x00];
        let raw = Ingredient::view(&bad).unwrap();
        assert!(matches!(
            Bytes::try_from(&raw),
            Err(Error::LengthTooShort { .. })
        ));
    }

    #[test]
    fn size_excludes_hint() {
        let b = Bytes::new(0xFFFF00FF, vec![1, 2, 3]);
        assert_eq!(b.len(), 3);
        let enc = Ingredient::from(&b);
        assert_eq!(enc.size(), 2 + 4 + 3);
        assert_eq!(Bytes::try_from(&enc).unwrap().len(), 3);
    }
}
