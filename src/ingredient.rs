//! The primitive record carrier.
//!
//! An [`Ingredient`] is one encoded wire record: a type-marker byte, an
//! optional little-endian length field, and a payload. It either borrows a
//! caller's buffer (zero-copy inspection) or owns its bytes outright;
//! composite decoders always hand out owned children, so a decoded tree
//! outlives the buffer it came from.

use std::borrow::Cow;
use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::marker::{type_marker, Kind, SizeClass};

const NULL_RECORD: [u8; 1] = [0x3F];

static NOT_FOUND: Ingredient<'static> = Ingredient {
    bytes: Cow::Borrowed(&NULL_RECORD),
};

/// Read the total record length claimed by the header at the front of
/// `buf`. Checks only that the header itself is present and sane.
fn record_size(buf: &[u8]) -> Result<u64> {
    if buf.is_empty() {
        return Err(Error::LengthTooShort {
            step: "record marker",
            actual: 0,
            expected: 1,
        });
    }
    let sc = SizeClass::from_marker(buf[0]);
    let header = sc.header_width();
    if buf.len() < header {
        return Err(Error::LengthTooShort {
            step: "record length",
            actual: buf.len(),
            expected: header,
        });
    }
    let total = match sc {
        SizeClass::Zero => 1,
        SizeClass::One => buf[1] as u64,
        SizeClass::Two => LittleEndian::read_u16(&buf[1..3]) as u64,
        SizeClass::Eight => LittleEndian::read_u64(&buf[1..9]),
    };
    if total < header as u64 {
        return Err(Error::BadEncode(format!(
            "record length {} is smaller than its {}-byte header",
            total, header
        )));
    }
    Ok(total)
}

/// A single wire record, borrowed or owned.
#[derive(Clone)]
pub struct Ingredient<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> Ingredient<'a> {
    /// Wrap a record sitting at the front of `buf` without copying it.
    ///
    /// The slice must hold at least one complete record; trailing bytes are
    /// ignored. The record is not validated beyond its own header.
    pub fn view(buf: &'a [u8]) -> Result<Ingredient<'a>> {
        let total = record_size(buf)?;
        if (buf.len() as u64) < total {
            return Err(Error::LengthTooShort {
                step: "record body",
                actual: buf.len(),
                expected: total as usize,
            });
        }
        Ok(Ingredient {
            bytes: Cow::Borrowed(&buf[..total as usize]),
        })
    }

    /// Copy the record at the front of `buf` into an owned Ingredient.
    pub fn copy_from(buf: &[u8]) -> Result<Ingredient<'static>> {
        Ok(Ingredient::view(buf)?.into_owned())
    }

    /// Take ownership of a buffer holding exactly one encoded record.
    pub fn adopt(bytes: Vec<u8>) -> Result<Ingredient<'static>> {
        let total = record_size(&bytes)?;
        if total != bytes.len() as u64 {
            return Err(Error::BadEncode(format!(
                "adopted buffer is {} bytes but its record length is {}",
                bytes.len(),
                total
            )));
        }
        Ok(Ingredient {
            bytes: Cow::Owned(bytes),
        })
    }

    /// The one-byte Null record.
    pub fn null() -> Ingredient<'static> {
        Ingredient {
            bytes: Cow::Borrowed(&NULL_RECORD),
        }
    }

    /// The shared not-found sentinel returned by container and map lookups.
    ///
    /// It is a Null record; callers that must distinguish "absent" from a
    /// stored Null use `contains_key` or `len` on the composite instead.
    pub fn not_found() -> &'static Ingredient<'static> {
        &NOT_FOUND
    }

    /// The leading type-marker byte.
    pub fn marker(&self) -> u8 {
        self.bytes[0]
    }

    /// The record's size class, from the marker's top two bits.
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_marker(self.marker())
    }

    /// The record's kind, from the marker's bottom six bits.
    pub fn kind(&self) -> Result<Kind> {
        Kind::from_u8(self.marker()).ok_or(Error::UnknownKind(self.marker()))
    }

    /// Total record length in bytes, header included.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// The bytes after the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.size_class().header_width()..]
    }

    /// The full encoded record.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether this Ingredient owns its bytes.
    pub fn is_owned(&self) -> bool {
        matches!(self.bytes, Cow::Owned(_))
    }

    /// An owned copy, detached from any borrowed buffer.
    pub fn to_owned(&self) -> Ingredient<'static> {
        Ingredient {
            bytes: Cow::Owned(self.bytes.to_vec()),
        }
    }

    /// Convert into an owned Ingredient, copying only if still borrowed.
    pub fn into_owned(self) -> Ingredient<'static> {
        Ingredient {
            bytes: Cow::Owned(self.bytes.into_owned()),
        }
    }

    /// Append a marker and length field for a record carrying
    /// `payload_len` payload bytes. The length field stores the low bytes
    /// of the total record size, per the wire rules.
    pub(crate) fn frame(kind: Kind, payload_len: usize, buf: &mut Vec<u8>) {
        let sc = SizeClass::for_payload(payload_len as u64);
        buf.push(type_marker(sc, kind));
        let total = (payload_len + sc.header_width()) as u64;
        buf.extend_from_slice(&total.to_le_bytes()[..sc.length_bytes()]);
    }

    /// Build an owned record from a kind and its payload bytes.
    pub(crate) fn from_payload(kind: Kind, payload: &[u8]) -> Ingredient<'static> {
        let mut buf = Vec::with_capacity(payload.len() + 9);
        Ingredient::frame(kind, payload.len(), &mut buf);
        buf.extend_from_slice(payload);
        Ingredient {
            bytes: Cow::Owned(buf),
        }
    }

    /// Wrap a buffer the encoders just framed. Internal, trusted.
    pub(crate) fn from_vec(buf: Vec<u8>) -> Ingredient<'static> {
        Ingredient {
            bytes: Cow::Owned(buf),
        }
    }

    fn fixed_payload(&self, kind: Kind, width: usize) -> Option<&[u8]> {
        match self.kind() {
            Ok(k) if k == kind && self.payload().len() == width => Some(self.payload()),
            _ => None,
        }
    }

    /// True iff the record is a Null.
    pub fn is_null(&self) -> bool {
        matches!(self.kind(), Ok(Kind::Null))
    }

    /// Relaxed boolean coercion: Null and False are false, integer kinds
    /// test nonzero, everything else is true.
    pub fn to_bool(&self) -> bool {
        match self.kind() {
            Ok(Kind::Null) | Ok(Kind::False) => false,
            Ok(Kind::Int32) => self.to_i32() != 0,
            Ok(Kind::Int64) => self.to_i64() != 0,
            Ok(Kind::UInt64) => self.to_u64() != 0,
            _ => true,
        }
    }

    /// The Float payload, or 0.0 for any other kind.
    pub fn to_f64(&self) -> f64 {
        self.fixed_payload(Kind::Float, 8)
            .map(LittleEndian::read_f64)
            .unwrap_or(0.0)
    }

    /// The Int32 payload, or 0 for any other kind.
    pub fn to_i32(&self) -> i32 {
        self.fixed_payload(Kind::Int32, 4)
            .map(LittleEndian::read_i32)
            .unwrap_or(0)
    }

    /// The Int64 payload, or 0 for any other kind.
    pub fn to_i64(&self) -> i64 {
        self.fixed_payload(Kind::Int64, 8)
            .map(LittleEndian::read_i64)
            .unwrap_or(0)
    }

    /// The UInt64 payload, or 0 for any other kind.
    pub fn to_u64(&self) -> u64 {
        self.fixed_payload(Kind::UInt64, 8)
            .map(LittleEndian::read_u64)
            .unwrap_or(0)
    }

    /// Unpack a Flags payload into one bool per bit, or an empty vector for
    /// any other kind.
    ///
    /// The wire stores whole bytes, so the reconstructed length is always a
    /// multiple of eight; callers that need the exact bit count carry it
    /// out-of-band.
    pub fn to_flags(&self) -> Vec<bool> {
        if !matches!(self.kind(), Ok(Kind::Flags)) {
            return Vec::new();
        }
        let payload = self.payload();
        let mut flags = Vec::with_capacity(payload.len() * 8);
        for i in 0..payload.len() * 8 {
            flags.push(payload[i >> 3] & (1 << (i & 7)) != 0);
        }
        flags
    }

    /// A textual rendering: canonical words for Null/True/False, decimal
    /// for the numeric kinds, the (lossily decoded) payload for String,
    /// and empty for everything else.
    pub fn to_text(&self) -> String {
        match self.kind() {
            Ok(Kind::Null) => "null".to_string(),
            Ok(Kind::True) => "true".to_string(),
            Ok(Kind::False) => "false".to_string(),
            Ok(Kind::Float) => self.to_f64().to_string(),
            Ok(Kind::Int32) => self.to_i32().to_string(),
            Ok(Kind::Int64) => self.to_i64().to_string(),
            Ok(Kind::UInt64) => self.to_u64().to_string(),
            Ok(Kind::String) => String::from_utf8_lossy(self.payload()).into_owned(),
            _ => String::new(),
        }
    }
}

impl Default for Ingredient<'_> {
    fn default() -> Self {
        Ingredient::null()
    }
}

impl<'a, 'b> PartialEq<Ingredient<'b>> for Ingredient<'a> {
    fn eq(&self, other: &Ingredient<'b>) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Ingredient<'_> {}

impl fmt::Debug for Ingredient<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let header = self.size_class().header_width();
        write!(f, "Ingredient[{:02X} {{", self.marker())?;
        for b in &self.bytes[1..header] {
            write!(f, " {:02X}", b)?;
        }
        write!(f, " }}")?;
        for b in &self.bytes[header..] {
            write!(f, " {:02X}", b)?;
        }
        write!(f, "]")
    }
}

impl From<bool> for Ingredient<'static> {
    fn from(val: bool) -> Self {
        let kind = if val { Kind::True } else { Kind::False };
        Ingredient::from_payload(kind, &[])
    }
}

macro_rules! impl_from_scalar {
    ($t:ty, $kind:expr) => {
        impl From<$t> for Ingredient<'static> {
            fn from(val: $t) -> Self {
                Ingredient::from_payload($kind, &val.to_le_bytes())
            }
        }
    };
}

impl_from_scalar!(f64, Kind::Float);
impl_from_scalar!(i32, Kind::Int32);
impl_from_scalar!(i64, Kind::Int64);
impl_from_scalar!(u64, Kind::UInt64);

impl From<&str> for Ingredient<'static> {
    fn from(val: &str) -> Self {
        Ingredient::from_payload(Kind::String, val.as_bytes())
    }
}

impl From<&String> for Ingredient<'static> {
    fn from(val: &String) -> Self {
        Ingredient::from(val.as_str())
    }
}

impl From<&[bool]> for Ingredient<'static> {
    fn from(val: &[bool]) -> Self {
        let mut payload = vec![0u8; (val.len() + 7) / 8];
        for (i, &flag) in val.iter().enumerate() {
            if flag {
                payload[i >> 3] |= 1 << (i & 7);
            }
        }
        Ingredient::from_payload(Kind::Flags, &payload)
    }
}
