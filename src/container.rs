//! Ordered composites: Container and Library.
//!
//! A Container's payload is a back-to-back run of child records; a Library
//! is the same wire shape restricted to String children and surfaced as a
//! list of owned strings. Both deep-copy on decode, so the decoded value
//! stays alive after the source buffer is gone.

use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::marker::{Kind, SizeClass};

/// An ordered sequence of arbitrary child records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    children: Vec<Ingredient<'static>>,
}

impl Container {
    /// An empty container.
    pub fn new() -> Container {
        Container::default()
    }

    /// The child records, in order.
    pub fn children(&self) -> &[Ingredient<'static>] {
        &self.children
    }

    /// Mutable access for building and editing.
    pub fn children_mut(&mut self) -> &mut Vec<Ingredient<'static>> {
        &mut self.children
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The child at `index`, or the shared Null sentinel when out of range.
    pub fn get(&self, index: u32) -> &Ingredient<'static> {
        self.children
            .get(index as usize)
            .unwrap_or(Ingredient::not_found())
    }
}

impl From<Vec<Ingredient<'static>>> for Container {
    fn from(children: Vec<Ingredient<'static>>) -> Self {
        Container { children }
    }
}

impl TryFrom<&Ingredient<'_>> for Container {
    type Error = Error;

    /// Decode the children out of a raw record's payload. Children are
    /// deep-copied; a child claiming more bytes than remain is an error.
    fn try_from(raw: &Ingredient) -> Result<Self> {
        let mut children = Vec::new();
        let mut rest = raw.payload();
        while !rest.is_empty() {
            let child = Ingredient::copy_from(rest)?;
            rest = &rest[child.size()..];
            children.push(child);
        }
        Ok(Container { children })
    }
}

impl From<&Container> for Ingredient<'static> {
    fn from(val: &Container) -> Self {
        let payload_len: usize = val.children.iter().map(|c| c.size()).sum();
        let mut buf = Vec::with_capacity(payload_len + 9);
        Ingredient::frame(Kind::Container, payload_len, &mut buf);
        for child in &val.children {
            buf.extend_from_slice(child.as_bytes());
        }
        Ingredient::from_vec(buf)
    }
}

/// An ordered sequence of strings: the Container shape with every child a
/// String record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Library {
    entries: Vec<String>,
}

impl Library {
    /// An empty library.
    pub fn new() -> Library {
        Library::default()
    }

    /// The entries, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Mutable access for building and editing.
    pub fn entries_mut(&mut self) -> &mut Vec<String> {
        &mut self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`, if in range.
    pub fn get(&self, index: u32) -> Option<&str> {
        self.entries.get(index as usize).map(String::as_str)
    }
}

impl From<Vec<String>> for Library {
    fn from(entries: Vec<String>) -> Self {
        Library { entries }
    }
}

impl TryFrom<&Ingredient<'_>> for Library {
    type Error = Error;

    fn try_from(raw: &Ingredient) -> Result<Self> {
        let mut entries = Vec::new();
        let mut rest = raw.payload();
        while !rest.is_empty() {
            let child = Ingredient::view(rest)?;
            if child.kind()? != Kind::String {
                return Err(Error::BadEncode(format!(
                    "library child {} is not a string",
                    entries.len()
                )));
            }
            let entry = std::str::from_utf8(child.payload())
                .map_err(|_| Error::BadEncode("library string is not valid UTF-8".into()))?;
            entries.push(entry.to_string());
            rest = &rest[child.size()..];
        }
        Ok(Library { entries })
    }
}

impl From<&Library> for Ingredient<'static> {
    fn from(val: &Library) -> Self {
        let payload_len: usize = val
            .entries
            .iter()
            .map(|e| e.len() + SizeClass::for_payload(e.len() as u64).header_width())
            .sum();
        let mut buf = Vec::with_capacity(payload_len + 9);
        Ingredient::frame(Kind::Library, payload_len, &mut buf);
        for entry in &val.entries {
            Ingredient::frame(Kind::String, entry.len(), &mut buf);
            buf.extend_from_slice(entry.as_bytes());
        }
        Ingredient::from_vec(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONTAINER: &[u8] = &[
        0x43, 0x25, // Container, total 37
        0x73, 0x09, b'T', b'e', b's', b't', b'i', b'n', b'g', // "Testing"
        0x73, 0x0A, b'T', b'e', b's', b't', b'i', b'n', b'g', b'.', // "Testing."
        0x73, 0x07, b'T', b'h', b'i', b'r', b'd', // "Third"
        0x30, // False
        0x31, // True
        0x3F, // Null
        0x69, 0x06, 0xF0, 0xF0, 0xF0, 0xF1, // Int32
    ];

    const TEST_LIBRARY: &[u8] = &[
        0x4C, 0x1C, // Library, total 28
        0x73, 0x09, b'T', b'e', b's', b't', b'i', b'n', b'g',
        0x73, 0x0A, b'T', b'e', b's', b't', b'i', b'n', b'g', b'.',
        0x73, 0x07, b'T', b'h', b'i', b'r', b'd',
    ];

    #[test]
    fn decode_mixed_children() {
        let raw = Ingredient::view(TEST_CONTAINER).unwrap();
        let c = Container::try_from(&raw).unwrap();

        assert_eq!(c.len(), 7);
        assert_eq!(c.get(0).to_text(), "Testing");
        assert_eq!(c.get(1).to_text(), "Testing.");
        assert_eq!(c.get(2).to_text(), "Third");
        assert_eq!(c.get(3).kind().unwrap(), Kind::False);
        assert_eq!(c.get(4).kind().unwrap(), Kind::True);
        assert!(c.get(5).is_null());
        assert_eq!(c.get(6).to_i32(), 0xF1F0F0F0u32 as i32);
    }

    #[test]
    fn children_outlive_source_buffer() {
        let buf = TEST_CONTAINER.to_vec();
        let c = {
            let raw = Ingredient::view(&buf).unwrap();
            Container::try_from(&raw).unwrap()
        };
        drop(buf);
        assert!(c.children().iter().all(|i| i.is_owned()));
        assert_eq!(c.get(0).to_text(), "Testing");
    }

    #[test]
    fn encode_round_trip() {
        let raw = Ingredient::view(TEST_CONTAINER).unwrap();
        let c = Container::try_from(&raw).unwrap();
        let out = Ingredient::from(&c);
        assert_eq!(out.as_bytes(), TEST_CONTAINER);
    }

    #[test]
    fn lookup_out_of_range_is_null() {
        let raw = Ingredient::view(TEST_CONTAINER).unwrap();
        let c = Container::try_from(&raw).unwrap();
        assert!(c.get(7).is_null());
        assert!(c.get(u32::MAX).is_null());
    }

    #[test]
    fn child_overshoot_is_an_error() {
        // Container claims 5 total bytes, but the child string claims 9.
        let bad = [0x43, 0x05, 0x73, 0x09, b'T'];
        let raw = Ingredient::view(&bad).unwrap();
        assert!(Container::try_from(&raw).is_err());
    }

    #[test]
    fn build_and_encode() {
        let mut c = Container::new();
        c.children_mut().push(Ingredient::from("abc"));
        c.children_mut().push(Ingredient::from(true));
        c.children_mut().push(Ingredient::null());

        let enc = Ingredient::from(&c);
        assert_eq!(enc.kind().unwrap(), Kind::Container);
        let dec = Container::try_from(&enc).unwrap();
        assert_eq!(dec, c);
    }

    #[test]
    fn empty_container_is_marker_only() {
        let enc = Ingredient::from(&Container::new());
        assert_eq!(enc.as_bytes(), &[0x03]);
        assert_eq!(Container::try_from(&enc).unwrap().len(), 0);
    }

    #[test]
    fn library_decode() {
        let raw = Ingredient::view(TEST_LIBRARY).unwrap();
        let l = Library::try_from(&raw).unwrap();
        assert_eq!(l.entries(), &["Testing", "Testing.", "Third"]);
        assert_eq!(l.get(2), Some("Third"));
        assert_eq!(l.get(3), None);
    }

    #[test]
    fn library_encode_exact_bytes() {
        let l = Library::from(vec![
            "Testing".to_string(),
            "Testing.".to_string(),
            "Third".to_string(),
        ]);
        let enc = Ingredient::from(&l);
        assert_eq!(enc.as_bytes(), TEST_LIBRARY);
    }

    #[test]
    fn library_rejects_non_string_child() {
        // A True record where a string should be.
        let bad = [0x4C, 0x03, 0x31];
        let raw = Ingredient::view(&bad).unwrap();
        assert!(matches!(
            Library::try_from(&raw),
            Err(Error::BadEncode(_))
        ));
    }

    #[test]
    fn library_rejects_invalid_utf8() {
        let bad = [0x4C, 0x06, 0x73, 0x04, 0xFF, 0xFE];
        let raw = Ingredient::view(&bad).unwrap();
        assert!(Library::try_from(&raw).is_err());
    }
}
