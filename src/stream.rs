//! Reading and writing records over `std::io` streams.
//!
//! Records are self-delimiting, so a stream is just a concatenation of
//! them. Reading peeks the marker, reads the length field the marker calls
//! for, then reads the rest of the record into an exactly-sized buffer.

use std::io::{ErrorKind, Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::marker::SizeClass;

/// Read one record from a byte stream.
///
/// Returns `Ok(None)` on a clean end-of-stream before any record bytes;
/// a stream that ends mid-record is a hard error.
pub fn read_ingredient<R: Read>(reader: &mut R) -> Result<Option<Ingredient<'static>>> {
    let mut scratch = [0u8; 9];
    match reader.read_exact(&mut scratch[..1]) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let sc = SizeClass::from_marker(scratch[0]);
    reader.read_exact(&mut scratch[1..sc.header_width()])?;
    let total = match sc {
        SizeClass::Zero => 1,
        SizeClass::One => scratch[1] as u64,
        SizeClass::Two => LittleEndian::read_u16(&scratch[1..3]) as u64,
        SizeClass::Eight => LittleEndian::read_u64(&scratch[1..9]),
    };
    let header = sc.header_width();
    if total < header as u64 {
        return Err(Error::BadEncode(format!(
            "record length {} is smaller than its {}-byte header",
            total, header
        )));
    }

    let mut buf = vec![0u8; total as usize];
    buf[..header].copy_from_slice(&scratch[..header]);
    reader.read_exact(&mut buf[header..])?;
    Ingredient::adopt(buf).map(Some)
}

/// Write one record's full byte image.
pub fn write_ingredient<W: Write>(writer: &mut W, val: &Ingredient) -> Result<()> {
    writer.write_all(val.as_bytes())?;
    Ok(())
}
