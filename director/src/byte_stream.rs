//! Endian-aware cursor over container bytes, plus the handful of encodings
//! that show up only in Director files: Apple SANE extended floats and the
//! afterburner format's 7-bit continuation varints.

use anyhow::{Context as _, Result as AResult};
use byteordered::{ByteOrdered, Endianness};
use libcommon::{Reader, SeekExt};
use std::convert::TryInto;
use std::io::{Cursor, SeekFrom};

/// A cursor over an in-memory chunk body with a selectable byte order.
///
/// Lingo bytecode and literal payloads are always big-endian regardless of
/// the container's own endianness, so callers read those through
/// [`ByteStream::big_endian`] rather than relying on the stream's default.
pub struct ByteStream<T: Reader> {
    input: ByteOrdered<T, Endianness>,
}

impl ByteStream<Cursor<Vec<u8>>> {
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>, endianness: Endianness) -> Self {
        Self { input: ByteOrdered::new(Cursor::new(bytes), endianness) }
    }
}

impl<T: Reader> ByteStream<T> {
    pub fn new(input: T, endianness: Endianness) -> Self {
        Self { input: ByteOrdered::new(input, endianness) }
    }

    #[must_use]
    pub fn endianness(&self) -> Endianness {
        self.input.endianness()
    }

    pub fn pos(&mut self) -> AResult<u64> {
        Ok(self.input.pos()?)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> AResult<u64> {
        Ok(self.input.seek(pos)?)
    }

    pub fn skip(&mut self, len: u64) -> AResult<u64> {
        Ok(self.input.skip(len)?)
    }

    pub fn eof(&mut self) -> AResult<bool> {
        Ok(self.input.bytes_left()? == 0)
    }

    pub fn read_u8(&mut self) -> AResult<u8> {
        self.input.read_u8().context("can’t read u8")
    }

    pub fn read_i8(&mut self) -> AResult<i8> {
        self.input.read_i8().context("can’t read i8")
    }

    pub fn read_u16(&mut self) -> AResult<u16> {
        self.input.read_u16().context("can’t read u16")
    }

    pub fn read_i16(&mut self) -> AResult<i16> {
        self.input.read_i16().context("can’t read i16")
    }

    pub fn read_u32(&mut self) -> AResult<u32> {
        self.input.read_u32().context("can’t read u32")
    }

    pub fn read_i32(&mut self) -> AResult<i32> {
        self.input.read_i32().context("can’t read i32")
    }

    pub fn read_f64(&mut self) -> AResult<f64> {
        self.input.read_f64().context("can’t read f64")
    }

    /// Reads a big-endian 10-byte Apple SANE extended float, as used by
    /// floating point literal data and some resource formats.
    pub fn read_f80_apple(&mut self) -> AResult<f64> {
        let mut bytes = [0u8; 10];
        self.input.read_exact(&mut bytes).context("can’t read extended float")?;
        Ok(apple_f80_to_f64(&bytes))
    }

    /// Reads a 7-bit continuation varint (MSB-first groups, terminated by a
    /// byte whose top bit is clear), as used throughout the afterburner
    /// directory and initial load segment.
    pub fn read_varint(&mut self) -> AResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..5 {
            let byte = self.read_u8()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        anyhow::bail!("varint did not terminate within 5 bytes")
    }

    pub fn read_bytes(&mut self, len: usize) -> AResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.input.read_exact(&mut buf).with_context(|| format!("can’t read {} bytes", len))?;
        Ok(buf)
    }

    pub fn read_string(&mut self, len: usize) -> AResult<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// A Pascal string: a one-byte length prefix followed by that many bytes.
    pub fn read_pascal_string(&mut self) -> AResult<String> {
        let len = self.read_u8()?;
        self.read_string(len.into())
    }

    /// A NUL-terminated C string, bounded to avoid runaway reads on garbage
    /// input.
    pub fn read_c_string(&mut self) -> AResult<String> {
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            if bytes.len() > 64 * 1024 {
                anyhow::bail!("C string exceeded 64 KiB without a NUL terminator");
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn read_four_cc(&mut self) -> AResult<u32> {
        // FourCCs are always big-endian regardless of stream endianness.
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes(bytes.as_slice().try_into().unwrap()))
    }

    pub fn into_inner(self) -> T {
        self.input.into_inner()
    }
}

/// Writer half of the same cursor, built on a growable buffer.
pub struct ByteWriter {
    output: ByteOrdered<Cursor<Vec<u8>>, Endianness>,
}

impl ByteWriter {
    #[must_use]
    pub fn new(endianness: Endianness) -> Self {
        Self { output: ByteOrdered::new(Cursor::new(Vec::new()), endianness) }
    }

    pub fn write_u8(&mut self, value: u8) -> AResult<()> {
        Ok(self.output.write_u8(value)?)
    }

    pub fn write_u16(&mut self, value: u16) -> AResult<()> {
        Ok(self.output.write_u16(value)?)
    }

    pub fn write_i16(&mut self, value: i16) -> AResult<()> {
        Ok(self.output.write_i16(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> AResult<()> {
        Ok(self.output.write_u32(value)?)
    }

    pub fn write_i32(&mut self, value: i32) -> AResult<()> {
        Ok(self.output.write_i32(value)?)
    }

    pub fn write_four_cc(&mut self, value: u32) -> AResult<()> {
        self.output.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> AResult<()> {
        self.output.write_all(bytes)?;
        Ok(())
    }

    pub fn pos(&mut self) -> AResult<u64> {
        Ok(self.output.pos()?)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> AResult<u64> {
        Ok(self.output.seek(pos)?)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.output.into_inner().into_inner()
    }
}

/// Decodes a big-endian 80-bit Apple SANE extended float (1 sign bit, 15
/// exponent bits, 64-bit integer-part mantissa with an explicit leading bit).
#[must_use]
pub fn apple_f80_to_f64(bytes: &[u8; 10]) -> f64 {
    let sign = if bytes[0] & 0x80 != 0 { -1.0 } else { 1.0 };
    let exponent = (u16::from(bytes[0] & 0x7F) << 8 | u16::from(bytes[1])) as i32 - 16383;
    let mantissa = u64::from_be_bytes(bytes[2..10].try_into().unwrap());
    if exponent == -16383 && mantissa == 0 {
        return 0.0;
    }
    sign * (mantissa as f64) * 2f64.powi(exponent - 63)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_reads_multi_byte_value() {
        // 300 = 0b1_0010_1100 -> groups [0b10, 0b0101100] with continuation
        let mut stream = ByteStream::from_vec(vec![0x82, 0x2C], Endianness::Big);
        assert_eq!(stream.read_varint().unwrap(), 300);
    }

    #[test]
    fn varint_reads_single_byte_value() {
        let mut stream = ByteStream::from_vec(vec![0x05], Endianness::Big);
        assert_eq!(stream.read_varint().unwrap(), 5);
    }

    #[test]
    fn four_cc_is_always_big_endian() {
        let mut stream = ByteStream::from_vec(b"RIFX".to_vec(), Endianness::Little);
        assert_eq!(stream.read_four_cc().unwrap(), 0x5249_4658);
    }

    #[test]
    fn apple_f80_decodes_one() {
        // 1.0 as SANE extended: sign=0, exponent=16383 (biased), mantissa = 1<<63
        let bytes = [0x3F, 0xFF, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!((apple_f80_to_f64(&bytes) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pascal_string_round_trips_length() {
        let mut stream = ByteStream::from_vec(vec![3, b'c', b'a', b't'], Endianness::Big);
        assert_eq!(stream.read_pascal_string().unwrap(), "cat");
    }
}
