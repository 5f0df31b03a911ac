//! 16-byte GUIDs ("MoaIDs") used to identify compression codecs in a container.

use byteorder::{BigEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Read};

/// A 16-byte globally unique identifier, stored in a container using the
/// classic `{data1-data2-data3-data4}` Microsoft layout.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    pub fn read<R: Read>(input: &mut R) -> io::Result<Self> {
        let data1 = input.read_u32::<BigEndian>()?;
        let data2 = input.read_u16::<BigEndian>()?;
        let data3 = input.read_u16::<BigEndian>()?;
        let mut data4 = [0u8; 8];
        input.read_exact(&mut data4)?;
        Ok(Self { data1, data2, data3, data4 })
    }

    /// The codec this GUID names, if it is one Director recognizes.
    #[must_use]
    pub fn compression_kind(&self) -> CompressionKind {
        if *self == NULL { CompressionKind::None }
        else if *self == ZLIB { CompressionKind::Zlib }
        else if *self == SND { CompressionKind::Snd }
        else if *self == FONTMAP { CompressionKind::FontMap }
        else { CompressionKind::Unknown }
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            self.data1, self.data2, self.data3,
            self.data4[0], self.data4[1],
            self.data4[2], self.data4[3], self.data4[4], self.data4[5], self.data4[6], self.data4[7],
        )
    }
}

/// What a [`Guid`] tells the container reader to do with a resource's bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionKind {
    /// Stored as-is.
    None,
    /// Zlib-deflated; inflate to the recorded uncompressed length.
    Zlib,
    /// An externally-decoded sound payload (`snd ` header + MP3 body).
    Snd,
    /// A placeholder for a version-specific default font map blob.
    FontMap,
    /// Not a codec this crate recognizes; callers should return the bytes raw
    /// and log that the codec went unhandled.
    Unknown,
}

pub const FONTMAP: Guid = Guid::new(0x8A46_79A1, 0x3720, 0x11D0, [0x92, 0x23, 0x00, 0xA0, 0xC9, 0x08, 0x68, 0xB1]);
pub const NULL: Guid = Guid::new(0xAC99_982E, 0x005D, 0x0D50, [0x00, 0x00, 0x08, 0x00, 0x07, 0x37, 0x7A, 0x34]);
pub const SND: Guid = Guid::new(0x7204_A889, 0xAFD0, 0x11CF, [0xA2, 0x22, 0x00, 0xA0, 0x24, 0x53, 0x44, 0x4C]);
pub const ZLIB: Guid = Guid::new(0xAC99_E904, 0x0070, 0x0B36, [0x00, 0x00, 0x08, 0x00, 0x07, 0x37, 0x7A, 0x34]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zlib_and_null_are_distinct() {
        assert_ne!(ZLIB, NULL);
        assert_eq!(ZLIB.compression_kind(), CompressionKind::Zlib);
        assert_eq!(NULL.compression_kind(), CompressionKind::None);
    }

    #[test]
    fn unknown_guid_is_unknown() {
        let weird = Guid::new(1, 2, 3, [4; 8]);
        assert_eq!(weird.compression_kind(), CompressionKind::Unknown);
    }

    #[test]
    fn display_matches_canonical_form() {
        assert_eq!(format!("{}", FONTMAP), "8A4679A1-3720-11D0-9223-00A0C90868B1");
    }
}
