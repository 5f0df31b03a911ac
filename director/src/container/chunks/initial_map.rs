//! The `imap` chunk: points at the active memory map.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::{ByteStream, ByteWriter};
use libcommon::Reader;

#[derive(Clone, Copy, Debug, Default)]
pub struct InitialMap {
    pub memory_map_offset: u32,
    pub version: u32,
}

impl InitialMap {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _one = stream.read_u32().context("can’t read imap sentinel")?;
        let memory_map_offset = stream.read_u32().context("can’t read mmap offset")?;
        let version = stream.read_u32().context("can’t read movie version")?;
        let _unused = stream.read_u32()?;
        let _unused = stream.read_u32()?;
        let _unused = stream.read_u32()?;
        Ok(Self { memory_map_offset, version })
    }

    pub fn write(&self, writer: &mut ByteWriter) -> AResult<()> {
        writer.write_u32(1)?;
        writer.write_u32(self.memory_map_offset)?;
        writer.write_u32(self.version)?;
        writer.write_u32(0)?;
        writer.write_u32(0)?;
        writer.write_u32(0)?;
        Ok(())
    }

    #[must_use]
    pub const fn size() -> u32 {
        24
    }
}
