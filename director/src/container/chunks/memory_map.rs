//! The `mmap` chunk: a sparse, free-list-threaded array of chunk entries.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::{ByteStream, ByteWriter};
use libcommon::Reader;

bitflags::bitflags! {
    pub struct MemoryMapEntryFlags: u16 {
        const DIRTY = 0x01;
        const VALID = 0x04;
        const FREE  = 0x08;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MemoryMapEntry {
    pub four_cc: u32,
    pub len: u32,
    pub offset: u32,
    pub flags: u16,
    pub reserved: i16,
    pub next: i32,
}

impl MemoryMapEntry {
    #[must_use]
    pub fn free() -> Self {
        Self { four_cc: u32::from_be_bytes(*b"free"), len: 0, offset: 0, flags: 12, reserved: 0, next: 0 }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.four_cc.to_be_bytes() == *b"free" || self.four_cc.to_be_bytes() == *b"junk"
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryMap {
    pub entries: Vec<MemoryMapEntry>,
    pub junk_head: i32,
    pub free_head: i32,
}

impl MemoryMap {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _header_len = stream.read_u16().context("can’t read mmap header length")?;
        let _entry_len = stream.read_u16().context("can’t read mmap entry length")?;
        let max_entries = stream.read_u32().context("can’t read mmap capacity")?;
        let _used_entries = stream.read_u32().context("can’t read mmap used count")?;
        let junk_head = stream.read_i32().context("can’t read mmap junk head")?;
        let _garbage = stream.read_i32()?;
        let free_head = stream.read_i32().context("can’t read mmap free head")?;

        let mut entries = Vec::with_capacity(max_entries as usize);
        for _ in 0..max_entries {
            let four_cc = stream.read_four_cc()?;
            let len = stream.read_u32()?;
            let offset = stream.read_u32()?;
            let flags = stream.read_u16()?;
            let reserved = stream.read_i16()?;
            let next = stream.read_i32()?;
            entries.push(MemoryMapEntry { four_cc, len, offset, flags, reserved, next });
        }

        Ok(Self { entries, junk_head, free_head })
    }

    pub fn write(&self, writer: &mut ByteWriter) -> AResult<()> {
        writer.write_u16(24)?;
        writer.write_u16(20)?;
        writer.write_u32(self.entries.len() as u32)?;
        let used = self.entries.iter().filter(|e| !e.is_free()).count() as u32;
        writer.write_u32(used)?;
        writer.write_i32(self.junk_head)?;
        writer.write_i32(0)?;
        writer.write_i32(self.free_head)?;
        for entry in &self.entries {
            writer.write_four_cc(entry.four_cc)?;
            writer.write_u32(entry.len)?;
            writer.write_u32(entry.offset)?;
            writer.write_u16(entry.flags)?;
            writer.write_i16(entry.reserved)?;
            writer.write_i32(entry.next)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        24 + 20 * self.entries.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_entry_is_recognized_by_four_cc() {
        assert!(MemoryMapEntry::free().is_free());
    }
}
