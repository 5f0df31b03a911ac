//! The `KEY*` chunk: binds chunks to their owning cast member or cast.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Copy, Debug)]
pub struct KeyTableEntry {
    pub section_id: i32,
    pub cast_id: i32,
    pub four_cc: u32,
}

#[derive(Clone, Debug, Default)]
pub struct KeyTable {
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTable {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let header_len = stream.read_u16().context("can’t read key table header length")?;
        let _entry_len = stream.read_u16().context("can’t read key table entry length")?;
        let _capacity = stream.read_u32().context("can’t read key table capacity")?;
        let used_entries = stream.read_u32().context("can’t read key table used count")?;
        stream.skip(u64::from(header_len).saturating_sub(12))?;

        let mut entries = Vec::with_capacity(used_entries as usize);
        for _ in 0..used_entries {
            let section_id = stream.read_i32()?;
            let cast_id = stream.read_i32()?;
            let four_cc = stream.read_four_cc()?;
            entries.push(KeyTableEntry { section_id, cast_id, four_cc });
        }

        Ok(Self { entries })
    }

    /// Finds the chunk id bound to `cast_id` with the given role four-cc
    /// (e.g. a script context attached to a cast member).
    #[must_use]
    pub fn find(&self, cast_id: i32, four_cc: u32) -> Option<i32> {
        self.entries.iter()
            .find(|e| e.cast_id == cast_id && e.four_cc == four_cc)
            .map(|e| e.section_id)
    }
}
