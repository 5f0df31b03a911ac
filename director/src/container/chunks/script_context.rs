//! The `Lctx`/`LctX` chunk: a cast's script section map, binding each
//! script slot to a `Lscr` chunk id and to the shared `Lnam` names table.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Copy, Debug)]
pub struct ScriptContextMapEntry {
    pub unknown0: i32,
    pub section_id: i32,
    pub unknown1: i16,
    pub unknown2: i16,
}

#[derive(Clone, Debug, Default)]
pub struct ScriptContext {
    pub entries: Vec<ScriptContextMapEntry>,
    pub lnam_section_id: i32,
}

impl ScriptContext {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _unknown0 = stream.read_i32().context("can’t read script context header field")?;
        let _unknown1 = stream.read_i32()?;
        let entry_count = stream.read_i32().context("can’t read script context entry count")?;
        let _entries_used = stream.read_i32()?;
        let _entry_size = stream.read_i16()?;
        let _entries_offset = stream.read_i32()?;
        let _unknown2 = stream.read_i16()?;
        let _unknown3 = stream.read_i32()?;
        let _unknown4 = stream.read_i32()?;
        let _unknown5 = stream.read_i32()?;
        let _case_insensitive = stream.read_i32()?;
        let _factory_name_offset = stream.read_i32()?;
        let lnam_section_id = stream.read_i32().context("can’t read lnam section id")?;
        let _validation_name_count = stream.read_i16()?;

        let mut entries = Vec::with_capacity(entry_count.max(0) as usize);
        for _ in 0..entry_count {
            let unknown0 = stream.read_i32()?;
            let section_id = stream.read_i32()?;
            let unknown1 = stream.read_i16()?;
            let unknown2 = stream.read_i16()?;
            entries.push(ScriptContextMapEntry { unknown0, section_id, unknown1, unknown2 });
        }

        Ok(Self { entries, lnam_section_id })
    }

    /// The `Lscr` chunk id for script slot `index`, or `None` if that slot
    /// is unused (section id `< 0`).
    #[must_use]
    pub fn script_chunk_id(&self, index: usize) -> Option<i32> {
        self.entries.get(index).and_then(|e| if e.section_id >= 0 { Some(e.section_id) } else { None })
    }
}
