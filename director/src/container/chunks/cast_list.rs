//! The `MCsL` cast list chunk: one entry per cast library attached to the
//! movie.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Debug)]
pub struct CastListEntry {
    pub name: String,
    pub file_path: String,
    pub preload_settings: i16,
    pub min_member: i16,
    pub max_member: i16,
    pub id: i32,
}

#[derive(Clone, Debug, Default)]
pub struct CastList {
    pub entries: Vec<CastListEntry>,
}

impl CastList {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _data_offset = stream.read_u32().context("can’t read cast list data offset")?;
        let count = stream.read_u16().context("can’t read cast list count")?;
        let _items_len = stream.read_u16().context("can’t read cast list item table length")?;

        let mut offsets = Vec::with_capacity(count as usize);
        for _ in 0..=count {
            offsets.push(stream.read_u32()?);
        }

        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let len = offsets[i + 1].saturating_sub(offsets[i]);
            let item_end = stream.pos()? + u64::from(len);
            let name = stream.read_pascal_string().unwrap_or_default();
            let file_path = stream.read_pascal_string().unwrap_or_default();
            let preload_settings = stream.read_i16().unwrap_or_default();
            let min_member = stream.read_i16().unwrap_or_default();
            let max_member = stream.read_i16().unwrap_or_default();
            let id = stream.read_i32().unwrap_or_default();
            stream.seek(std::io::SeekFrom::Start(item_end)).ok();
            entries.push(CastListEntry { name, file_path, preload_settings, min_member, max_member, id });
        }

        Ok(Self { entries })
    }
}
