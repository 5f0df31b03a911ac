//! The `Cinf` chunk: a cast member's name, script text, and other
//! string-valued metadata, stored as an offset table over an item-data
//! region (the same list-style layout as [`super::cast_list`]).

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Debug, Default)]
pub struct CastInfo {
    pub items: Vec<Vec<u8>>,
}

impl CastInfo {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _data_offset = stream.read_u32().context("can’t read cast info data offset")?;
        let _unused = [stream.read_u32()?, stream.read_u32()?, stream.read_u32()?];
        let _flags = stream.read_u32()?;
        let _unused2 = stream.read_i32()?;
        let count = stream.read_u16().context("can’t read cast info item count")?;

        let mut offsets = Vec::with_capacity(count as usize + 1);
        for _ in 0..=count {
            offsets.push(stream.read_u32()?);
        }

        let mut items = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let len = offsets[i + 1].saturating_sub(offsets[i]) as usize;
            items.push(stream.read_bytes(len)?);
        }

        Ok(Self { items })
    }

    #[must_use]
    pub fn read_pascal_string(&self, index: usize) -> Option<String> {
        let bytes = self.items.get(index)?;
        let len = *bytes.first()? as usize;
        Some(String::from_utf8_lossy(bytes.get(1..=len)?).into_owned())
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.read_pascal_string(0)
    }

    #[must_use]
    pub fn script_text(&self) -> Option<String> {
        self.read_pascal_string(1)
    }
}
