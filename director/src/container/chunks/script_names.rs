//! The `Lnam` chunk: the shared name table a ScriptContext's scripts
//! resolve their handler, variable, and property names through.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Debug, Default)]
pub struct ScriptNames {
    pub names: Vec<String>,
}

impl ScriptNames {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let _unknown0 = stream.read_u32().context("can’t read script names header field")?;
        let _unknown1 = stream.read_u32()?;
        let _len1 = stream.read_u32()?;
        let _len2 = stream.read_u32()?;
        let names_offset = stream.read_u16().context("can’t read names offset")?;
        let count = stream.read_u16().context("can’t read name count")?;
        stream.skip(u64::from(names_offset).saturating_sub(20))?;

        let mut names = Vec::with_capacity(count as usize);
        for _ in 0..count {
            names.push(stream.read_pascal_string().context("can’t read script name")?);
        }

        Ok(Self { names })
    }

    /// Resolves a name id, never failing: an out-of-range id yields a
    /// placeholder string rather than propagating an error, so a handler
    /// whose context is missing entries still decompiles.
    #[must_use]
    pub fn get(&self, id: i16) -> String {
        if id < 0 {
            return format!("UNKNOWN_NAME_{}", id);
        }
        self.names.get(id as usize)
            .cloned()
            .unwrap_or_else(|| format!("UNKNOWN_NAME_{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_id_is_a_placeholder_not_a_panic() {
        let names = ScriptNames { names: vec!["foo".into()] };
        assert_eq!(names.get(0), "foo");
        assert_eq!(names.get(5), "UNKNOWN_NAME_5");
        assert_eq!(names.get(-1), "UNKNOWN_NAME_-1");
    }
}
