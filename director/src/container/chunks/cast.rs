//! The `CAS*` chunk: the ordered list of cast member chunk ids belonging to
//! one cast library.

use anyhow::{Context as _, Result as AResult};

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Debug, Default)]
pub struct Cast {
    pub member_ids: Vec<i32>,
}

impl Cast {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let mut member_ids = Vec::new();
        while !stream.eof().context("can’t check cast chunk length")? {
            member_ids.push(stream.read_i32()?);
        }
        Ok(Self { member_ids })
    }
}
