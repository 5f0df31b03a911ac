//! Typed chunk codecs: read/size/write for each chunk kind the container
//! knows how to materialize.

pub mod cast;
pub mod cast_info;
pub mod cast_list;
pub mod cast_member;
pub mod config;
pub mod initial_map;
pub mod key_table;
pub mod memory_map;
pub mod script;
pub mod script_context;
pub mod script_names;

use anyhow::Result as AResult;

use crate::byte_stream::ByteStream;
use std::io::Cursor;

/// The set of chunk four-character codes this crate understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChunkKind {
    InitialMap,
    MemoryMap,
    KeyTable,
    Config,
    CastList,
    Cast,
    CastMember,
    CastInfo,
    ScriptContext,
    ScriptNames,
    Script,
}

impl ChunkKind {
    #[must_use]
    pub fn four_cc(self) -> u32 {
        u32::from_be_bytes(*match self {
            Self::InitialMap => b"imap",
            Self::MemoryMap => b"mmap",
            Self::KeyTable => b"KEY*",
            Self::Config => b"VWCF",
            Self::CastList => b"MCsL",
            Self::Cast => b"CAS*",
            Self::CastMember => b"CASt",
            Self::CastInfo => b"Cinf",
            Self::ScriptContext => b"Lctx",
            Self::ScriptNames => b"Lnam",
            Self::Script => b"Lscr",
        })
    }

    /// True for chunks this crate will rewrite rather than copy verbatim.
    #[must_use]
    pub fn writable(self) -> bool {
        matches!(self, Self::Config | Self::InitialMap | Self::MemoryMap | Self::CastMember | Self::CastInfo)
    }
}

/// A materialized, typed chunk.
#[derive(Debug)]
pub enum Chunk {
    Config(config::Config),
    CastList(cast_list::CastList),
    Cast(cast::Cast),
    CastMember(cast_member::CastMember),
    CastInfo(cast_info::CastInfo),
    ScriptContext(script_context::ScriptContext),
    ScriptNames(script_names::ScriptNames),
    Script(script::Script),
    KeyTable(key_table::KeyTable),
}

impl Chunk {
    pub fn read(kind: ChunkKind, stream: &mut ByteStream<Cursor<Vec<u8>>>) -> AResult<Self> {
        Ok(match kind {
            ChunkKind::Config => Self::Config(config::Config::read(stream)?),
            ChunkKind::CastList => Self::CastList(cast_list::CastList::read(stream)?),
            ChunkKind::Cast => Self::Cast(cast::Cast::read(stream)?),
            ChunkKind::CastMember => Self::CastMember(cast_member::CastMember::read(stream)?),
            ChunkKind::CastInfo => Self::CastInfo(cast_info::CastInfo::read(stream)?),
            ChunkKind::ScriptContext => Self::ScriptContext(script_context::ScriptContext::read(stream)?),
            ChunkKind::ScriptNames => Self::ScriptNames(script_names::ScriptNames::read(stream)?),
            ChunkKind::Script => Self::Script(script::Script::read(stream)?),
            ChunkKind::KeyTable => Self::KeyTable(key_table::KeyTable::read(stream)?),
            ChunkKind::InitialMap | ChunkKind::MemoryMap =>
                anyhow::bail!("{:?} is parsed directly by the container reader, not via get_chunk", kind),
        })
    }
}
