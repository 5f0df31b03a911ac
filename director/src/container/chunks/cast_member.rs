//! The `CASt` chunk: one cast member's fixed header plus a type-specific
//! payload. Only the `script_type` discriminant of that payload is parsed
//! here; other member kinds (bitmap, text, shape, …) are out of scope.

use anyhow::{Context as _, Result as AResult};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::byte_stream::ByteStream;
use libcommon::Reader;

#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum MemberKind {
    Null = 0,
    Bitmap = 1,
    FilmLoop = 2,
    Text = 3,
    Palette = 4,
    Picture = 5,
    Sound = 6,
    Button = 7,
    Shape = 8,
    Movie = 9,
    DigitalVideo = 10,
    Script = 11,
    RichText = 12,
    Ole = 13,
}

#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum ScriptType {
    Score = 1,
    Movie = 3,
    Parent = 7,
}

#[derive(Clone, Debug)]
pub struct CastMember {
    pub kind: Option<MemberKind>,
    pub script_type: Option<ScriptType>,
}

impl CastMember {
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let kind_raw = stream.read_u32().context("can’t read cast member type")?;
        let header_len = stream.read_u32().context("can’t read cast member header length")?;
        let kind = MemberKind::from_u32(kind_raw);

        let mut script_type = None;
        if header_len >= 2 {
            // Pre-500 layouts store the 16-bit specific-data size first;
            // a script-kind member's first payload field is its type.
            if matches!(kind, Some(MemberKind::Script)) {
                if let Ok(raw) = stream.read_u16() {
                    script_type = ScriptType::from_u16(raw);
                }
            }
        }

        Ok(Self { kind, script_type })
    }
}
