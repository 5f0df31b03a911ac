//! The `Lscr` chunk: a compiled script's handlers, name-id tables, and
//! literal pool.

use anyhow::{Context as _, Result as AResult};
use bitflags::bitflags;

use crate::byte_stream::ByteStream;
use libcommon::Reader;

bitflags! {
    pub struct ScriptFlags: u32 {
        const FUNCS_GLOBAL = 0x01;
        const VARS_GLOBAL  = 0x02;
        const FACTORY_DEF  = 0x04;
        const HAS_FACTORY  = 0x08;
        const EVENT_SCRIPT = 0x20;
        const EVENT_SCRIPT_2 = 0x40;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LiteralKind {
    String,
    Int,
    Float,
}

#[derive(Clone, Debug)]
pub struct Literal {
    pub kind: LiteralKind,
    pub offset: i32,
    pub int_value: i32,
    pub string_value: String,
    pub float_value: f64,
}

#[derive(Clone, Debug)]
pub struct Handler {
    pub name_id: i16,
    pub arg_count: i16,
    pub arg_offset: i32,
    pub local_count: i16,
    pub local_offset: i32,
    pub global_count: i16,
    pub global_offset: i32,
    pub compiled_offset: i32,
    pub compiled_len: i32,
    pub stack_height: i32,
    pub arg_name_ids: Vec<i16>,
    pub local_name_ids: Vec<i16>,
    pub global_name_ids: Vec<i16>,
    pub bytecode: Vec<u8>,
    /// Whether this handler should print without the `on NAME … end`
    /// wrapper (the first handler of a script flagged `event_script`).
    pub is_generic_event: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Script {
    pub total_length: i32,
    pub total_length2: i32,
    pub header_len: i16,
    pub script_number: i16,
    pub parent_number: i16,
    pub script_flags: u32,
    pub cast_id: i32,
    pub factory_name_id: i16,
    pub handlers: Vec<Handler>,
    pub property_name_ids: Vec<i16>,
    pub global_name_ids: Vec<i16>,
    pub literals: Vec<Literal>,
}

impl Script {
    #[allow(clippy::too_many_lines)]
    pub fn read<T: Reader>(stream: &mut ByteStream<T>) -> AResult<Self> {
        let total_length = stream.read_i32().context("can’t read script total length")?;
        let total_length2 = stream.read_i32().context("can’t read script total length (2)")?;
        let header_len = stream.read_i16().context("can’t read script header length")?;
        let script_number = stream.read_i16().context("can’t read script number")?;
        let _unknown1 = stream.read_i16()?;
        let parent_number = stream.read_i16().context("can’t read script parent number")?;
        let _unknown2 = [stream.read_i32()?, stream.read_i32()?];
        let script_flags = stream.read_u32().context("can’t read script flags")?;
        let _unknown3 = stream.read_i32()?;
        let cast_id = stream.read_i32().context("can’t read script cast id")?;
        let _unknown4 = [stream.read_i16()?, stream.read_i16()?, stream.read_i16()?, stream.read_i16()?, stream.read_i16()?];
        let factory_name_id = stream.read_i16().context("can’t read script factory name id")?;
        let _unknown5 = stream.read_i16()?;
        let handler_vector_offset = stream.read_i32()?;
        let handler_count = stream.read_i16().context("can’t read handler count")?;
        let _unknown6 = stream.read_i32()?;
        let property_count = stream.read_i16().context("can’t read property count")?;
        let property_offset = stream.read_i32()?;
        let global_count = stream.read_i16().context("can’t read global count")?;
        let global_offset = stream.read_i32()?;
        let _unknown7 = [stream.read_i32()?, stream.read_i32()?];
        let literal_count = stream.read_i16().context("can’t read literal count")?;
        let literals_offset = stream.read_i32()?;
        let literals_data_count = stream.read_i32()?;
        let literals_data_offset = stream.read_i32()?;

        stream.seek(std::io::SeekFrom::Start(handler_vector_offset as u64))?;
        let mut handler_headers = Vec::with_capacity(handler_count.max(0) as usize);
        for _ in 0..handler_count {
            let name_id = stream.read_i16()?;
            let arg_count = stream.read_i16()?;
            let arg_offset = stream.read_i32()?;
            let local_count = stream.read_i16()?;
            let local_offset = stream.read_i32()?;
            let global_count = stream.read_i16()?;
            let global_offset = stream.read_i32()?;
            let _unknown = stream.read_i32()?;
            let compiled_len = stream.read_i32()?;
            let compiled_offset = stream.read_i32()?;
            let stack_height = stream.read_i32()?;
            handler_headers.push((name_id, arg_count, arg_offset, local_count, local_offset, global_count, global_offset, compiled_len, compiled_offset, stack_height));
        }

        let mut handlers = Vec::with_capacity(handler_headers.len());
        for (i, h) in handler_headers.into_iter().enumerate() {
            let (name_id, arg_count, arg_offset, local_count, local_offset, global_count, global_offset, compiled_len, compiled_offset, stack_height) = h;

            stream.seek(std::io::SeekFrom::Start(arg_offset as u64))?;
            let arg_name_ids = (0..arg_count).map(|_| stream.read_i16()).collect::<AResult<Vec<_>>>()?;
            stream.seek(std::io::SeekFrom::Start(local_offset as u64))?;
            let local_name_ids = (0..local_count).map(|_| stream.read_i16()).collect::<AResult<Vec<_>>>()?;
            stream.seek(std::io::SeekFrom::Start(global_offset as u64))?;
            let global_name_ids = (0..global_count).map(|_| stream.read_i16()).collect::<AResult<Vec<_>>>()?;

            stream.seek(std::io::SeekFrom::Start(compiled_offset as u64))?;
            let bytecode = stream.read_bytes(compiled_len.max(0) as usize)?;

            let is_generic_event = i == 0 && ScriptFlags::from_bits_truncate(script_flags).contains(ScriptFlags::EVENT_SCRIPT);

            handlers.push(Handler {
                name_id, arg_count, arg_offset, local_count, local_offset,
                global_count, global_offset, compiled_offset, compiled_len,
                stack_height, arg_name_ids, local_name_ids, global_name_ids,
                bytecode, is_generic_event,
            });
        }

        stream.seek(std::io::SeekFrom::Start(property_offset as u64))?;
        let property_name_ids = (0..property_count).map(|_| stream.read_i16()).collect::<AResult<Vec<_>>>()?;

        stream.seek(std::io::SeekFrom::Start(global_offset as u64))?;
        let global_name_ids = (0..global_count).map(|_| stream.read_i16()).collect::<AResult<Vec<_>>>()?;

        stream.seek(std::io::SeekFrom::Start(literals_offset as u64))?;
        let mut literal_records = Vec::with_capacity(literal_count.max(0) as usize);
        for _ in 0..literal_count {
            let kind_raw = stream.read_i32()?;
            let offset = stream.read_i32()?;
            literal_records.push((kind_raw, offset));
        }

        let mut literals = Vec::with_capacity(literal_records.len());
        for (kind_raw, offset) in literal_records {
            let (kind, int_value, string_value, float_value) = match kind_raw {
                1 => {
                    stream.seek(std::io::SeekFrom::Start((literals_data_offset + offset) as u64))?;
                    let len = stream.read_i32()?;
                    let s = stream.read_string(len.max(0) as usize)?;
                    (LiteralKind::String, 0, s, 0.0)
                }
                4 => (LiteralKind::Int, offset, String::new(), 0.0),
                9 => {
                    stream.seek(std::io::SeekFrom::Start((literals_data_offset + offset) as u64))?;
                    let len = stream.read_i32()?;
                    let f = if len == 8 {
                        stream.read_f64()?
                    } else {
                        stream.read_f80_apple()?
                    };
                    (LiteralKind::Float, 0, String::new(), f)
                }
                other => anyhow::bail!("unrecognized literal kind {}", other),
            };
            literals.push(Literal { kind, offset, int_value, string_value, float_value });
        }

        let _ = literals_data_count;

        Ok(Self {
            total_length, total_length2, header_len, script_number, parent_number,
            script_flags, cast_id, factory_name_id, handlers, property_name_ids,
            global_name_ids, literals,
        })
    }

    #[must_use]
    pub fn is_factory(&self) -> bool {
        ScriptFlags::from_bits_truncate(self.script_flags).contains(ScriptFlags::FACTORY_DEF)
    }
}
