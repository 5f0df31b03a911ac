mod seek_ext;
mod shared_stream;
mod take_seek;

pub use seek_ext::SeekExt;
pub use shared_stream::SharedStream;
pub use take_seek::{TakeSeek, TakeSeekExt};
use std::io;

/// Anything that can be read from and seeked within, and that can be named
/// in a debug trace. All of the container's typed readers are generic over
/// this rather than over a concrete file or buffer type so that the same
/// code works whether the backing store is a `File`, a `Cursor<Vec<u8>>`, or
/// a `SharedStream` substream of either.
pub trait Reader: io::Read + io::Seek + core::fmt::Debug {}
impl <T: io::Read + io::Seek + core::fmt::Debug> Reader for T {}

/// Runs `f`, rewinding `reader` to its starting position if `f` returns an
/// error. Used by chunk parsers that need to speculatively try a layout
/// before falling back to another one.
pub fn restore_on_error<R, E, F, T>(reader: &mut R, f: F) -> Result<T, E>
where
    R: io::Read + io::Seek,
    E: From<io::Error>,
    F: FnOnce(&mut R, u64) -> Result<T, E>,
{
    let pos = reader.pos()?;
    f(reader, pos).map_err(|err| {
        let _ = reader.seek(io::SeekFrom::Start(pos));
        err
    })
}
