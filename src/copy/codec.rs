//! Binary format of saved copies.
//!
//! Every record is a single gzip stream. All integers are little-endian.
//!
//! Current format (`.cpb`):
//!
//! ```text
//! u16 width, u16 height, u16 length
//! i32 origin_x, i32 origin_y, i32 origin_z
//! i32 offset_x, i32 offset_y, i32 offset_z
//! u32 used_blocks
//! u8  paste_air
//! u8  blocks[width * height * length]
//! ```
//!
//! Legacy format (`.cpy`) is the same record without the offset triple; the
//! offset of a legacy copy loads as zero. Only the current format is written.

use std::io::{self, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use super::buffer::CopyBuffer;

/// Extension of current-format files
pub const CURRENT_EXTENSION: &str = "cpb";

/// Extension of legacy-format files
pub const LEGACY_EXTENSION: &str = "cpy";

/// Largest block array reserved up front while decoding.
const PREALLOC_LIMIT: usize = 1 << 20;

/// On-disk format revision of a saved copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferFormat {
    /// Header carries the paste offset.
    Current,
    /// Header without offset.
    Legacy,
}

/// Decoded header fields shared by both revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Header {
    size: IVec3,
    origin: IVec3,
    offset: IVec3,
    used_blocks: u32,
    paste_air: bool,
}

impl BufferFormat {
    /// Lookup order when resolving a saved name: current first.
    pub const LOOKUP_ORDER: [BufferFormat; 2] = [BufferFormat::Current, BufferFormat::Legacy];

    pub fn extension(self) -> &'static str {
        match self {
            BufferFormat::Current => CURRENT_EXTENSION,
            BufferFormat::Legacy => LEGACY_EXTENSION,
        }
    }

    /// Format for a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case(CURRENT_EXTENSION) {
            Some(BufferFormat::Current)
        } else if ext.eq_ignore_ascii_case(LEGACY_EXTENSION) {
            Some(BufferFormat::Legacy)
        } else {
            None
        }
    }

    /// Format of a saved copy judged by its file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    fn read_header(self, reader: &mut impl Read) -> io::Result<Header> {
        let size = IVec3::new(
            read_u16(reader)? as i32,
            read_u16(reader)? as i32,
            read_u16(reader)? as i32,
        );
        let origin = read_ivec3(reader)?;
        let offset = match self {
            BufferFormat::Current => read_ivec3(reader)?,
            BufferFormat::Legacy => IVec3::ZERO,
        };
        let used_blocks = read_u32(reader)?;
        let paste_air = match read_u8(reader)? {
            0 => false,
            1 => true,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("air flag {} is not 0 or 1", other),
                ));
            }
        };
        Ok(Header {
            size,
            origin,
            offset,
            used_blocks,
            paste_air,
        })
    }

    /// Decompress and decode a whole saved copy in this format.
    ///
    /// Nothing is returned unless the block array holds exactly
    /// `width * height * length` entries.
    pub fn decode(self, bytes: &[u8]) -> Result<CopyBuffer> {
        let mut reader = GzDecoder::new(bytes);
        let header = self.read_header(&mut reader).map_err(corrupt)?;

        let size = header.size;
        if size.cmple(IVec3::ZERO).any() {
            return Err(Error::CorruptBuffer(format!(
                "dimensions {}x{}x{} are not positive",
                size.x, size.y, size.z
            )));
        }
        let expected = size.x as usize * size.y as usize * size.z as usize;

        // The header is untrusted; let the payload grow the vector past this.
        // One byte past the declared volume is enough to detect trailing data.
        let mut blocks = Vec::with_capacity(expected.min(PREALLOC_LIMIT));
        reader
            .by_ref()
            .take(expected as u64 + 1)
            .read_to_end(&mut blocks)
            .map_err(corrupt)?;
        if blocks.len() != expected {
            return Err(Error::VoxelCountMismatch {
                expected,
                actual: blocks.len(),
            });
        }

        CopyBuffer::from_parts(
            size,
            header.origin,
            header.offset,
            header.used_blocks as u64,
            header.paste_air,
            blocks,
        )
    }
}

/// Encode a buffer in the current format, compressed.
pub fn encode(buffer: &CopyBuffer) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    write_current(&mut encoder, buffer)?;
    Ok(encoder.finish()?)
}

/// Write the uncompressed current-format record.
fn write_current(writer: &mut impl Write, buffer: &CopyBuffer) -> Result<()> {
    let size = buffer.size();
    let too_large = || Error::RegionTooLarge {
        width: size.x,
        height: size.y,
        length: size.z,
    };
    let width = u16::try_from(size.x).map_err(|_| too_large())?;
    let height = u16::try_from(size.y).map_err(|_| too_large())?;
    let length = u16::try_from(size.z).map_err(|_| too_large())?;
    let used_blocks = u32::try_from(buffer.used_blocks()).map_err(|_| too_large())?;

    writer.write_all(&width.to_le_bytes())?;
    writer.write_all(&height.to_le_bytes())?;
    writer.write_all(&length.to_le_bytes())?;
    write_ivec3(writer, buffer.origin())?;
    write_ivec3(writer, buffer.offset())?;
    writer.write_all(&used_blocks.to_le_bytes())?;
    writer.write_all(&[buffer.paste_air() as u8])?;
    writer.write_all(buffer.blocks())?;
    Ok(())
}

fn corrupt(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::CorruptBuffer("stream ends early".to_string()),
        _ => Error::CorruptBuffer(e.to_string()),
    }
}

fn read_u8(reader: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16(reader: &mut impl Read) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_ivec3(reader: &mut impl Read) -> io::Result<IVec3> {
    let mut buf = [0u8; 12];
    reader.read_exact(&mut buf)?;
    Ok(IVec3::new(
        i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
        i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        i32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
    ))
}

fn write_ivec3(writer: &mut impl Write, v: IVec3) -> io::Result<()> {
    writer.write_all(&v.x.to_le_bytes())?;
    writer.write_all(&v.y.to_le_bytes())?;
    writer.write_all(&v.z.to_le_bytes())?;
    Ok(())
}
