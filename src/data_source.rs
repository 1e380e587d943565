use std::{
    fmt,
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use crate::{
    data_types::{F2Dot14, Fixed, FWord, LongDateTime, TableTag, UFWord},
    error::{FontResult, ParseError},
};

/// Random access over the raw bytes of a font.
///
/// Implementations supply the four primitive operations; everything else is
/// derived from them, so a file on disk and a buffer in memory behave
/// identically, including at the boundaries.
pub trait DataSource {
    /// Total number of bytes in the source
    fn len(&self) -> u64;

    /// Current read position, in bytes from the start of the source
    fn position(&self) -> u64;

    /// Moves the read position to `position`.
    ///
    /// Seeking anywhere past the last byte is an error, except to the
    /// position exactly at the end of the data.
    fn seek(&mut self, position: u64) -> FontResult<()>;

    /// Fills `buf` from the current position, advancing past the bytes read
    fn read_exact(&mut self, buf: &mut [u8]) -> FontResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_u8(&mut self) -> FontResult<u8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;

        Ok(buf[0])
    }

    fn read_u16(&mut self) -> FontResult<u16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;

        Ok(u16::from_be_bytes(buf))
    }

    fn read_i16(&mut self) -> FontResult<i16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;

        Ok(i16::from_be_bytes(buf))
    }

    fn read_u32(&mut self) -> FontResult<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;

        Ok(u32::from_be_bytes(buf))
    }

    fn read_i64(&mut self) -> FontResult<i64> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;

        Ok(i64::from_be_bytes(buf))
    }

    fn read_fixed(&mut self) -> FontResult<Fixed> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;

        Ok(Fixed(i32::from_be_bytes(buf)))
    }

    fn read_fword(&mut self) -> FontResult<FWord> {
        Ok(FWord(self.read_i16()?))
    }

    fn read_ufword(&mut self) -> FontResult<UFWord> {
        Ok(UFWord(self.read_u16()?))
    }

    fn read_f2dot14(&mut self) -> FontResult<F2Dot14> {
        Ok(F2Dot14::from_bits(self.read_i16()?))
    }

    fn read_long_date_time(&mut self) -> FontResult<LongDateTime> {
        Ok(LongDateTime(self.read_i64()?))
    }

    fn read_tag(&mut self) -> FontResult<TableTag> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;

        Ok(TableTag::new(buf))
    }

    fn read_bytes(&mut self, length: usize) -> FontResult<Vec<u8>> {
        let mut buf = vec![0; length];
        self.read_exact(&mut buf)?;

        Ok(buf)
    }
}

/// An entire font held in memory
pub struct MemorySource {
    buffer: Vec<u8>,
    cursor: usize,
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("cursor", &self.cursor)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl MemorySource {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer, cursor: 0 }
    }
}

impl DataSource for MemorySource {
    fn len(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn position(&self) -> u64 {
        self.cursor as u64
    }

    fn seek(&mut self, position: u64) -> FontResult<()> {
        if position > self.len() {
            return Err(ParseError::SeekOutOfBounds {
                position,
                len: self.len(),
            });
        }

        self.cursor = position as usize;

        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> FontResult<()> {
        let end = self.cursor + buf.len();

        if end > self.buffer.len() {
            return Err(ParseError::UnexpectedEof);
        }

        buf.copy_from_slice(&self.buffer[self.cursor..end]);
        self.cursor = end;

        Ok(())
    }
}

/// A font read incrementally from a file on disk
pub struct FileSource {
    file: File,
    len: u64,
    position: u64,
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSource")
            .field("position", &self.position)
            .field("file", &format!("[ {} bytes ]", self.len))
            .finish()
    }
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> FontResult<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            len,
            position: 0,
        })
    }
}

impl DataSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, position: u64) -> FontResult<()> {
        // File::seek permits positions past the end, so bounds are checked here
        if position > self.len {
            return Err(ParseError::SeekOutOfBounds {
                position,
                len: self.len,
            });
        }

        self.file.seek(SeekFrom::Start(position))?;
        self.position = position;

        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> FontResult<()> {
        match self.file.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;

                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                // File::read_exact may consume bytes before hitting the end;
                // put the OS cursor back so a failed read leaves the position
                // unchanged, the same as a memory buffer
                self.file.seek(SeekFrom::Start(self.position))?;

                Err(ParseError::UnexpectedEof)
            }
            Err(err) => Err(err.into()),
        }
    }
}
