use std::{fmt, io};

use crate::data_types::TableTag;

#[derive(Debug)]
pub enum ParseError {
    UnexpectedEof,
    IoError(io::Error),
    SeekOutOfBounds {
        position: u64,
        len: u64,
    },
    MissingTable {
        tag: TableTag,
    },
    InvalidFormat {
        tag: TableTag,
        /// Wide enough to hold any version or format field found in a font
        format: i64,
    },
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self::IoError(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of data"),
            Self::IoError(err) => err.fmt(f),
            Self::SeekOutOfBounds { position, len } => {
                write!(f, "seek to {} is past the end of data ({} bytes)", position, len)
            }
            Self::MissingTable { tag } => write!(f, "the {} table is missing", tag),
            Self::InvalidFormat { tag, format } => {
                write!(f, "invalid format {} in the {} table", format, tag)
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub type FontResult<T> = Result<T, ParseError>;
