use std::fmt::{self, Write};

use fixed::types::extra::U14;

/// 16.16-bit signed fixed-point number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub i32);

impl Fixed {
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }
}

/// 16-bit signed integer that describes a quantity in FUnits, the smallest
/// measurable distance in em space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct FWord(pub i16);

/// 16-bit unsigned integer that describes a quantity in FUnits, the smallest
/// measurable distance in em space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct UFWord(pub u16);

/// 16-bit signed fixed number with the low 14 bits representing fraction
pub type F2Dot14 = fixed::FixedI16<U14>;

/// The long internal format of a date in seconds since 12:00 midnight, January
/// 1, 1904. It is represented as a signed 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongDateTime(pub i64);

/// Four bytes of big-endian ASCII naming a table in the font directory
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableTag(pub [u8; 4]);

impl TableTag {
    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

impl fmt::Debug for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.0[0] as char)?;
        f.write_char(self.0[1] as char)?;
        f.write_char(self.0[2] as char)?;
        f.write_char(self.0[3] as char)?;

        Ok(())
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
