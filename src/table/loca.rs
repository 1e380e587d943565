use crate::{
    data_source::DataSource,
    data_types::TableTag,
    error::{FontResult, ParseError},
};

/// Byte offsets of every glyph outline within `glyf`, one per glyph plus a
/// final entry marking the end of the last outline
#[derive(Debug, Clone, PartialEq)]
pub struct LocaTable {
    pub offsets: Vec<u32>,
}

/// Where a single glyph's outline lives, relative to the start of `glyf`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphLocation {
    pub offset: u32,
    pub length: u32,
}

impl LocaTable {
    pub const TAG: TableTag = TableTag::new(*b"loca");

    pub fn read(
        source: &mut dyn DataSource,
        index_to_loc_format: i16,
        num_glyphs: u16,
    ) -> FontResult<Self> {
        let count = usize::from(num_glyphs) + 1;
        let mut offsets = Vec::with_capacity(count);

        match index_to_loc_format {
            // short offsets are stored halved
            0 => {
                for _ in 0..count {
                    offsets.push(u32::from(source.read_u16()?) * 2);
                }
            }
            1 => {
                for _ in 0..count {
                    offsets.push(source.read_u32()?);
                }
            }
            format => {
                return Err(ParseError::InvalidFormat {
                    tag: Self::TAG,
                    format: format.into(),
                })
            }
        }

        Ok(Self { offsets })
    }

    /// An empty range (a glyph with no outline) yields `None`
    pub fn glyph_location(&self, glyph_id: u16) -> Option<GlyphLocation> {
        let glyph_id = usize::from(glyph_id);
        let offset = *self.offsets.get(glyph_id)?;
        let end = *self.offsets.get(glyph_id + 1)?;

        if end <= offset {
            return None;
        }

        Some(GlyphLocation {
            offset,
            length: end - offset,
        })
    }

    pub fn num_glyphs(&self) -> u16 {
        (self.offsets.len().saturating_sub(1)) as u16
    }
}
