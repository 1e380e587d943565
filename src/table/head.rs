use crate::{
    data_source::DataSource,
    data_types::{Fixed, FWord, LongDateTime, TableTag},
    error::FontResult,
};

/// The font header, holding global metrics and the layout of `loca`
#[derive(Debug, Clone, PartialEq)]
pub struct HeadTable {
    pub version: Fixed,
    pub font_revision: Fixed,

    /// Stored as read; never recomputed
    pub checksum_adjustment: u32,

    /// 0x5F0F3CF5 in well-formed fonts. Stored as read; not validated
    pub magic_number: u32,

    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,
    pub mac_style: MacStyle,

    /// Smallest readable size in pixels
    pub lowest_rec_ppem: u16,

    pub font_direction_hint: i16,

    /// 0 for short (uint16, halved) `loca` offsets, 1 for long (uint32)
    pub index_to_loc_format: i16,

    pub glyph_data_format: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacStyle(pub u16);

impl MacStyle {
    const BOLD: u16 = 1 << 0;
    const ITALIC: u16 = 1 << 1;

    pub fn is_bold(self) -> bool {
        self.0 & Self::BOLD != 0
    }

    pub fn is_italic(self) -> bool {
        self.0 & Self::ITALIC != 0
    }
}

impl HeadTable {
    pub const TAG: TableTag = TableTag::new(*b"head");

    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let version = source.read_fixed()?;
        let font_revision = source.read_fixed()?;
        let checksum_adjustment = source.read_u32()?;
        let magic_number = source.read_u32()?;
        let flags = source.read_u16()?;
        let units_per_em = source.read_u16()?;
        let created = source.read_long_date_time()?;
        let modified = source.read_long_date_time()?;
        let x_min = source.read_fword()?;
        let y_min = source.read_fword()?;
        let x_max = source.read_fword()?;
        let y_max = source.read_fword()?;
        let mac_style = MacStyle(source.read_u16()?);
        let lowest_rec_ppem = source.read_u16()?;
        let font_direction_hint = source.read_i16()?;
        let index_to_loc_format = source.read_i16()?;
        let glyph_data_format = source.read_i16()?;

        Ok(Self {
            version,
            font_revision,
            checksum_adjustment,
            magic_number,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }
}
