use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

/// Windows-oriented metrics and classification data.
///
/// Later versions append field groups; absent groups are left zeroed. Some
/// very old fonts truncate the table before the typographic metrics, which
/// is tolerated the same way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Os2Table {
    pub version: u16,
    pub average_char_width: i16,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_type: u16,
    pub subscript_x_size: i16,
    pub subscript_y_size: i16,
    pub subscript_x_offset: i16,
    pub subscript_y_offset: i16,
    pub superscript_x_size: i16,
    pub superscript_y_size: i16,
    pub superscript_x_offset: i16,
    pub superscript_y_offset: i16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub family_class: i16,
    pub panose: [u8; 10],
    pub unicode_range1: u32,
    pub unicode_range2: u32,
    pub unicode_range3: u32,
    pub unicode_range4: u32,
    pub ach_vend_id: [u8; 4],
    pub fs_selection: u16,
    pub first_char_index: u16,
    pub last_char_index: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,

    /// version 1 and later
    pub code_page_range1: u32,
    pub code_page_range2: u32,

    /// version 2 and later
    pub sx_height: i16,
    pub s_cap_height: i16,
    pub default_char: u16,
    pub break_char: u16,
    pub max_context: u16,
}

impl Os2Table {
    pub const TAG: TableTag = TableTag::new(*b"OS/2");

    pub fn read(source: &mut dyn DataSource, length: u32) -> FontResult<Self> {
        let mut table = Self {
            version: source.read_u16()?,
            average_char_width: source.read_i16()?,
            weight_class: source.read_u16()?,
            width_class: source.read_u16()?,
            fs_type: source.read_u16()?,
            subscript_x_size: source.read_i16()?,
            subscript_y_size: source.read_i16()?,
            subscript_x_offset: source.read_i16()?,
            subscript_y_offset: source.read_i16()?,
            superscript_x_size: source.read_i16()?,
            superscript_y_size: source.read_i16()?,
            superscript_x_offset: source.read_i16()?,
            superscript_y_offset: source.read_i16()?,
            strikeout_size: source.read_i16()?,
            strikeout_position: source.read_i16()?,
            family_class: source.read_i16()?,
            ..Self::default()
        };

        source.read_exact(&mut table.panose)?;

        table.unicode_range1 = source.read_u32()?;
        table.unicode_range2 = source.read_u32()?;
        table.unicode_range3 = source.read_u32()?;
        table.unicode_range4 = source.read_u32()?;
        source.read_exact(&mut table.ach_vend_id)?;
        table.fs_selection = source.read_u16()?;
        table.first_char_index = source.read_u16()?;
        table.last_char_index = source.read_u16()?;

        // 68 bytes so far; pre-OpenType tables may stop here
        if length >= 78 {
            table.typo_ascender = source.read_i16()?;
            table.typo_descender = source.read_i16()?;
            table.typo_line_gap = source.read_i16()?;
            table.win_ascent = source.read_u16()?;
            table.win_descent = source.read_u16()?;
        }

        if table.version >= 1 {
            table.code_page_range1 = source.read_u32()?;
            table.code_page_range2 = source.read_u32()?;
        }

        if table.version >= 2 {
            table.sx_height = source.read_i16()?;
            table.s_cap_height = source.read_i16()?;
            table.default_char = source.read_u16()?;
            table.break_char = source.read_u16()?;
            table.max_context = source.read_u16()?;
        }

        Ok(table)
    }
}
