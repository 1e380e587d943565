use crate::{
    data_source::DataSource,
    data_types::{Fixed, FWord, TableTag, UFWord},
    error::FontResult,
};

/// Layout metrics shared by all horizontal glyph runs, plus the metric count
/// that shapes `hmtx`
#[derive(Debug, Clone, PartialEq)]
pub struct HheaTable {
    pub version: Fixed,
    pub ascender: FWord,
    pub descender: FWord,
    pub line_gap: FWord,
    pub advance_width_max: UFWord,
    pub min_left_side_bearing: FWord,
    pub min_right_side_bearing: FWord,
    pub x_max_extent: FWord,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: FWord,
    pub metric_data_format: i16,

    /// Number of (advance, bearing) pairs at the front of `hmtx`
    pub number_of_h_metrics: u16,
}

impl HheaTable {
    pub const TAG: TableTag = TableTag::new(*b"hhea");

    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let version = source.read_fixed()?;
        let ascender = source.read_fword()?;
        let descender = source.read_fword()?;
        let line_gap = source.read_fword()?;
        let advance_width_max = source.read_ufword()?;
        let min_left_side_bearing = source.read_fword()?;
        let min_right_side_bearing = source.read_fword()?;
        let x_max_extent = source.read_fword()?;
        let caret_slope_rise = source.read_i16()?;
        let caret_slope_run = source.read_i16()?;
        let caret_offset = source.read_fword()?;

        for _ in 0..4 {
            let _reserved = source.read_i16()?;
        }

        let metric_data_format = source.read_i16()?;
        let number_of_h_metrics = source.read_u16()?;

        Ok(Self {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }
}
