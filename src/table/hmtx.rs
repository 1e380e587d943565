use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

/// Per-glyph horizontal advance widths and side bearings
#[derive(Debug, Clone, PartialEq)]
pub struct HmtxTable {
    /// One entry per metric; glyphs past the end reuse the last width
    pub advance_widths: Vec<u16>,
    pub left_side_bearings: Vec<i16>,

    /// Bearings for glyphs beyond `numberOfHMetrics`. May be shorter than the
    /// glyph count when the table itself is truncated
    pub non_horizontal_left_side_bearings: Vec<i16>,
}

impl HmtxTable {
    pub const TAG: TableTag = TableTag::new(*b"hmtx");

    pub fn read(
        source: &mut dyn DataSource,
        length: u32,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> FontResult<Self> {
        let mut advance_widths = Vec::with_capacity(usize::from(number_of_h_metrics));
        let mut left_side_bearings = Vec::with_capacity(usize::from(number_of_h_metrics));

        let mut bytes_read = 0u32;
        for _ in 0..number_of_h_metrics {
            advance_widths.push(source.read_u16()?);
            left_side_bearings.push(source.read_i16()?);
            bytes_read += 4;
        }

        let number_non_horizontal = num_glyphs.saturating_sub(number_of_h_metrics);
        let mut non_horizontal_left_side_bearings =
            Vec::with_capacity(usize::from(number_non_horizontal));

        for _ in 0..number_non_horizontal {
            if bytes_read + 2 > length {
                break;
            }

            non_horizontal_left_side_bearings.push(source.read_i16()?);
            bytes_read += 2;
        }

        Ok(Self {
            advance_widths,
            left_side_bearings,
            non_horizontal_left_side_bearings,
        })
    }

    pub fn advance_width(&self, glyph_id: u16) -> u16 {
        if let Some(&width) = self.advance_widths.get(usize::from(glyph_id)) {
            return width;
        }

        // monospaced fonts may not list a width for every glyph
        match self.advance_widths.last() {
            Some(&width) => width,
            None => 250,
        }
    }

    pub fn left_side_bearing(&self, glyph_id: u16) -> i16 {
        let glyph_id = usize::from(glyph_id);

        if let Some(&bearing) = self.left_side_bearings.get(glyph_id) {
            return bearing;
        }

        self.non_horizontal_left_side_bearings
            .get(glyph_id - self.left_side_bearings.len())
            .copied()
            .unwrap_or(0)
    }
}
