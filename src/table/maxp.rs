use crate::{
    data_source::DataSource,
    data_types::{Fixed, TableTag},
    error::FontResult,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MaxpTable {
    /// 0x00010000 (1.0) for fonts with TrueType outlines, 0x00005000 (0.5)
    /// for fonts without
    pub version: Fixed,
    /// the number of glyphs in the font
    pub num_glyphs: u16,
    /// points in non-compound glyph
    pub max_points: u16,
    /// contours in non-compound glyph
    pub max_contours: u16,
    /// points in compound glyph
    pub max_component_points: u16,
    /// contours in compound glyph
    pub max_component_contours: u16,
    /// set to 2
    pub max_zones: u16,
    /// points used in Twilight Zone (Z0)
    pub max_twilight_points: u16,
    /// number of Storage Area locations
    pub max_storage: u16,
    /// number of FDEFs
    pub max_function_defs: u16,
    /// number of IDEFs
    pub max_instruction_defs: u16,
    /// maximum stack depth
    pub max_stack_elements: u16,
    /// byte count for glyph instructions
    pub max_size_of_instructions: u16,
    /// number of glyphs referenced at top level
    pub max_component_elements: u16,
    /// levels of recursion, set to 0 if font has only simple glyphs
    pub max_component_depth: u16,
}

impl MaxpTable {
    pub const TAG: TableTag = TableTag::new(*b"maxp");

    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let version = source.read_fixed()?;
        let num_glyphs = source.read_u16()?;

        let mut table = Self {
            version,
            num_glyphs,
            max_points: 0,
            max_contours: 0,
            max_component_points: 0,
            max_component_contours: 0,
            max_zones: 0,
            max_twilight_points: 0,
            max_storage: 0,
            max_function_defs: 0,
            max_instruction_defs: 0,
            max_stack_elements: 0,
            max_size_of_instructions: 0,
            max_component_elements: 0,
            max_component_depth: 0,
        };

        // Version 0.5 ends after the glyph count
        if version.0 >= 0x0001_0000 {
            table.max_points = source.read_u16()?;
            table.max_contours = source.read_u16()?;
            table.max_component_points = source.read_u16()?;
            table.max_component_contours = source.read_u16()?;
            table.max_zones = source.read_u16()?;
            table.max_twilight_points = source.read_u16()?;
            table.max_storage = source.read_u16()?;
            table.max_function_defs = source.read_u16()?;
            table.max_instruction_defs = source.read_u16()?;
            table.max_stack_elements = source.read_u16()?;
            table.max_size_of_instructions = source.read_u16()?;
            table.max_component_elements = source.read_u16()?;
            table.max_component_depth = source.read_u16()?;
        }

        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_source::MemorySource;

    #[test]
    fn read_maxp_full_profile() {
        #[rustfmt::skip]
        let mut source = MemorySource::new(vec![
            0x00, 0x01, 0x00, 0x00, // version 1.0
            0x00, 0x03, // numGlyphs
            0x00, 0x08, // maxPoints
            0x00, 0x02, // maxContours
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x02, // maxZones
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x40, // maxStackElements
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);

        let maxp = MaxpTable::read(&mut source).unwrap();
        assert_eq!(maxp.num_glyphs, 3);
        assert_eq!(maxp.max_points, 8);
        assert_eq!(maxp.max_zones, 2);
        assert_eq!(maxp.max_stack_elements, 64);
    }

    #[test]
    fn read_maxp_half_version() {
        let mut source = MemorySource::new(vec![0x00, 0x00, 0x50, 0x00, 0x01, 0x00]);

        let maxp = MaxpTable::read(&mut source).unwrap();
        assert_eq!(maxp.version, Fixed(0x0000_5000));
        assert_eq!(maxp.num_glyphs, 256);
        assert_eq!(maxp.max_points, 0);
    }
}
