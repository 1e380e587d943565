use crate::{
    data_source::DataSource,
    data_types::{Fixed, TableTag},
    error::FontResult,
};

/// The fixed-size header at the start of every sfnt container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSubtable {
    /// Identifies the flavor of outline data in the file. Stored as read; no
    /// particular value is required
    pub scaler_type: Fixed,

    pub number_of_tables: u16,

    /// the largest power of two less than or equal to the number of items in
    /// the table, i.e. the largest number of items that can be easily searched
    pub search_range: u16,

    /// log2(maximum power of 2 <= numTables)
    pub entry_selector: u16,

    /// numTables * 16 - searchRange
    pub range_shift: u16,
}

impl OffsetSubtable {
    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let scaler_type = source.read_fixed()?;
        let number_of_tables = source.read_u16()?;
        let search_range = source.read_u16()?;
        let entry_selector = source.read_u16()?;
        let range_shift = source.read_u16()?;

        Ok(Self {
            scaler_type,
            number_of_tables,
            search_range,
            entry_selector,
            range_shift,
        })
    }
}

/// One 16-byte record in the table directory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRecord {
    pub tag: TableTag,

    /// Stored as read; never recomputed or verified against the table data
    pub checksum: u32,

    /// Byte offset of the table from the beginning of the font
    pub offset: u32,

    /// Length of the table in bytes, excluding padding
    pub length: u32,
}

impl TableRecord {
    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let tag = source.read_tag()?;
        let checksum = source.read_u32()?;
        let offset = source.read_u32()?;
        let length = source.read_u32()?;

        Ok(Self {
            tag,
            checksum,
            offset,
            length,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_source::MemorySource;

    #[test]
    fn read_offset_subtable() {
        let mut source = MemorySource::new(vec![
            0x00, 0x01, 0x00, 0x00, // 1.0
            0x00, 0x0b, // 11 tables
            0x00, 0x80, 0x00, 0x03, 0x00, 0x30,
        ]);

        let header = OffsetSubtable::read(&mut source).unwrap();
        assert_eq!(header.scaler_type, Fixed(0x0001_0000));
        assert_eq!(header.number_of_tables, 11);
        assert_eq!(header.search_range, 128);
        assert_eq!(header.entry_selector, 3);
        assert_eq!(header.range_shift, 48);
    }

    #[test]
    fn read_table_record() {
        let mut source = MemorySource::new(vec![
            b'c', b'm', b'a', b'p', 0xde, 0xad, 0xbe, 0xef, 0x00, 0x00, 0x01, 0x2c, 0x00, 0x00,
            0x00, 0x54,
        ]);

        let record = TableRecord::read(&mut source).unwrap();
        assert_eq!(record.tag, TableTag::new(*b"cmap"));
        assert_eq!(record.checksum, 0xdead_beef);
        assert_eq!(record.offset, 300);
        assert_eq!(record.length, 84);
    }
}
