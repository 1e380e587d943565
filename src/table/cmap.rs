use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

/// Character-to-glyph index mappings, one subtable per platform encoding
#[derive(Debug, Clone, PartialEq)]
pub struct CmapTable {
    /// Version number (Set to zero)
    pub version: u16,
    pub subtables: Vec<CmapSubtable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CmapSubtable {
    /// Platform identifier code.
    pub platform_id: u16,
    /// Platform-specific encoding identifier.
    pub platform_specific_id: u16,
    pub format: CmapFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CmapFormat {
    /// Byte encoding table, single-byte codes only
    Zero {
        language: u16,
        glyph_index_array: Vec<u8>,
    },
    /// Segment mapping to delta values, the common Windows Unicode format
    Four {
        language: u16,
        end_code: Vec<u16>,
        start_code: Vec<u16>,
        id_delta: Vec<i16>,
        id_range_offset: Vec<u16>,
        glyph_index_array: Vec<u16>,
    },
    /// Trimmed table mapping for a single dense code range
    Six {
        language: u16,
        first_code: u16,
        glyph_index_array: Vec<u16>,
    },
    /// Segmented coverage of the full Unicode range
    Twelve {
        language: u32,
        groups: Vec<SequentialMapGroup>,
    },
    /// A format this parser does not decode; the subtable is kept so the
    /// rest of the font still loads
    Unsupported { format: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl CmapTable {
    pub const TAG: TableTag = TableTag::new(*b"cmap");

    pub fn read(source: &mut dyn DataSource, table_offset: u32) -> FontResult<Self> {
        let version = source.read_u16()?;
        let number_subtables = source.read_u16()?;

        let mut records = Vec::with_capacity(usize::from(number_subtables));
        for _ in 0..number_subtables {
            let platform_id = source.read_u16()?;
            let platform_specific_id = source.read_u16()?;
            let offset = source.read_u32()?;

            records.push((platform_id, platform_specific_id, offset));
        }

        let mut subtables = Vec::with_capacity(usize::from(number_subtables));
        for (platform_id, platform_specific_id, offset) in records {
            let subtable_start = u64::from(table_offset) + u64::from(offset);
            source.seek(subtable_start)?;

            let format = read_subtable(source, subtable_start)?;

            subtables.push(CmapSubtable {
                platform_id,
                platform_specific_id,
                format,
            });
        }

        Ok(Self { version, subtables })
    }

    pub fn subtable(&self, platform_id: u16, platform_specific_id: u16) -> Option<&CmapSubtable> {
        self.subtables.iter().find(|subtable| {
            subtable.platform_id == platform_id
                && subtable.platform_specific_id == platform_specific_id
        })
    }

    /// The most Unicode-capable subtable the font carries: the full-range
    /// Windows encoding first, then any Unicode-platform entry, then the
    /// Windows BMP encoding
    pub fn unicode_subtable(&self) -> Option<&CmapSubtable> {
        self.subtable(3, 10)
            .or_else(|| self.subtables.iter().find(|subtable| subtable.platform_id == 0))
            .or_else(|| self.subtable(3, 1))
    }

    /// Maps a character code through [`Self::unicode_subtable`], falling back
    /// to the first subtable for fonts with only a legacy mapping
    pub fn glyph_id(&self, char_code: u32) -> Option<u16> {
        self.unicode_subtable()
            .or_else(|| self.subtables.first())
            .and_then(|subtable| subtable.format.glyph_id(char_code))
    }
}

fn read_subtable(source: &mut dyn DataSource, subtable_start: u64) -> FontResult<CmapFormat> {
    let format = source.read_u16()?;

    match format {
        0 => read_format_0(source),
        4 => read_format_4(source, subtable_start),
        6 => read_format_6(source),
        12 => read_format_12(source),
        _ => {
            log::warn!("unsupported cmap subtable format {}", format);

            Ok(CmapFormat::Unsupported { format })
        }
    }
}

fn read_format_0(source: &mut dyn DataSource) -> FontResult<CmapFormat> {
    let _length = source.read_u16()?;
    let language = source.read_u16()?;
    let glyph_index_array = source.read_bytes(256)?;

    Ok(CmapFormat::Zero {
        language,
        glyph_index_array,
    })
}

fn read_format_4(source: &mut dyn DataSource, subtable_start: u64) -> FontResult<CmapFormat> {
    let length = source.read_u16()?;
    let language = source.read_u16()?;
    let seg_count_x2 = source.read_u16()?;
    let _search_range = source.read_u16()?;
    let _entry_selector = source.read_u16()?;
    let _range_shift = source.read_u16()?;

    let seg_count = usize::from(seg_count_x2 / 2);

    let mut end_code = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        end_code.push(source.read_u16()?);
    }

    let _reserved_pad = source.read_u16()?;

    let mut start_code = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        start_code.push(source.read_u16()?);
    }

    let mut id_delta = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        id_delta.push(source.read_i16()?);
    }

    let mut id_range_offset = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        id_range_offset.push(source.read_u16()?);
    }

    // whatever the declared length leaves after the segment arrays belongs
    // to the glyph index array
    let consumed = source.position() - subtable_start;
    let remaining = u64::from(length).checked_sub(consumed).unwrap_or(0);

    let mut glyph_index_array = Vec::with_capacity((remaining / 2) as usize);
    for _ in 0..remaining / 2 {
        glyph_index_array.push(source.read_u16()?);
    }

    Ok(CmapFormat::Four {
        language,
        end_code,
        start_code,
        id_delta,
        id_range_offset,
        glyph_index_array,
    })
}

fn read_format_6(source: &mut dyn DataSource) -> FontResult<CmapFormat> {
    let _length = source.read_u16()?;
    let language = source.read_u16()?;
    let first_code = source.read_u16()?;
    let entry_count = source.read_u16()?;

    let mut glyph_index_array = Vec::with_capacity(usize::from(entry_count));
    for _ in 0..entry_count {
        glyph_index_array.push(source.read_u16()?);
    }

    Ok(CmapFormat::Six {
        language,
        first_code,
        glyph_index_array,
    })
}

fn read_format_12(source: &mut dyn DataSource) -> FontResult<CmapFormat> {
    let _reserved = source.read_u16()?;
    let _length = source.read_u32()?;
    let language = source.read_u32()?;
    let num_groups = source.read_u32()?;

    let mut groups = Vec::with_capacity(num_groups as usize);
    for _ in 0..num_groups {
        groups.push(SequentialMapGroup {
            start_char_code: source.read_u32()?,
            end_char_code: source.read_u32()?,
            start_glyph_id: source.read_u32()?,
        });
    }

    Ok(CmapFormat::Twelve { language, groups })
}

impl CmapFormat {
    /// Maps a character code to a glyph id. `None` means the code is outside
    /// the subtable's coverage; glyph 0 is the font's missing-glyph entry
    pub fn glyph_id(&self, char_code: u32) -> Option<u16> {
        match self {
            Self::Zero {
                glyph_index_array, ..
            } => glyph_index_array
                .get(char_code as usize)
                .map(|&glyph_id| u16::from(glyph_id)),
            Self::Four {
                end_code,
                start_code,
                id_delta,
                id_range_offset,
                glyph_index_array,
                ..
            } => {
                if char_code > 0xffff {
                    return None;
                }

                let c = char_code as u16;
                let seg_count = end_code.len();
                let i = end_code.iter().position(|&end| end >= c)?;

                if *start_code.get(i)? > c {
                    return None;
                }

                let delta = *id_delta.get(i)? as u16;
                let range_offset = *id_range_offset.get(i)?;

                if range_offset == 0 {
                    return Some(c.wrapping_add(delta));
                }

                // idRangeOffset is in bytes from its own slot in the file,
                // so the index reaches over the tail of that array into the
                // glyph index array
                let index = usize::from(range_offset / 2)
                    .checked_add(usize::from(c - start_code[i]))?
                    .checked_sub(seg_count - i)?;
                let glyph_index = *glyph_index_array.get(index)?;

                if glyph_index == 0 {
                    return Some(0);
                }

                Some(glyph_index.wrapping_add(delta))
            }
            Self::Six {
                first_code,
                glyph_index_array,
                ..
            } => {
                let index = char_code.checked_sub(u32::from(*first_code))?;

                glyph_index_array.get(index as usize).copied()
            }
            Self::Twelve { groups, .. } => {
                let group = groups.iter().find(|group| {
                    group.start_char_code <= char_code && char_code <= group.end_char_code
                })?;

                let glyph_id = group
                    .start_glyph_id
                    .wrapping_add(char_code - group.start_char_code);

                Some(glyph_id as u16)
            }
            Self::Unsupported { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_source::MemorySource;

    #[test]
    fn format_0_byte_mapping() {
        let mut buffer = vec![
            0x00, 0x00, // version
            0x00, 0x01, // one subtable
            0x00, 0x01, 0x00, 0x00, // platform 1, encoding 0
            0x00, 0x00, 0x00, 0x0c, // subtable offset
            0x00, 0x00, // format 0
            0x01, 0x06, // length 262
            0x00, 0x00, // language
        ];
        let mut glyph_index_array = vec![0u8; 256];
        glyph_index_array[0x41] = 1;
        buffer.extend_from_slice(&glyph_index_array);
        let mut source = MemorySource::new(buffer);

        let cmap = CmapTable::read(&mut source, 0).unwrap();
        let subtable = cmap.subtable(1, 0).unwrap();
        assert_eq!(subtable.format.glyph_id(0x41), Some(1));
        assert_eq!(subtable.format.glyph_id(0x42), Some(0));
        assert_eq!(subtable.format.glyph_id(0x141), None);

        // no Unicode subtable, so the font-level lookup falls back to this one
        assert!(cmap.unicode_subtable().is_none());
        assert_eq!(cmap.glyph_id(0x41), Some(1));
    }

    #[test]
    fn unicode_subtable_is_preferred() {
        let mut buffer = vec![
            0x00, 0x00, // version
            0x00, 0x02, // two subtables
            0x00, 0x01, 0x00, 0x00, // platform 1, encoding 0
            0x00, 0x00, 0x00, 0x14, // subtable offset 20
            0x00, 0x03, 0x00, 0x01, // platform 3, encoding 1
            0x00, 0x00, 0x01, 0x1a, // subtable offset 282
        ];
        // the Macintosh byte mapping sends 'A' to glyph 9
        buffer.extend_from_slice(&[0x00, 0x00, 0x01, 0x06, 0x00, 0x00]);
        let mut glyph_ids = [0u8; 256];
        glyph_ids[0x41] = 9;
        buffer.extend_from_slice(&glyph_ids);
        // the Windows segment mapping sends 'A' to glyph 1
        #[rustfmt::skip]
        let windows_subtable = [
            0x00, 0x04, // format
            0x00, 0x20, // length 32
            0x00, 0x00, // language
            0x00, 0x04, // segCountX2
            0x00, 0x04, 0x00, 0x01, 0x00, 0x02, // legacy search fields
            0x00, 0x5a, 0xff, 0xff, // endCode
            0x00, 0x00, // reservedPad
            0x00, 0x41, 0xff, 0xff, // startCode
            0xff, 0xc0, 0x00, 0x01, // idDelta -64, 1
            0x00, 0x00, 0x00, 0x00, // idRangeOffset
        ];
        buffer.extend_from_slice(&windows_subtable);
        let mut source = MemorySource::new(buffer);

        let cmap = CmapTable::read(&mut source, 0).unwrap();
        assert_eq!(cmap.unicode_subtable().unwrap().platform_id, 3);
        assert_eq!(cmap.glyph_id(0x41), Some(1));
        assert_eq!(cmap.glyph_id(0x40), None);
    }

    #[test]
    fn format_4_delta_segment() {
        // 'A'..'Z' maps through idDelta -64, so 'A' (0x41) becomes glyph 1
        #[rustfmt::skip]
        let buffer = vec![
            0x00, 0x04, // format
            0x00, 0x20, // length 32
            0x00, 0x00, // language
            0x00, 0x04, // segCountX2
            0x00, 0x04, 0x00, 0x01, 0x00, 0x02, // legacy search fields
            0x00, 0x5a, 0xff, 0xff, // endCode
            0x00, 0x00, // reservedPad
            0x00, 0x41, 0xff, 0xff, // startCode
            0xff, 0xc0, 0x00, 0x01, // idDelta -64, 1
            0x00, 0x00, 0x00, 0x00, // idRangeOffset
        ];
        let mut source = MemorySource::new(buffer);
        source.seek(2).unwrap();

        let format = read_format_4(&mut source, 0).unwrap();
        assert_eq!(format.glyph_id(0x41), Some(1));
        assert_eq!(format.glyph_id(0x5a), Some(26));
        // below the first segment
        assert_eq!(format.glyph_id(0x40), None);
    }

    #[test]
    fn format_4_range_offset_segment() {
        // 'a' and 'b' map through the glyph index array to glyphs 5 and 6
        #[rustfmt::skip]
        let buffer = vec![
            0x00, 0x04, // format
            0x00, 0x24, // length 36
            0x00, 0x00, // language
            0x00, 0x04, // segCountX2
            0x00, 0x04, 0x00, 0x01, 0x00, 0x02, // legacy search fields
            0x00, 0x62, 0xff, 0xff, // endCode
            0x00, 0x00, // reservedPad
            0x00, 0x61, 0xff, 0xff, // startCode
            0x00, 0x00, 0x00, 0x01, // idDelta
            0x00, 0x04, 0x00, 0x00, // idRangeOffset
            0x00, 0x05, 0x00, 0x06, // glyphIndexArray
        ];
        let mut source = MemorySource::new(buffer);
        source.seek(2).unwrap();

        let format = read_format_4(&mut source, 0).unwrap();
        assert_eq!(format.glyph_id(0x61), Some(5));
        assert_eq!(format.glyph_id(0x62), Some(6));
    }

    #[test]
    fn format_6_trimmed_range() {
        #[rustfmt::skip]
        let mut source = MemorySource::new(vec![
            0x00, 0x0e, // length
            0x00, 0x00, // language
            0x00, 0x30, // firstCode '0'
            0x00, 0x02, // entryCount
            0x00, 0x11, 0x00, 0x12,
        ]);

        let format = read_format_6(&mut source).unwrap();
        assert_eq!(format.glyph_id(0x30), Some(17));
        assert_eq!(format.glyph_id(0x31), Some(18));
        assert_eq!(format.glyph_id(0x32), None);
        assert_eq!(format.glyph_id(0x2f), None);
    }

    #[test]
    fn format_12_groups() {
        #[rustfmt::skip]
        let mut source = MemorySource::new(vec![
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x1c, // length
            0x00, 0x00, 0x00, 0x00, // language
            0x00, 0x00, 0x00, 0x01, // one group
            0x00, 0x01, 0xf4, 0x00, // start 0x1f400
            0x00, 0x01, 0xf4, 0x02, // end
            0x00, 0x00, 0x00, 0x07, // start glyph 7
        ]);

        let format = read_format_12(&mut source).unwrap();
        assert_eq!(format.glyph_id(0x1f401), Some(8));
        assert_eq!(format.glyph_id(0x1f403), None);
    }

    #[test]
    fn unsupported_format_is_tolerated() {
        #[rustfmt::skip]
        let mut source = MemorySource::new(vec![
            0x00, 0x00, // version
            0x00, 0x01,
            0x00, 0x03, 0x00, 0x00, // platform 3, encoding 0
            0x00, 0x00, 0x00, 0x0c,
            0x00, 0x02, // format 2, not decoded
        ]);

        let cmap = CmapTable::read(&mut source, 0).unwrap();
        assert!(matches!(
            cmap.subtables[0].format,
            CmapFormat::Unsupported { format: 2 }
        ));
        assert_eq!(cmap.subtables[0].format.glyph_id(0x41), None);
    }
}
