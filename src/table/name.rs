use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

/// Human-readable metadata strings, keyed by name id and platform
#[derive(Debug, Clone, PartialEq)]
pub struct NameTable {
    pub format: u16,
    pub string_offset: u16,
    pub name_records: Vec<NameRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameRecord {
    /// Platform identifier code.
    pub platform_id: u16,
    /// Platform-specific encoding identifier.
    pub platform_specific_id: u16,
    /// Language identifier.
    pub language_id: u16,
    /// Name identifier.
    pub name_id: u16,
    /// Name string length in bytes.
    pub length: u16,
    /// Name string offset in bytes from stringOffset.
    pub offset: u16,
    /// The decoded string itself
    pub string: String,
}

impl NameRecord {
    pub const FONT_FAMILY: u16 = 1;
    pub const FONT_SUBFAMILY: u16 = 2;
    pub const FULL_NAME: u16 = 4;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

impl NameTable {
    pub const TAG: TableTag = TableTag::new(*b"name");

    pub fn read(source: &mut dyn DataSource, table_offset: u32) -> FontResult<Self> {
        let format = source.read_u16()?;
        let count = source.read_u16()?;
        let string_offset = source.read_u16()?;

        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let platform_id = source.read_u16()?;
            let platform_specific_id = source.read_u16()?;
            let language_id = source.read_u16()?;
            let name_id = source.read_u16()?;
            let length = source.read_u16()?;
            let offset = source.read_u16()?;

            records.push((
                platform_id,
                platform_specific_id,
                language_id,
                name_id,
                length,
                offset,
            ));
        }

        let storage_start = u64::from(table_offset) + u64::from(string_offset);

        let mut name_records = Vec::with_capacity(usize::from(count));
        for (platform_id, platform_specific_id, language_id, name_id, length, offset) in records {
            source.seek(storage_start + u64::from(offset))?;
            let bytes = source.read_bytes(usize::from(length))?;
            let string = decode_string(platform_id, platform_specific_id, &bytes);

            name_records.push(NameRecord {
                platform_id,
                platform_specific_id,
                language_id,
                name_id,
                length,
                offset,
                string,
            });
        }

        Ok(Self {
            format,
            string_offset,
            name_records,
        })
    }

    /// The string for `name_id`, preferring the Windows US-English record
    /// when the font carries more than one
    pub fn name(&self, name_id: u16) -> Option<&str> {
        let preferred = self.name_records.iter().find(|record| {
            record.name_id == name_id
                && record.platform_id == 3
                && record.platform_specific_id == 1
                && record.language_id == 0x409
        });

        preferred
            .or_else(|| {
                self.name_records
                    .iter()
                    .find(|record| record.name_id == name_id)
            })
            .map(|record| record.string.as_str())
    }

    pub fn font_family(&self) -> Option<&str> {
        self.name(NameRecord::FONT_FAMILY)
    }

    pub fn font_subfamily(&self) -> Option<&str> {
        self.name(NameRecord::FONT_SUBFAMILY)
    }

    pub fn postscript_name(&self) -> Option<&str> {
        self.name(NameRecord::POSTSCRIPT_NAME)
    }
}

fn decode_string(platform_id: u16, platform_specific_id: u16, bytes: &[u8]) -> String {
    match (platform_id, platform_specific_id) {
        (0, _) | (3, 0 | 1 | 10) => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();

            String::from_utf16_lossy(&units)
        }
        // remaining platforms are close enough to Latin-1 for metadata
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
