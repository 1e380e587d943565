use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

/// Digital signature records. Blocks are carried as raw bytes; nothing here
/// verifies them
#[derive(Debug, Clone, PartialEq)]
pub struct DsigTable {
    pub version: u32,
    pub flags: u16,
    pub signatures: Vec<SignatureRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureRecord {
    pub format: u32,
    pub length: u32,

    /// Byte offset of the block from the beginning of the table
    pub offset: u32,

    /// The uninterpreted signature block
    pub data: Vec<u8>,
}

impl DsigTable {
    pub const TAG: TableTag = TableTag::new(*b"DSIG");

    pub fn read(source: &mut dyn DataSource, table_offset: u32) -> FontResult<Self> {
        let version = source.read_u32()?;
        let num_signatures = source.read_u16()?;
        let flags = source.read_u16()?;

        let mut records = Vec::with_capacity(usize::from(num_signatures));
        for _ in 0..num_signatures {
            let format = source.read_u32()?;
            let length = source.read_u32()?;
            let offset = source.read_u32()?;

            records.push((format, length, offset));
        }

        let mut signatures = Vec::with_capacity(usize::from(num_signatures));
        for (format, length, offset) in records {
            source.seek(u64::from(table_offset) + u64::from(offset))?;
            let data = source.read_bytes(length as usize)?;

            signatures.push(SignatureRecord {
                format,
                length,
                offset,
                data,
            });
        }

        Ok(Self {
            version,
            flags,
            signatures,
        })
    }
}
