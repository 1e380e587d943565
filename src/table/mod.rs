use crate::{data_source::DataSource, data_types::TableTag, error::FontResult};

mod cmap;
mod directory;
mod dsig;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod loca;
mod maxp;
mod name;
mod os2;
mod post;

pub use cmap::{CmapFormat, CmapSubtable, CmapTable, SequentialMapGroup};
pub use directory::{OffsetSubtable, TableRecord};
pub use dsig::{DsigTable, SignatureRecord};
pub use glyf::{
    ComponentFlags, ComponentTransform, CompoundGlyph, GlyfTable, Glyph, GlyphBounds,
    GlyphComponent, OutlineFlag, SimpleGlyph,
};
pub use head::{HeadTable, MacStyle};
pub use hhea::HheaTable;
pub use hmtx::HmtxTable;
pub use loca::{GlyphLocation, LocaTable};
pub use maxp::MaxpTable;
pub use name::{NameRecord, NameTable};
pub use os2::Os2Table;
pub use post::{MAC_GLYPH_NAMES, PostTable};

/// The closed set of table kinds this parser gives a dedicated decoder.
///
/// Every tag maps to exactly one kind; anything unrecognized, vendor tags
/// included, is `Generic`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Head,
    Hhea,
    Hmtx,
    Loca,
    Maxp,
    Glyf,
    Cmap,
    Name,
    Os2,
    Post,
    Dsig,
    Generic,
}

impl TableKind {
    pub fn from_tag(tag: TableTag) -> Self {
        match tag {
            HeadTable::TAG => Self::Head,
            HheaTable::TAG => Self::Hhea,
            HmtxTable::TAG => Self::Hmtx,
            LocaTable::TAG => Self::Loca,
            MaxpTable::TAG => Self::Maxp,
            GlyfTable::TAG => Self::Glyf,
            CmapTable::TAG => Self::Cmap,
            NameTable::TAG => Self::Name,
            Os2Table::TAG => Self::Os2,
            PostTable::TAG => Self::Post,
            DsigTable::TAG => Self::Dsig,
            _ => Self::Generic,
        }
    }
}

/// A fully decoded table payload
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Head(HeadTable),
    Hhea(HheaTable),
    Hmtx(HmtxTable),
    Loca(LocaTable),
    Maxp(MaxpTable),
    Glyf(GlyfTable),
    Cmap(CmapTable),
    Name(NameTable),
    Os2(Os2Table),
    Post(PostTable),
    Dsig(DsigTable),
    Generic(GenericTable),
}

impl Table {
    pub fn kind(&self) -> TableKind {
        match self {
            Self::Head(..) => TableKind::Head,
            Self::Hhea(..) => TableKind::Hhea,
            Self::Hmtx(..) => TableKind::Hmtx,
            Self::Loca(..) => TableKind::Loca,
            Self::Maxp(..) => TableKind::Maxp,
            Self::Glyf(..) => TableKind::Glyf,
            Self::Cmap(..) => TableKind::Cmap,
            Self::Name(..) => TableKind::Name,
            Self::Os2(..) => TableKind::Os2,
            Self::Post(..) => TableKind::Post,
            Self::Dsig(..) => TableKind::Dsig,
            Self::Generic(..) => TableKind::Generic,
        }
    }
}

/// An opaque passthrough for tags without a dedicated decoder; the payload
/// is kept byte for byte
#[derive(Debug, Clone, PartialEq)]
pub struct GenericTable {
    pub data: Vec<u8>,
}

impl GenericTable {
    pub fn read(source: &mut dyn DataSource, length: u32) -> FontResult<Self> {
        let data = source.read_bytes(length as usize)?;

        Ok(Self { data })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_source::MemorySource;

    #[test]
    fn tag_dispatch_is_total() {
        assert_eq!(TableKind::from_tag(TableTag::new(*b"head")), TableKind::Head);
        assert_eq!(TableKind::from_tag(TableTag::new(*b"glyf")), TableKind::Glyf);
        assert_eq!(TableKind::from_tag(TableTag::new(*b"OS/2")), TableKind::Os2);
        assert_eq!(TableKind::from_tag(TableTag::new(*b"DSIG")), TableKind::Dsig);
        // vendor and unknown tags degrade instead of failing
        assert_eq!(
            TableKind::from_tag(TableTag::new(*b"kern")),
            TableKind::Generic
        );
        assert_eq!(
            TableKind::from_tag(TableTag::new([0xff, 0x00, 0x20, 0x7f])),
            TableKind::Generic
        );
    }

    #[test]
    fn generic_table_keeps_raw_bytes() {
        let mut source = MemorySource::new(vec![1, 2, 3, 4, 5]);

        let table = GenericTable::read(&mut source, 4).unwrap();
        assert_eq!(table.data, vec![1, 2, 3, 4]);
    }
}
