use std::{collections::HashMap, fmt};

use crate::{
    data_source::DataSource,
    data_types::{Fixed, TableTag},
    error::{FontResult, ParseError},
    table::{
        CmapTable, DsigTable, GenericTable, GlyfTable, HeadTable, HheaTable, HmtxTable, LocaTable,
        MaxpTable, NameTable, OffsetSubtable, Os2Table, PostTable, Table, TableKind, TableRecord,
    },
};

/// Materialization state of one directory slot. A slot moves from `Unloaded`
/// to `Loaded` exactly once and never back
#[derive(Debug, PartialEq)]
pub enum TableState {
    Unloaded,
    Loaded(Table),
}

/// One directory entry together with whatever has been decoded from it
#[derive(Debug, PartialEq)]
pub struct TableSlot {
    pub record: TableRecord,
    pub kind: TableKind,
    pub state: TableState,
}

impl TableSlot {
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, TableState::Loaded(..))
    }
}

/// A parsed font: the directory slots in file order plus the source they
/// were read from.
///
/// Accessors materialize their table transparently, resolving decode
/// dependencies on other tables first, so a lazily parsed font behaves like
/// an eagerly parsed one on first access
pub struct TrueTypeFont {
    header: OffsetSubtable,
    source: Box<dyn DataSource>,
    embedded: bool,
    lazy: bool,
    slots: Vec<TableSlot>,
    index: HashMap<TableTag, usize>,
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("header", &self.header)
            .field("slots", &self.slots)
            .field("source", &format!("[ {} bytes ]", self.source.len()))
            .finish()
    }
}

impl TrueTypeFont {
    pub(crate) fn new(
        header: OffsetSubtable,
        source: Box<dyn DataSource>,
        embedded: bool,
        lazy: bool,
    ) -> Self {
        Self {
            header,
            source,
            embedded,
            lazy,
            slots: Vec::with_capacity(usize::from(header.number_of_tables)),
            index: HashMap::new(),
        }
    }

    /// Appends a stub slot for `record`, preserving file order. A duplicate
    /// tag replaces the earlier slot in place, so the later directory entry
    /// wins without changing the table's position in the sequence
    pub(crate) fn add_table(&mut self, record: TableRecord) {
        let slot = TableSlot {
            record,
            kind: TableKind::from_tag(record.tag),
            state: TableState::Unloaded,
        };

        match self.index.get(&record.tag) {
            Some(&slot_index) => {
                log::warn!("duplicate {} table; keeping the later entry", record.tag);
                self.slots[slot_index] = slot;
            }
            None => {
                self.slots.push(slot);
                self.index.insert(record.tag, self.slots.len() - 1);
            }
        }
    }

    /// The container header, legacy search fields included
    pub fn header(&self) -> &OffsetSubtable {
        &self.header
    }

    /// The container's scaler type ("sfnt version")
    pub fn version(&self) -> Fixed {
        self.header.scaler_type
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// All slots in file order
    pub fn tables(&self) -> &[TableSlot] {
        &self.slots
    }

    pub fn contains_table(&self, tag: TableTag) -> bool {
        self.index.contains_key(&tag)
    }

    pub fn table_record(&self, tag: TableTag) -> Option<&TableRecord> {
        self.index
            .get(&tag)
            .map(|&slot_index| &self.slots[slot_index].record)
    }

    /// Materializes every table, in file order
    pub(crate) fn read_all_tables(&mut self) -> FontResult<()> {
        // the slot count is fixed before the pass; materializing never adds
        // or removes slots
        for slot_index in 0..self.slots.len() {
            self.materialize(slot_index)?;
        }

        Ok(())
    }

    fn materialize(&mut self, slot_index: usize) -> FontResult<()> {
        if self.slots[slot_index].is_loaded() {
            return Ok(());
        }

        let saved_position = self.source.position();
        let table = self.decode_slot(slot_index)?;
        self.source.seek(saved_position)?;

        // setting Loaded is the final step; a decode failure above leaves
        // the slot Unloaded rather than half done
        self.slots[slot_index].state = TableState::Loaded(table);

        Ok(())
    }

    /// Materializes the table for `tag`, failing if the font does not have
    /// one. Used for tables another table cannot be decoded without
    fn require(&mut self, tag: TableTag) -> FontResult<usize> {
        let Some(&slot_index) = self.index.get(&tag) else {
            return Err(ParseError::MissingTable { tag });
        };
        self.materialize(slot_index)?;

        Ok(slot_index)
    }

    fn loaded_table(&self, slot_index: usize) -> Option<&Table> {
        match &self.slots[slot_index].state {
            TableState::Loaded(table) => Some(table),
            TableState::Unloaded => None,
        }
    }

    fn decode_slot(&mut self, slot_index: usize) -> FontResult<Table> {
        let record = self.slots[slot_index].record;
        let kind = self.slots[slot_index].kind;

        match kind {
            TableKind::Head => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Head(HeadTable::read(self.source.as_mut())?))
            }
            TableKind::Hhea => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Hhea(HheaTable::read(self.source.as_mut())?))
            }
            TableKind::Maxp => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Maxp(MaxpTable::read(self.source.as_mut())?))
            }
            TableKind::Hmtx => {
                let hhea_index = self.require(HheaTable::TAG)?;
                let number_of_h_metrics = match self.loaded_table(hhea_index) {
                    Some(Table::Hhea(hhea)) => hhea.number_of_h_metrics,
                    _ => return Err(ParseError::MissingTable { tag: HheaTable::TAG }),
                };
                let maxp_index = self.require(MaxpTable::TAG)?;
                let num_glyphs = match self.loaded_table(maxp_index) {
                    Some(Table::Maxp(maxp)) => maxp.num_glyphs,
                    _ => return Err(ParseError::MissingTable { tag: MaxpTable::TAG }),
                };

                self.source.seek(record.offset.into())?;

                Ok(Table::Hmtx(HmtxTable::read(
                    self.source.as_mut(),
                    record.length,
                    number_of_h_metrics,
                    num_glyphs,
                )?))
            }
            TableKind::Loca => {
                let head_index = self.require(HeadTable::TAG)?;
                let index_to_loc_format = match self.loaded_table(head_index) {
                    Some(Table::Head(head)) => head.index_to_loc_format,
                    _ => return Err(ParseError::MissingTable { tag: HeadTable::TAG }),
                };
                let maxp_index = self.require(MaxpTable::TAG)?;
                let num_glyphs = match self.loaded_table(maxp_index) {
                    Some(Table::Maxp(maxp)) => maxp.num_glyphs,
                    _ => return Err(ParseError::MissingTable { tag: MaxpTable::TAG }),
                };

                self.source.seek(record.offset.into())?;

                Ok(Table::Loca(LocaTable::read(
                    self.source.as_mut(),
                    index_to_loc_format,
                    num_glyphs,
                )?))
            }
            TableKind::Glyf => {
                let loca_index = self.require(LocaTable::TAG)?;
                // borrow the slot directly so the reader stays free for the
                // glyph pass below
                let loca = match &self.slots[loca_index].state {
                    TableState::Loaded(Table::Loca(loca)) => loca,
                    _ => return Err(ParseError::MissingTable { tag: LocaTable::TAG }),
                };

                Ok(Table::Glyf(GlyfTable::read(
                    self.source.as_mut(),
                    record.offset,
                    loca,
                )?))
            }
            TableKind::Cmap => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Cmap(CmapTable::read(
                    self.source.as_mut(),
                    record.offset,
                )?))
            }
            TableKind::Name => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Name(NameTable::read(
                    self.source.as_mut(),
                    record.offset,
                )?))
            }
            TableKind::Os2 => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Os2(Os2Table::read(
                    self.source.as_mut(),
                    record.length,
                )?))
            }
            TableKind::Post => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Post(PostTable::read(self.source.as_mut())?))
            }
            TableKind::Dsig => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Dsig(DsigTable::read(
                    self.source.as_mut(),
                    record.offset,
                )?))
            }
            TableKind::Generic => {
                self.source.seek(record.offset.into())?;

                Ok(Table::Generic(GenericTable::read(
                    self.source.as_mut(),
                    record.length,
                )?))
            }
        }
    }

    /// The decoded table for `tag`, materializing it first if need be.
    /// `Ok(None)` means the font simply has no such table
    pub fn table(&mut self, tag: TableTag) -> FontResult<Option<&Table>> {
        let Some(&slot_index) = self.index.get(&tag) else {
            return Ok(None);
        };
        self.materialize(slot_index)?;

        Ok(self.loaded_table(slot_index))
    }

    pub fn head(&mut self) -> FontResult<Option<&HeadTable>> {
        match self.table(HeadTable::TAG)? {
            Some(Table::Head(head)) => Ok(Some(head)),
            _ => Ok(None),
        }
    }

    pub fn hhea(&mut self) -> FontResult<Option<&HheaTable>> {
        match self.table(HheaTable::TAG)? {
            Some(Table::Hhea(hhea)) => Ok(Some(hhea)),
            _ => Ok(None),
        }
    }

    pub fn maxp(&mut self) -> FontResult<Option<&MaxpTable>> {
        match self.table(MaxpTable::TAG)? {
            Some(Table::Maxp(maxp)) => Ok(Some(maxp)),
            _ => Ok(None),
        }
    }

    pub fn hmtx(&mut self) -> FontResult<Option<&HmtxTable>> {
        match self.table(HmtxTable::TAG)? {
            Some(Table::Hmtx(hmtx)) => Ok(Some(hmtx)),
            _ => Ok(None),
        }
    }

    pub fn loca(&mut self) -> FontResult<Option<&LocaTable>> {
        match self.table(LocaTable::TAG)? {
            Some(Table::Loca(loca)) => Ok(Some(loca)),
            _ => Ok(None),
        }
    }

    pub fn glyf(&mut self) -> FontResult<Option<&GlyfTable>> {
        match self.table(GlyfTable::TAG)? {
            Some(Table::Glyf(glyf)) => Ok(Some(glyf)),
            _ => Ok(None),
        }
    }

    pub fn cmap(&mut self) -> FontResult<Option<&CmapTable>> {
        match self.table(CmapTable::TAG)? {
            Some(Table::Cmap(cmap)) => Ok(Some(cmap)),
            _ => Ok(None),
        }
    }

    pub fn name(&mut self) -> FontResult<Option<&NameTable>> {
        match self.table(NameTable::TAG)? {
            Some(Table::Name(name)) => Ok(Some(name)),
            _ => Ok(None),
        }
    }

    pub fn os2(&mut self) -> FontResult<Option<&Os2Table>> {
        match self.table(Os2Table::TAG)? {
            Some(Table::Os2(os2)) => Ok(Some(os2)),
            _ => Ok(None),
        }
    }

    pub fn post(&mut self) -> FontResult<Option<&PostTable>> {
        match self.table(PostTable::TAG)? {
            Some(Table::Post(post)) => Ok(Some(post)),
            _ => Ok(None),
        }
    }

    pub fn dsig(&mut self) -> FontResult<Option<&DsigTable>> {
        match self.table(DsigTable::TAG)? {
            Some(Table::Dsig(dsig)) => Ok(Some(dsig)),
            _ => Ok(None),
        }
    }

    /// The number of glyphs from `maxp`, or 0 when the font has none
    pub fn num_glyphs(&mut self) -> FontResult<u16> {
        Ok(self.maxp()?.map_or(0, |maxp| maxp.num_glyphs))
    }

    /// Design units per em from `head`, defaulting to the common 1000
    pub fn units_per_em(&mut self) -> FontResult<u16> {
        Ok(self.head()?.map_or(1000, |head| head.units_per_em))
    }

    pub fn advance_width(&mut self, glyph_id: u16) -> FontResult<u16> {
        Ok(self
            .hmtx()?
            .map_or(250, |hmtx| hmtx.advance_width(glyph_id)))
    }

    /// The raw bytes of a table as they sit in the source, whether or not
    /// the table has been decoded
    pub fn table_bytes(&mut self, tag: TableTag) -> FontResult<Option<Vec<u8>>> {
        let Some(&slot_index) = self.index.get(&tag) else {
            return Ok(None);
        };
        let record = self.slots[slot_index].record;

        let saved_position = self.source.position();
        self.source.seek(record.offset.into())?;
        let bytes = self.source.read_bytes(record.length as usize)?;
        self.source.seek(saved_position)?;

        Ok(Some(bytes))
    }
}
