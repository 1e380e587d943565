use std::path::Path;

use crate::{
    data_source::{DataSource, FileSource, MemorySource},
    data_types::TableTag,
    error::{FontResult, ParseError},
    font::TrueTypeFont,
    table::{
        CmapTable, GlyfTable, HeadTable, HheaTable, HmtxTable, LocaTable, MaxpTable, NameTable,
        OffsetSubtable, PostTable, TableRecord,
    },
};

/// Parser configuration, fixed for the lifetime of every font it produces.
///
/// `embedded` relaxes the mandatory-table rules for fonts that arrive inside
/// a larger document. `lazy` defers table decoding, and with it the
/// mandatory-table check, until a table is actually asked for
#[derive(Debug, Clone, Copy, Default)]
pub struct FontParser {
    embedded: bool,
    lazy: bool,
}

impl FontParser {
    /// Tables a standalone font cannot be used without, in the order they
    /// are checked. The second element marks those still required when the
    /// font is embedded; an embedding document can stand in for the
    /// metadata tables, but never for glyph storage or metrics
    const MANDATORY_TABLES: [(TableTag, bool); 9] = [
        (HeadTable::TAG, true),
        (HheaTable::TAG, true),
        (MaxpTable::TAG, true),
        (PostTable::TAG, false),
        (LocaTable::TAG, true),
        (GlyfTable::TAG, true),
        (HmtxTable::TAG, true),
        (NameTable::TAG, false),
        (CmapTable::TAG, false),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Marks parsed fonts as living inside a larger document, such as a
    /// subset font inside a print file
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// Defers table decoding until first access instead of materializing
    /// everything up front
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> FontResult<TrueTypeFont> {
        self.parse(Box::new(FileSource::open(path)?))
    }

    pub fn parse_bytes(&self, bytes: Vec<u8>) -> FontResult<TrueTypeFont> {
        self.parse(Box::new(MemorySource::new(bytes)))
    }

    /// Reads the offset subtable and the table directory, then hands the
    /// source over to the font. Eager parsing goes on to materialize every
    /// table and check that the mandatory ones are present; lazy parsing
    /// stops after the directory scan
    pub fn parse(&self, mut source: Box<dyn DataSource>) -> FontResult<TrueTypeFont> {
        let header = OffsetSubtable::read(source.as_mut())?;
        log::debug!("font directory lists {} tables", header.number_of_tables);

        let mut records = Vec::with_capacity(usize::from(header.number_of_tables));
        for _ in 0..header.number_of_tables {
            records.push(TableRecord::read(source.as_mut())?);
        }

        let mut font = TrueTypeFont::new(header, source, self.embedded, self.lazy);
        for record in records {
            font.add_table(record);
        }

        if !self.lazy {
            font.read_all_tables()?;
            self.check_mandatory_tables(&font)?;
        }

        Ok(font)
    }

    /// Fails with the first table in [`Self::MANDATORY_TABLES`] order that
    /// the font lacks, even when several are missing at once
    fn check_mandatory_tables(&self, font: &TrueTypeFont) -> FontResult<()> {
        for (tag, required_when_embedded) in Self::MANDATORY_TABLES {
            if self.embedded && !required_when_embedded {
                continue;
            }

            if !font.contains_table(tag) {
                return Err(ParseError::MissingTable { tag });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::table::{Glyph, Table};

    fn head_payload(index_to_loc_format: i16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        v.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
        v.extend_from_slice(&0u32.to_be_bytes()); // checkSumAdjustment
        v.extend_from_slice(&0x5f0f_3cf5u32.to_be_bytes()); // magicNumber
        v.extend_from_slice(&0u16.to_be_bytes()); // flags
        v.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
        v.extend_from_slice(&0i64.to_be_bytes()); // created
        v.extend_from_slice(&0i64.to_be_bytes()); // modified
        v.extend_from_slice(&(-50i16).to_be_bytes()); // xMin
        v.extend_from_slice(&(-200i16).to_be_bytes()); // yMin
        v.extend_from_slice(&1000i16.to_be_bytes()); // xMax
        v.extend_from_slice(&900i16.to_be_bytes()); // yMax
        v.extend_from_slice(&0u16.to_be_bytes()); // macStyle
        v.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
        v.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
        v.extend_from_slice(&index_to_loc_format.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
        v
    }

    fn hhea_payload(number_of_h_metrics: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        v.extend_from_slice(&800i16.to_be_bytes()); // ascender
        v.extend_from_slice(&(-200i16).to_be_bytes()); // descender
        v.extend_from_slice(&90i16.to_be_bytes()); // lineGap
        v.extend_from_slice(&600u16.to_be_bytes()); // advanceWidthMax
        v.extend_from_slice(&10i16.to_be_bytes()); // minLeftSideBearing
        v.extend_from_slice(&0i16.to_be_bytes()); // minRightSideBearing
        v.extend_from_slice(&500i16.to_be_bytes()); // xMaxExtent
        v.extend_from_slice(&1i16.to_be_bytes()); // caretSlopeRise
        v.extend_from_slice(&0i16.to_be_bytes()); // caretSlopeRun
        v.extend_from_slice(&0i16.to_be_bytes()); // caretOffset
        v.extend_from_slice(&[0u8; 8]); // reserved
        v.extend_from_slice(&0i16.to_be_bytes()); // metricDataFormat
        v.extend_from_slice(&number_of_h_metrics.to_be_bytes());
        v
    }

    fn maxp_payload(num_glyphs: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        v.extend_from_slice(&num_glyphs.to_be_bytes());
        v.extend_from_slice(&[0u8; 26]); // remaining profile limits
        v
    }

    fn hmtx_payload() -> Vec<u8> {
        let mut v = Vec::new();
        for (advance, bearing) in [(500u16, 10i16), (600, 20)] {
            v.extend_from_slice(&advance.to_be_bytes());
            v.extend_from_slice(&bearing.to_be_bytes());
        }
        v
    }

    // short format, offsets stored halved: glyph 0 is empty, glyph 1 spans
    // the first 26 bytes of glyf
    fn loca_payload() -> Vec<u8> {
        [0u16, 0, 13].iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    // glyph 1 is one triangular contour; the apex height is the only part
    // that varies between fixtures
    fn glyf_payload(apex_y: i16) -> Vec<u8> {
        #[rustfmt::skip]
        let mut v = vec![
            0x00, 0x01, // numberOfContours
            0x00, 0x00, 0x00, 0x00, 0x01, 0xf4, 0x01, 0xf4, // bounds
            0x00, 0x02, // endPtsOfContours
            0x00, 0x00, // instructionLength
            0x37, 0x21, 0x01, // flags
            0x00, // x0 +0
            0x01, 0xf4, // x1 +500
            0xff, 0x06, // x2 -250
            0x00, // y0 +0
        ];
        v.extend_from_slice(&apex_y.to_be_bytes()); // y2 (y1 repeats y0)
        v.push(0); // pad to the even length short loca offsets need
        v
    }

    fn post_payload() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0x0003_0000u32.to_be_bytes()); // no glyph names
        v.extend_from_slice(&0u32.to_be_bytes()); // italicAngle
        v.extend_from_slice(&0u16.to_be_bytes()); // underlinePosition
        v.extend_from_slice(&0u16.to_be_bytes()); // underlineThickness
        v.extend_from_slice(&0u32.to_be_bytes()); // isFixedPitch
        v.extend_from_slice(&[0u8; 16]); // memory usage hints
        v
    }

    fn name_payload() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0u16.to_be_bytes()); // format
        v.extend_from_slice(&0u16.to_be_bytes()); // count
        v.extend_from_slice(&6u16.to_be_bytes()); // stringOffset
        v
    }

    // version 0 with a single Macintosh Roman byte-encoding subtable
    fn cmap_payload() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&0u16.to_be_bytes()); // version
        v.extend_from_slice(&1u16.to_be_bytes()); // numberSubtables
        v.extend_from_slice(&1u16.to_be_bytes()); // platformID
        v.extend_from_slice(&0u16.to_be_bytes()); // platformSpecificID
        v.extend_from_slice(&12u32.to_be_bytes()); // offset
        v.extend_from_slice(&0u16.to_be_bytes()); // format
        v.extend_from_slice(&262u16.to_be_bytes()); // length
        v.extend_from_slice(&0u16.to_be_bytes()); // language
        let mut glyph_ids = [0u8; 256];
        glyph_ids[b'A' as usize] = 1;
        v.extend_from_slice(&glyph_ids);
        v
    }

    /// Lays out a complete font image: offset subtable, directory records,
    /// then the payloads padded to four-byte boundaries. Checksums are left
    /// zero; nothing in the parser verifies them
    fn build_font(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let number_of_tables = tables.len() as u16;
        let mut entry_selector = 0u16;
        while number_of_tables != 0 && 1u16 << (entry_selector + 1) <= number_of_tables {
            entry_selector += 1;
        }
        let search_range = if number_of_tables == 0 {
            0
        } else {
            (1u16 << entry_selector) * 16
        };

        let mut image = Vec::new();
        image.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // scaler type
        image.extend_from_slice(&number_of_tables.to_be_bytes());
        image.extend_from_slice(&search_range.to_be_bytes());
        image.extend_from_slice(&entry_selector.to_be_bytes());
        image.extend_from_slice(&(number_of_tables * 16 - search_range).to_be_bytes());

        let mut offset = 12 + 16 * tables.len() as u32;
        for (tag, payload) in tables {
            let padded = (payload.len() + 3) & !3;
            image.extend_from_slice(*tag);
            image.extend_from_slice(&0u32.to_be_bytes()); // checksum
            image.extend_from_slice(&offset.to_be_bytes());
            image.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            offset += padded as u32;
        }
        for (_, payload) in tables {
            let padded = (payload.len() + 3) & !3;
            image.extend_from_slice(payload);
            image.resize(image.len() + (padded - payload.len()), 0);
        }

        image
    }

    fn core_tables(apex_y: i16) -> Vec<(&'static [u8; 4], Vec<u8>)> {
        vec![
            (b"head", head_payload(0)),
            (b"hhea", hhea_payload(2)),
            (b"maxp", maxp_payload(2)),
            (b"hmtx", hmtx_payload()),
            (b"loca", loca_payload()),
            (b"glyf", glyf_payload(apex_y)),
        ]
    }

    #[test]
    fn eager_and_lazy_parses_decode_identically() {
        let mut tables = core_tables(500);
        tables.push((b"post", post_payload()));
        tables.push((b"name", name_payload()));
        tables.push((b"cmap", cmap_payload()));
        let image = build_font(&tables);

        let eager = FontParser::new().parse_bytes(image.clone()).unwrap();
        assert!(eager.tables().iter().all(|slot| slot.is_loaded()));

        let mut lazy = FontParser::new().lazy(true).parse_bytes(image).unwrap();
        assert!(lazy.tables().iter().all(|slot| !slot.is_loaded()));
        let tags: Vec<_> = lazy.tables().iter().map(|slot| slot.record.tag).collect();
        for tag in tags {
            lazy.table(tag).unwrap();
        }

        assert_eq!(eager.tables(), lazy.tables());
    }

    #[test]
    fn directory_order_is_preserved() {
        let image = build_font(&core_tables(500));
        let mut font = FontParser::new().embedded(true).parse_bytes(image).unwrap();

        let tags: Vec<String> = font
            .tables()
            .iter()
            .map(|slot| slot.record.tag.to_string())
            .collect();
        assert_eq!(tags, ["head", "hhea", "maxp", "hmtx", "loca", "glyf"]);

        assert!(matches!(
            font.table(MaxpTable::TAG).unwrap(),
            Some(Table::Maxp(_))
        ));
        assert_eq!(font.num_glyphs().unwrap(), 2);
        assert_eq!(font.units_per_em().unwrap(), 1000);
        assert_eq!(font.advance_width(1).unwrap(), 600);
    }

    #[test]
    fn missing_loca_is_reported_by_name() {
        // loca and glyf are both absent; loca is the first gap in the
        // check order
        let image = build_font(&[
            (b"head", head_payload(0)),
            (b"hhea", hhea_payload(2)),
            (b"maxp", maxp_payload(2)),
            (b"hmtx", hmtx_payload()),
            (b"post", post_payload()),
            (b"name", name_payload()),
            (b"cmap", cmap_payload()),
        ]);

        let err = FontParser::new().parse_bytes(image).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingTable { tag } if tag == LocaTable::TAG
        ));
    }

    #[test]
    fn embedded_fonts_may_omit_metadata_tables() {
        // post, name, and cmap are all missing
        let image = build_font(&core_tables(500));

        let font = FontParser::new()
            .embedded(true)
            .parse_bytes(image.clone())
            .unwrap();
        assert!(font.is_embedded());

        let err = FontParser::new().parse_bytes(image).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingTable { tag } if tag == PostTable::TAG
        ));
    }

    #[test]
    fn missing_cmap_is_reported_by_name() {
        let mut tables = core_tables(500);
        tables.push((b"post", post_payload()));
        tables.push((b"name", name_payload()));
        let image = build_font(&tables);

        let err = FontParser::new().parse_bytes(image).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingTable { tag } if tag == CmapTable::TAG
        ));
    }

    #[test]
    fn first_missing_table_in_check_order_wins() {
        // name and cmap are both absent; name sits earlier in the check
        // order, so it is the one reported
        let mut tables = core_tables(500);
        tables.push((b"post", post_payload()));
        let image = build_font(&tables);

        let err = FontParser::new().parse_bytes(image).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingTable { tag } if tag == NameTable::TAG
        ));
    }

    #[test]
    fn font_with_no_tables_fails_validation_on_head() {
        let err = FontParser::new().parse_bytes(build_font(&[])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingTable { tag } if tag == HeadTable::TAG
        ));
    }

    #[test]
    fn duplicate_directory_entries_keep_the_later_one() {
        let mut tables = core_tables(500);
        tables.push((b"glyf", glyf_payload(700)));
        let image = build_font(&tables);

        // the duplicate is the seventh record; its offset field sits at
        // 12 + 16 * 6 + 8
        let later_offset =
            u32::from_be_bytes(image[12 + 16 * 6 + 8..][..4].try_into().unwrap());

        let mut font = FontParser::new().embedded(true).parse_bytes(image).unwrap();
        let glyf_slots = font
            .tables()
            .iter()
            .filter(|slot| slot.record.tag == GlyfTable::TAG)
            .count();
        assert_eq!(glyf_slots, 1);
        assert_eq!(
            font.table_record(GlyfTable::TAG).unwrap().offset,
            later_offset
        );

        let glyph = match font.glyf().unwrap().unwrap().glyph(1) {
            Some(Glyph::Simple(glyph)) => glyph,
            other => panic!("expected a simple glyph, got {:?}", other),
        };
        assert_eq!(glyph.y_coords, vec![0, 0, 700]);
    }

    #[test]
    fn out_of_range_table_fails_only_at_materialization() {
        let mut image = build_font(&[(b"wxyz", vec![1, 2, 3, 4])]);
        // rewrite the record's offset field to point far past the end of
        // the image
        image[12 + 8..12 + 12].copy_from_slice(&0x0004_0000u32.to_be_bytes());

        let mut font = FontParser::new()
            .lazy(true)
            .parse_bytes(image.clone())
            .unwrap();
        assert_eq!(font.tables().len(), 1);
        assert!(!font.tables()[0].is_loaded());

        let err = font.table(TableTag::new(*b"wxyz")).unwrap_err();
        assert!(matches!(err, ParseError::SeekOutOfBounds { .. }));

        // an eager parse of the same bytes trips over the same seek
        let err = FontParser::new().parse_bytes(image).unwrap_err();
        assert!(matches!(err, ParseError::SeekOutOfBounds { .. }));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let path = std::env::temp_dir().join("truetype_parser_test.ttf");
        std::fs::write(&path, build_font(&core_tables(500))).unwrap();

        let mut font = FontParser::new()
            .embedded(true)
            .lazy(true)
            .parse_file(&path)
            .unwrap();
        assert_eq!(font.units_per_em().unwrap(), 1000);
        assert_eq!(font.num_glyphs().unwrap(), 2);

        std::fs::remove_file(path).ok();
    }
}
