use crate::{
    data_source::DataSource,
    data_types::{Fixed, FWord, TableTag},
    error::{FontResult, ParseError},
};

/// PostScript printing data, chiefly the glyph-name list
#[derive(Debug, Clone, PartialEq)]
pub struct PostTable {
    pub format: Fixed,
    pub italic_angle: Fixed,
    pub underline_position: FWord,
    pub underline_thickness: FWord,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,

    /// `None` for format 3.0, which deliberately stores no names
    pub glyph_names: Option<Vec<String>>,
}

impl PostTable {
    pub const TAG: TableTag = TableTag::new(*b"post");

    pub fn read(source: &mut dyn DataSource) -> FontResult<Self> {
        let format = source.read_fixed()?;
        let italic_angle = source.read_fixed()?;
        let underline_position = source.read_fword()?;
        let underline_thickness = source.read_fword()?;
        let is_fixed_pitch = source.read_u32()?;
        let min_mem_type42 = source.read_u32()?;
        let max_mem_type42 = source.read_u32()?;
        let min_mem_type1 = source.read_u32()?;
        let max_mem_type1 = source.read_u32()?;

        let glyph_names = match format.0 {
            0x0001_0000 => Some(
                MAC_GLYPH_NAMES
                    .iter()
                    .map(|&name| name.to_owned())
                    .collect(),
            ),
            0x0002_0000 => Some(read_format_2_names(source)?),
            0x0002_5000 => Some(read_format_2_5_names(source)?),
            0x0003_0000 => None,
            other => {
                return Err(ParseError::InvalidFormat {
                    tag: Self::TAG,
                    format: other.into(),
                })
            }
        };

        Ok(Self {
            format,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            min_mem_type42,
            max_mem_type42,
            min_mem_type1,
            max_mem_type1,
            glyph_names,
        })
    }

    pub fn glyph_name(&self, glyph_id: u16) -> Option<&str> {
        self.glyph_names
            .as_ref()?
            .get(usize::from(glyph_id))
            .map(String::as_str)
    }
}

fn read_format_2_names(source: &mut dyn DataSource) -> FontResult<Vec<String>> {
    let num_glyphs = source.read_u16()?;

    let mut glyph_name_index = Vec::with_capacity(usize::from(num_glyphs));
    let mut max_index = None::<u16>;
    for _ in 0..num_glyphs {
        let index = source.read_u16()?;
        glyph_name_index.push(index);

        // indices above 32767 are reserved
        if index <= 32767 {
            max_index = Some(max_index.map_or(index, |max| max.max(index)));
        }
    }

    let mut new_names = Vec::new();
    if let Some(max_index) = max_index {
        if max_index >= 258 {
            let number_new_glyphs = usize::from(max_index) - 257;

            for _ in 0..number_new_glyphs {
                let number_of_chars = source.read_u8()?;
                let bytes = source.read_bytes(usize::from(number_of_chars))?;
                new_names.push(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }

    let names = glyph_name_index
        .iter()
        .map(|&index| match usize::from(index) {
            i if i < MAC_GLYPH_NAMES.len() => MAC_GLYPH_NAMES[i].to_owned(),
            i if i <= 32767 => match new_names.get(i - MAC_GLYPH_NAMES.len()) {
                Some(name) => name.clone(),
                None => {
                    log::warn!("glyph name index {} is out of range", index);

                    ".undefined".to_owned()
                }
            },
            _ => ".undefined".to_owned(),
        })
        .collect();

    Ok(names)
}

fn read_format_2_5_names(source: &mut dyn DataSource) -> FontResult<Vec<String>> {
    let num_glyphs = source.read_u16()?;

    let mut names = Vec::with_capacity(usize::from(num_glyphs));
    for glyph_id in 0..i32::from(num_glyphs) {
        let offset = source.read_u8()? as i8;
        let index = glyph_id + i32::from(offset);

        let name = usize::try_from(index)
            .ok()
            .and_then(|index| MAC_GLYPH_NAMES.get(index))
            .map_or_else(|| ".undefined".to_owned(), |&name| name.to_owned());

        names.push(name);
    }

    Ok(names)
}

/// Glyph names in the standard Macintosh ordering. Format 1.0 uses this list
/// verbatim; formats 2.0 and 2.5 index into it
pub const MAC_GLYPH_NAMES: [&str; 258] = [
    ".notdef",
    ".null",
    "nonmarkingreturn",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quotesingle",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "grave",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
    "Adieresis",
    "Aring",
    "Ccedilla",
    "Eacute",
    "Ntilde",
    "Odieresis",
    "Udieresis",
    "aacute",
    "agrave",
    "acircumflex",
    "adieresis",
    "atilde",
    "aring",
    "ccedilla",
    "eacute",
    "egrave",
    "ecircumflex",
    "edieresis",
    "iacute",
    "igrave",
    "icircumflex",
    "idieresis",
    "ntilde",
    "oacute",
    "ograve",
    "ocircumflex",
    "odieresis",
    "otilde",
    "uacute",
    "ugrave",
    "ucircumflex",
    "udieresis",
    "dagger",
    "degree",
    "cent",
    "sterling",
    "section",
    "bullet",
    "paragraph",
    "germandbls",
    "registered",
    "copyright",
    "trademark",
    "acute",
    "dieresis",
    "notequal",
    "AE",
    "Oslash",
    "infinity",
    "plusminus",
    "lessequal",
    "greaterequal",
    "yen",
    "mu",
    "partialdiff",
    "summation",
    "product",
    "pi",
    "integral",
    "ordfeminine",
    "ordmasculine",
    "Omega",
    "ae",
    "oslash",
    "questiondown",
    "exclamdown",
    "logicalnot",
    "radical",
    "florin",
    "approxequal",
    "Delta",
    "guillemotleft",
    "guillemotright",
    "ellipsis",
    "nonbreakingspace",
    "Agrave",
    "Atilde",
    "Otilde",
    "OE",
    "oe",
    "endash",
    "emdash",
    "quotedblleft",
    "quotedblright",
    "quoteleft",
    "quoteright",
    "divide",
    "lozenge",
    "ydieresis",
    "Ydieresis",
    "fraction",
    "currency",
    "guilsinglleft",
    "guilsinglright",
    "fi",
    "fl",
    "daggerdbl",
    "periodcentered",
    "quotesinglbase",
    "quotedblbase",
    "perthousand",
    "Acircumflex",
    "Ecircumflex",
    "Aacute",
    "Edieresis",
    "Egrave",
    "Iacute",
    "Icircumflex",
    "Idieresis",
    "Igrave",
    "Oacute",
    "Ocircumflex",
    "apple",
    "Ograve",
    "Uacute",
    "Ucircumflex",
    "Ugrave",
    "dotlessi",
    "circumflex",
    "tilde",
    "macron",
    "breve",
    "dotaccent",
    "ring",
    "cedilla",
    "hungarumlaut",
    "ogonek",
    "caron",
    "Lslash",
    "lslash",
    "Scaron",
    "scaron",
    "Zcaron",
    "zcaron",
    "brokenbar",
    "Eth",
    "eth",
    "Yacute",
    "yacute",
    "Thorn",
    "thorn",
    "minus",
    "multiply",
    "onesuperior",
    "twosuperior",
    "threesuperior",
    "onehalf",
    "onequarter",
    "threequarters",
    "franc",
    "Gbreve",
    "gbreve",
    "Idotaccent",
    "Scedilla",
    "scedilla",
    "Cacute",
    "cacute",
    "Ccaron",
    "ccaron",
    "dcroat",
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_source::MemorySource;

    fn post_header(format: i32) -> Vec<u8> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&format.to_be_bytes());
        buffer.extend_from_slice(&0i32.to_be_bytes()); // italicAngle
        buffer.extend_from_slice(&(-75i16).to_be_bytes()); // underlinePosition
        buffer.extend_from_slice(&50i16.to_be_bytes()); // underlineThickness
        buffer.extend_from_slice(&[0; 20]); // isFixedPitch + memory usage

        buffer
    }

    #[test]
    fn format_1_standard_names() {
        let mut source = MemorySource::new(post_header(0x0001_0000));

        let post = PostTable::read(&mut source).unwrap();
        assert_eq!(post.underline_position, FWord(-75));
        assert_eq!(post.glyph_name(0), Some(".notdef"));
        assert_eq!(post.glyph_name(36), Some("A"));
        assert_eq!(post.glyph_name(257), Some("dcroat"));
        assert_eq!(post.glyph_name(258), None);
    }

    #[test]
    fn format_2_custom_names() {
        let mut buffer = post_header(0x0002_0000);
        buffer.extend_from_slice(&3u16.to_be_bytes()); // numGlyphs
        buffer.extend_from_slice(&0u16.to_be_bytes()); // .notdef
        buffer.extend_from_slice(&3u16.to_be_bytes()); // space
        buffer.extend_from_slice(&258u16.to_be_bytes()); // first custom name
        buffer.push(5);
        buffer.extend_from_slice(b"alpha");
        let mut source = MemorySource::new(buffer);

        let post = PostTable::read(&mut source).unwrap();
        assert_eq!(post.glyph_name(0), Some(".notdef"));
        assert_eq!(post.glyph_name(1), Some("space"));
        assert_eq!(post.glyph_name(2), Some("alpha"));
    }

    #[test]
    fn format_3_has_no_names() {
        let mut source = MemorySource::new(post_header(0x0003_0000));

        let post = PostTable::read(&mut source).unwrap();
        assert!(post.glyph_names.is_none());
        assert_eq!(post.glyph_name(0), None);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut source = MemorySource::new(post_header(0x0004_0000));

        assert!(matches!(
            PostTable::read(&mut source),
            Err(ParseError::InvalidFormat {
                format: 0x0004_0000,
                ..
            })
        ));
    }

    #[test]
    fn format_2_5_offsets() {
        let mut buffer = post_header(0x0002_5000);
        buffer.extend_from_slice(&2u16.to_be_bytes()); // numGlyphs
        buffer.push(0); // glyph 0 keeps index 0
        buffer.push(2); // glyph 1 + 2 = index 3, space
        let mut source = MemorySource::new(buffer);

        let post = PostTable::read(&mut source).unwrap();
        assert_eq!(post.glyph_name(0), Some(".notdef"));
        assert_eq!(post.glyph_name(1), Some("space"));
    }
}
