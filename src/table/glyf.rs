use crate::{
    data_source::DataSource,
    data_types::{F2Dot14, FWord, TableTag},
    error::FontResult,
    table::loca::LocaTable,
};

/// Every glyph outline in the font, in glyph-id order
#[derive(Debug, Clone, PartialEq)]
pub struct GlyfTable {
    pub glyphs: Vec<Glyph>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    /// A glyph with no outline at all, such as the space
    Empty,
    Simple(SimpleGlyph),
    Compound(CompoundGlyph),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBounds {
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleGlyph {
    pub bounds: GlyphBounds,

    /// Array of last points of each contour; array entries are point indices
    pub end_points_of_contours: Vec<u16>,

    pub instructions: Vec<u8>,
    pub flags: Vec<u8>,

    /// Absolute x-coordinates, accumulated from the deltas in the file
    pub x_coords: Vec<i16>,

    /// Absolute y-coordinates, accumulated from the deltas in the file
    pub y_coords: Vec<i16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundGlyph {
    pub bounds: GlyphBounds,
    pub components: Vec<GlyphComponent>,
    pub instructions: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphComponent {
    pub flags: ComponentFlags,

    /// Glyph index of component
    pub glyph_index: u16,

    /// X-offset for component or point number; meaning depends on
    /// ARGS_ARE_XY_VALUES
    pub argument_one: i32,

    /// Y-offset for component or point number; meaning depends on
    /// ARGS_ARE_XY_VALUES
    pub argument_two: i32,

    pub transform: ComponentTransform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentTransform {
    None,
    Scale(F2Dot14),
    ScaleXy { x: F2Dot14, y: F2Dot14 },
    TwoByTwo {
        x_scale: F2Dot14,
        scale01: F2Dot14,
        scale10: F2Dot14,
        y_scale: F2Dot14,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineFlag(pub u8);

impl OutlineFlag {
    pub const ON_CURVE: u8 = 1 << 0;
    pub const X_SHORT_VECTOR: u8 = 1 << 1;
    pub const Y_SHORT_VECTOR: u8 = 1 << 2;
    pub const REPEAT: u8 = 1 << 3;
    pub const X_SAME_OR_POSITIVE: u8 = 1 << 4;
    pub const Y_SAME_OR_POSITIVE: u8 = 1 << 5;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentFlags(pub u16);

impl ComponentFlags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
    pub const ARGS_ARE_XY_VALUES: u16 = 1 << 1;
    pub const ROUND_XY_TO_GRID: u16 = 1 << 2;
    pub const WE_HAVE_A_SCALE: u16 = 1 << 3;
    pub const MORE_COMPONENTS: u16 = 1 << 5;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
    pub const WE_HAVE_INSTRUCTIONS: u16 = 1 << 8;
    pub const USE_MY_METRICS: u16 = 1 << 9;
}

impl GlyfTable {
    pub const TAG: TableTag = TableTag::new(*b"glyf");

    pub fn read(
        source: &mut dyn DataSource,
        table_offset: u32,
        loca: &LocaTable,
    ) -> FontResult<Self> {
        let num_glyphs = loca.num_glyphs();
        let mut glyphs = Vec::with_capacity(usize::from(num_glyphs));

        for glyph_id in 0..num_glyphs {
            let glyph = match loca.glyph_location(glyph_id) {
                Some(location) => {
                    source.seek(u64::from(table_offset) + u64::from(location.offset))?;
                    read_glyph(source)?
                }
                None => Glyph::Empty,
            };

            glyphs.push(glyph);
        }

        Ok(Self { glyphs })
    }

    pub fn glyph(&self, glyph_id: u16) -> Option<&Glyph> {
        self.glyphs.get(usize::from(glyph_id))
    }
}

fn read_glyph(source: &mut dyn DataSource) -> FontResult<Glyph> {
    let number_of_contours = source.read_i16()?;
    let bounds = GlyphBounds {
        x_min: source.read_fword()?,
        y_min: source.read_fword()?,
        x_max: source.read_fword()?,
        y_max: source.read_fword()?,
    };

    if number_of_contours >= 0 {
        let glyph = read_simple_glyph(source, bounds, number_of_contours)?;

        Ok(Glyph::Simple(glyph))
    } else {
        let glyph = read_compound_glyph(source, bounds)?;

        Ok(Glyph::Compound(glyph))
    }
}

fn read_glyph_flags(source: &mut dyn DataSource, number_of_points: usize) -> FontResult<Vec<u8>> {
    let mut flags = Vec::with_capacity(number_of_points);

    while flags.len() < number_of_points {
        let next = source.read_u8()?;
        flags.push(next);

        if next & OutlineFlag::REPEAT != 0 {
            let num_repeat = source.read_u8()?;

            for _ in 0..num_repeat {
                if flags.len() >= number_of_points {
                    break;
                }

                flags.push(next);
            }
        }
    }

    Ok(flags)
}

fn read_simple_glyph(
    source: &mut dyn DataSource,
    bounds: GlyphBounds,
    number_of_contours: i16,
) -> FontResult<SimpleGlyph> {
    let mut end_points_of_contours = Vec::with_capacity(number_of_contours as usize);

    for _ in 0..number_of_contours {
        end_points_of_contours.push(source.read_u16()?);
    }

    let instruction_length = source.read_u16()?;
    let instructions = source.read_bytes(usize::from(instruction_length))?;

    let number_of_points = match end_points_of_contours.last() {
        Some(&last) => usize::from(last) + 1,
        None => 0,
    };

    let flags = read_glyph_flags(source, number_of_points)?;

    let mut x_coords = Vec::with_capacity(number_of_points);
    let mut last_x = 0i16;
    for &flag in &flags {
        let is_short = flag & OutlineFlag::X_SHORT_VECTOR != 0;
        let is_same_or_positive = flag & OutlineFlag::X_SAME_OR_POSITIVE != 0;

        let delta_x = match (is_short, is_same_or_positive) {
            (false, false) => source.read_i16()?,
            (false, true) => {
                x_coords.push(last_x);
                continue;
            }
            (true, false) => -i16::from(source.read_u8()?),
            (true, true) => i16::from(source.read_u8()?),
        };

        last_x = last_x.wrapping_add(delta_x);
        x_coords.push(last_x);
    }

    let mut y_coords = Vec::with_capacity(number_of_points);
    let mut last_y = 0i16;
    for &flag in &flags {
        let is_short = flag & OutlineFlag::Y_SHORT_VECTOR != 0;
        let is_same_or_positive = flag & OutlineFlag::Y_SAME_OR_POSITIVE != 0;

        let delta_y = match (is_short, is_same_or_positive) {
            (false, false) => source.read_i16()?,
            (false, true) => {
                y_coords.push(last_y);
                continue;
            }
            (true, false) => -i16::from(source.read_u8()?),
            (true, true) => i16::from(source.read_u8()?),
        };

        last_y = last_y.wrapping_add(delta_y);
        y_coords.push(last_y);
    }

    Ok(SimpleGlyph {
        bounds,
        end_points_of_contours,
        instructions,
        flags,
        x_coords,
        y_coords,
    })
}

fn read_compound_glyph(
    source: &mut dyn DataSource,
    bounds: GlyphBounds,
) -> FontResult<CompoundGlyph> {
    let mut components = Vec::new();
    let mut last_flags;

    loop {
        let flags = ComponentFlags(source.read_u16()?);
        let glyph_index = source.read_u16()?;

        let (argument_one, argument_two) = if flags.0 & ComponentFlags::ARG_1_AND_2_ARE_WORDS != 0
        {
            (
                i32::from(source.read_i16()?),
                i32::from(source.read_i16()?),
            )
        } else {
            (
                i32::from(source.read_u8()? as i8),
                i32::from(source.read_u8()? as i8),
            )
        };

        let transform = if flags.0 & ComponentFlags::WE_HAVE_A_SCALE != 0 {
            ComponentTransform::Scale(source.read_f2dot14()?)
        } else if flags.0 & ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            ComponentTransform::ScaleXy {
                x: source.read_f2dot14()?,
                y: source.read_f2dot14()?,
            }
        } else if flags.0 & ComponentFlags::WE_HAVE_A_TWO_BY_TWO != 0 {
            ComponentTransform::TwoByTwo {
                x_scale: source.read_f2dot14()?,
                scale01: source.read_f2dot14()?,
                scale10: source.read_f2dot14()?,
                y_scale: source.read_f2dot14()?,
            }
        } else {
            ComponentTransform::None
        };

        components.push(GlyphComponent {
            flags,
            glyph_index,
            argument_one,
            argument_two,
            transform,
        });

        last_flags = flags;
        if flags.0 & ComponentFlags::MORE_COMPONENTS == 0 {
            break;
        }
    }

    // instructions trail the final component when its flags say so
    let instructions = if last_flags.0 & ComponentFlags::WE_HAVE_INSTRUCTIONS != 0 {
        let instruction_length = source.read_u16()?;
        source.read_bytes(usize::from(instruction_length))?
    } else {
        Vec::new()
    };

    Ok(CompoundGlyph {
        bounds,
        components,
        instructions,
    })
}
