use std::{env, process};

use truetype::{
    table::{CmapFormat, Glyph},
    FontParser,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut path = None;
    let mut lazy = false;
    let mut embedded = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--lazy" => lazy = true,
            "--embedded" => embedded = true,
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        eprintln!("usage: truetype <font-file> [--lazy] [--embedded]");
        process::exit(2);
    };

    let mut font = FontParser::new()
        .embedded(embedded)
        .lazy(lazy)
        .parse_file(&path)?;

    println!("{}: sfnt version {}", path, font.version().to_f32());
    println!();
    println!("tag   checksum    offset    length  state");
    for slot in font.tables() {
        println!(
            "{}  {:#010x}  {:8}  {:8}  {}",
            slot.record.tag,
            slot.record.checksum,
            slot.record.offset,
            slot.record.length,
            if slot.is_loaded() { "decoded" } else { "pending" },
        );
    }

    if let Some(head) = font.head()? {
        println!();
        println!(
            "head: {} units per em, revision {}",
            head.units_per_em,
            head.font_revision.to_f32()
        );
        println!(
            "      bounds ({}, {}) to ({}, {}){}{}",
            head.x_min.0,
            head.y_min.0,
            head.x_max.0,
            head.y_max.0,
            if head.mac_style.is_bold() { ", bold" } else { "" },
            if head.mac_style.is_italic() {
                ", italic"
            } else {
                ""
            },
        );
    }

    if let Some(hhea) = font.hhea()? {
        println!();
        println!(
            "hhea: ascender {}, descender {}, line gap {}, {} metrics",
            hhea.ascender.0, hhea.descender.0, hhea.line_gap.0, hhea.number_of_h_metrics
        );
    }

    let num_glyphs = font.num_glyphs()?;
    if let Some(maxp) = font.maxp()? {
        println!();
        println!(
            "maxp: {} glyphs, version {}",
            maxp.num_glyphs,
            maxp.version.to_f32()
        );
    }

    if font.hmtx()?.is_some() {
        println!();
        print!("hmtx: advances");
        for glyph_id in 0..num_glyphs.min(8) {
            print!(" {}", font.advance_width(glyph_id)?);
        }
        println!();
    }

    if let Some(glyf) = font.glyf()? {
        let mut empty = 0usize;
        let mut simple = 0usize;
        let mut compound = 0usize;
        for glyph in &glyf.glyphs {
            match glyph {
                Glyph::Empty => empty += 1,
                Glyph::Simple(..) => simple += 1,
                Glyph::Compound(..) => compound += 1,
            }
        }
        println!();
        println!(
            "glyf: {} simple, {} compound, {} empty",
            simple, compound, empty
        );
    }

    if let Some(cmap) = font.cmap()? {
        println!();
        println!("cmap: {} subtables", cmap.subtables.len());
        for subtable in &cmap.subtables {
            let format = match &subtable.format {
                CmapFormat::Zero { .. } => "format 0",
                CmapFormat::Four { .. } => "format 4",
                CmapFormat::Six { .. } => "format 6",
                CmapFormat::Twelve { .. } => "format 12",
                CmapFormat::Unsupported { .. } => "unsupported",
            };
            let sample = subtable
                .format
                .glyph_id(u32::from('A'))
                .map(|glyph_id| format!(", 'A' -> glyph {}", glyph_id))
                .unwrap_or_default();
            println!(
                "      platform {} encoding {}: {}{}",
                subtable.platform_id, subtable.platform_specific_id, format, sample
            );
        }
    }

    if let Some(name) = font.name()? {
        println!();
        println!("name: {} records", name.name_records.len());
        for (label, value) in [
            ("family", name.font_family()),
            ("subfamily", name.font_subfamily()),
            ("postscript", name.postscript_name()),
        ] {
            if let Some(value) = value {
                println!("      {}: {}", label, value);
            }
        }
    }

    if let Some(os2) = font.os2()? {
        println!();
        println!(
            "OS/2: version {}, weight {}, width class {}",
            os2.version, os2.weight_class, os2.width_class
        );
    }

    if let Some(post) = font.post()? {
        println!();
        println!(
            "post: format {}, italic angle {}",
            post.format.to_f32(),
            post.italic_angle.to_f32()
        );
        if let Some(glyph_name) = post.glyph_name(0) {
            println!("      glyph 0 is named {:?}", glyph_name);
        }
    }

    if let Some(dsig) = font.dsig()? {
        println!();
        println!("DSIG: {} signatures", dsig.signatures.len());
    }

    Ok(())
}
