//! `mirage-gallery`: opens one optical illusion demo per run.

mod cli;
mod demos;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use mirage_engine::logging::init_logging;

use crate::cli::{Demo, GalleryArgs};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

fn main() -> Result<()> {
    let args = GalleryArgs::parse();
    init_logging(args.logging());

    if args.list {
        for demo in Demo::value_variants() {
            println!("{:<16} {}", demo.name(), demo.summary());
        }
        return Ok(());
    }

    args.validate()?;
    demos::run(&args, load_font())
}

/// First readable system font, if any.
fn load_font() -> Option<Vec<u8>> {
    let found = FONT_PATHS.iter().find_map(|p| std::fs::read(p).ok().map(|bytes| (p, bytes)));
    match found {
        Some((path, bytes)) => {
            log::debug!("using font {path}");
            Some(bytes)
        }
        None => {
            log::warn!("no system font found; controls will have no labels");
            None
        }
    }
}
