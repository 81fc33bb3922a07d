//////////////////////////////////////////////////////////////////////
// command line tool: render a Penrose background image
//
//   penrose_cover [SETTINGSFILE]
//
// with no settings file, the defaults in CoverSettings are used.

use std::fs::File;
use std::io::BufReader;

#[macro_use]
extern crate error_chain;

use log::info;

use penrose_cover::errors::*;
use penrose_cover::settings::CoverSettings;
use penrose_cover::{TileRenderer, TilingGenerator};

fn load_settings(args: &[String]) -> Result<CoverSettings> {

    if args.len() < 2 {
        return Ok(CoverSettings::default());
    }

    let filename = &args[1];

    let f = File::open(filename).chain_err(|| format!("opening {:}", filename))?;
    let mut reader = BufReader::new(f);

    CoverSettings::parse(filename, &mut reader)

}

fn run() -> Result<()> {

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        eprintln!("usage: {:?} [SETTINGSFILE]", args[0]);
        std::process::exit(1);
    }

    let settings = load_settings(&args)?;

    info!("{:?}", settings);

    let generator = TilingGenerator::new(settings.iterations)?;

    let canvas = settings.canvas_size();
    let options = settings.render_options(generator.mesh())?;

    let (fat, thin) = generator.mesh().class_counts();

    println!("{:} iterations: {:} fat + {:} thin triangles",
             generator.iterations(), fat, thin);

    let mut raster = TileRenderer::new(options).render(generator.mesh(), canvas)?;

    let img = raster.to_rgba_image()?;

    img.save(&settings.output).chain_err(
        || format!("writing {:}", settings.output.display()))?;

    println!("wrote {:} ({:}x{:} at {:} dpi)",
             settings.output.display(), raster.width(), raster.height(), raster.dpi());

    Ok(())

}

quick_main!(run);
