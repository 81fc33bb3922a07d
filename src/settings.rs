//////////////////////////////////////////////////////////////////////
// settings files for the cover background tool.
//
// one keyword per line, whitespace separated arguments, # starts a
// comment. every keyword may be given at most once.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use phf::phf_map;

use crate::errors::*;
use crate::render::*;
use crate::tiling::TilingMesh;

//////////////////////////////////////////////////////////////////////
// named color schemes as [fat, thin, outline]

pub static PALETTES: phf::Map<&'static str, [[u8; 3]; 3]> = phf_map! {
    "crimson" => CRIMSON,
    "slate" => [[0x2f, 0x3e, 0x4c], [0x4a, 0x60, 0x74], [0x15, 0x1c, 0x22]],
    "parchment" => [[0xd8, 0xc3, 0x9a], [0xee, 0xe0, 0xc0], [0x7a, 0x63, 0x3c]],
    "grayscale" => [[0x40, 0x40, 0x40], [0x80, 0x80, 0x80], [0x10, 0x10, 0x10]],
};

//////////////////////////////////////////////////////////////////////
// pull typed values off a token slice, erroring on missing or extra
// tokens. a single name gives back a bare value, several give a tuple.

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ty, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => match value.parse::<$type>() {
                Ok($name) => parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } ),
                Err(_) => Err(format!("error parsing {:} as type {:}",
                                      value, stringify!($type)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

    // Entry point
    ($a:expr, { }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { } -> { } )
        }
    )

}

//////////////////////////////////////////////////////////////////////

// canvas dimensions, either directly or as a physical size
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CanvasSpec {
    Pixels(i32, i32),
    Inches(f64, f64)
}

// where the pixels-per-unit scale comes from
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ScaleSpec {
    FromDpi,
    Fixed(f64),
    Fit,
    Cover
}

#[derive(Debug, PartialEq, Clone)]
pub struct CoverSettings {
    pub iterations:    i32,
    pub dpi:           u32,
    pub canvas:        CanvasSpec,
    pub palette:       String,
    pub fat_rgb:       Option<[u8; 3]>,
    pub thin_rgb:      Option<[u8; 3]>,
    pub outline_rgb:   Option<[u8; 3]>,
    pub vignette:      Option<Vignette>,
    pub outline_width: Option<f64>,
    pub scale:         ScaleSpec,
    pub output:        PathBuf
}

impl Default for CoverSettings {
    fn default() -> Self {
        CoverSettings {
            iterations: 9,
            dpi: 300,
            canvas: CanvasSpec::Inches(6.0, 9.0),
            palette: "crimson".to_string(),
            fat_rgb: None,
            thin_rgb: None,
            outline_rgb: None,
            vignette: Some(Vignette::default()),
            outline_width: None,
            scale: ScaleSpec::Cover,
            output: PathBuf::from("penrose.png")
        }
    }
}

//////////////////////////////////////////////////////////////////////
// resolve child_filename relative to the directory of orig_filename

fn rel_path(orig_filename: &str, child_filename: String) -> PathBuf {

    let child = PathBuf::from(child_filename);

    if child.is_absolute() {
        return child;
    }

    match Path::new(orig_filename).parent() {
        None => child,
        Some(parent) => parent.join(child)
    }

}

// settings that share a slot and so can't both be given
fn slot_for_keyword(keyword: &str) -> &str {
    match keyword {
        "canvas_px" | "canvas_in" => "canvas",
        "scale" | "fit_all" | "cover_all" | "dpi_scale" => "scale",
        "vignette" | "no_vignette" => "vignette",
        other => other
    }
}

impl CoverSettings {

    fn apply_keyword(&mut self, filename: &str,
                     keyword: &str, rest: &[&str]) -> Result<()> {

        match keyword {

            "iterations" => {
                self.iterations = parse_tokens!(rest, { iterations: i32 })?;
            },

            "dpi" => {
                self.dpi = parse_tokens!(rest, { dpi: u32 })?;
            },

            "canvas_px" => {
                let (w, h) = parse_tokens!(rest, { width: i32, height: i32 })?;
                self.canvas = CanvasSpec::Pixels(w, h);
            },

            "canvas_in" => {
                let (w, h) = parse_tokens!(rest, { width: f64, height: f64 })?;
                self.canvas = CanvasSpec::Inches(w, h);
            },

            "palette" => {

                let name = parse_tokens!(rest, { name: String })?;

                if !PALETTES.contains_key(name.as_str()) {
                    let mut known: Vec<&str> = PALETTES.keys().cloned().collect();
                    known.sort();
                    bail!("unknown palette \"{:}\", expected one of: {:}",
                          name, known.join(", "));
                }

                self.palette = name;

            },

            "fat_rgb" | "thin_rgb" | "outline_rgb" => {

                let (r, g, b) = parse_tokens!(rest, { r: u8, g: u8, b: u8 })?;

                let rgb = Some([r, g, b]);

                match keyword {
                    "fat_rgb" => self.fat_rgb = rgb,
                    "thin_rgb" => self.thin_rgb = rgb,
                    _ => self.outline_rgb = rgb
                }

            },

            "vignette" => {
                let (alpha, extent) = parse_tokens!(rest, { alpha: f64, extent: f64 })?;
                self.vignette = Some(Vignette { alpha: alpha, extent: extent });
            },

            "no_vignette" => {
                parse_tokens!(rest, { })?;
                self.vignette = None;
            },

            "outline_width" => {
                let width = parse_tokens!(rest, { width: f64 })?;
                self.outline_width = Some(width);
            },

            "scale" => {
                let scale = parse_tokens!(rest, { scale: f64 })?;
                self.scale = ScaleSpec::Fixed(scale);
            },

            "fit_all" => {
                parse_tokens!(rest, { })?;
                self.scale = ScaleSpec::Fit;
            },

            "cover_all" => {
                parse_tokens!(rest, { })?;
                self.scale = ScaleSpec::Cover;
            },

            "dpi_scale" => {
                parse_tokens!(rest, { })?;
                self.scale = ScaleSpec::FromDpi;
            },

            "output" => {
                let path = parse_tokens!(rest, { path: String })?;
                self.output = rel_path(filename, path);
            },

            _ => {
                bail!("unrecognized keyword");
            }

        };

        Ok(())

    }

    fn update_from(&mut self, filename: &str, line: &str,
                   seen: &mut HashSet<String>) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if tokens.is_empty() {
            return Ok(());
        }

        let keyword = tokens[0];
        let rest = &tokens[1..];

        let slot = slot_for_keyword(keyword);

        if seen.contains(slot) {
            bail!("{:} is already set", slot);
        }

        self.apply_keyword(filename, keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        seen.insert(slot.to_string());

        Ok(())

    }

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<CoverSettings> {

        let mut settings = CoverSettings::default();
        let mut seen = HashSet::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            settings.update_from(filename, line.as_str(), &mut seen)
                .chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        Ok(settings)

    }

    //////////////////////////////////////////////////

    pub fn canvas_size(&self) -> PixelSize {
        match self.canvas {
            CanvasSpec::Pixels(w, h) => PixelSize::new(w, h),
            CanvasSpec::Inches(w, h) => PixelSize::from_inches(w, h, self.dpi)
        }
    }

    pub fn palette(&self) -> Palette {

        let base = PALETTES.get(self.palette.as_str()).unwrap_or(&CRIMSON);

        let mut palette = Palette::from_rgb8(base);

        if let Some(rgb) = self.fat_rgb {
            palette.fat = rgb8(rgb);
        }

        if let Some(rgb) = self.thin_rgb {
            palette.thin = rgb8(rgb);
        }

        if let Some(rgb) = self.outline_rgb {
            palette.outline = rgb8(rgb);
        }

        palette

    }

    // render options for drawing the given mesh on our canvas
    pub fn render_options(&self, mesh: &TilingMesh) -> Result<RenderOptions> {

        let mut options = RenderOptions::for_dpi(self.dpi);

        options.palette = self.palette();
        options.vignette = self.vignette;

        if let Some(width) = self.outline_width {
            options.outline_width = width;
        }

        match self.scale {

            ScaleSpec::FromDpi => {},

            ScaleSpec::Fixed(scale) => {
                options.scale_factor = scale;
            },

            ScaleSpec::Fit => {
                options.scale_factor = match fit_scale(&mesh.bounds(), &self.canvas_size()) {
                    Some(scale) => scale,
                    None => invalid_argument!("can't fit an empty mesh onto the canvas")
                };
            },

            ScaleSpec::Cover => {
                options.scale_factor = cover_scale(&self.canvas_size());
            }

        }

        options.validate()?;

        Ok(options)

    }

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Cursor;

    fn parse_str(text: &str) -> Result<CoverSettings> {
        CoverSettings::parse("covers/test.cfg", &mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn empty_file_gives_defaults() {

        let settings = parse_str("# nothing here\n\n").unwrap();

        assert_eq!(settings, CoverSettings::default());
        assert_eq!(settings.canvas_size(), PixelSize::new(1800, 2700));

    }

    #[test]
    fn parses_every_keyword() {

        let text = "
            iterations 5      # keep it quick
            dpi 150
            canvas_in 2 3
            palette slate
            thin_rgb 1 2 3
            vignette 0.5 0.75
            outline_width 2.5
            scale 1200
            output out/bg.tiff
        ";

        let settings = parse_str(text).unwrap();

        assert_eq!(settings.iterations, 5);
        assert_eq!(settings.dpi, 150);
        assert_eq!(settings.canvas_size(), PixelSize::new(300, 450));
        assert_eq!(settings.palette, "slate");
        assert_eq!(settings.thin_rgb, Some([1, 2, 3]));
        assert_eq!(settings.vignette, Some(Vignette { alpha: 0.5, extent: 0.75 }));
        assert_eq!(settings.outline_width, Some(2.5));
        assert_eq!(settings.scale, ScaleSpec::Fixed(1200.0));
        assert_eq!(settings.output, Path::new("covers").join("out/bg.tiff"));

        let palette = settings.palette();
        assert_eq!(palette.fat, rgb8(PALETTES["slate"][0]));
        assert_eq!(palette.thin, rgb8([1, 2, 3]));

    }

    #[test]
    fn render_options_follow_settings() {

        let mesh = TilingMesh::seed_wheel();

        let settings = parse_str("dpi 600\nno_vignette\ndpi_scale\n").unwrap();
        let options = settings.render_options(&mesh).unwrap();

        assert_eq!(options.dpi, 600);
        assert_eq!(options.scale_factor, 1200.0);
        assert_eq!(options.outline_width, 2.0);
        assert_eq!(options.vignette, None);
        assert_eq!(options.palette, Palette::default());

        let settings = parse_str("canvas_px 200 100\nfit_all\n").unwrap();
        let options = settings.render_options(&mesh).unwrap();

        assert!((options.scale_factor - 50.0).abs() < 1e-9);

        // default covers the 6x9 inch canvas corner to corner
        let options = parse_str("").unwrap().render_options(&mesh).unwrap();
        let corner = PixelSize::new(1800, 2700).center().norm();

        assert!((options.scale_factor * (std::f64::consts::PI / 10.0).cos() - corner).abs() < 1e-6);

    }

    #[test]
    fn fit_all_needs_geometry() {

        let settings = parse_str("fit_all").unwrap();
        let err = settings.render_options(&TilingMesh::default()).unwrap_err();

        match err.kind() {
            ErrorKind::InvalidArgument(_) => {},
            other => panic!("unexpected error: {:}", other)
        }

    }

    #[test]
    fn duplicate_keywords_rejected() {
        assert!(parse_str("dpi 100\ndpi 200\n").is_err());
        assert!(parse_str("canvas_px 10 10\ncanvas_in 1 1\n").is_err());
        assert!(parse_str("scale 100\nfit_all\n").is_err());
        assert!(parse_str("cover_all\ndpi_scale\n").is_err());
    }

    #[test]
    fn malformed_lines_rejected() {
        assert!(parse_str("dpi\n").is_err());
        assert!(parse_str("dpi 100 200\n").is_err());
        assert!(parse_str("dpi lots\n").is_err());
        assert!(parse_str("fat_rgb 1 2 300\n").is_err());
        assert!(parse_str("fit_all please\n").is_err());
        assert!(parse_str("palette plaid\n").is_err());
        assert!(parse_str("sparkles 11\n").is_err());
    }

    #[test]
    fn errors_name_the_line() {

        let err = parse_str("dpi 100\n\niterations x\n").unwrap_err();

        assert!(err.to_string().contains("covers/test.cfg:3"), "{:}", err);

    }

    #[test]
    fn negative_iterations_parse_but_fail_later() {

        let settings = parse_str("iterations -2").unwrap();
        assert_eq!(settings.iterations, -2);

        assert!(crate::tiling::TilingGenerator::new(settings.iterations).is_err());

    }

    #[test]
    fn absolute_output_kept() {

        let settings = parse_str("output /tmp/cover.png").unwrap();
        assert_eq!(settings.output, PathBuf::from("/tmp/cover.png"));

    }

    #[test]
    fn every_palette_is_distinct_per_class() {
        for (name, colors) in PALETTES.entries() {
            assert_ne!(colors[0], colors[1], "palette {:}", name);
        }
    }

}
