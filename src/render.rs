//////////////////////////////////////////////////////////////////////
// rasterize a tiling mesh into a cairo image surface

use log::{debug, info};

use crate::errors::*;
use crate::geometry::*;
use crate::tiling::{RhombusClass, TilingGenerator, TilingMesh};

// pixels per unit of seed radius for each dot per inch, so the seed
// wheel is always four inches across
const SCALE_PER_DPI: f64 = 2.0;

// vignette darkness at the top edge
pub const DEFAULT_VIGNETTE_ALPHA: f64 = 64.0 / 255.0;

//////////////////////////////////////////////////////////////////////
// colors are rgb in [0, 1], same as cairo wants them

pub fn rgb8(rgb: [u8; 3]) -> Vec3d {
    Vec3d::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64) / 255.0
}

#[derive(Debug, PartialEq, Clone)]
pub struct Palette {
    pub fat:     Vec3d,
    pub thin:    Vec3d,
    pub outline: Vec3d
}

impl Palette {

    // palette from [fat, thin, outline] byte triplets
    pub fn from_rgb8(colors: &[[u8; 3]; 3]) -> Self {
        Palette {
            fat: rgb8(colors[0]),
            thin: rgb8(colors[1]),
            outline: rgb8(colors[2])
        }
    }

    pub fn fill(&self, class: RhombusClass) -> &Vec3d {
        match class {
            RhombusClass::Fat => &self.fat,
            RhombusClass::Thin => &self.thin
        }
    }

}

// dark reds, the default cover look
pub const CRIMSON: [[u8; 3]; 3] = [
    [0x83, 0x15, 0x18],
    [0xb3, 0x1c, 0x1f],
    [0x3a, 0x09, 0x0a]
];

impl Default for Palette {
    fn default() -> Self { Palette::from_rgb8(&CRIMSON) }
}

//////////////////////////////////////////////////////////////////////
// top-to-bottom fade from translucent black to transparent

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vignette {

    // opacity at the top edge
    pub alpha: f64,

    // fraction of canvas height where it reaches zero
    pub extent: f64

}

impl Default for Vignette {
    fn default() -> Self {
        Vignette { alpha: DEFAULT_VIGNETTE_ALPHA, extent: 1.0 }
    }
}

//////////////////////////////////////////////////////////////////////
// canvas dimensions in pixels, signed so negative sizes can be
// rejected

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PixelSize {
    pub width: i32,
    pub height: i32
}

impl PixelSize {

    pub fn new(width: i32, height: i32) -> Self {
        PixelSize { width: width, height: height }
    }

    // physical size at the given resolution, truncated to whole pixels
    pub fn from_inches(width: f64, height: f64, dpi: u32) -> Self {
        PixelSize {
            width: (width * dpi as f64) as i32,
            height: (height * dpi as f64) as i32
        }
    }

    pub fn validate(&self) -> Result<()> {

        if self.width <= 0 || self.height <= 0 {
            invalid_argument!("canvas must be at least 1x1 pixels, got {:}x{:}",
                              self.width, self.height);
        }

        Ok(())

    }

    // where the mesh origin lands
    pub fn center(&self) -> Vec2d {
        Vec2d::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

}

//////////////////////////////////////////////////////////////////////
// everything the renderer needs besides the mesh itself

#[derive(Debug, PartialEq, Clone)]
pub struct RenderOptions {

    // pixels per unit of seed radius
    pub scale_factor: f64,

    // in pixels, 0 for no outline
    pub outline_width: f64,

    // metadata only, never changes the pixels
    pub dpi: u32,

    pub palette: Palette,
    pub vignette: Option<Vignette>

}

impl RenderOptions {

    // keeps apparent triangle size constant across resolutions
    pub fn for_dpi(dpi: u32) -> Self {

        RenderOptions {
            scale_factor: SCALE_PER_DPI * dpi as f64,
            outline_width: dpi as f64 / 300.0,
            dpi: dpi,
            palette: Palette::default(),
            vignette: Some(Vignette::default())
        }

    }

    pub fn validate(&self) -> Result<()> {

        if self.dpi == 0 {
            invalid_argument!("dpi must be positive");
        }

        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            invalid_argument!("scale factor must be positive, got {:}", self.scale_factor);
        }

        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            invalid_argument!("outline width must be >= 0, got {:}", self.outline_width);
        }

        if let Some(v) = &self.vignette {

            if !(v.alpha >= 0.0 && v.alpha <= 1.0) {
                invalid_argument!("vignette alpha must be in [0, 1], got {:}", v.alpha);
            }

            if !(v.extent > 0.0 && v.extent <= 1.0) {
                invalid_argument!("vignette extent must be in (0, 1], got {:}", v.extent);
            }

        }

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// largest scale that keeps the given bounds on the canvas when the
// origin sits at the canvas center. None for an empty or degenerate
// bounds.

pub fn fit_scale(bounds: &Rect2d, canvas: &PixelSize) -> Option<f64> {

    if bounds.is_empty() {
        return None;
    }

    let half = Vec2d::new(bounds.p0.x.abs().max(bounds.p1.x.abs()),
                          bounds.p0.y.abs().max(bounds.p1.y.abs()));

    let room = canvas.center();

    let scl = (room.x / half.x).min(room.y / half.y);

    if scl.is_finite() && scl > 0.0 {
        Some(scl)
    } else {
        None
    }

}

//////////////////////////////////////////////////////////////////////
// smallest scale at which the seed decagon covers the whole canvas:
// its inscribed circle has to reach the canvas corners.

pub fn cover_scale(canvas: &PixelSize) -> f64 {
    canvas.center().norm() / (PI / 10.0).cos()
}

//////////////////////////////////////////////////////////////////////
// a few helpers so we can talk to cairo in terms of nalgebra types

trait CairoVecOps {

    fn setcolor(&self, v: &Vec3d);
    fn drawtri(&self, p0: &Point2d, p1: &Point2d, p2: &Point2d);

}

impl CairoVecOps for cairo::Context {

    fn setcolor(&self, v: &Vec3d) {
        self.set_source_rgb(v[0], v[1], v[2]);
    }

    fn drawtri(&self, p0: &Point2d, p1: &Point2d, p2: &Point2d) {
        self.move_to(p0[0], p0[1]);
        self.line_to(p1[0], p1[1]);
        self.line_to(p2[0], p2[1]);
        self.close_path();
    }

}

//////////////////////////////////////////////////////////////////////
// the rendered image: a cairo ARGB32 surface plus its resolution

pub struct Raster {
    surface: cairo::ImageSurface,
    dpi: u32
}

impl std::fmt::Debug for Raster {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("dpi", &self.dpi)
            .finish()
    }

}

// unpack one premultiplied native-endian ARGB32 pixel into
// straight-alpha rgba
fn unpremultiply(px: &[u8]) -> [u8; 4] {

    let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);

    let a = (argb >> 24) & 0xff;

    let channel = |shift: u32| -> u8 {
        let c = (argb >> shift) & 0xff;
        if a == 0 {
            0
        } else {
            ((c * 255 + a / 2) / a).min(255) as u8
        }
    };

    [channel(16), channel(8), channel(0), a as u8]

}

impl Raster {

    pub fn width(&self) -> i32 {
        self.surface.get_width()
    }

    pub fn height(&self) -> i32 {
        self.surface.get_height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    // hand the surface over to callers who want to keep drawing on it
    pub fn into_surface(self) -> cairo::ImageSurface {
        self.surface
    }

    // raw premultiplied ARGB32 bytes, rows packed at 4*width
    pub fn pixels(&mut self) -> Result<Vec<u8>> {

        let width = self.width() as usize;
        let height = self.height() as usize;
        let stride = self.surface.get_stride() as usize;

        let data = self.surface.get_data()?;

        let mut buf = Vec::with_capacity(4 * width * height);

        for row in data.chunks(stride).take(height) {
            buf.extend_from_slice(&row[..4 * width]);
        }

        Ok(buf)

    }

    // straight-alpha copy for image encoders
    pub fn to_rgba_image(&mut self) -> Result<image::RgbaImage> {

        let width = self.width() as u32;
        let height = self.height() as u32;
        let stride = self.surface.get_stride() as usize;

        let data = self.surface.get_data()?;

        let mut img = image::RgbaImage::new(width, height);

        for (y, row) in data.chunks(stride).take(height as usize).enumerate() {
            for x in 0..width {
                let i = 4 * x as usize;
                img.put_pixel(x, y as u32, image::Rgba(unpremultiply(&row[i..i + 4])));
            }
        }

        Ok(img)

    }

}

//////////////////////////////////////////////////////////////////////
// maps a mesh onto a fresh surface. holds configuration only; nothing
// from a previous render survives into the next.

#[derive(Debug, Clone)]
pub struct TileRenderer {
    options: RenderOptions
}

impl TileRenderer {

    pub fn new(options: RenderOptions) -> Self {
        TileRenderer { options: options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, mesh: &TilingMesh, canvas: PixelSize) -> Result<Raster> {

        self.options.validate()?;
        canvas.validate()?;

        let surface = match cairo::ImageSurface::create(
            cairo::Format::ARgb32, canvas.width, canvas.height) {

            Ok(surface) => surface,

            Err(cairo::Error::NoMemory) => {
                bail!(ErrorKind::ResourceExhaustion(
                    format!("can't allocate {:}x{:} surface", canvas.width, canvas.height)));
            }

            Err(err) => {
                return Err(err).chain_err(|| format!("creating {:}x{:} surface",
                                                    canvas.width, canvas.height));
            }

        };

        {

            let ctx = cairo::Context::new(&surface);

            self.draw_triangles(&ctx, mesh, &canvas.center());

            if let Some(vignette) = &self.options.vignette {
                draw_vignette(&ctx, vignette, &canvas);
            }

        }

        surface.flush();

        info!("rendered {:} triangles onto {:}x{:} canvas at {:} dpi",
              mesh.len(), canvas.width, canvas.height, self.options.dpi);

        Ok(Raster {
            surface: surface,
            dpi: self.options.dpi
        })

    }

    fn draw_triangles(&self, ctx: &cairo::Context, mesh: &TilingMesh, offset: &Vec2d) {

        let scl = self.options.scale_factor;
        let lw = self.options.outline_width;
        let palette = &self.options.palette;

        debug!("drawing with scale {:} px/unit, outline {:} px", scl, lw);

        ctx.set_line_width(lw);
        ctx.set_line_join(cairo::LineJoin::Round);

        for tri in mesh {

            let p0 = to_pixel_space(&tri.a, scl, offset);
            let p1 = to_pixel_space(&tri.b, scl, offset);
            let p2 = to_pixel_space(&tri.c, scl, offset);

            ctx.drawtri(&p0, &p1, &p2);
            ctx.setcolor(palette.fill(tri.class));

            if lw > 0.0 {
                ctx.fill_preserve();
                ctx.setcolor(&palette.outline);
                ctx.stroke();
            } else {
                ctx.fill();
            }

        }

    }

}

fn draw_vignette(ctx: &cairo::Context, vignette: &Vignette, canvas: &PixelSize) {

    let w = canvas.width as f64;
    let h = canvas.height as f64;

    let gradient = cairo::LinearGradient::new(0.0, 0.0, 0.0, vignette.extent * h);

    gradient.add_color_stop_rgba(0.0, 0.0, 0.0, 0.0, vignette.alpha);
    gradient.add_color_stop_rgba(1.0, 0.0, 0.0, 0.0, 0.0);

    ctx.rectangle(0.0, 0.0, w, h);
    ctx.set_source(&gradient);
    ctx.fill();

}

//////////////////////////////////////////////////////////////////////
// one-call rendering with the dpi convention

impl TilingGenerator {

    pub fn render(&self, canvas: PixelSize, dpi: u32) -> Result<Raster> {
        TileRenderer::new(RenderOptions::for_dpi(dpi)).render(self.mesh(), canvas)
    }

}

//////////////////////////////////////////////////////////////////////
