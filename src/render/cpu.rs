use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::prepared::PreparedAssets;
use crate::assets::text::TextLayoutEngine;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::frame::FrameRGBA;
use crate::scene::model::{DrawOp, ImageElement, ImageRef, Scene, TextAnchor, TextElement};

/// Rasterizes one scene into a canvas-sized frame.
///
/// Implementations must be pure functions of the scene: rendering the same scene twice yields
/// identical pixels.
pub trait FrameRenderer {
    /// Render `scene` over the background.
    fn render(&mut self, scene: &Scene) -> QuizResult<FrameRGBA>;
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// `vello_cpu` renderer over prepared assets.
pub struct CpuFrameRenderer {
    width: u16,
    height: u16,
    ctx: Option<vello_cpu::RenderContext>,
    background: ImagePaint,
    tiles: Vec<ImagePaint>,
    logo: Option<ImagePaint>,
    icons: Vec<Option<ImagePaint>>,
    text: TextLayoutEngine,
}

impl CpuFrameRenderer {
    /// Build a renderer for `canvas`, converting every prepared raster into a paint once.
    pub fn new(canvas: Canvas, assets: &PreparedAssets, text: TextLayoutEngine) -> QuizResult<Self> {
        canvas.validate()?;
        let width = u16::try_from(canvas.width)
            .map_err(|_| QuizError::render("canvas width exceeds u16"))?;
        let height = u16::try_from(canvas.height)
            .map_err(|_| QuizError::render("canvas height exceeds u16"))?;

        let tiles = assets
            .tiles
            .iter()
            .map(image_paint)
            .collect::<QuizResult<Vec<_>>>()?;
        let logo = assets.logo.as_ref().map(image_paint).transpose()?;
        let icons = assets
            .icons
            .iter()
            .map(|icon| icon.as_ref().map(image_paint).transpose())
            .collect::<QuizResult<Vec<_>>>()?;

        Ok(Self {
            width,
            height,
            ctx: None,
            background: image_paint(&assets.background)?,
            tiles,
            logo,
            icons,
            text,
        })
    }

    fn paint_for(&self, image: ImageRef) -> Option<&ImagePaint> {
        match image {
            ImageRef::Tile(i) => self.tiles.get(i),
            ImageRef::Logo => self.logo.as_ref(),
            ImageRef::Icon(i) => self.icons.get(i).and_then(Option::as_ref),
        }
    }

    fn draw_image(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        el: &ImageElement,
    ) -> QuizResult<()> {
        if el.alpha == 0 {
            return Ok(());
        }
        let p = self.paint_for(el.image).ok_or_else(|| {
            QuizError::render(format!("scene references unavailable image {:?}", el.image))
        })?;

        let sx = f64::from(el.size.width) / f64::from(p.w.max(1));
        let sy = f64::from(el.size.height) / f64::from(p.h.max(1));
        let tr = Affine::translate((f64::from(el.top_left.x), f64::from(el.top_left.y)))
            * Affine::scale_non_uniform(sx, sy);

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(p.paint.clone());
        with_opacity(ctx, el.alpha, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(p.w),
                f64::from(p.h),
            ));
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        el: &TextElement,
    ) -> QuizResult<()> {
        if el.alpha == 0 || el.text.is_empty() {
            return Ok(());
        }
        let layout = self.text.layout(&el.text, el.style)?;
        let font = self.text.font_data(el.style.face()).clone();

        let (x, y) = match el.anchor {
            TextAnchor::TopLeft => (f64::from(el.pos.x), f64::from(el.pos.y)),
            TextAnchor::Center => (
                f64::from(el.pos.x) - f64::from(layout.width()) / 2.0,
                f64::from(el.pos.y) - f64::from(layout.height()) / 2.0,
            ),
        };

        ctx.set_transform(affine_to_cpu(Affine::translate((x.round(), y.round()))));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            el.color.r, el.color.g, el.color.b, 255,
        ));
        with_opacity(ctx, el.alpha, |ctx| {
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        });
        Ok(())
    }
}

impl FrameRenderer for CpuFrameRenderer {
    fn render(&mut self, scene: &Scene) -> QuizResult<FrameRGBA> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let out = self.draw_scene(&mut ctx, scene);
        let frame = out.map(|()| {
            let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            FrameRGBA {
                width: u32::from(self.width),
                height: u32::from(self.height),
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            }
        });
        self.ctx = Some(ctx);
        frame
    }
}

impl CpuFrameRenderer {
    fn draw_scene(&mut self, ctx: &mut vello_cpu::RenderContext, scene: &Scene) -> QuizResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(self.background.paint.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.background.w),
            f64::from(self.background.h),
        ));

        for op in scene.draw_ops() {
            match op {
                DrawOp::Image(el) => self.draw_image(ctx, el)?,
                DrawOp::Text(el) => self.draw_text(ctx, el)?,
            }
        }
        Ok(())
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    alpha: u8,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if alpha < u8::MAX {
        ctx.push_opacity_layer(f32::from(alpha) / 255.0);
        draw(ctx);
        ctx.pop_layer();
    } else {
        draw(ctx);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(img: &PreparedImage) -> QuizResult<ImagePaint> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: img.width,
        h: img.height,
    })
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> QuizResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| QuizError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| QuizError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(QuizError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let opaque = bytes.chunks_exact(4).all(|px| px[3] == u8::MAX);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, !opaque,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
