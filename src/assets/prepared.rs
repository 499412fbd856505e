use std::path::Path;

use crate::assets::decode::{PreparedImage, cover_resize, exact_resize, load_rgba};
use crate::config::RenderConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::QuizResult;
use crate::job::{ITEM_COUNT, RenderJob};
use crate::scene::layout::{BoxSize, SceneLayout};
use crate::scene::model::ImageRef;
use crate::scene::timeline::OverlayAvailability;

/// Every raster a render needs, decoded and resized once before the frame loop.
#[derive(Clone, Debug)]
pub struct PreparedAssets {
    /// Canvas-sized background.
    pub background: PreparedImage,
    /// Grid tiles at tile size, in slot order.
    pub tiles: [PreparedImage; ITEM_COUNT],
    /// Logo at logo size, when available.
    pub logo: Option<PreparedImage>,
    /// Icons at icon size, parallel to the configured outro actions.
    pub icons: Vec<Option<PreparedImage>>,
}

impl PreparedAssets {
    /// Decode the job images, the chosen background (or the solid fallback) and the optional
    /// outro overlays.
    pub fn load(
        job: &RenderJob,
        config: &RenderConfig,
        background: Option<&Path>,
    ) -> QuizResult<Self> {
        let layout = SceneLayout::for_canvas(config.canvas());
        let canvas_box = BoxSize {
            width: config.video.width,
            height: config.video.height,
        };

        let background = match background {
            Some(path) => PreparedImage::from_rgba(cover_resize(load_rgba(path)?, canvas_box)),
            None => {
                let c = Rgb8::FALLBACK_BACKGROUND;
                PreparedImage::solid(canvas_box, [c.r, c.g, c.b])
            }
        };

        let mut tiles = Vec::with_capacity(ITEM_COUNT);
        for path in job.images() {
            let img = load_rgba(path)?;
            tiles.push(PreparedImage::from_rgba(cover_resize(img, layout.tile)));
        }
        let tiles: [PreparedImage; ITEM_COUNT] = tiles
            .try_into()
            .map_err(|_| anyhow::anyhow!("job must carry {ITEM_COUNT} images"))?;

        let logo = load_overlay(&config.paths.logo_path(), layout.logo);
        let icons = config
            .outro
            .actions
            .iter()
            .map(|action| load_overlay(&config.paths.icon_path(&action.icon), layout.icon))
            .collect();

        Ok(Self {
            background,
            tiles,
            logo,
            icons,
        })
    }

    /// Which optional overlays can be drawn.
    pub fn overlays(&self) -> OverlayAvailability {
        OverlayAvailability {
            logo: self.logo.is_some(),
            icons: self.icons.iter().map(Option::is_some).collect(),
        }
    }

    /// Raster referenced by a scene element.
    pub fn image(&self, image: ImageRef) -> Option<&PreparedImage> {
        match image {
            ImageRef::Tile(i) => self.tiles.get(i),
            ImageRef::Logo => self.logo.as_ref(),
            ImageRef::Icon(i) => self.icons.get(i).and_then(Option::as_ref),
        }
    }
}

/// Optional overlays are skipped when absent or undecodable.
fn load_overlay(path: &Path, size: BoxSize) -> Option<PreparedImage> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "optional overlay not found");
        return None;
    }
    match load_rgba(path) {
        Ok(img) => Some(PreparedImage::from_rgba(exact_resize(&img, size))),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable overlay");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/prepared.rs"]
mod tests;
