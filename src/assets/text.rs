use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{QuizError, QuizResult};
use crate::scene::model::{FontFace, TextStyle};

/// Shaped, line-broken and centered text block.
pub type TextLayout = parley::Layout<()>;

/// One face registered with the layout engine, plus its rasterizer handle.
struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Parley layout engine bound to the primary and secondary faces.
///
/// Layouts are cached per `(style, text)`; color and opacity are applied at draw time, so a
/// caption that only fades in is shaped once.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    primary: LoadedFont,
    secondary: LoadedFont,
    cache: HashMap<(TextStyle, String), Arc<TextLayout>>,
}

impl TextLayoutEngine {
    /// Load both faces from disk. A missing file is a configuration error.
    pub fn from_files(primary: &Path, secondary: &Path) -> QuizResult<Self> {
        let read = |role: &str, path: &Path| {
            std::fs::read(path).map_err(|e| {
                QuizError::config(format!("{role} font '{}' unreadable: {e}", path.display()))
            })
        };
        Self::from_bytes(read("primary", primary)?, read("secondary", secondary)?)
    }

    /// Register both faces from raw font bytes.
    pub fn from_bytes(primary: Vec<u8>, secondary: Vec<u8>) -> QuizResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let primary = register(&mut font_ctx, "primary", primary)?;
        let secondary = register(&mut font_ctx, "secondary", secondary)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            primary,
            secondary,
            cache: HashMap::new(),
        })
    }

    /// Rasterizer handle for `face`.
    pub fn font_data(&self, face: FontFace) -> &vello_cpu::peniko::FontData {
        match face {
            FontFace::Primary => &self.primary.data,
            FontFace::Secondary => &self.secondary.data,
        }
    }

    /// Shape `text` in `style`, with every line centered within the block.
    pub fn layout(&mut self, text: &str, style: TextStyle) -> QuizResult<Arc<TextLayout>> {
        let key = (style, text.to_string());
        if let Some(layout) = self.cache.get(&key) {
            return Ok(Arc::clone(layout));
        }

        let size_px = style.font_size();
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(QuizError::render("text size must be finite and > 0"));
        }
        let family_name = match style.face() {
            FontFace::Primary => self.primary.family.clone(),
            FontFace::Secondary => self.secondary.family.clone(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: TextLayout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );

        let layout = Arc::new(layout);
        self.cache.insert(key, Arc::clone(&layout));
        Ok(layout)
    }

    /// Number of cached layouts.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn register(
    font_ctx: &mut parley::FontContext,
    role: &str,
    bytes: Vec<u8>,
) -> QuizResult<LoadedFont> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
    let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
        QuizError::config(format!("no font families registered from {role} font bytes"))
    })?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| QuizError::config(format!("{role} font family has no name")))?
        .to_string();
    let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
    Ok(LoadedFont { family, data })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
