use crate::foundation::core::{PixelPoint, Rgb8};
use crate::scene::layout::BoxSize;

/// Which loaded face a caption uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FontFace {
    /// Bold face.
    Primary,
    /// Regular face.
    Secondary,
}

/// Typographic role of a caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TextStyle {
    /// Top-of-screen question.
    Hook,
    /// Rule line under the hook.
    Instruction,
    /// Countdown in the top-right corner.
    Timer,
    /// Outro title.
    OutroTitle,
    /// Outro call to action.
    OutroText,
    /// Label under an outro icon.
    IconLabel,
}

impl TextStyle {
    /// Every style, for preloading layouts.
    pub const ALL: [Self; 6] = [
        Self::Hook,
        Self::Instruction,
        Self::Timer,
        Self::OutroTitle,
        Self::OutroText,
        Self::IconLabel,
    ];

    /// Face used for this style.
    pub fn face(self) -> FontFace {
        match self {
            Self::Instruction | Self::IconLabel => FontFace::Secondary,
            Self::Hook | Self::Timer | Self::OutroTitle | Self::OutroText => FontFace::Primary,
        }
    }

    /// Font size in pixels.
    pub fn font_size(self) -> f32 {
        match self {
            Self::Hook => 78.0,
            Self::Instruction => 52.0,
            Self::Timer => 54.0,
            Self::OutroTitle => 72.0,
            Self::OutroText => 46.0,
            Self::IconLabel => 34.0,
        }
    }
}

/// How a caption's position is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    /// `pos` is the center of the text block; lines are centered.
    Center,
    /// `pos` is the top-left corner of the text block.
    TopLeft,
}

/// A caption placed on the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextElement {
    /// Text, possibly spanning several lines.
    pub text: String,
    /// Typographic role.
    pub style: TextStyle,
    /// Anchor of `pos`.
    pub anchor: TextAnchor,
    /// Anchor position in canvas pixels.
    pub pos: PixelPoint,
    /// Fill color.
    pub color: Rgb8,
    /// Opacity in `[0, 255]`.
    pub alpha: u8,
}

/// Which prepared raster an [`ImageElement`] draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ImageRef {
    /// Grid tile `0..4`.
    Tile(usize),
    /// Outro logo.
    Logo,
    /// Icon of outro action `n`.
    Icon(usize),
}

/// A raster placed on the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageElement {
    /// Source raster.
    pub image: ImageRef,
    /// Top-left corner in canvas pixels; may lie off-canvas while sliding in.
    pub top_left: PixelPoint,
    /// Drawn size.
    pub size: BoxSize,
    /// Opacity in `[0, 255]`.
    pub alpha: u8,
}

/// Scene for every frame before the outro.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MainScene {
    /// Hook caption, once its entrance has started.
    pub hook: Option<TextElement>,
    /// Instruction caption, once its entrance has started.
    pub instruction: Option<TextElement>,
    /// Grid tiles whose entrance has started, in slot order.
    pub tiles: Vec<ImageElement>,
    /// Countdown, once the timer phase has started.
    pub timer: Option<TextElement>,
}

/// Icon + label pair in the outro.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionBadge {
    /// Icon raster.
    pub icon: ImageElement,
    /// Label under the icon.
    pub label: TextElement,
}

/// Closing scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutroScene {
    /// Shared fade-in opacity.
    pub alpha: u8,
    /// Logo, when one is available.
    pub logo: Option<ImageElement>,
    /// Centered title.
    pub title: TextElement,
    /// Colored call to action.
    pub call_to_action: TextElement,
    /// Actions whose icon is available, left to right.
    pub actions: Vec<ActionBadge>,
}

/// Fully determined description of one frame. Both variants draw over the background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scene {
    /// Hook, instruction, grid and countdown.
    Main(MainScene),
    /// Closing scene.
    Outro(OutroScene),
}

/// One paint operation, in back-to-front order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp<'a> {
    /// Composite a prepared raster.
    Image(&'a ImageElement),
    /// Draw a caption.
    Text(&'a TextElement),
}

impl Scene {
    /// `true` for the closing scene.
    pub fn is_outro(&self) -> bool {
        matches!(self, Self::Outro(_))
    }

    /// Paint operations after the background, back to front.
    pub fn draw_ops(&self) -> Vec<DrawOp<'_>> {
        let mut ops = Vec::new();
        match self {
            Self::Main(main) => {
                ops.extend(main.hook.iter().map(DrawOp::Text));
                ops.extend(main.instruction.iter().map(DrawOp::Text));
                ops.extend(main.tiles.iter().map(DrawOp::Image));
                ops.extend(main.timer.iter().map(DrawOp::Text));
            }
            Self::Outro(outro) => {
                ops.extend(outro.logo.iter().map(DrawOp::Image));
                ops.push(DrawOp::Text(&outro.title));
                ops.push(DrawOp::Text(&outro.call_to_action));
                for badge in &outro.actions {
                    ops.push(DrawOp::Image(&badge.icon));
                    ops.push(DrawOp::Text(&badge.label));
                }
            }
        }
        ops
    }
}
