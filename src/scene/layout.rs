use crate::foundation::core::{Canvas, PixelPoint};

/// Pixel size of a rectangular placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoxSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoxSize {
    /// Square box.
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Fixed placement of every scene element on a canvas.
///
/// Horizontal positions derive from the canvas width; the outro bands are fractions of the
/// height. Rows of the main scene are absolute offsets from the top edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneLayout {
    /// Canvas the layout was derived for.
    pub canvas: Canvas,
    /// Center of the hook caption.
    pub hook_center: PixelPoint,
    /// Center of the instruction caption.
    pub instruction_center: PixelPoint,
    /// Top-left corners of the 2x2 grid tiles, row-major.
    pub grid: [PixelPoint; 4],
    /// Size every grid tile is drawn at.
    pub tile: BoxSize,
    /// Top-left of the countdown text.
    pub timer_top_left: PixelPoint,
    /// Top-left of the outro logo.
    pub logo_top_left: PixelPoint,
    /// Size the outro logo is drawn at.
    pub logo: BoxSize,
    /// Center of the outro title.
    pub outro_title_center: PixelPoint,
    /// Center of the outro call to action.
    pub call_to_action_center: PixelPoint,
    /// Vertical center of the outro icon row.
    pub icon_row_y: i32,
    /// Horizontal distance between neighbouring icon centers.
    pub icon_spacing: i32,
    /// Size every outro icon is drawn at.
    pub icon: BoxSize,
    /// Vertical distance from an icon center to its label center.
    pub label_offset: i32,
}

const HOOK_Y: i32 = 120;
const INSTRUCTION_Y: i32 = 260;
const GRID_TOP_Y: i32 = 380;
const GRID_GAP: i32 = 20;
const TILE_SIDE: u32 = 420;
const TIMER_RIGHT_INSET: i32 = 160;
const TIMER_Y: i32 = 60;
const LOGO_SIDE: u32 = 120;
const LOGO_RIGHT_INSET: i32 = 140;
const LOGO_Y: i32 = 30;
const ICON_SIDE: u32 = 80;
const ICON_SPACING: i32 = 200;
const LABEL_OFFSET: i32 = 70;

fn fraction_of(total: u32, fraction: f64) -> i32 {
    (f64::from(total) * fraction).floor() as i32
}

impl SceneLayout {
    /// Layout for `canvas`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        let w = canvas.width as i32;
        let cx = canvas.center_x();
        let side = TILE_SIDE as i32;
        let start_x = (w - (side * 2 + GRID_GAP)).div_euclid(2);
        let second_col = start_x + side + GRID_GAP;
        let second_row = GRID_TOP_Y + side + GRID_GAP;

        Self {
            canvas,
            hook_center: PixelPoint::new(cx, HOOK_Y),
            instruction_center: PixelPoint::new(cx, INSTRUCTION_Y),
            grid: [
                PixelPoint::new(start_x, GRID_TOP_Y),
                PixelPoint::new(second_col, GRID_TOP_Y),
                PixelPoint::new(start_x, second_row),
                PixelPoint::new(second_col, second_row),
            ],
            tile: BoxSize::square(TILE_SIDE),
            timer_top_left: PixelPoint::new(w - TIMER_RIGHT_INSET, TIMER_Y),
            logo_top_left: PixelPoint::new(w - LOGO_RIGHT_INSET, LOGO_Y),
            logo: BoxSize::square(LOGO_SIDE),
            outro_title_center: PixelPoint::new(cx, fraction_of(canvas.height, 0.30)),
            call_to_action_center: PixelPoint::new(cx, fraction_of(canvas.height, 0.42)),
            icon_row_y: fraction_of(canvas.height, 0.62),
            icon_spacing: ICON_SPACING,
            icon: BoxSize::square(ICON_SIDE),
            label_offset: LABEL_OFFSET,
        }
    }

    /// Center of action slot `slot` out of `count`, laid out symmetrically around the canvas
    /// center.
    pub fn action_center(&self, slot: usize, count: usize) -> PixelPoint {
        let offset = slot as i32 * 2 - (count as i32 - 1);
        let x = self.canvas.center_x() + offset * self.icon_spacing / 2;
        PixelPoint::new(x, self.icon_row_y)
    }

    /// Top-left corner that centers an icon on `center`.
    pub fn icon_top_left(&self, center: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            center.x - (self.icon.width / 2) as i32,
            center.y - (self.icon.height / 2) as i32,
        )
    }

    /// Center of the label below the icon centered on `center`.
    pub fn label_center(&self, center: PixelPoint) -> PixelPoint {
        PixelPoint::new(center.x, center.y + self.label_offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;
