/// Glyph sprites, their pixel silhouettes, and the shared asset context.
///
/// A sprite is a block of terminal glyphs.  Each glyph covers a
/// `cell_width x cell_height` rectangle of simulation pixels, and every
/// pixel under a non-space glyph is opaque.  The resulting [`Mask`] is
/// what collision tests run against.

use std::sync::Arc;

use crate::config::{GameConfig, MAX_CELL_SIZE};
use crate::entities::EnemyColor;

// ── Art ───────────────────────────────────────────────────────────────────────

const PLAYER_SHIP: &[&str] = &[
    "   A   ",
    " /=H=\\ ",
    "<=#H#=>",
];
// Lasers share their ship's width so a shot fired from the ship's origin
// travels down its centre line.
const PLAYER_LASER: &[&str] = &["   |   "];

const RED_SHIP: &[&str] = &["\\vVv/", " \\o/ "];
const RED_LASER: &[&str] = &["  !  "];

const GREEN_SHIP: &[&str] = &["{=O=}", " ]-[ "];
const GREEN_LASER: &[&str] = &["  :  "];

const BLUE_SHIP: &[&str] = &["<\\#/>", " \\V/ "];
const BLUE_LASER: &[&str] = &["  *  "];

// ── Mask ──────────────────────────────────────────────────────────────────────

/// Per-pixel opacity map, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask from raw rows where `'#'` marks an opaque pixel.
    /// Handy for hand-written silhouettes.
    pub fn from_pixels(rows: &[&str]) -> Self {
        Self::from_glyphs(
            &rows.iter().map(|r| r.replace(|c: char| c != '#', " ")).collect::<Vec<_>>(),
            1,
            1,
        )
    }

    /// Expand glyph rows into pixels; non-space glyphs are opaque.
    /// Cell sizes are clamped to `0..=MAX_CELL_SIZE`.
    pub fn from_glyphs<S: AsRef<str>>(rows: &[S], cell_width: i32, cell_height: i32) -> Self {
        let cell_width = cell_width.clamp(0, MAX_CELL_SIZE);
        let cell_height = cell_height.clamp(0, MAX_CELL_SIZE);
        let cols = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0) as i32;
        let width = cols * cell_width;
        let height = rows.len() as i32 * cell_height;
        let mut bits = vec![false; (width * height).max(0) as usize];

        for (row, line) in rows.iter().enumerate() {
            for (col, glyph) in line.as_ref().chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let x0 = col as i32 * cell_width;
                let y0 = row as i32 * cell_height;
                for y in y0..y0 + cell_height {
                    for x in x0..x0 + cell_width {
                        bits[(y * width + x) as usize] = true;
                    }
                }
            }
        }

        Mask { width, height, bits }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Opacity at `(x, y)`; anything outside the mask is transparent.
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// First opaque pixel shared with `other` placed at `offset` relative to
    /// this mask's origin, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let x_end = (ox + other.width).min(self.width);
        let y_start = oy.max(0);
        let y_end = (oy + other.height).min(self.height);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.is_opaque(x, y) && other.is_opaque(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

// ── Sprite ────────────────────────────────────────────────────────────────────

/// Glyph art plus its silhouette, computed once at construction.
#[derive(Clone, Debug)]
pub struct Sprite {
    glyphs: Vec<String>,
    mask: Mask,
}

impl Sprite {
    pub fn new<S: AsRef<str>>(glyphs: &[S], cell_width: i32, cell_height: i32) -> Self {
        Sprite {
            glyphs: glyphs.iter().map(|g| g.as_ref().to_string()).collect(),
            mask: Mask::from_glyphs(glyphs, cell_width, cell_height),
        }
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Width in simulation pixels.
    pub fn width(&self) -> i32 {
        self.mask.width()
    }

    /// Height in simulation pixels.
    pub fn height(&self) -> i32 {
        self.mask.height()
    }
}

// ── Asset context ─────────────────────────────────────────────────────────────

/// The sprite pair every combatant variant needs.
#[derive(Clone, Debug)]
pub struct ShipArt {
    pub ship: Arc<Sprite>,
    pub laser: Arc<Sprite>,
}

impl ShipArt {
    fn new(ship: &[&str], laser: &[&str], config: &GameConfig) -> Self {
        ShipArt {
            ship: Arc::new(Sprite::new(ship, config.cell_width, config.cell_height)),
            laser: Arc::new(Sprite::new(laser, config.cell_width, config.cell_height)),
        }
    }
}

/// All sprites, built once at startup and shared read-only by every entity.
#[derive(Clone, Debug)]
pub struct Assets {
    pub player: ShipArt,
    red: ShipArt,
    green: ShipArt,
    blue: ShipArt,
}

impl Assets {
    pub fn new(config: &GameConfig) -> Self {
        Assets {
            player: ShipArt::new(PLAYER_SHIP, PLAYER_LASER, config),
            red: ShipArt::new(RED_SHIP, RED_LASER, config),
            green: ShipArt::new(GREEN_SHIP, GREEN_LASER, config),
            blue: ShipArt::new(BLUE_SHIP, BLUE_LASER, config),
        }
    }

    pub fn enemy(&self, color: EnemyColor) -> &ShipArt {
        match color {
            EnemyColor::Red => &self.red,
            EnemyColor::Green => &self.green,
            EnemyColor::Blue => &self.blue,
        }
    }
}
