/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// simulation pixels into terminal cells and queues the draw commands.

use std::io::Write;
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invader::config::GameConfig;
use space_invader::entities::{Combatant, EnemyColor, GameState, HealthBar, Phase, Projectile};
use space_invader::sprite::Sprite;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_BAR_EMPTY: Color = Color::Red;
const C_BAR_FULL: Color = Color::Green;
const C_LOST: Color = Color::Red;
const C_TITLE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Vertical pixel position of the loss banner.
const LOST_BANNER_Y: i32 = 350;
/// Vertical pixel positions of the title and prompt on the menu.
const TITLE_Y: i32 = 300;
const PROMPT_Y: i32 = 450;

fn enemy_color(color: EnemyColor) -> Color {
    match color {
        EnemyColor::Red => Color::Red,
        EnemyColor::Green => Color::Green,
        EnemyColor::Blue => Color::Blue,
    }
}

/// Maps simulation pixels onto the terminal grid.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: u16,
    rows: u16,
    width: i32,
    height: i32,
}

impl Viewport {
    fn new(config: &GameConfig, size: (u16, u16)) -> Self {
        Viewport {
            cols: size.0,
            rows: size.1,
            width: config.screen_width,
            height: config.screen_height,
        }
    }

    fn col(&self, x: i32) -> i32 {
        (i64::from(x) * i64::from(self.cols) / i64::from(self.width)) as i32
    }

    fn row(&self, y: i32) -> i32 {
        (i64::from(y) * i64::from(self.rows) / i64::from(self.height)) as i32
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < i32::from(self.cols) && row < i32::from(self.rows)
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame of a match.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    config: &GameConfig,
    size: (u16, u16),
) -> std::io::Result<()> {
    let view = Viewport::new(config, size);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for enemy in &state.enemies {
        let color = enemy.color().map(enemy_color).unwrap_or(C_PLAYER);
        draw_ship(out, &view, enemy, color)?;
    }

    draw_ship(out, &view, &state.player, C_PLAYER)?;
    draw_health_bar(out, &view, &state.player, config)?;
    draw_hud(out, &view, state)?;

    if matches!(state.phase, Phase::LostDisplaying | Phase::Terminated) {
        draw_centered(out, &view, LOST_BANNER_Y, "You Lost!!", C_LOST)?;
    }

    finish(out, &view)
}

/// Render the title screen.
pub fn render_menu<W: Write>(
    out: &mut W,
    config: &GameConfig,
    size: (u16, u16),
) -> std::io::Result<()> {
    let view = Viewport::new(config, size);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_centered(out, &view, TITLE_Y, "...Welcome to Space Invader...", C_TITLE)?;
    draw_centered(out, &view, PROMPT_Y, "Press SPACE to start", C_TITLE)?;

    let hint = "W A S D / arrows : Move   SPACE : Shoot   Q : Quit";
    let col = (view.cols / 2).saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    finish(out, &view)
}

fn finish<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("Lives: {}", state.lives)))?;

    let level = format!("Level: {}", state.level);
    let col = view.cols.saturating_sub(level.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(level))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(
    out: &mut W,
    view: &Viewport,
    ship: &Combatant,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    draw_sprite(out, view, ship.sprite(), ship.x, ship.y)?;
    for laser in &ship.lasers {
        draw_laser(out, view, laser)?;
    }
    Ok(())
}

fn draw_laser<W: Write>(out: &mut W, view: &Viewport, laser: &Projectile) -> std::io::Result<()> {
    draw_sprite(out, view, laser.sprite(), laser.x, laser.y)
}

/// Blit glyphs at the cell under `(x, y)`, skipping spaces and clipping to
/// the terminal.  Uses whatever foreground colour is already set.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &Sprite,
    x: i32,
    y: i32,
) -> std::io::Result<()> {
    let col0 = view.col(x);
    let row0 = view.row(y);
    for (dy, line) in sprite.glyphs().iter().enumerate() {
        let row = row0 + dy as i32;
        for (dx, glyph) in line.chars().enumerate() {
            let col = col0 + dx as i32;
            if glyph == ' ' || !view.contains(col, row) {
                continue;
            }
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

/// Red background the width of the ship, green overlay for what is left.
fn draw_health_bar<W: Write>(
    out: &mut W,
    view: &Viewport,
    player: &Combatant,
    config: &GameConfig,
) -> std::io::Result<()> {
    let Some(bar) = player.health_bar(config.health_bar_gap, config.health_bar_height) else {
        return Ok(());
    };
    let cells = player
        .sprite()
        .glyphs()
        .iter()
        .map(|g| g.chars().count())
        .max()
        .unwrap_or(0) as i32;
    let filled_cells = if bar.width > 0 {
        bar.filled * cells / bar.width
    } else {
        0
    };

    let col0 = view.col(bar.x);
    for row in bar_rows(view, player, &bar) {
        for i in 0..cells {
            let col = col0 + i;
            if !view.contains(col, row) {
                continue;
            }
            let color = if i < filled_cells { C_BAR_FULL } else { C_BAR_EMPTY };
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print('█'))?;
        }
    }
    Ok(())
}

/// Terminal rows covered by the bar, at least one.  Glyphs are drawn one
/// cell each regardless of scale, so the bar never climbs into the sprite.
fn bar_rows(view: &Viewport, player: &Combatant, bar: &HealthBar) -> Range<i32> {
    let below_sprite = view.row(player.y) + player.sprite().glyphs().len() as i32;
    let top = view.row(bar.y).max(below_sprite);
    let span = view.row(bar.y + bar.height) - view.row(bar.y);
    top..(top + span).max(top + 1)
}

fn draw_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    y: i32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let row = view.row(y).clamp(0, i32::from(view.rows.saturating_sub(1))) as u16;
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_invader::sprite::Assets;

    fn bar_for(size: (u16, u16)) -> Range<i32> {
        let config = GameConfig::default();
        let assets = Assets::new(&config);
        let player = Combatant::player(300, 630, &assets, &config);
        let bar = player
            .health_bar(config.health_bar_gap, config.health_bar_height)
            .unwrap();
        bar_rows(&Viewport::new(&config, size), &player, &bar)
    }

    #[test]
    fn health_bar_rows_follow_its_pixel_box() {
        // One row per pixel: the bar sits 10px under the 60px ship, 10px tall.
        assert_eq!(bar_for((800, 800)), 700..710);
    }

    #[test]
    fn health_bar_keeps_one_row_on_small_terminals() {
        // 20px per row: the ship's three glyph rows end at row 34.
        assert_eq!(bar_for((80, 40)), 35..36);
    }

    #[test]
    fn health_bar_never_overlaps_the_ship_glyphs() {
        // 40px per row squeezes the bar into the sprite's last row; push it below.
        assert_eq!(bar_for((80, 20)), 18..19);
    }
}
