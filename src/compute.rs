/// Game logic: match setup, wave spawning, and the per-tick simulation step.
///
/// Every function mutates the `GameState` it is handed; rendering and input
/// polling belong to the shell.  All randomness comes through an injected
/// `rng` so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::collision::collide;
use crate::config::GameConfig;
use crate::entities::{Combatant, GameState, Phase};
use crate::sprite::Assets;

/// Held keys for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Window close / quit key.
    pub quit: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh match, ready to play.  The first wave spawns on the first tick.
pub fn init_state(config: &GameConfig, assets: &Assets) -> GameState {
    GameState {
        player: Combatant::player(config.player_start_x, config.player_start_y, assets, config),
        enemies: Vec::new(),
        level: config.starting_level,
        wave_size: config.starting_wave_size,
        lives: config.starting_lives,
        loss_timer: 0,
        phase: Phase::Playing,
        frame: 0,
    }
}

/// Same as [`init_state`] but parked on the title screen.
pub fn menu_state(config: &GameConfig, assets: &Assets) -> GameState {
    GameState {
        phase: Phase::Menu,
        ..init_state(config, assets)
    }
}

/// Leave the menu (or a finished match) with a brand-new match.
/// Does nothing while a match is in progress.
pub fn start_match(state: &mut GameState, config: &GameConfig, assets: &Assets) {
    if matches!(state.phase, Phase::Menu | Phase::Terminated) {
        *state = init_state(config, assets);
        log::info!("Match started");
    }
}

// ── Waves ────────────────────────────────────────────────────────────────────

/// Bump the level and wave size, then spawn `wave_size` enemies above the
/// screen.  Returns the number spawned.
pub fn spawn_wave(
    state: &mut GameState,
    config: &GameConfig,
    assets: &Assets,
    rng: &mut impl Rng,
) -> usize {
    state.level += 1;
    state.wave_size += config.wave_increment;

    let count = state.wave_size as usize;
    state.enemies.reserve(count);
    for _ in 0..count {
        let x = rng.gen_range(config.spawn_x_min..config.spawn_x_max());
        let y = rng.gen_range(config.spawn_y_min..config.spawn_y_max);
        let Some(&color) = config.spawn_colors.choose(rng) else {
            break;
        };
        state
            .enemies
            .push(Combatant::enemy(x, y, color, assets, config));
    }

    log::info!("Level {}: spawned {} enemies", state.level, state.enemies.len());
    count
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Move the player by one step per held direction, never letting the
/// sprite (plus its health bar underneath) leave the screen.
pub fn move_player(state: &mut GameState, input: &TickInput, config: &GameConfig) {
    let v = config.player_velocity;
    let player = &mut state.player;
    let (w, h) = (player.width(), player.height());

    if input.left && player.x - v > 0 {
        player.x -= v;
    }
    if input.right && player.x + v + w < config.screen_width {
        player.x += v;
    }
    if input.up && player.y - v > 0 {
        player.y -= v;
    }
    if input.down && player.y + v + h + config.bottom_margin < config.screen_height {
        player.y += v;
    }
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Advance the match by one tick.
///
/// Order: quit, loss check, loss-banner countdown, wave spawn, player
/// movement and fire, each enemy (drift, its lasers, random fire, ramming,
/// escaping off the bottom), then the player's lasers.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    assets: &Assets,
    rng: &mut impl Rng,
) {
    if matches!(state.phase, Phase::Menu | Phase::Terminated) {
        return;
    }
    state.frame += 1;

    // Quit is honoured in every phase, the loss banner included.
    if input.quit {
        state.phase = Phase::Terminated;
        return;
    }

    // ── 1. Loss ───────────────────────────────────────────────────────────────
    if state.phase == Phase::Playing && state.is_lost() {
        log::info!(
            "Match lost at level {} (lives {}, health {})",
            state.level,
            state.lives,
            state.player.health
        );
        state.phase = Phase::LostDisplaying;
    }
    if state.phase == Phase::LostDisplaying {
        state.loss_timer += 1;
        if state.loss_timer > config.loss_display_ticks() {
            state.phase = Phase::Terminated;
        }
        return;
    }

    // ── 2. Next wave ─────────────────────────────────────────────────────────
    if state.enemies.is_empty() {
        spawn_wave(state, config, assets, rng);
    }

    // ── 3. Player ────────────────────────────────────────────────────────────
    move_player(state, input, config);
    if input.fire {
        state.player.fire();
    }

    // ── 4. Enemies ───────────────────────────────────────────────────────────
    let screen_height = config.screen_height;
    let damage = config.hit_damage;
    let mut survivors = Vec::with_capacity(state.enemies.len());

    for mut enemy in std::mem::take(&mut state.enemies) {
        enemy.advance(config.enemy_velocity);
        let hits =
            enemy.advance_projectiles(config.laser_velocity, screen_height, &mut state.player, damage);
        if hits > 0 {
            log::trace!("Player hit by {} laser(s), health {}", hits, state.player.health);
        }

        if rng.gen_ratio(1, config.enemy_fire_chance) {
            enemy.fire();
        }

        if collide(&enemy, &state.player) {
            state.player.health -= damage;
            log::debug!("Enemy rammed the player, health {}", state.player.health);
            continue;
        }
        if enemy.y + enemy.height() > screen_height {
            state.lives -= 1;
            log::debug!("Enemy escaped, {} lives left", state.lives);
            continue;
        }
        survivors.push(enemy);
    }
    state.enemies = survivors;

    // ── 5. Player lasers ─────────────────────────────────────────────────────
    let kills = state.player.advance_projectiles_against(
        -config.laser_velocity,
        screen_height,
        &mut state.enemies,
    );
    if kills > 0 {
        log::debug!("{} enemy(ies) destroyed, {} remain", kills, state.enemies.len());
    }
}
