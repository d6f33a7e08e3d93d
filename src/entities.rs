/// Game entities: lasers, ships, and the match state that owns them.
///
/// Ships share one `Combatant` struct; what differs between the player and
/// an enemy lives in [`ShipKind`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::collision::{collide, Collidable};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::sprite::{Assets, Mask, Sprite};

// ── Enemy palette ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum EnemyColor {
    Red,
    Green,
    Blue,
}

impl EnemyColor {
    pub const ALL: [EnemyColor; 3] = [EnemyColor::Red, EnemyColor::Green, EnemyColor::Blue];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyColor::Red => "red",
            EnemyColor::Green => "green",
            EnemyColor::Blue => "blue",
        }
    }
}

impl fmt::Display for EnemyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnemyColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(EnemyColor::Red),
            "green" => Ok(EnemyColor::Green),
            "blue" => Ok(EnemyColor::Blue),
            _ => Err(GameError::UnknownColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for EnemyColor {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    sprite: Arc<Sprite>,
}

impl Projectile {
    pub fn new(x: i32, y: i32, sprite: Arc<Sprite>) -> Self {
        Projectile { x, y, sprite }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Move vertically; negative is up.
    pub fn advance(&mut self, velocity: i32) {
        self.y += velocity;
    }

    /// Outside the inclusive band `[0, screen_height]`.
    pub fn is_off_screen(&self, screen_height: i32) -> bool {
        !(0..=screen_height).contains(&self.y)
    }

    pub fn overlaps<T: Collidable + ?Sized>(&self, other: &T) -> bool {
        collide(self, other)
    }
}

impl Collidable for Projectile {
    fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn mask(&self) -> &Mask {
        self.sprite.mask()
    }
}

// ── Ships ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipKind {
    Player { max_health: i32 },
    Enemy { color: EnemyColor },
}

/// Rectangles for the player's health bar, in simulation pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthBar {
    pub x: i32,
    pub y: i32,
    /// Full (red) background width, equal to the ship's width.
    pub width: i32,
    /// Remaining (green) width.
    pub filled: i32,
    pub height: i32,
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub x: i32,
    pub y: i32,
    /// Not clamped; callers treat `<= 0` as destroyed.
    pub health: i32,
    pub kind: ShipKind,
    ship: Arc<Sprite>,
    laser: Arc<Sprite>,
    /// Oldest shot first.
    pub lasers: Vec<Projectile>,
    /// 0 means ready to fire.
    pub cooldown_counter: u32,
    cooldown: u32,
}

impl Combatant {
    pub fn player(x: i32, y: i32, assets: &Assets, config: &GameConfig) -> Self {
        let art = &assets.player;
        Combatant {
            x,
            y,
            health: config.starting_health,
            kind: ShipKind::Player {
                max_health: config.starting_health,
            },
            ship: Arc::clone(&art.ship),
            laser: Arc::clone(&art.laser),
            lasers: Vec::new(),
            cooldown_counter: 0,
            cooldown: config.cooldown_ticks,
        }
    }

    pub fn enemy(x: i32, y: i32, color: EnemyColor, assets: &Assets, config: &GameConfig) -> Self {
        let art = assets.enemy(color);
        Combatant {
            x,
            y,
            health: config.starting_health,
            kind: ShipKind::Enemy { color },
            ship: Arc::clone(&art.ship),
            laser: Arc::clone(&art.laser),
            lasers: Vec::new(),
            cooldown_counter: 0,
            cooldown: config.cooldown_ticks,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.ship
    }

    pub fn width(&self) -> i32 {
        self.ship.width()
    }

    pub fn height(&self) -> i32 {
        self.ship.height()
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ShipKind::Player { .. })
    }

    pub fn color(&self) -> Option<EnemyColor> {
        match self.kind {
            ShipKind::Enemy { color } => Some(color),
            ShipKind::Player { .. } => None,
        }
    }

    // ── Firing ───────────────────────────────────────────────────────────────

    pub fn can_fire(&self) -> bool {
        self.cooldown_counter == 0
    }

    /// Once fired, the counter climbs one per call until it reaches the
    /// cooldown period, then drops back to ready.
    pub fn handle_cooldown(&mut self) {
        if self.cooldown_counter >= self.cooldown {
            self.cooldown_counter = 0;
        } else if self.cooldown_counter > 0 {
            self.cooldown_counter += 1;
        }
    }

    /// Spawn a laser at the ship's origin if the cooldown allows it.
    /// Returns whether a shot was fired.
    pub fn fire(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.lasers
            .push(Projectile::new(self.x, self.y, Arc::clone(&self.laser)));
        self.cooldown_counter = 1;
        true
    }

    // ── Movement ─────────────────────────────────────────────────────────────

    /// Straight vertical drift.
    pub fn advance(&mut self, velocity: i32) {
        self.y += velocity;
    }

    /// Move every laser, drop the ones that left the screen, and damage
    /// `target` for each one that hits it.  Returns the number of hits.
    pub fn advance_projectiles(
        &mut self,
        velocity: i32,
        screen_height: i32,
        target: &mut Combatant,
        damage: i32,
    ) -> usize {
        self.handle_cooldown();

        let mut hits = 0;
        self.lasers.retain_mut(|laser| {
            laser.advance(velocity);
            if laser.is_off_screen(screen_height) {
                return false;
            }
            if laser.overlaps(&*target) {
                target.health -= damage;
                hits += 1;
                return false;
            }
            true
        });
        hits
    }

    /// Player variant: each laser destroys at most one enemy, the first one
    /// it overlaps in `enemies` order.  Returns the number of kills.
    pub fn advance_projectiles_against(
        &mut self,
        velocity: i32,
        screen_height: i32,
        enemies: &mut Vec<Combatant>,
    ) -> usize {
        self.handle_cooldown();

        let mut kills = 0;
        self.lasers.retain_mut(|laser| {
            laser.advance(velocity);
            if laser.is_off_screen(screen_height) {
                return false;
            }
            match enemies.iter().position(|enemy| laser.overlaps(enemy)) {
                Some(index) => {
                    enemies.remove(index);
                    kills += 1;
                    false
                }
                None => true,
            }
        });
        kills
    }

    // ── Health bar ───────────────────────────────────────────────────────────

    /// Bar under the player's sprite; `None` for enemies.
    pub fn health_bar(&self, gap: i32, bar_height: i32) -> Option<HealthBar> {
        let ShipKind::Player { max_health } = self.kind else {
            return None;
        };
        let width = self.width();
        let health = self.health.clamp(0, max_health);
        let filled = if max_health > 0 {
            (i64::from(width) * i64::from(health) / i64::from(max_health)) as i32
        } else {
            0
        };
        Some(HealthBar {
            x: self.x,
            y: self.y + self.height() + gap,
            width,
            filled,
            height: bar_height,
        })
    }
}

impl Collidable for Combatant {
    fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn mask(&self) -> &Mask {
        self.ship.mask()
    }
}

// ── Match state ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    /// The loss banner is up; the timer is running.
    LostDisplaying,
    Terminated,
}

/// Everything the simulation loop owns for one match.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Combatant,
    pub enemies: Vec<Combatant>,
    pub level: u32,
    /// Enemies spawned by the next wave is `wave_size + wave_increment`.
    pub wave_size: u32,
    pub lives: i32,
    /// Ticks spent in `LostDisplaying`, counting the entering tick.
    pub loss_timer: u32,
    pub phase: Phase,
    pub frame: u64,
}

impl GameState {
    pub fn is_lost(&self) -> bool {
        self.lives <= 0 || self.player.health <= 0
    }
}
