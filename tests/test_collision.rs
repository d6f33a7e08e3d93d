use proptest::prelude::*;
use space_invader::collision::{collide, Placed};
use space_invader::config::GameConfig;
use space_invader::entities::{Combatant, EnemyColor};
use space_invader::sprite::{Assets, Mask, Sprite};

// ── Mask construction ─────────────────────────────────────────────────────────

#[test]
fn glyph_mask_expands_cells_into_pixels() {
    let mask = Mask::from_glyphs(&["# ", " #"], 3, 2);
    assert_eq!((mask.width(), mask.height()), (6, 4));
    assert_eq!(mask.count(), 12);
    assert!(mask.is_opaque(0, 0));
    assert!(mask.is_opaque(2, 1));
    assert!(!mask.is_opaque(3, 0));
    assert!(mask.is_opaque(3, 2));
    assert!(mask.is_opaque(5, 3));
    assert!(!mask.is_opaque(6, 3));
    assert!(!mask.is_opaque(-1, 0));
}

#[test]
fn oversized_cells_are_clamped() {
    let mask = Mask::from_glyphs(&["#"], 100_000, 100_000);
    assert_eq!((mask.width(), mask.height()), (1000, 1000));
    assert_eq!(mask.count(), 1_000_000);
}

#[test]
fn ragged_rows_pad_to_the_widest() {
    let mask = Mask::from_pixels(&["###", "#"]);
    assert_eq!((mask.width(), mask.height()), (3, 2));
    assert_eq!(mask.count(), 4);
}

#[test]
fn sprite_silhouettes_follow_the_art() {
    let config = GameConfig::default();
    let assets = Assets::new(&config);

    let ship = &assets.player.ship;
    assert_eq!((ship.width(), ship.height()), (70, 60));
    // 1 + 5 + 7 opaque glyphs, 10x20 pixels each.
    assert_eq!(ship.mask().count(), 13 * 200);

    let laser = &assets.player.laser;
    assert_eq!(laser.width(), ship.width());
    assert_eq!(laser.mask().count(), 200);

    for color in EnemyColor::ALL {
        let art = assets.enemy(color);
        assert_eq!((art.ship.width(), art.ship.height()), (50, 40));
        assert_eq!(art.laser.width(), art.ship.width());
    }
}

#[test]
fn sprite_keeps_its_glyphs() {
    let sprite = Sprite::new(&["/^\\"], 1, 1);
    assert_eq!(sprite.glyphs(), &["/^\\".to_string()]);
    assert_eq!(sprite.mask().count(), 3);
}

// ── Overlap ───────────────────────────────────────────────────────────────────

#[test]
fn touching_edges_do_not_collide() {
    let block = Mask::from_pixels(&["##", "##"]);
    let a = Placed::new(0, 0, &block);
    assert!(!collide(&a, &Placed::new(2, 0, &block)));
    assert!(!collide(&a, &Placed::new(0, 2, &block)));
    assert!(collide(&a, &Placed::new(1, 1, &block)));
}

#[test]
fn bounding_boxes_overlapping_is_not_enough() {
    let slash = Mask::from_pixels(&["#..", ".#.", "..#"]);
    let backslash = Mask::from_pixels(&["..#", "...", "#.."]);
    let a = Placed::new(10, 10, &slash);
    // Same box, but the opaque pixels never meet.
    assert!(!collide(&a, &Placed::new(10, 10, &backslash)));
    // Shift so the top-right corner lands on the centre.
    assert!(collide(&a, &Placed::new(9, 11, &backslash)));
}

#[test]
fn overlap_reports_first_shared_pixel() {
    let a = Mask::from_pixels(&["....", ".##.", ".##."]);
    let b = Mask::from_pixels(&["#"]);
    assert_eq!(a.overlap(&b, (2, 2)), Some((2, 2)));
    assert_eq!(a.overlap(&b, (0, 0)), None);
    assert_eq!(a.overlap(&b, (10, 10)), None);
}

#[test]
fn combatants_collide_through_their_masks() {
    let config = GameConfig::default();
    let assets = Assets::new(&config);
    let player = Combatant::player(300, 630, &assets, &config);
    let hit = Combatant::enemy(310, 601, EnemyColor::Red, &assets, &config);
    let miss = Combatant::enemy(400, 601, EnemyColor::Red, &assets, &config);
    assert!(collide(&player, &hit));
    assert!(!collide(&player, &miss));
}

// ── Properties ────────────────────────────────────────────────────────────────

fn mask_strategy() -> impl Strategy<Value = Mask> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 1..6), 1..6).prop_map(|rows| {
        let rows: Vec<String> = rows
            .iter()
            .map(|r| r.iter().map(|&b| if b { '#' } else { '.' }).collect())
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        Mask::from_pixels(&refs)
    })
}

/// Reference answer: walk the world and look for a pixel both cover.
fn brute_force(a: &Mask, ax: i32, ay: i32, b: &Mask, bx: i32, by: i32) -> bool {
    for y in ay.min(by)..ay.max(by) + 8 {
        for x in ax.min(bx)..ax.max(bx) + 8 {
            if a.is_opaque(x - ax, y - ay) && b.is_opaque(x - bx, y - by) {
                return true;
            }
        }
    }
    false
}

proptest! {
    #[test]
    fn collision_is_symmetric(
        a in mask_strategy(),
        b in mask_strategy(),
        ax in -8i32..8, ay in -8i32..8,
        bx in -8i32..8, by in -8i32..8,
    ) {
        let pa = Placed::new(ax, ay, &a);
        let pb = Placed::new(bx, by, &b);
        prop_assert_eq!(collide(&pa, &pb), collide(&pb, &pa));
    }

    #[test]
    fn collision_matches_pixel_walk(
        a in mask_strategy(),
        b in mask_strategy(),
        ax in -8i32..8, ay in -8i32..8,
        bx in -8i32..8, by in -8i32..8,
    ) {
        let pa = Placed::new(ax, ay, &a);
        let pb = Placed::new(bx, by, &b);
        prop_assert_eq!(collide(&pa, &pb), brute_force(&a, ax, ay, &b, bx, by));
    }

    #[test]
    fn identical_silhouettes_collide_at_zero_offset(a in mask_strategy(), x in -50i32..50, y in -50i32..50) {
        let pa = Placed::new(x, y, &a);
        prop_assert_eq!(collide(&pa, &pa), a.count() > 0);
    }
}
