//! End-to-end swaps on hand-built boards. Refills are random, so assertions stick to
//! the steps whose outcome the board fully determines.

use balloon_crush::event::{RemovalReason, WallHit};
use balloon_crush::{
    GameSession, Grid, LevelConfig, Pos, Resolution, SwapOutcome, Tile, TileKind,
};

/// Colour bomb at (2,2) next to a blue; nine blues on the board.
const BOMB_BOARD: &str = "BRGBYR
                          RGBYBG
                          GB@RGB
                          YRGBRY
                          BYRGYB
                          RGPRGY";

fn session(board: &str, num_colors: u8, seed: u64) -> GameSession {
    let grid: Grid = board.parse().unwrap();
    let config = LevelConfig {
        num_colors,
        ..LevelConfig::default()
    };
    GameSession::from_grid(config, grid, seed).unwrap()
}

fn resolved(outcome: SwapOutcome) -> Resolution {
    match outcome {
        SwapOutcome::Resolved(res) => res,
        SwapOutcome::Reverted => panic!("swap was reverted"),
    }
}

#[test]
fn run_of_four_leaves_a_striped_balloon_on_the_swapped_cell() {
    let mut s = session(
        "RBGYRBGY
         GYRBGYRB
         RBGYRBGY
         GGYGBYRB
         RBGYRBGY
         GYRBGYRB
         RBGYRBGY
         GYRBGYRB",
        4,
        7,
    );
    let res = resolved(s.attempt_swap(Pos::new(2, 4), Pos::new(2, 3)).unwrap());
    let first = &res.steps[0];
    assert_eq!(first.combo, 1);
    assert_eq!(first.matched.len(), 4);
    assert_eq!(first.score_delta, 40);
    let created = first.special.unwrap();
    assert_eq!(created.pos, Pos::new(2, 3));
    assert_eq!(created.kind, TileKind::StripedColumn);
    assert!(created.placed);
    assert_eq!(
        first.grid.get(Pos::new(2, 3)),
        Some(&Tile::special(2, TileKind::StripedColumn))
    );
    assert_eq!(res.moves_left, 24);
    assert_eq!(s.moves_left(), 24);
}

#[test]
fn colour_bomb_clears_every_balloon_of_the_partner_colour() {
    let mut s = session(
        BOMB_BOARD,
        4,
        3,
    );
    assert_eq!(s.grid().count_color(1), 9);
    let before = s.grid().clone();
    let res = resolved(s.attempt_swap(Pos::new(2, 2), Pos::new(1, 2)).unwrap());
    let first = &res.steps[0];
    assert!(first.matched.is_empty());
    assert_eq!(first.cleared_count(), 10);
    assert_eq!(first.removed_by(RemovalReason::ColorBomb).count(), 10);
    assert_eq!(first.score_delta, 200);
    for pos in first.removed_by(RemovalReason::ColorBomb) {
        let tile = before.get(pos).unwrap();
        assert!(tile.color == 1 || tile.kind == TileKind::ColorBomb);
    }
    assert_eq!(res.moves_left, 24);
    assert!(res.score >= 200);
}

#[test]
fn cascade_doubles_the_per_tile_value() {
    // Clearing row 3 drops "BB" from row 2 next to the B at (3,3).
    let mut s = session(
        "GYPOGY
         POGYPO
         YBBGOP
         RRGBYG
         OGRPGY
         GPORPO",
        6,
        11,
    );
    let res = resolved(s.attempt_swap(Pos::new(2, 3), Pos::new(2, 4)).unwrap());
    assert!(res.steps.len() >= 2);
    let (first, second) = (&res.steps[0], &res.steps[1]);
    assert_eq!(first.score_delta, 30);
    assert_eq!(second.combo, 2);
    for pos in [Pos::new(1, 3), Pos::new(2, 3), Pos::new(3, 3)] {
        assert!(second.matched.contains(&pos), "{pos} not matched");
    }
    let per_tile = |step: &balloon_crush::StepReport| step.score_delta / step.cleared_count() as u32;
    assert_eq!(per_tile(second), 2 * per_tile(first));
    assert_eq!(res.score, res.score_gained());
}

#[test]
fn wall_breaks_on_its_second_hit() {
    let mut s = session(
        "GYPOGY
         POGYPO
         YBBGOP
         RRGBYG
         O2RPGY
         GPORPO",
        6,
        11,
    );
    let wall = Pos::new(1, 4);
    let res = resolved(s.attempt_swap(Pos::new(2, 3), Pos::new(2, 4)).unwrap());
    let (first, second) = (&res.steps[0], &res.steps[1]);
    assert_eq!(
        first.walls_hit,
        vec![WallHit {
            pos: wall,
            remaining: 1
        }]
    );
    assert_eq!(first.removed_by(RemovalReason::WallBroken).count(), 0);
    assert!(first.grid.get(wall).unwrap().is_wall());

    assert!(second.walls_hit.contains(&WallHit {
        pos: wall,
        remaining: 0
    }));
    assert!(second.removed_by(RemovalReason::WallBroken).any(|p| p == wall));
    assert!(!second.grid.get(wall).unwrap().is_wall());
    assert_eq!(s.grid().wall_count(), 0);
}

#[test]
fn level_is_won_once_the_target_is_reached() {
    let grid: Grid = BOMB_BOARD.parse().unwrap();
    let config = LevelConfig {
        num_colors: 4,
        target_score: 150,
        ..LevelConfig::default()
    };
    let mut s = GameSession::from_grid(config, grid, 5).unwrap();
    let res = resolved(s.attempt_swap(Pos::new(1, 2), Pos::new(2, 2)).unwrap());
    assert_eq!(res.status, balloon_crush::LevelStatus::Won);
    assert!(s.hint().is_some());
    s.next_level().unwrap();
    assert_eq!(s.level(), 2);
    assert_eq!(s.config().num_colors, 4);
    assert_eq!(s.config().target_score, 1000);
}

#[test]
fn vertical_run_of_four_keeps_its_stripe_on_the_swapped_cell() {
    let mut s = session(
        "BGYPOB
         RYPOBG
         RPOBGY
         GRBGYP
         ROGYPB
         YBRPGO",
        6,
        13,
    );
    let swapped = Pos::new(0, 3);
    let res = resolved(s.attempt_swap(Pos::new(1, 3), swapped).unwrap());
    let first = &res.steps[0];
    assert_eq!(first.matched.len(), 4);
    let created = first.special.unwrap();
    assert_eq!(created.pos, swapped);
    assert_eq!(created.kind, TileKind::StripedRow);
    assert!(created.placed);
    assert_eq!(
        first.grid.get(swapped),
        Some(&Tile::special(0, TileKind::StripedRow))
    );
    assert_eq!(
        first.grid.iter().filter(|(_, t)| t.kind.is_special()).count(),
        1
    );
    // The B above the run settled at the run's bottom cell.
    assert_eq!(first.grid.get(Pos::new(0, 4)), Some(&Tile::normal(1)));
    assert!(!first.refilled.contains(&swapped));
}

#[test]
fn colour_bomb_with_a_striped_partner_is_a_compound_clear() {
    let mut grid: Grid = BOMB_BOARD.parse().unwrap();
    grid.set(Pos::new(1, 2), Tile::special(1, TileKind::StripedRow));
    let config = LevelConfig {
        num_colors: 4,
        ..LevelConfig::default()
    };
    let mut s = GameSession::from_grid(config, grid, 17).unwrap();
    let res = resolved(s.attempt_swap(Pos::new(2, 2), Pos::new(1, 2)).unwrap());
    let first = &res.steps[0];
    assert_eq!(first.cleared_count(), 10);
    assert_eq!(first.removed_by(RemovalReason::Compound).count(), 10);
    assert_eq!(first.score_delta, 200);
    // The stripe is consumed by the compound and does not fire its row.
    assert!(first.removed_by(RemovalReason::StripedLine).next().is_none());
    assert_eq!(res.moves_left, 24);
}

#[test]
fn two_colour_bombs_clear_the_whole_board() {
    let mut s = session(
        "BRGBYR
         RGBYBG
         G@@RGB
         YRGBRY
         BYRGYB
         RGPRGY",
        4,
        19,
    );
    let res = resolved(s.attempt_swap(Pos::new(1, 2), Pos::new(2, 2)).unwrap());
    let first = &res.steps[0];
    assert_eq!(first.cleared_count(), 36);
    assert_eq!(first.removed_by(RemovalReason::Compound).count(), 36);
    assert_eq!(first.score_delta, 36 * 20);
    assert_eq!(first.refilled.len(), 36);
    assert!(first.grid.iter().all(|(_, t)| t.kind == TileKind::Normal));
    assert_eq!(res.moves_left, 24);
}
