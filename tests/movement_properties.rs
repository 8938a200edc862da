use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rich_street::board::{Rules, TRACK_LENGTH, resolve_target};
use rich_street::engine::{GameError, Output, WalkEnd, validate_relative_placement, walk};
use rich_street::state::{GameState, Player};

fn lone_walker(position: usize) -> GameState {
    let mut p = Player::new(0, "Q", 10_000);
    p.position = position;
    GameState::new(vec![p, Player::new(1, "A", 10_000)], 10)
}

proptest! {
    #[test]
    fn resolve_wraps_forward(p in 0..TRACK_LENGTH, s in 0i64..10_000) {
        prop_assert_eq!(resolve_target(p, s), (p + s as usize) % TRACK_LENGTH);
    }

    #[test]
    fn resolve_stays_on_the_track(p in 0..TRACK_LENGTH, s in -10_000i64..10_000) {
        prop_assert!(resolve_target(p, s) < TRACK_LENGTH);
    }

    #[test]
    fn resolve_never_overflows(p in 0..TRACK_LENGTH, s in any::<i64>()) {
        prop_assert!(resolve_target(p, s) < TRACK_LENGTH);
    }

    #[test]
    fn unobstructed_walk_matches_resolve(p in 0..TRACK_LENGTH, s in 1i64..=12) {
        let mut state = lone_walker(p);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, s);
        prop_assert_eq!(end, WalkEnd::Arrived(resolve_target(p, s)));
    }

    #[test]
    fn long_walks_end_where_resolve_says(p in 0..TRACK_LENGTH, s in 71i64..=i64::MAX) {
        let mut state = lone_walker(p);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, s);
        prop_assert_eq!(end, WalkEnd::Arrived(resolve_target(p, s)));
    }

    #[test]
    fn placement_range_is_symmetric(d in any::<i64>()) {
        let result = validate_relative_placement(d, 10);
        if d == 0 {
            prop_assert_eq!(result, Err(GameError::OwnTile));
        } else if d.unsigned_abs() <= 10 {
            prop_assert_eq!(result, Ok(()));
        } else {
            prop_assert_eq!(result, Err(GameError::OutOfRange { range: 10 }));
        }
    }
}
