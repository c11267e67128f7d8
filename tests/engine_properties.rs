use std::collections::HashSet;

use rail_snake::config::{GameConfig, GridSize, Topology};
use rail_snake::food::FoodSet;
use rail_snake::game::{GameState, TickOutcome};
use rail_snake::grid::{ExitFlags, MapModel};
use rail_snake::input::Direction;
use rail_snake::snake::{Position, Snake};

fn rail_config(width: u16, height: u16) -> GameConfig {
    GameConfig::new(GridSize { width, height }, Topology::Rail)
}

/// Cheap deterministic direction picker for long runs.
fn scripted_direction(step: u64) -> Direction {
    let mixed = step.wrapping_mul(6_364_136_223_846_793_005).rotate_left(17);
    Direction::ALL[(mixed % 4) as usize]
}

#[test]
fn growth_and_score_move_together() {
    for seed in 0..8 {
        let mut state = GameState::new_with_seed(rail_config(22, 22), seed).expect("rail map");

        for step in 0..400 {
            if step % 5 == 0 {
                state.set_desired_direction(scripted_direction(step + seed));
            }

            let before_len = state.snake.len();
            let before_score = state.score;
            let outcome = state.tick();

            match outcome {
                TickOutcome::Ate { score } => {
                    assert_eq!(score, before_score + 1);
                    assert_eq!(state.snake.len(), before_len + 1);
                }
                TickOutcome::Moved | TickOutcome::Idle => {
                    assert_eq!(state.score, before_score);
                    assert_eq!(state.snake.len(), before_len);
                }
                TickOutcome::Collided(_) | TickOutcome::Finished => break,
            }

            let distinct: HashSet<_> = state.snake.segments().copied().collect();
            assert_eq!(distinct.len(), state.snake.len(), "path self-intersects");
            assert!(state.food.iter().all(|food| !state.snake.occupies(*food)));
            assert!(
                state
                    .snake
                    .segments()
                    .all(|segment| state.map().is_traversable(*segment)),
                "path left the rails without ending the game"
            );
        }
    }
}

#[test]
fn interval_never_increases_during_play() {
    let mut state = GameState::new_with_seed(
        GameConfig::new(
            GridSize {
                width: 30,
                height: 4,
            },
            Topology::Open,
        ),
        3,
    )
    .expect("open map");
    state.snake = Snake::moving(Position::new(1, 1), Direction::Right);

    let mut previous = state.tick_interval_ms;
    for x in 2..29 {
        state.food = FoodSet::from_positions([Position::new(x, 1)]);
        assert!(matches!(state.tick(), TickOutcome::Ate { .. }));
        assert!(state.tick_interval_ms <= previous);
        assert!(state.tick_interval_ms >= state.config().min_tick_interval_ms);
        previous = state.tick_interval_ms;
    }

    assert_eq!(state.score, 27);
    assert_eq!(state.tick_interval_ms, 80 - 22);
}

#[test]
fn reversal_never_moves_head_into_neck() {
    let mut state = GameState::new_with_seed(rail_config(16, 16), 1).expect("rail map");
    state.snake = Snake::from_segments(
        vec![Position::new(3, 4), Position::new(2, 4)],
        Direction::Right,
    );
    state.food = FoodSet::from_positions([Position::new(13, 13)]);

    state.set_desired_direction(Direction::Left);
    for _ in 0..3 {
        state.tick();
        assert_ne!(state.snake.head(), Position::new(2, 4));
    }

    assert_eq!(state.snake.head(), Position::new(6, 4));
    assert!(!state.is_over());
}

#[test]
fn moving_down_a_rail_ends_before_leaving_it() {
    let size = GridSize {
        width: 14,
        height: 14,
    };
    let map = MapModel::build(size, Topology::Rail);
    let start = Position::new(4, 1);
    assert!(map.exits(start).expect("in bounds").down);

    let mut state = GameState::new_with_seed(rail_config(14, 14), 2).expect("rail map");
    state.snake = Snake::moving(start, Direction::Down);
    state.food = FoodSet::new();

    let mut ticks = 0;
    while !state.is_over() {
        state.tick();
        ticks += 1;
        assert!(ticks < 20, "never reached the end of the rail");

        if !state.is_over() {
            assert_ne!(map.exits(state.snake.head()), Some(ExitFlags::CLOSED));
        }
    }

    // Column 4 runs from row 1 down to row 12; the border row 13 is lethal.
    assert_eq!(state.snake.head(), Position::new(4, 12));
}

#[test]
fn board_with_one_free_cell_gets_that_food() {
    // 5x3 open map: interior cells (1,1), (2,1), (3,1).
    let mut state = GameState::new_with_seed(
        GameConfig::new(
            GridSize {
                width: 5,
                height: 3,
            },
            Topology::Open,
        ),
        4,
    )
    .expect("open map");
    state.snake = Snake::moving(Position::new(1, 1), Direction::Right);
    state.food = FoodSet::from_positions([Position::new(2, 1)]);

    assert_eq!(state.tick(), TickOutcome::Ate { score: 1 });
    assert_eq!(state.food.iter().copied().collect::<Vec<_>>(), vec![
        Position::new(3, 1)
    ]);

    // Eating the last free cell leaves nothing to spawn on.
    assert_eq!(state.tick(), TickOutcome::Ate { score: 2 });
    assert!(state.food.is_empty());
    assert_eq!(state.snake.len(), 3);
}
