use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Result};
use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::state::{DeathCause, GameState, TickOutcome};
use crate::term::TermManager;
use crate::timer::Timer;
use crate::snake::Direction::{*, self};
use crate::{Cell, Coords, TermInt};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};

const TITLE: &str = "SNAKE THE GAME";

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';

/// What a single key press asks the game to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    TogglePause,
    Quit,
    Ignore,
}

pub fn map_key(ev: &KeyEvent) -> Input {
    if is_ctrl_c(ev) {
        return Input::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Input::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Input::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Input::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Input::Turn(Right),
        KeyCode::Char(' ') | KeyCode::Esc => Input::TogglePause,
        KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
        _ => Input::Ignore,
    }
}

/// What a grid cell should show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Sprite {
    Head(Direction),
    Body,
    Food,
    Empty,
}

/// Head and tail as they were before a tick.
#[derive(Copy, Clone, Debug)]
struct Snapshot {
    head: Cell,
    tail: Cell,
}

impl Snapshot {
    fn of(body: &crate::snake::Body) -> Self {
        Snapshot { head: body.head(), tail: body.tail() }
    }
}

/// Consults the timer every frame, paused or not, so resuming keeps the
/// tick cadence. Returns the tick outcome when the timer fired.
fn frame_tick<R: Rng>(timer: &mut Timer, state: &mut GameState<R>, now: f64, interval: f64) -> Option<TickOutcome> {
    if timer.should_fire(now, interval) {
        Some(state.tick())
    } else {
        None
    }
}

/// Cells to repaint after a plain move: the old head becomes body, the old
/// tail is cleared unless the snake grew or the head took its place, and a
/// fresh food is drawn when one was eaten.
fn move_updates<R: Rng>(before: Snapshot, ate: bool, state: &GameState<R>) -> Vec<(Cell, Sprite)> {
    let head = state.body().head();
    let mut updates = vec![(before.head, Sprite::Body)];

    if !ate && before.tail != head {
        updates.push((before.tail, Sprite::Empty));
    }
    if ate {
        if let Some(food) = state.food() {
            updates.push((food, Sprite::Food));
        }
    }

    updates.push((head, Sprite::Head(state.direction())));
    updates
}

/// Owns the terminal, the game state and the frame loop.
pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
    state: GameState,
    timer: Timer,
    last_outcome: Option<TickOutcome>,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let term = TermManager::new()?;
        let state = GameState::new(config.cell_count);
        Ok(SnakeGame { config, term, state, timer: Timer::new(), last_outcome: None })
    }

    /// Runs until the player quits. The terminal is restored even when the
    /// game loop fails.
    pub fn run(&mut self) -> Result<()> {
        self.check_terminal_size()?;
        self.term.setup()?;

        let res = self.show_intro().and_then(|go| if go { self.play() } else { Ok(()) });
        let restored = self.term.restore();

        res?;
        restored
    }

    ///////////////////////////////////////////////////////////////////////////

    fn check_terminal_size(&self) -> Result<()> {
        let (need_w, need_h) = self.config.screen_size();
        let (w, h) = self.term.get_terminal_size();
        if (w as u32) < need_w || (h as u32) < need_h {
            bail!("terminal is {}x{}, the game needs at least {}x{}", w, h, need_w, need_h);
        }
        Ok(())
    }

    /// Returns false if the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Space or Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        let key = self.term.read_key_blocking()?;
        if map_key(&key) == Input::Quit {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    fn play(&mut self) -> Result<()> {
        self.term.clear()?;
        self.draw_frame()?;
        self.draw_state()?;

        let clock = Instant::now();
        let frame = Duration::from_secs_f64(1.0 / self.config.fps as f64);

        loop {
            let frame_start = Instant::now();
            let mut redraw = false;
            let mut pause_toggled = false;

            for key_ev in self.term.read_key_events_queue()? {
                match map_key(&key_ev) {
                    Input::Quit => {
                        info!("quit requested");
                        return Ok(());
                    }
                    Input::TogglePause => {
                        self.state.toggle_running();
                        if self.state.is_running() {
                            self.last_outcome = None;
                        }
                        pause_toggled = true;
                    }
                    Input::Turn(dir) => {
                        if self.state.set_direction(dir) {
                            debug!("direction -> {:?}", dir);
                        }
                    }
                    Input::Ignore => {}
                }
            }

            let now = clock.elapsed().as_secs_f64();
            let before = Snapshot::of(self.state.body());
            match frame_tick(&mut self.timer, &mut self.state, now, self.config.tick_interval) {
                None | Some(TickOutcome::Paused) => {}
                Some(TickOutcome::Moved { ate }) => {
                    let updates = move_updates(before, ate, &self.state);
                    self.draw_cells(&updates)?;
                }
                Some(outcome) => {
                    self.last_outcome = Some(outcome);
                    redraw = true;
                }
            }

            if redraw {
                self.draw_state()?;
            } else if pause_toggled {
                self.update_overlay()?;
            }

            if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                sleep(rest);
            }
        }
    }

    fn draw_frame(&mut self) -> Result<()> {
        let offset = self.config.offset;
        let (w, h) = self.grid_size();

        if self.config.has_border() {
            self.term.draw_borders((offset - 1, offset - 1), (offset + w, offset + h))?;
        }

        if self.config.has_title() {
            let title_len = TITLE.chars().count() as TermInt;
            let x = offset + w.saturating_sub(title_len) / 2;
            self.term.print_str_at((x, offset - 2), TITLE)?;
        }

        self.term.flush()
    }

    /// Repaints the whole grid, then the pause or game-over box if the game
    /// is not running.
    fn draw_state(&mut self) -> Result<()> {
        self.term.hide_message()?;

        let n = self.state.cell_count();
        let empty = self.sprite_glyph(Sprite::Empty);
        for y in 0..n {
            for x in 0..n {
                let pos = self.screen_pos((x, y));
                self.term.print_str_at(pos, &empty)?;
            }
        }

        let mut cells: Vec<(Cell, Sprite)> = self.state.food().map(|f| (f, Sprite::Food)).into_iter().collect();
        cells.extend(self.state.body().iter().skip(1).map(|c| (*c, Sprite::Body)));
        cells.push((self.state.body().head(), Sprite::Head(self.state.direction())));
        self.draw_cells(&cells)?;

        self.update_overlay()
    }

    fn draw_cells(&mut self, cells: &[(Cell, Sprite)]) -> Result<()> {
        for (cell, sprite) in cells {
            let glyph = self.sprite_glyph(*sprite);
            let pos = self.screen_pos(*cell);
            self.term.print_str_at(pos, &glyph)?;
        }
        self.term.flush()
    }

    fn update_overlay(&mut self) -> Result<()> {
        if self.state.is_running() {
            self.term.hide_message()
        } else {
            self.show_overlay()
        }
    }

    fn show_overlay(&mut self) -> Result<()> {
        let lines = match self.last_outcome {
            Some(TickOutcome::Died(cause)) => vec![
                "Game over!",
                death_message(cause),
                "",
                "Space to play again,",
                "or Q to quit."
            ],
            Some(TickOutcome::BoardFilled) => vec![
                "You won!",
                "",
                "Space to play again,",
                "or Q to quit."
            ],
            _ => vec!["Paused", "Space to resume", "or Q to quit"],
        };
        self.term.show_message(&lines)
    }

    fn grid_size(&self) -> Coords {
        let n = self.config.cell_count as TermInt;
        (n * self.config.cell_width, n)
    }

    fn screen_pos(&self, (x, y): Cell) -> Coords {
        let offset = self.config.offset;
        (offset + x as TermInt * self.config.cell_width, offset + y as TermInt)
    }

    fn sprite_glyph(&self, sprite: Sprite) -> String {
        let width = self.config.cell_width as usize;
        match sprite {
            Sprite::Head(dir) => std::iter::repeat(head_char(dir)).take(width).collect(),
            Sprite::Body => std::iter::repeat(SNAKE_BODY_CHAR).take(width).collect(),
            Sprite::Empty => " ".repeat(width),
            Sprite::Food if width < 2 => APPLE_CHAR.to_string(),
            Sprite::Food => format!("({})", " ".repeat(width - 2)),
        }
    }
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn death_message(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::OutOfBounds => "You hit the wall.",
        DeathCause::SelfCollision => "You bit yourself.",
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Body;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(map_key(&key(KeyCode::Up)), Input::Turn(Up));
        assert_eq!(map_key(&key(KeyCode::Down)), Input::Turn(Down));
        assert_eq!(map_key(&key(KeyCode::Left)), Input::Turn(Left));
        assert_eq!(map_key(&key(KeyCode::Right)), Input::Turn(Right));

        assert_eq!(map_key(&key(KeyCode::Char('w'))), Input::Turn(Up));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), Input::Turn(Left));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), Input::Turn(Down));
        assert_eq!(map_key(&key(KeyCode::Char('D'))), Input::Turn(Right));
    }

    #[test]
    fn pause_and_quit_keys() {
        assert_eq!(map_key(&key(KeyCode::Char(' '))), Input::TogglePause);
        assert_eq!(map_key(&key(KeyCode::Esc)), Input::TogglePause);
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Input::Quit);

        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(map_key(&ctrl_c), Input::Quit);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('c'))), Input::Ignore);
        assert_eq!(map_key(&key(KeyCode::Enter)), Input::Ignore);
    }

    fn game(seed: u64) -> GameState<StdRng> {
        GameState::with_rng(25, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn timer_keeps_running_while_paused() {
        let mut state = game(1);
        let mut timer = Timer::new();
        state.toggle_running();

        assert_eq!(frame_tick(&mut timer, &mut state, 0.25, 0.2), Some(TickOutcome::Paused));
        assert_eq!(frame_tick(&mut timer, &mut state, 0.3, 0.2), None);

        // Resuming just after a paused firing waits for the next interval
        state.toggle_running();
        assert_eq!(frame_tick(&mut timer, &mut state, 0.31, 0.2), None);
        assert!(matches!(
            frame_tick(&mut timer, &mut state, 0.5, 0.2),
            Some(TickOutcome::Moved { .. })
        ));
    }

    #[test]
    fn move_repaints_head_neck_and_tail() {
        let mut state = game(2);
        state.place(Body::initial(25), Right, Some((0, 0)));
        let before = Snapshot::of(state.body());

        assert_eq!(state.tick(), TickOutcome::Moved { ate: false });
        assert_eq!(
            move_updates(before, false, &state),
            vec![((12, 12), Sprite::Body), ((10, 12), Sprite::Empty), ((13, 12), Sprite::Head(Right))]
        );
    }

    #[test]
    fn eating_keeps_tail_and_draws_new_food() {
        let mut state = game(3);
        state.place(Body::initial(25), Right, Some((13, 12)));
        let before = Snapshot::of(state.body());

        assert_eq!(state.tick(), TickOutcome::Moved { ate: true });
        let food = state.food().unwrap();
        assert_eq!(
            move_updates(before, true, &state),
            vec![((12, 12), Sprite::Body), (food, Sprite::Food), ((13, 12), Sprite::Head(Right))]
        );
    }

    #[test]
    fn head_entering_old_tail_is_not_erased() {
        let mut state = game(4);
        state.place(Body::from_cells(&[(5, 5), (6, 5), (6, 6), (5, 6)]), Down, Some((20, 20)));
        let before = Snapshot::of(state.body());

        assert_eq!(state.tick(), TickOutcome::Moved { ate: false });
        assert_eq!(
            move_updates(before, false, &state),
            vec![((5, 5), Sprite::Body), ((5, 6), Sprite::Head(Down))]
        );
    }

    #[test]
    fn head_points_where_the_snake_goes() {
        assert_eq!(head_char(Up), '^');
        assert_eq!(head_char(Right), '>');
    }
}
