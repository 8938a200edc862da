pub mod board;
pub mod engine;
pub mod save;
pub mod state;

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use board::Rules;
use engine::{Command, GameError, Output, SetupError, Target};
use state::{GameState, HazardKind};

pub use board::{load_rules_from_file, load_rules_from_str};

/// One game in progress: the rules it runs under, its state and its dice.
pub struct Game {
    pub rules: Rules,
    pub state: GameState,
    rng: StdRng,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    struct WasmStepResult {
        blocks: Vec<engine::OutputBlock>,
        quit: bool,
    }

    #[wasm_bindgen]
    pub struct WasmGame {
        game: Game,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Start a game for the given roster selection (e.g. "1234") with default rules.
        #[wasm_bindgen(constructor)]
        pub fn new(roster: &str, fund: i64, seed: u64) -> Result<WasmGame, JsValue> {
            let game = Game::from_roster(Rules::default(), roster, fund, Some(seed))
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmGame { game })
        }

        /// The opening board and first prompt.
        #[wasm_bindgen]
        pub fn init(&mut self) -> JsValue {
            to_value(&WasmStepResult {
                blocks: self.game.initialize().blocks,
                quit: false,
            })
            .unwrap_or(JsValue::NULL)
        }

        /// Process one input line and return the resulting output blocks and quit flag.
        #[wasm_bindgen]
        pub fn step(&mut self, input: &str) -> JsValue {
            let (out, quit) = self.game.step(input);
            to_value(&WasmStepResult {
                blocks: out.blocks,
                quit,
            })
            .unwrap_or(JsValue::NULL)
        }
    }
}

impl Game {
    pub fn new(rules: Rules, state: GameState) -> Self {
        Game {
            rules,
            state,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Same as `new`, with a reproducible dice stream.
    pub fn with_seed(rules: Rules, state: GameState, seed: u64) -> Self {
        Game {
            rules,
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A fresh game for a roster selection such as `"1234"`.
    pub fn from_roster(
        rules: Rules,
        selection: &str,
        fund: i64,
        seed: Option<u64>,
    ) -> Result<Self, SetupError> {
        let players = engine::new_players(&rules, selection, fund)?;
        let state = GameState::new(players, rules.fortune_initial_cooldown);
        info!(players = state.players.len(), fund, "new game");
        Ok(match seed {
            Some(seed) => Game::with_seed(rules, state, seed),
            None => Game::new(rules, state),
        })
    }

    /// A game resumed from a JSON preset. The rules are kept for a fallback setup on error.
    pub fn from_preset(
        rules: &Rules,
        path: &Path,
        seed: Option<u64>,
    ) -> Result<Self, save::SaveError> {
        let state = save::load_from_file(path, rules)?;
        Ok(match seed {
            Some(seed) => Game::with_seed(rules.clone(), state, seed),
            None => Game::new(rules.clone(), state),
        })
    }

    pub fn is_over(&self) -> bool {
        self.state.turn.ended
    }

    pub fn initialize(&mut self) -> Output {
        let mut out = Output::new();
        out.title("Rich Street");
        engine::render_map(&mut out, &self.state);
        engine::evaluate_win_condition(&mut out, &mut self.state);
        if let Some(p) = self.state.current_player() {
            out.say(format!("It is {}'s turn. Type 'help' for commands.", p.name));
        }
        self.finish(&mut out);
        out
    }

    /// Process a single input line; returns (output, quit?)
    pub fn step(&mut self, input: &str) -> (Output, bool) {
        let mut out = Output::new();
        let input = input.trim();

        if input.eq_ignore_ascii_case("quit") {
            out.say("Goodbye.");
            return (out, true);
        }
        if input.is_empty() {
            self.finish(&mut out);
            return (out, false);
        }

        if let Some(pending) = &self.state.turn.pending {
            // looking around does not answer the question
            if let Ok(cmd @ (Command::Help | Command::Map | Command::Status | Command::Query)) =
                Command::parse(input)
            {
                debug!(player = pending.player(), "command while a question is pending");
                self.run(&mut out, cmd);
                engine::repeat_question(&mut out, &self.state);
                return (out, false);
            }
            debug!(player = pending.player(), answer = input, "answering pending question");
            let settled = engine::resolve_pending(&mut out, &mut self.state, &self.rules, input);
            if settled && !self.state.turn.ended {
                engine::advance_turn(&mut out, &mut self.state, &self.rules, &mut self.rng);
            }
            self.finish(&mut out);
            return (out, false);
        }

        let quit = match Command::parse(input) {
            Ok(cmd) => self.run(&mut out, cmd),
            Err(e) => {
                out.say(e.to_string());
                engine::render_help(&mut out);
                false
            }
        };
        self.finish(&mut out);
        (out, quit)
    }

    fn run(&mut self, out: &mut Output, cmd: Command) -> bool {
        match cmd {
            Command::Quit => {
                out.say("Goodbye.");
                return true;
            }
            Command::Help => engine::render_help(out),
            Command::Map => engine::render_map(out, &self.state),
            Command::Status => engine::render_status(out, &self.state),
            Command::Query => match self.state.turn.current {
                Some(player) => engine::render_query(out, &self.state, player),
                None => out.say(GameError::NotStarted.to_string()),
            },
            Command::Dump(path) => self.dump(out, &path),
            Command::Load(path) => self.load(out, &path),
            other => {
                if let Err(e) = self.act(out, other) {
                    out.say(e.to_string());
                }
            }
        }
        false
    }

    /// Commands that act for the current player.
    fn act(&mut self, out: &mut Output, cmd: Command) -> Result<(), GameError> {
        if !self.state.turn.started {
            return Err(GameError::NotStarted);
        }
        if self.state.turn.ended {
            return Err(GameError::GameOver);
        }
        let player = self.state.turn.current.ok_or(GameError::NotStarted)?;

        match cmd {
            Command::Roll => {
                let roll: i64 = self.rng.random_range(1..=6);
                debug!(player, roll, "dice rolled");
                out.say(format!("{} rolls a {roll}.", self.state.players[player].name));
                engine::take_move(out, &mut self.state, &self.rules, &mut self.rng, roll);
            }
            Command::Step(steps) => {
                engine::take_move(out, &mut self.state, &self.rules, &mut self.rng, steps);
            }
            Command::Sell(tile) => {
                engine::sell(out, &mut self.state, player, tile)?;
            }
            Command::Block(target) => self.use_hazard(out, player, HazardKind::Barrier, target)?,
            Command::Bomb(target) => self.use_hazard(out, player, HazardKind::Bomb, target)?,
            Command::Robot => {
                engine::use_robot(out, &mut self.state, &self.rules, player)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn use_hazard(
        &mut self,
        out: &mut Output,
        player: usize,
        kind: HazardKind,
        target: Target,
    ) -> Result<(), GameError> {
        engine::use_hazard_item(out, &mut self.state, &self.rules, player, kind, target)?;
        Ok(())
    }

    fn dump(&self, out: &mut Output, path: &Path) {
        match save::save_to_file(&self.state, path) {
            Ok(()) => out.say(format!("Game saved to {}.", path.display())),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "save failed");
                out.say(format!("Could not save to {}: {e}", path.display()));
            }
        }
    }

    fn load(&mut self, out: &mut Output, path: &Path) {
        match save::load_from_file(path, &self.rules) {
            Ok(state) => {
                self.state = state;
                out.say(format!("Loaded {}.", path.display()));
                engine::evaluate_win_condition(out, &mut self.state);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "load failed");
                out.say(format!("Could not load {}: {e}", path.display()));
            }
        }
    }

    /// Leave the player a prompt to answer next.
    fn finish(&self, out: &mut Output) {
        if out.prompt().is_some() || self.state.turn.pending.is_some() {
            return;
        }
        if self.state.turn.ended {
            out.set_prompt("Game over. Type 'quit' to leave.");
        } else if let Some(p) = self.state.current_player() {
            out.set_prompt(format!("{}> ", p.name));
        }
    }
}
