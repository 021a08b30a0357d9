use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, RoundTimer, SystemClock};
use crate::color::{self, Channel, Color, ColorDelta};
use crate::hint::hint_for;
use crate::settings::{Difficulty, GameConfig, GameMode, SettingsError, SettingsField, SettingsPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundOutcome {
    Matched,
    OutOfTime,
    OutOfActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Playing,
    RoundOver(RoundOutcome),
}

/// A single player intent that changes the mix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Channel(Channel, i32),
    All(i32),
    Mix(ColorDelta),
    Shade { percentage: f64, toward_black: bool },
}

impl Adjustment {
    pub fn apply(self, current: Color) -> Color {
        match self {
            Adjustment::Channel(channel, amount) => {
                color::adjust_channel(current, ColorDelta::channel(channel, amount))
            }
            Adjustment::All(amount) => color::adjust_channel(current, ColorDelta::all(amount)),
            Adjustment::Mix(delta) => color::adjust_channel(current, delta),
            Adjustment::Shade {
                percentage,
                toward_black,
            } => color::adjust_shade(current, percentage, toward_black),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub target: Color,
    pub current: Color,
    pub actions: u32,
    pub time_left: u32,
    pub phase: Phase,
    /// rounds matched in endless mode
    pub score: u32,
}

/// Read-only view handed to the presentation layer after each intent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub target: Color,
    pub current: Color,
    pub normalized: Color,
    pub match_percentage: u8,
    pub actions: u32,
    pub time_left: u32,
    pub game_over: bool,
    pub outcome: Option<RoundOutcome>,
    pub score: u32,
    pub hint: String,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub phase: Phase,
}

/// Owns one play session and enforces the round rules.
///
/// Configuration changes are staged and copied into the active config when a
/// round starts, so settings never change mid-round.
#[derive(Debug)]
pub struct SessionController<C: Clock = SystemClock> {
    clock: C,
    rng: StdRng,
    staged: GameConfig,
    active: GameConfig,
    state: SessionState,
    match_percentage: u8,
    hint: String,
    timer: Option<RoundTimer>,
    generation: u64,
}

impl SessionController<SystemClock> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> SessionController<C> {
    pub fn with_clock(config: GameConfig, clock: C) -> Self {
        Self::from_rng(config, clock, StdRng::from_entropy())
    }

    pub fn with_seed(config: GameConfig, clock: C, seed: u64) -> Self {
        Self::from_rng(config, clock, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, clock: C, mut rng: StdRng) -> Self {
        let target = color::random_color(&mut rng);
        let mut controller = Self {
            clock,
            rng,
            staged: config,
            active: config,
            state: SessionState {
                target,
                current: Color::BLACK,
                actions: 0,
                time_left: config.settings.time_limit,
                phase: Phase::Idle,
                score: 0,
            },
            match_percentage: 0,
            hint: String::new(),
            timer: None,
            generation: 0,
        };
        controller.recompute();
        controller
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.phase == Phase::Playing
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_config(&self) -> &GameConfig {
        &self.active
    }

    pub fn staged_config(&self) -> &GameConfig {
        &self.staged
    }

    pub fn match_percentage(&self) -> u8 {
        self.match_percentage
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Begin a new game from Idle or RoundOver. Ignored while playing.
    pub fn start(&mut self) {
        if self.is_playing() {
            return;
        }
        self.begin_game();
    }

    /// Start over from any phase, clearing the score.
    pub fn reset(&mut self) {
        self.begin_game();
    }

    /// Leave the game and return to Idle.
    pub fn stop(&mut self) {
        self.cancel_timer();
        self.state.phase = Phase::Idle;
        debug!("session stopped");
    }

    pub fn adjust(&mut self, adjustment: Adjustment) {
        if !self.is_playing() {
            return;
        }

        self.state.current = adjustment.apply(self.state.current);
        self.state.actions = self.state.actions.saturating_add(1);
        self.recompute();
        self.check_round();
    }

    /// Apply up to `repeat_count` adjustments, stopping as soon as the round ends.
    /// Returns how many were applied.
    pub fn adjust_repeated(&mut self, adjustment: Adjustment, repeat_count: u32) -> u32 {
        let mut applied = 0;
        while applied < repeat_count && self.is_playing() {
            self.adjust(adjustment);
            applied += 1;
        }
        applied
    }

    /// One elapsed second of round time.
    pub fn tick(&mut self) {
        if !self.is_playing() || !self.active.is_timed() {
            return;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.finish(RoundOutcome::OutOfTime);
        }
    }

    /// Deliver the ticks the clock says are due. Returns the number delivered.
    pub fn pump(&mut self) -> u32 {
        let generation = self.generation;
        if self.timer.is_some_and(|t| t.generation() != generation) {
            self.timer = None;
        }

        let now = self.clock.now();
        let due = self.timer.as_mut().map_or(0, |timer| timer.due_ticks(now));

        let mut delivered = 0;
        for _ in 0..due {
            if !self.is_playing() {
                break;
            }
            self.tick();
            delivered += 1;
        }
        delivered
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.staged.mode = mode;
        self.sync_idle_config();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.staged.difficulty = difficulty;
        self.sync_idle_config();
    }

    pub fn set_settings(&mut self, patch: SettingsPatch) {
        self.staged.settings.apply(patch);
        self.sync_idle_config();
    }

    /// Apply a raw text field. Bad input leaves the staged settings untouched.
    pub fn set_setting_raw(&mut self, field: SettingsField, input: &str) -> Result<(), SettingsError> {
        if let Err(err) = self.staged.settings.apply_raw(field, input) {
            warn!(%field, input, "rejected settings input");
            return Err(err);
        }
        self.sync_idle_config();
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let outcome = match self.state.phase {
            Phase::RoundOver(outcome) => Some(outcome),
            _ => None,
        };

        Snapshot {
            target: self.state.target,
            current: self.state.current,
            normalized: color::normalize(self.state.current),
            match_percentage: self.match_percentage,
            actions: self.state.actions,
            time_left: self.state.time_left,
            game_over: outcome.is_some(),
            outcome,
            score: self.state.score,
            hint: self.hint.clone(),
            mode: self.active.mode,
            difficulty: self.active.difficulty,
            phase: self.state.phase,
        }
    }

    fn begin_game(&mut self) {
        self.active = self.staged;
        self.state.score = 0;
        self.new_round();
        info!(
            mode = %self.active.mode,
            difficulty = %self.active.difficulty,
            target = %self.state.target,
            "game started"
        );
    }

    fn new_round(&mut self) {
        self.state.target = color::random_color(&mut self.rng);
        self.state.current = Color::BLACK;
        self.state.actions = 0;
        self.state.time_left = self.active.settings.time_limit;
        self.state.phase = Phase::Playing;

        self.generation += 1;
        self.timer = self
            .active
            .is_timed()
            .then(|| RoundTimer::arm(self.generation, self.clock.now()));

        self.recompute();
    }

    fn check_round(&mut self) {
        let threshold = self.active.settings.accuracy_threshold;

        if f64::from(self.match_percentage) >= threshold {
            if self.active.mode == GameMode::Endless {
                self.state.score = self.state.score.saturating_add(1);
                info!(score = self.state.score, "target matched, next round");
                self.new_round();
            } else {
                self.finish(RoundOutcome::Matched);
            }
        } else if self.active.is_action_limited()
            && self.state.actions >= self.active.settings.max_actions
        {
            self.finish(RoundOutcome::OutOfActions);
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        self.cancel_timer();
        self.state.phase = Phase::RoundOver(outcome);
        info!(
            ?outcome,
            match_percentage = self.match_percentage,
            actions = self.state.actions,
            score = self.state.score,
            "round over"
        );
    }

    fn cancel_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!(generation = self.generation, "round timer cancelled");
        }
    }

    fn recompute(&mut self) {
        self.match_percentage = color::match_percentage(self.state.target, self.state.current);
        self.hint = if self.active.shows_hint() {
            hint_for(self.state.target, self.state.current)
        } else {
            String::new()
        };
    }

    fn sync_idle_config(&mut self) {
        // a finished round keeps the config it was played with
        if self.state.phase != Phase::Idle {
            debug!("config change staged for next round");
            return;
        }
        self.active = self.staged;
        self.state.time_left = self.active.settings.time_limit;
        self.recompute();
    }
}
