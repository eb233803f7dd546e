//! Round state: phase machine, countdown and round clocks, end causes, and the
//! on-screen message log (rendering of the text itself is a backend concern).

/// Game phase. GameOver is terminal for the round; a new process run restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    StartMenu,
    Playing,
    GameOver,
}

/// Why the round ended. The first cause recorded wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    TimeExpired,
    AllGemsCollected,
    HardImpact,
    Splashdown,
}

impl EndCause {
    pub fn describe(&self) -> &'static str {
        match self {
            EndCause::TimeExpired => "time expired",
            EndCause::AllGemsCollected => "all gems collected",
            EndCause::HardImpact => "hard impact",
            EndCause::Splashdown => "in water",
        }
    }
}

/// One-shot notifications out of [`RoundState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// The armed countdown reached zero: place gems, start the round clock.
    CountdownFinished,
    /// The round clock passed the configured duration.
    RoundExpired,
}

/// Countdown/round clocks and phase transitions.
#[derive(Debug)]
pub struct RoundState {
    phase: GamePhase,
    countdown_length: f32,
    round_length: f32,
    /// Remaining countdown seconds while armed.
    countdown: Option<f32>,
    /// Elapsed round seconds while a round is live.
    round_clock: Option<f32>,
    end_cause: Option<EndCause>,
}

impl RoundState {
    pub fn new(countdown_length: f32, round_length: f32) -> Self {
        Self {
            phase: GamePhase::StartMenu,
            countdown_length,
            round_length,
            countdown: None,
            round_clock: None,
            end_cause: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.end_cause
    }

    /// Countdown seconds remaining, if armed.
    pub fn countdown_remaining(&self) -> Option<f32> {
        self.countdown
    }

    /// Round seconds remaining, if a round is live.
    pub fn round_remaining(&self) -> Option<f32> {
        self.round_clock.map(|t| (self.round_length - t).max(0.0))
    }

    /// A round is live once the countdown has finished and until the round ends.
    pub fn round_active(&self) -> bool {
        self.phase == GamePhase::Playing && self.round_clock.is_some()
    }

    /// StartMenu -> Playing. No-op from any other phase.
    pub fn start_playing(&mut self) -> bool {
        if self.phase == GamePhase::StartMenu {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Arm the pre-round countdown. Only meaningful while Playing.
    pub fn arm_countdown(&mut self) {
        if self.phase == GamePhase::Playing {
            self.countdown = Some(self.countdown_length);
        }
    }

    /// Advance the clocks. Returns at most one event per call.
    pub fn tick(&mut self, dt: f32) -> Option<StateEvent> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        if let Some(remaining) = &mut self.countdown {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.countdown = None;
                self.round_clock = Some(0.0);
                return Some(StateEvent::CountdownFinished);
            }
            return None;
        }

        if let Some(elapsed) = &mut self.round_clock {
            *elapsed += dt;
            if *elapsed >= self.round_length {
                return Some(StateEvent::RoundExpired);
            }
        }

        None
    }

    /// End the round with `cause`. Returns true only on the first call; the
    /// phase, clocks and recorded cause are untouched afterwards.
    pub fn finish(&mut self, cause: EndCause) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.end_cause = Some(cause);
        self.countdown = None;
        self.round_clock = None;
        true
    }
}

/// On-screen message (event log rendered by the overlay).
pub struct GameMessage {
    pub text: String,
    pub time_remaining: f32,
}

/// Manages the on-screen message log displayed over the game view.
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    default_duration: f32,
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            default_duration: 6.0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{}", text);
        self.messages.push(GameMessage {
            text,
            time_remaining: self.default_duration,
        });
        if self.messages.len() > 20 {
            self.messages.remove(0);
        }
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }
}
