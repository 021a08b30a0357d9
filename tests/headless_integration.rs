use std::sync::mpsc;
use std::time::Duration;

use assert_matches::assert_matches;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use huemix::clock::ManualClock;
use huemix::runtime::{FixedTicker, MixEvent, Runner, ScriptedEventSource, TestEventSource};
use huemix::{
    Adjustment, Channel, Difficulty, GameConfig, GameMode, Phase, RoundOutcome,
    SessionController, Settings,
};

fn key(c: char) -> MixEvent {
    MixEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn adjustment(c: char) -> Option<Adjustment> {
    match c {
        'r' => Some(Adjustment::Channel(Channel::Red, 5)),
        'g' => Some(Adjustment::Channel(Channel::Green, 5)),
        'b' => Some(Adjustment::Channel(Channel::Blue, 5)),
        _ => None,
    }
}

// Headless flow using the runtime + controller without a TTY:
// key events become adjustments until the action budget runs out.
#[test]
fn headless_standard_round_runs_out_of_actions() {
    let config = GameConfig {
        mode: GameMode::Standard,
        difficulty: Difficulty::Normal,
        settings: Settings {
            max_actions: 3,
            accuracy_threshold: 100.0,
            ..Settings::default()
        },
    };
    let mut session = SessionController::with_seed(config, ManualClock::new(), 5);
    session.start();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    for c in ['r', 'g', 'b', 'r'] {
        tx.send(key(c)).unwrap();
    }

    for _ in 0..100u32 {
        if let MixEvent::Key(k) = runner.step_session(&mut session) {
            if let KeyCode::Char(c) = k.code {
                if let Some(adj) = adjustment(c) {
                    session.adjust(adj);
                }
            }
        }
        if !session.is_playing() {
            break;
        }
    }

    assert_matches!(
        session.phase(),
        Phase::RoundOver(RoundOutcome::OutOfActions)
    );
    assert_eq!(session.state().actions, 3);
    assert_eq!(session.state().time_left, 60);
}

#[test]
fn headless_timed_session_finishes_by_clock() {
    let config = GameConfig {
        mode: GameMode::Time,
        settings: Settings {
            time_limit: 3,
            ..Settings::default()
        },
        ..GameConfig::default()
    };
    let mut session = SessionController::with_seed(config, ManualClock::new(), 9);
    session.start();

    let runner = Runner::new(
        ScriptedEventSource::default(),
        FixedTicker::new(Duration::from_millis(100)),
    );

    // each runner step stands for 100ms of wall time
    let mut steps = 0;
    while session.is_playing() && steps < 100 {
        session.clock().advance(Duration::from_millis(100));
        assert_eq!(runner.step_session(&mut session), MixEvent::Tick);
        steps += 1;
    }

    assert_eq!(steps, 30);
    assert_matches!(session.phase(), Phase::RoundOver(RoundOutcome::OutOfTime));
    assert_eq!(session.state().time_left, 0);
    assert!(!session.timer_armed());
}

#[test]
fn headless_reset_discards_old_round_timer() {
    let config = GameConfig {
        settings: Settings {
            time_limit: 2,
            ..Settings::default()
        },
        ..GameConfig::default()
    };
    let mut session = SessionController::with_seed(config, ManualClock::new(), 9);
    let runner = Runner::new(
        ScriptedEventSource::default(),
        FixedTicker::new(Duration::from_millis(100)),
    );

    session.start();
    session.clock().advance(Duration::from_millis(1900));
    runner.step_session(&mut session);
    assert_eq!(session.state().time_left, 1);

    session.reset();
    session.clock().advance(Duration::from_millis(200));
    runner.step_session(&mut session);
    assert_eq!(session.state().time_left, 2);
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn headless_endless_hard_keeps_scoring_until_time_runs_out() {
    let config = GameConfig {
        mode: GameMode::Endless,
        difficulty: Difficulty::Hard,
        settings: Settings {
            time_limit: 2,
            max_actions: 1000,
            accuracy_threshold: 0.0,
        },
    };
    let mut session = SessionController::with_seed(config, ManualClock::new(), 21);
    session.start();

    // threshold 0 means any adjustment wins the round
    session.adjust(Adjustment::All(1));
    session.adjust(Adjustment::All(1));
    assert_eq!(session.state().score, 2);
    assert_eq!(session.phase(), Phase::Playing);

    session.clock().advance(Duration::from_secs(2));
    session.pump();
    assert_matches!(session.phase(), Phase::RoundOver(RoundOutcome::OutOfTime));
    assert_eq!(session.snapshot().score, 2);
}
