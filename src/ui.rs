pub mod screen;

use huemix::{GameMode, Phase, RoundOutcome, SettingsField, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{ui::screen::current_screen, App};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        current_screen(&self.state).render(self, area, buf);
    }
}

fn swatch_color(c: huemix::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

fn swatch(title: &str, c: huemix::Color, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().bg(swatch_color(c)))
        .render(chunks[0], buf);

    Paragraph::new(format!("{}  {}", c.css(), c.hex()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn stats_line(snap: &Snapshot, app: &App) -> String {
    let config = app.session.active_config();
    let mut parts = vec![format!("Match {}%", snap.match_percentage)];

    if config.is_action_limited() {
        parts.push(format!(
            "Actions {}/{}",
            snap.actions, config.settings.max_actions
        ));
    } else {
        parts.push(format!("Actions {}", snap.actions));
    }
    if config.is_timed() {
        parts.push(format!("Time {}s", snap.time_left));
    }
    if snap.mode == GameMode::Endless {
        parts.push(format!("Score {}", snap.score));
    }
    parts.push(format!("Goal {}%", config.settings.accuracy_threshold));

    parts.join("   ")
}

fn status_line(snap: &Snapshot) -> Span<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match snap.phase {
        Phase::Idle => Span::styled("press (enter) to start", bold.fg(Color::Yellow)),
        Phase::Playing => Span::styled("mixing...", Style::default().add_modifier(Modifier::DIM)),
        Phase::RoundOver(RoundOutcome::Matched) => {
            Span::styled("Matched! (enter) to play again", bold.fg(Color::Green))
        }
        Phase::RoundOver(RoundOutcome::OutOfTime) => {
            Span::styled("Out of time. (enter) to play again", bold.fg(Color::Red))
        }
        Phase::RoundOver(RoundOutcome::OutOfActions) => {
            Span::styled("Out of actions. (enter) to play again", bold.fg(Color::Red))
        }
    }
}

pub fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let snap = app.session.snapshot();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // mode header
            Constraint::Min(3),    // swatches
            Constraint::Length(1), // stats
            Constraint::Length(1), // hint
            Constraint::Length(1), // status
            Constraint::Length(2), // legend
        ])
        .split(area);

    let staged = app.session.staged_config();
    let header = format!("huemix · mode: {} · difficulty: {}", snap.mode, snap.difficulty);
    let header = if staged.mode != snap.mode || staged.difficulty != snap.difficulty {
        format!("{header} (next: {} / {})", staged.mode, staged.difficulty)
    } else {
        header
    };
    Paragraph::new(Span::styled(header, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let swatches = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    swatch("Target", snap.target, swatches[0], buf);
    swatch("Your mix", snap.current, swatches[1], buf);

    Paragraph::new(Span::styled(stats_line(&snap, app), bold_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if !snap.hint.is_empty() {
        Paragraph::new(Span::styled(
            snap.hint.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    Paragraph::new(status_line(&snap))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let legend = format!(
        "(r/g/b) +{step} (R/G/B) -{step} (+/-) all (l)ighten (k) darken\n(enter) start (n)ew (m)ode (d)ifficulty (s)ettings (q)uit",
        step = app.step
    );
    Paragraph::new(Span::styled(legend, italic_style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[5], buf);
}

pub fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let settings = app.session.staged_config().settings;
    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            "Game Settings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for field in SettingsField::ALL {
        if field == app.form.field {
            lines.push(Line::from(Span::styled(
                format!("{field}: {}_", app.form.buffer),
                selected,
            )));
        } else {
            lines.push(Line::from(format!("{field}: {}", settings.get(field))));
        }
    }

    lines.push(Line::from(""));
    if let Some(message) = &app.form.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(
        "(tab) next field / (enter) save / (esc) back",
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Settings"))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, Cli};
    use clap::Parser;
    use huemix::{Adjustment, Channel};

    fn app_with(args: &[&str]) -> App {
        let mut argv = vec!["huemix", "--seed", "11"];
        argv.extend_from_slice(args);
        App::new(&Cli::parse_from(argv))
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_idle_screen_prompts_to_start() {
        let app = app_with(&[]);
        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("press (enter) to start"));
        assert!(text.contains("Target"));
        assert!(text.contains("Your mix"));
    }

    #[test]
    fn test_game_screen_shows_stats() {
        let mut app = app_with(&["-m", "standard", "-a", "9"]);
        app.session.start();
        app.session.adjust(Adjustment::Channel(Channel::Red, 5));

        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("Actions 1/9"));
        assert!(text.contains("rgb(5, 0, 0)"));
        assert!(!text.contains("Time "));
    }

    #[test]
    fn test_easy_mode_shows_hint() {
        let mut app = app_with(&["-d", "easy"]);
        app.session.start();

        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains(app.session.hint()));
        assert!(text.contains("Too "));
    }

    #[test]
    fn test_round_over_banner() {
        let mut app = app_with(&["-t", "1"]);
        app.session.start();
        app.session.tick();

        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("Out of time"));
    }

    #[test]
    fn test_settings_screen_lists_fields() {
        let mut app = app_with(&[]);
        app.open_settings();
        assert_eq!(app.state, AppState::Settings);

        let text = rendered(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("Time Limit (seconds): 60_"));
        assert!(text.contains("Max Actions: 20"));
        assert!(text.contains("Accuracy Threshold (%): 90"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let mut app = app_with(&[]);
        app.session.start();
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 1);
    }
}
