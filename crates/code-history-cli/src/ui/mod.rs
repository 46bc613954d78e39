//! TUI rendering: terminal window with header, prompt, fact and status bar.

pub mod fact;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::app::{App, Phase};

pub const TITLE: &str = "code-history v0.1.0";

pub const PROMPT_USER: &str = "user@code-history:~$";

pub const PROMPT_COMMAND: &str = "./code-history --day";

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(2), // prompt
      Constraint::Min(0),    // fact
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_prompt(f, rows[1]);
  fact::draw(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let clock = Local::now().format("%H:%M:%S").to_string();

  let left = Span::styled(
    format!(" {TITLE}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{clock} "), Style::default().fg(Color::Gray));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Prompt ───────────────────────────────────────────────────────────────────

fn draw_prompt(f: &mut Frame, area: Rect) {
  let line = Line::from(vec![
    Span::styled(PROMPT_USER, Style::default().fg(Color::Green)),
    Span::raw(" "),
    Span::raw(PROMPT_COMMAND),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.phase {
    Phase::Loading => ("LOADING", "q quit"),
    Phase::Ready if app.is_typing() => ("TYPING", "Enter skip  q quit"),
    Phase::Ready => ("READY", "s share  r reload  q quit"),
    Phase::Empty => ("EMPTY", "r reload  q quit"),
    Phase::Failed(_) => ("ERROR", "r retry  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Green)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
