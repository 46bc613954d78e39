//! Fact pane: the typed-out transcript.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Phase};

const CURSOR: &str = "█";

/// Render the fact pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let messages = app.messages();
  let body = match &app.phase {
    Phase::Loading => dim(messages.loading),
    Phase::Empty => dim(messages.empty),
    Phase::Failed(msg) => vec![Line::from(Span::styled(
      msg.clone(),
      Style::default().fg(Color::Red),
    ))],
    Phase::Ready => transcript_lines(&app.typed_text(), app.is_typing()),
  };

  f.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), inner);
}

fn dim(text: &str) -> Vec<Line<'static>> {
  vec![Line::from(Span::styled(
    text.to_owned(),
    Style::default().fg(Color::DarkGray),
  ))]
}

/// The first line (date and year) is the heading; the cursor trails the text.
fn transcript_lines(text: &str, typing: bool) -> Vec<Line<'static>> {
  let mut lines: Vec<Line> = text
    .split('\n')
    .enumerate()
    .map(|(i, l)| {
      let style = if i == 0 {
        Style::default()
          .fg(Color::Green)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Line::from(Span::styled(l.to_owned(), style))
    })
    .collect();

  if typing {
    if let Some(last) = lines.last_mut() {
      last.spans.push(Span::styled(CURSOR, Style::default().fg(Color::Green)));
    }
  }
  lines
}
