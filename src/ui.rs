//! Terminal rendering, split per the view-layer design: pure functions turn
//! session state into declarative content (cards, filter rows, status text),
//! and `draw` is the thin adapter that paints that content into the frame.
//! Every frame is a full redraw; nothing is diffed or patched in place.

use std::collections::HashSet;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, LoadPhase, Pane};
use crate::fetch::Pokemon;

pub const EMPTY_GALLERY_MESSAGE: &str = "No Pokémon found.";
pub const LOADING_MESSAGE: &str = "Loading Pokémon...";
pub const COLLECTED_LABEL: &str = "[x] Collected";
pub const MARK_COLLECTED_LABEL: &str = "[ ] Mark as Collected";

// Lines per rendered card: name, types, image, collect marker, spacer.
const CARD_LINES: usize = 5;
const FILTER_PANE_WIDTH: u16 = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
  pub name: String,
  pub image_url: Option<String>,
  pub types: Vec<String>,
  pub collected: bool,
  pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryContent {
  /// Exactly one placeholder message, never zero content.
  Empty { placeholder: &'static str },
  Cards(Vec<CardView>),
}

/// Pure: one card per visible entity in view order, or the placeholder.
pub fn gallery_content(
  view: &[&Pokemon],
  collected: &HashSet<String>,
  cursor: usize,
) -> GalleryContent {
  if view.is_empty() {
    return GalleryContent::Empty {
      placeholder: EMPTY_GALLERY_MESSAGE,
    };
  }
  let cards = view
    .iter()
    .enumerate()
    .map(|(index, pokemon)| CardView {
      name: pokemon.name.clone(),
      image_url: pokemon.image_url().map(str::to_string),
      types: pokemon.types.clone(),
      collected: collected.contains(&pokemon.name),
      selected: index == cursor,
    })
    .collect();
  GalleryContent::Cards(cards)
}

pub fn type_color(name: &str) -> Color {
  match name {
    "fire" => Color::Red,
    "water" => Color::Blue,
    "grass" | "bug" => Color::Green,
    "electric" => Color::Yellow,
    "psychic" | "fairy" => Color::Magenta,
    "ice" => Color::Cyan,
    "dragon" | "ghost" => Color::LightMagenta,
    "dark" => Color::DarkGray,
    "fighting" | "rock" | "ground" => Color::LightRed,
    "flying" => Color::LightBlue,
    "poison" => Color::LightGreen,
    "steel" => Color::Gray,
    _ => Color::White,
  }
}

fn card_lines(card: &CardView) -> Vec<Line<'static>> {
  let name_style = if card.selected {
    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
  } else {
    Style::default().add_modifier(Modifier::BOLD)
  };

  let mut badges: Vec<Span<'static>> = vec![Span::raw("  ")];
  for name in &card.types {
    badges.push(Span::styled(
      format!(" {} ", name),
      Style::default().fg(Color::Black).bg(type_color(name)),
    ));
    badges.push(Span::raw(" "));
  }

  let image = match &card.image_url {
    Some(url) => format!("  img: {}", url),
    None => "  img: (none)".to_string(),
  };

  let collect_label = if card.collected {
    Span::styled(
      format!("  {}", COLLECTED_LABEL),
      Style::default().fg(Color::Green),
    )
  } else {
    Span::raw(format!("  {}", MARK_COLLECTED_LABEL))
  };

  vec![
    Line::from(Span::styled(card.name.clone(), name_style)),
    Line::from(badges),
    Line::from(Span::styled(image, Style::default().fg(Color::DarkGray))),
    Line::from(collect_label),
    Line::default(),
  ]
}

pub fn gallery_lines(content: &GalleryContent) -> Vec<Line<'static>> {
  match content {
    GalleryContent::Empty { placeholder } => vec![Line::from(Span::raw(*placeholder))],
    GalleryContent::Cards(cards) => cards.iter().flat_map(card_lines).collect(),
  }
}

/// One `[x]`/`[ ]` row per distinct type, cursor row highlighted when the
/// filter pane has focus.
pub fn type_filter_lines(
  all_types: &[String],
  selected: &[String],
  cursor: usize,
  focused: bool,
) -> Vec<Line<'static>> {
  all_types
    .iter()
    .enumerate()
    .map(|(index, name)| {
      let mark = if selected.iter().any(|t| t == name) {
        "[x]"
      } else {
        "[ ]"
      };
      let style = if focused && index == cursor {
        Style::default().add_modifier(Modifier::REVERSED)
      } else {
        Style::default().fg(type_color(name))
      };
      Line::from(Span::styled(format!("{} {}", mark, name), style))
    })
    .collect()
}

pub fn status_line(app: &App) -> Line<'static> {
  match &app.phase {
    LoadPhase::Loading => Line::from(Span::styled(
      LOADING_MESSAGE,
      Style::default().fg(Color::Yellow),
    )),
    LoadPhase::Failed(_) => Line::from(Span::raw("q: quit")),
    LoadPhase::Ready => {
      let shown = app.visible().len();
      Line::from(Span::raw(format!(
        "{} Pokémon · {} shown · {} collected   /: search  Tab: pane  Space: toggle  c: collected only  q: quit",
        app.catalog.len(),
        shown,
        app.collected.len()
      )))
    }
  }
}

fn gallery_scroll(content: &GalleryContent, cursor: usize, viewport: u16) -> u16 {
  let GalleryContent::Cards(_) = content else {
    return 0;
  };
  if viewport == 0 {
    return 0;
  }
  let bottom = (cursor * CARD_LINES + CARD_LINES - 1) as u16;
  if bottom < viewport {
    0
  } else {
    bottom + 1 - viewport
  }
}

pub fn draw(frame: &mut Frame, app: &App) {
  let rows = Layout::vertical([
    Constraint::Length(3),
    Constraint::Min(0),
    Constraint::Length(1),
  ])
  .split(frame.area());

  draw_search_bar(frame, app, rows[0]);

  match &app.phase {
    LoadPhase::Loading => draw_notice(frame, LOADING_MESSAGE, Color::Yellow, rows[1]),
    LoadPhase::Failed(message) => draw_notice(frame, message, Color::Red, rows[1]),
    LoadPhase::Ready => draw_body(frame, app, rows[1]),
  }

  frame.render_widget(Paragraph::new(status_line(app)), rows[2]);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
  let mut spans = vec![Span::raw(app.filter.search.clone())];
  if app.search_editing {
    spans.push(Span::styled("▌", Style::default().fg(Color::Yellow)));
  }
  let title = if app.search_editing {
    "Search (Enter to keep, Esc to clear)"
  } else {
    "Search (/)"
  };
  let paragraph = Paragraph::new(Line::from(spans))
    .block(Block::default().borders(Borders::ALL).title(title));
  frame.render_widget(paragraph, area);
}

fn draw_notice(frame: &mut Frame, message: &str, color: Color, area: Rect) {
  let paragraph = Paragraph::new(Line::from(Span::styled(
    message.to_string(),
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  )))
  .wrap(Wrap { trim: false })
  .block(Block::default().borders(Borders::ALL));
  frame.render_widget(paragraph, area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
  let panes =
    Layout::horizontal([Constraint::Length(FILTER_PANE_WIDTH), Constraint::Min(0)]).split(area);

  let collected_mark = if app.filter.collected_only { "[x]" } else { "[ ]" };
  let mut filter_rows = vec![
    Line::from(Span::raw(format!("{} collected only (c)", collected_mark))),
    Line::default(),
  ];
  filter_rows.extend(type_filter_lines(
    &app.all_types,
    &app.filter.selected_types,
    app.filter_cursor,
    app.focus == Pane::Filters,
  ));
  let filters = Paragraph::new(filter_rows)
    .block(Block::default().borders(Borders::ALL).title("Filters"));
  frame.render_widget(filters, panes[0]);

  let view = app.visible();
  let content = gallery_content(&view, &app.collected, app.gallery_cursor);
  let scroll = gallery_scroll(&content, app.gallery_cursor, panes[1].height.saturating_sub(2));
  let gallery = Paragraph::new(gallery_lines(&content))
    .scroll((scroll, 0))
    .block(Block::default().borders(Borders::ALL).title("Gallery"));
  frame.render_widget(gallery, panes[1]);
}
