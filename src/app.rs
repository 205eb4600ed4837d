//! Session state and event handling. One owned struct, mutated only from the
//! UI loop; the derived view is recomputed from scratch before every draw.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::fetch::{FetchError, Pokemon};
use crate::filter::{compute_view, distinct_types, FilterState};

pub const LOAD_FAILED_MESSAGE: &str = "Could not load Pokémon. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
  Loading,
  Ready,
  Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
  Filters,
  Gallery,
}

pub struct App {
  pub phase: LoadPhase,
  pub catalog: Vec<Pokemon>,
  pub all_types: Vec<String>,
  pub collected: HashSet<String>,
  pub filter: FilterState,
  pub focus: Pane,
  pub filter_cursor: usize,
  pub gallery_cursor: usize,
  pub search_editing: bool,
  pub should_quit: bool,
}

impl App {
  pub fn new() -> Self {
    App {
      phase: LoadPhase::Loading,
      catalog: Vec::new(),
      all_types: Vec::new(),
      collected: HashSet::new(),
      filter: FilterState::default(),
      focus: Pane::Gallery,
      filter_cursor: 0,
      gallery_cursor: 0,
      search_editing: false,
      should_quit: false,
    }
  }

  /// Installs the load outcome. Success replaces the catalog wholesale and
  /// derives the type filter list once; failure leaves the catalog empty and
  /// records the banner message. Either way the loading placeholder is gone.
  pub fn on_load_result(&mut self, result: Result<Vec<Pokemon>, FetchError>) {
    match result {
      Ok(catalog) => {
        self.all_types = distinct_types(&catalog);
        self.catalog = catalog;
        self.phase = LoadPhase::Ready;
        tracing::info!(
          count = self.catalog.len(),
          types = self.all_types.len(),
          "catalog loaded"
        );
      }
      Err(error) => {
        tracing::error!(%error, "catalog load failed");
        self.catalog.clear();
        self.all_types.clear();
        self.phase = LoadPhase::Failed(LOAD_FAILED_MESSAGE.to_string());
      }
    }
  }

  pub fn visible(&self) -> Vec<&Pokemon> {
    compute_view(&self.catalog, &self.filter, &self.collected)
  }

  /// Toggle semantics: present → removed → `false`; absent → added → `true`.
  pub fn toggle_collected(&mut self, name: &str) -> bool {
    let now_collected = if self.collected.remove(name) {
      false
    } else {
      self.collected.insert(name.to_string());
      true
    };
    // With collected-only active the toggled card may leave the view.
    if self.filter.collected_only {
      self.clamp_gallery_cursor();
    }
    now_collected
  }

  pub fn toggle_selected_card(&mut self) -> Option<bool> {
    let name = self.visible().get(self.gallery_cursor).map(|p| p.name.clone())?;
    Some(self.toggle_collected(&name))
  }

  pub fn toggle_type_at_cursor(&mut self) {
    let Some(name) = self.all_types.get(self.filter_cursor).cloned() else {
      return;
    };
    if let Some(position) = self.filter.selected_types.iter().position(|t| *t == name) {
      self.filter.selected_types.remove(position);
    } else {
      self.filter.selected_types.push(name);
    }
    self.clamp_gallery_cursor();
  }

  pub fn on_key(&mut self, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
      return;
    }

    if self.search_editing {
      match key.code {
        KeyCode::Esc => {
          self.search_editing = false;
          self.filter.search.clear();
          self.clamp_gallery_cursor();
        }
        KeyCode::Enter => self.search_editing = false,
        KeyCode::Backspace => {
          self.filter.search.pop();
          self.clamp_gallery_cursor();
        }
        KeyCode::Char(c) => {
          self.filter.search.push(c);
          self.clamp_gallery_cursor();
        }
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
      KeyCode::Char('/') => self.search_editing = true,
      KeyCode::Tab => {
        self.focus = match self.focus {
          Pane::Filters => Pane::Gallery,
          Pane::Gallery => Pane::Filters,
        };
      }
      KeyCode::Char('c') => {
        self.filter.collected_only = !self.filter.collected_only;
        self.clamp_gallery_cursor();
      }
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::Char(' ') | KeyCode::Enter => match self.focus {
        Pane::Filters => self.toggle_type_at_cursor(),
        Pane::Gallery => {
          self.toggle_selected_card();
        }
      },
      _ => {}
    }
  }

  fn move_cursor(&mut self, delta: i64) {
    let len = match self.focus {
      Pane::Filters => self.all_types.len(),
      Pane::Gallery => self.visible().len(),
    };
    if len == 0 {
      return;
    }
    let current = match self.focus {
      Pane::Filters => self.filter_cursor,
      Pane::Gallery => self.gallery_cursor,
    };
    let next = if delta < 0 {
      current.saturating_sub(1)
    } else {
      (current + 1).min(len - 1)
    };
    match self.focus {
      Pane::Filters => self.filter_cursor = next,
      Pane::Gallery => self.gallery_cursor = next,
    }
  }

  fn clamp_gallery_cursor(&mut self) {
    let len = self.visible().len();
    if len == 0 {
      self.gallery_cursor = 0;
    } else if self.gallery_cursor >= len {
      self.gallery_cursor = len - 1;
    }
  }
}

impl Default for App {
  fn default() -> Self {
    App::new()
  }
}
