//! Pure filtering over the fetched catalog. Every call starts from the full
//! collection; nothing here is incremental or stateful.

use std::collections::HashSet;

use crate::fetch::Pokemon;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
  pub search: String,
  pub selected_types: Vec<String>,
  pub collected_only: bool,
}

/// Derives the visible subsequence of `catalog` for the given filter state.
/// Stages apply in order: name substring (case-insensitive, empty matches
/// all), then OR across the selected types, then collected membership.
/// Original catalog order is preserved.
pub fn compute_view<'a>(
  catalog: &'a [Pokemon],
  filter: &FilterState,
  collected: &HashSet<String>,
) -> Vec<&'a Pokemon> {
  let needle = filter.search.to_lowercase();
  catalog
    .iter()
    .filter(|pokemon| needle.is_empty() || pokemon.name.to_lowercase().contains(&needle))
    .filter(|pokemon| {
      filter.selected_types.is_empty()
        || pokemon
          .types
          .iter()
          .any(|name| filter.selected_types.iter().any(|selected| selected == name))
    })
    .filter(|pokemon| !filter.collected_only || collected.contains(&pokemon.name))
    .collect()
}

/// Distinct type names across the whole catalog, in first-encounter order.
/// Computed once after load from the full collection, so the filter list
/// stays complete no matter how far the view is narrowed.
pub fn distinct_types(catalog: &[Pokemon]) -> Vec<String> {
  let mut types: Vec<String> = Vec::new();
  for pokemon in catalog {
    for name in &pokemon.types {
      if !types.contains(name) {
        types.push(name.clone());
      }
    }
  }
  types
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pokemon(name: &str, types: &[&str]) -> Pokemon {
    Pokemon {
      name: name.to_string(),
      artwork_url: None,
      sprite_url: None,
      types: types.iter().map(|t| t.to_string()).collect(),
    }
  }

  fn starters() -> Vec<Pokemon> {
    vec![
      pokemon("charmander", &["fire"]),
      pokemon("charizard", &["fire", "flying"]),
      pokemon("squirtle", &["water"]),
    ]
  }

  fn names(view: &[&Pokemon]) -> Vec<String> {
    view.iter().map(|p| p.name.clone()).collect()
  }

  #[test]
  fn default_filter_returns_full_catalog_in_order() {
    let catalog = starters();
    let view = compute_view(&catalog, &FilterState::default(), &HashSet::new());
    assert_eq!(names(&view), vec!["charmander", "charizard", "squirtle"]);
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let catalog = vec![pokemon("Pikachu", &["electric"])];
    for term in ["pika", "PIKA", "chu"] {
      let filter = FilterState {
        search: term.to_string(),
        ..FilterState::default()
      };
      let view = compute_view(&catalog, &filter, &HashSet::new());
      assert_eq!(view.len(), 1, "search {:?} should match Pikachu", term);
    }
  }

  #[test]
  fn search_narrows_while_preserving_order() {
    let catalog = starters();
    let filter = FilterState {
      search: "char".to_string(),
      ..FilterState::default()
    };
    let view = compute_view(&catalog, &filter, &HashSet::new());
    assert_eq!(names(&view), vec!["charmander", "charizard"]);
  }

  #[test]
  fn type_filter_is_or_across_selections() {
    let catalog = starters();
    let both = FilterState {
      selected_types: vec!["flying".to_string(), "water".to_string()],
      ..FilterState::default()
    };
    let view = compute_view(&catalog, &both, &HashSet::new());
    assert_eq!(names(&view), vec!["charizard", "squirtle"]);

    let unrelated = FilterState {
      selected_types: vec!["ghost".to_string()],
      ..FilterState::default()
    };
    assert!(compute_view(&catalog, &unrelated, &HashSet::new()).is_empty());
  }

  #[test]
  fn single_type_selection_ignores_search_being_empty() {
    let catalog = starters();
    let filter = FilterState {
      selected_types: vec!["flying".to_string()],
      ..FilterState::default()
    };
    let view = compute_view(&catalog, &filter, &HashSet::new());
    assert_eq!(names(&view), vec!["charizard"]);
  }

  #[test]
  fn collected_only_keeps_marked_entries() {
    let catalog = starters();
    let mut collected = HashSet::new();
    collected.insert("squirtle".to_string());
    let filter = FilterState {
      collected_only: true,
      ..FilterState::default()
    };
    let view = compute_view(&catalog, &filter, &collected);
    assert_eq!(names(&view), vec!["squirtle"]);
  }

  #[test]
  fn view_is_subsequence_of_catalog() {
    let catalog = starters();
    let filter = FilterState {
      search: "a".to_string(),
      selected_types: vec!["fire".to_string()],
      ..FilterState::default()
    };
    let view = compute_view(&catalog, &filter, &HashSet::new());

    let mut catalog_iter = catalog.iter();
    for shown in &view {
      assert!(
        catalog_iter.any(|candidate| std::ptr::eq(candidate, *shown)),
        "view element out of catalog order"
      );
    }
  }

  #[test]
  fn compute_view_is_deterministic() {
    let catalog = starters();
    let filter = FilterState {
      search: "char".to_string(),
      selected_types: vec!["fire".to_string()],
      collected_only: false,
    };
    let first = names(&compute_view(&catalog, &filter, &HashSet::new()));
    let second = names(&compute_view(&catalog, &filter, &HashSet::new()));
    assert_eq!(first, second);
  }

  #[test]
  fn distinct_types_dedupes_in_first_encounter_order() {
    let catalog = starters();
    assert_eq!(distinct_types(&catalog), vec!["fire", "flying", "water"]);
  }

  #[test]
  fn distinct_types_of_empty_catalog_is_empty() {
    assert!(distinct_types(&[]).is_empty());
  }
}
