//! PokeAPI client: index fetch, parallel detail fan-out, payload mapping.

use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const POKEMON_LIMIT: usize = 1008;

const CLIENT_USER_AGENT: &str = "pokegallery/0.1";

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request to {url} failed: {source}")]
  Request { url: String, source: reqwest::Error },
  #[error("{url} returned status {status}")]
  Status { url: String, status: StatusCode },
  #[error("could not decode payload from {url}: {source}")]
  Decode { url: String, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokemon {
  pub name: String,
  pub artwork_url: Option<String>,
  pub sprite_url: Option<String>,
  pub types: Vec<String>,
}

impl Pokemon {
  /// Official artwork when present, front sprite otherwise.
  pub fn image_url(&self) -> Option<&str> {
    self.artwork_url.as_deref().or(self.sprite_url.as_deref())
  }
}

#[derive(Deserialize)]
struct IndexPayload {
  results: Vec<IndexEntry>,
}

#[derive(Deserialize)]
struct IndexEntry {
  name: String,
  url: String,
}

#[derive(Deserialize)]
struct DetailPayload {
  name: String,
  sprites: SpritesPayload,
  types: Vec<TypeSlot>,
}

#[derive(Deserialize)]
struct SpritesPayload {
  front_default: Option<String>,
  #[serde(default)]
  other: Option<OtherSprites>,
}

#[derive(Deserialize)]
struct OtherSprites {
  #[serde(rename = "official-artwork")]
  official_artwork: Option<ArtworkSprites>,
}

#[derive(Deserialize)]
struct ArtworkSprites {
  front_default: Option<String>,
}

#[derive(Deserialize)]
struct TypeSlot {
  #[serde(rename = "type")]
  kind: NamedResource,
}

#[derive(Deserialize)]
struct NamedResource {
  name: String,
}

impl From<DetailPayload> for Pokemon {
  fn from(payload: DetailPayload) -> Self {
    let SpritesPayload { front_default, other } = payload.sprites;
    let artwork_url = other
      .and_then(|sprites| sprites.official_artwork)
      .and_then(|artwork| artwork.front_default);
    Pokemon {
      name: payload.name,
      artwork_url,
      sprite_url: front_default,
      types: payload.types.into_iter().map(|slot| slot.kind.name).collect(),
    }
  }
}

pub fn build_client() -> reqwest::Result<Client> {
  Client::builder().user_agent(CLIENT_USER_AGENT).build()
}

async fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
  let response = client.get(url).send().await.map_err(|source| FetchError::Request {
    url: url.to_string(),
    source,
  })?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::Status {
      url: url.to_string(),
      status,
    });
  }

  let body = response.text().await.map_err(|source| FetchError::Request {
    url: url.to_string(),
    source,
  })?;

  serde_json::from_str(&body).map_err(|source| FetchError::Decode {
    url: url.to_string(),
    source,
  })
}

/// Fetches the index, then every detail record in parallel. All-or-nothing:
/// one failed detail request fails the whole load, and the resulting order
/// follows the index order.
pub async fn load_catalog(
  client: &Client,
  base_url: &str,
  limit: usize,
) -> Result<Vec<Pokemon>, FetchError> {
  let index_url = format!("{}/pokemon?limit={}", base_url, limit);
  let index: IndexPayload = get_json(client, &index_url).await?;
  tracing::info!(count = index.results.len(), "fetched pokemon index");

  let details = index.results.iter().map(|entry| {
    tracing::trace!(name = %entry.name, url = %entry.url, "queueing detail fetch");
    get_json::<DetailPayload>(client, &entry.url)
  });
  let payloads = try_join_all(details).await?;

  Ok(payloads.into_iter().map(Pokemon::from).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  const DETAIL_JSON: &str = r#"{
    "name": "charizard",
    "sprites": {
      "front_default": "https://img.example/charizard-front.png",
      "other": {
        "official-artwork": {
          "front_default": "https://img.example/charizard-art.png"
        }
      }
    },
    "types": [
      { "slot": 1, "type": { "name": "fire", "url": "https://api.example/type/10/" } },
      { "slot": 2, "type": { "name": "flying", "url": "https://api.example/type/3/" } }
    ]
  }"#;

  #[test]
  fn detail_payload_maps_to_pokemon() {
    let payload: DetailPayload = serde_json::from_str(DETAIL_JSON).unwrap();
    let pokemon = Pokemon::from(payload);

    assert_eq!(pokemon.name, "charizard");
    assert_eq!(pokemon.types, vec!["fire", "flying"]);
    assert_eq!(
      pokemon.artwork_url.as_deref(),
      Some("https://img.example/charizard-art.png")
    );
    assert_eq!(pokemon.image_url(), Some("https://img.example/charizard-art.png"));
  }

  #[test]
  fn image_url_falls_back_to_sprite_without_artwork() {
    let json = r#"{
      "name": "missingno",
      "sprites": { "front_default": "https://img.example/front.png" },
      "types": []
    }"#;
    let payload: DetailPayload = serde_json::from_str(json).unwrap();
    let pokemon = Pokemon::from(payload);

    assert!(pokemon.artwork_url.is_none());
    assert_eq!(pokemon.image_url(), Some("https://img.example/front.png"));
  }

  #[test]
  fn image_url_is_none_without_any_sprite() {
    let pokemon = Pokemon {
      name: "ghost".to_string(),
      artwork_url: None,
      sprite_url: None,
      types: vec![],
    };
    assert_eq!(pokemon.image_url(), None);
  }

  #[test]
  fn detail_payload_missing_types_is_rejected() {
    let json = r#"{ "name": "broken", "sprites": { "front_default": null } }"#;
    assert!(serde_json::from_str::<DetailPayload>(json).is_err());
  }

  #[test]
  fn index_payload_preserves_entry_order() {
    let json = r#"{
      "count": 3,
      "results": [
        { "name": "bulbasaur", "url": "https://api.example/pokemon/1/" },
        { "name": "ivysaur", "url": "https://api.example/pokemon/2/" },
        { "name": "venusaur", "url": "https://api.example/pokemon/3/" }
      ]
    }"#;
    let index: IndexPayload = serde_json::from_str(json).unwrap();
    let names: Vec<&str> = index.results.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
    assert_eq!(index.results[0].url, "https://api.example/pokemon/1/");
  }
}
