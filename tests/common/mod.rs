//! Stub PokeAPI payloads and mock helpers shared by integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn pokemon(
    base: &str,
    id: u32,
    name: &str,
    abilities: &[&str],
    moves: &[&str],
    stats: &[(u32, &str)],
) -> Value {
    let abilities: Vec<Value> = abilities
        .iter()
        .enumerate()
        .map(|(i, a)| {
            json!({
                "ability": {"name": a, "url": format!("{base}/ability/{a}/")},
                "is_hidden": false,
                "slot": i + 1
            })
        })
        .collect();
    let moves: Vec<Value> = moves
        .iter()
        .map(|m| {
            json!({
                "move": {"name": m, "url": format!("{base}/move/{m}/")},
                "version_group_details": [{"level_learned_at": 1}]
            })
        })
        .collect();
    let stats: Vec<Value> = stats
        .iter()
        .map(|(id, s)| {
            json!({
                "base_stat": 100,
                "effort": 0,
                "stat": {"name": s, "url": format!("{base}/stat/{id}/")}
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "height": 4,
        "weight": 40,
        "types": [{"slot": 1, "type": {"name": "psychic", "url": format!("{base}/type/14/")}}],
        "abilities": abilities,
        "moves": moves,
        "stats": stats
    })
}

pub fn ability(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "generation": {"name": "generation-iii"},
        "effect_entries": [{
            "effect": format!("{name} long effect.\n\nSecond paragraph."),
            "short_effect": format!("{name} short effect."),
            "language": {"name": "en"}
        }],
        "pokemon": [{"is_hidden": false, "slot": 1, "pokemon": {"name": "mew"}}]
    })
}

pub fn move_payload(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "generation": {"name": "generation-i"},
        "accuracy": 100,
        "pp": 35,
        "power": 40,
        "type": {"name": "normal"},
        "damage_class": {"name": "physical"},
        "effect_entries": [{
            "effect": "Inflicts regular damage.",
            "short_effect": format!("{name} short effect."),
            "language": {"name": "en"}
        }]
    })
}

pub fn stat(id: u32, name: &str) -> Value {
    json!({"id": id, "name": name, "is_battle_only": false})
}

/// Serve `body` for `GET /{category}/{id}`
pub async fn serve(server: &MockServer, category: &str, id: &str, body: Value) {
    serve_delayed(server, category, id, body, Duration::ZERO).await;
}

pub async fn serve_delayed(
    server: &MockServer,
    category: &str,
    id: &str,
    body: Value,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(format!("/{category}/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

/// Answer 404 for `GET /{category}/{id}`
pub async fn not_found(server: &MockServer, category: &str, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{category}/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(server)
        .await;
}
