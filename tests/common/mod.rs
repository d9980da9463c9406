#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use recipe_snap::{ClientConfig, RecipeClient};
use serde_json::json;

pub fn client_for(server: &ServerGuard) -> RecipeClient {
    let config = ClientConfig {
        api_key: Some("fake_api_key".to_string()),
        base_url: server.url(),
        model: "llama-test".to_string(),
        timeout: 5,
        ..Default::default()
    };
    RecipeClient::new(config).unwrap()
}

/// Body of a successful completion whose reply text is `content`
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub async fn mock_reply(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub fn six_recipes_json() -> String {
    let recipes: Vec<_> = ["Shakshuka", "Omelette", "Tomato Soup", "Frittata", "Egg Fried Rice", "Bruschetta"]
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "id": (i + 1).to_string(),
                "title": title,
                "emoji": "🍳",
                "difficulty": (["Easy", "Medium", "Hard"][i % 3]),
                "time": format!("{} min", 10 + i * 5),
                "description": format!("A quick {}.", title.to_lowercase())
            })
        })
        .collect();

    json!({"ingredients": ["egg", "tomato"], "recipes": recipes}).to_string()
}
