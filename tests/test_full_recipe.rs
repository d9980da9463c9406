mod common;

use common::{client_for, completion_body, mock_reply};
use mockito::Matcher;
use recipe_snap::{Difficulty, RecipeError};
use serde_json::json;

fn shakshuka_json() -> String {
    json!({
        "title": "Shakshuka",
        "emoji": "🍳",
        "servings": 2,
        "prepTime": "10 min",
        "cookTime": "20 min",
        "difficulty": "Medium",
        "description": "Eggs poached in a spiced tomato sauce.",
        "ingredients": [
            {"amount": "4", "unit": "", "item": "eggs"},
            {"amount": "3", "unit": "", "item": "tomatoes"}
        ],
        "steps": [
            {"number": 1, "instruction": "Dice the tomatoes."},
            {"number": 2, "instruction": "Simmer until thick."},
            {"number": 3, "instruction": "Crack in the eggs and cover."}
        ],
        "tips": ["Use a wide pan", "Serve with crusty bread"],
        "nutrition": {"calories": 350, "protein": "15g", "carbs": "20g", "fat": "12g"}
    })
    .to_string()
}

#[tokio::test]
async fn test_fetch_full_recipe() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_reply(&mut server, 200, &completion_body(&shakshuka_json())).await;

    let ingredients = vec!["egg".to_string(), "tomato".to_string()];
    let recipe = client_for(&server)
        .fetch_full_recipe("Shakshuka", &ingredients)
        .await
        .unwrap();

    assert_eq!(recipe.title, "Shakshuka");
    assert_eq!(recipe.servings_or_default(), 2);
    assert_eq!(recipe.difficulty, Difficulty::Medium);
    assert_eq!(recipe.ingredient_lines.len(), 2);
    assert_eq!(recipe.steps[2].instruction, "Crack in the eggs and cover.");
    assert_eq!(recipe.tips.len(), 2);
    assert_eq!(recipe.nutrition.unwrap().calories, Some(350.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_recipe_request_shape() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJsonString(
                r#"{"max_tokens": 2048, "temperature": 0.7}"#.to_string(),
            ),
            Matcher::Regex(r#""role":"user","content":"You are a professional chef"#.to_string()),
            Matcher::Regex("Available ingredients: egg, tomato".to_string()),
        ]))
        .with_status(200)
        .with_body(completion_body(&shakshuka_json()))
        .create_async()
        .await;

    let ingredients = vec!["egg".to_string(), "tomato".to_string()];
    client_for(&server)
        .fetch_full_recipe("Shakshuka", &ingredients)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fenced_reply_matches_bare_reply() {
    let mut bare_server = mockito::Server::new_async().await;
    let _bare = mock_reply(&mut bare_server, 200, &completion_body(&shakshuka_json())).await;

    let mut fenced_server = mockito::Server::new_async().await;
    let fenced = format!("```json\n{}\n```", shakshuka_json());
    let _fenced = mock_reply(&mut fenced_server, 200, &completion_body(&fenced)).await;

    let bare = client_for(&bare_server)
        .fetch_full_recipe("Shakshuka", &[])
        .await
        .unwrap();
    let from_fenced = client_for(&fenced_server)
        .fetch_full_recipe("Shakshuka", &[])
        .await
        .unwrap();
    assert_eq!(bare, from_fenced);
}

#[tokio::test]
async fn test_truncated_reply_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let truncated = r#"{"title": "Shakshuka", "steps": [{"number": 1, "instruction": "Dice the} tomatoes"#;
    let _mock = mock_reply(&mut server, 200, &completion_body(truncated)).await;

    let err = client_for(&server)
        .fetch_full_recipe("Shakshuka", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, RecipeError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_error_payload_with_success_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_reply(
        &mut server,
        200,
        r#"{"error": {"message": "model_decommissioned", "type": "invalid_request_error"}}"#,
    )
    .await;

    let err = client_for(&server)
        .fetch_full_recipe("Shakshuka", &[])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "model_decommissioned");
}

#[tokio::test]
async fn test_fetch_selection_uses_scan_ingredients() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Available ingredients: egg, spinach".to_string()))
        .with_status(200)
        .with_body(completion_body(&shakshuka_json()))
        .create_async()
        .await;

    let scan: recipe_snap::IngredientScanResult = serde_json::from_value(json!({
        "ingredients": ["egg", "spinach"],
        "recipes": [{"id": "1", "title": "Green Shakshuka"}]
    }))
    .unwrap();
    let selection = scan.select(0).unwrap();

    let recipe = client_for(&server).fetch_selection(&selection).await.unwrap();
    assert_eq!(recipe.title, "Shakshuka");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retry_on_malformed_reprompts_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body("no json here"))
        .expect(2)
        .create_async()
        .await;

    let client = recipe_snap::RecipeClient::builder()
        .api_key("fake_api_key")
        .base_url(server.url())
        .retry_on_malformed()
        .build()
        .unwrap();

    let err = client.fetch_full_recipe("Shakshuka", &[]).await.unwrap_err();
    assert!(matches!(err, RecipeError::MalformedResponse { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_loose_recipe_shapes_are_accepted() {
    let mut server = mockito::Server::new_async().await;
    let reply = json!({
        "title": "Buttered Toast",
        "ingredients": ["2 slices bread", {"amount": "1", "unit": "tbsp", "item": "butter"}],
        "steps": ["Toast the bread.", "Butter it while hot."],
        "nutrition": "n/a"
    })
    .to_string();
    let _mock = mock_reply(&mut server, 200, &completion_body(&reply)).await;

    let recipe = client_for(&server)
        .fetch_full_recipe("Buttered Toast", &["bread".to_string()])
        .await
        .unwrap();

    assert_eq!(recipe.ingredient_lines.len(), 2);
    assert_eq!(recipe.ingredient_lines[0].item, "2 slices bread");
    assert_eq!(recipe.ingredient_lines[1].item, "butter");
    assert_eq!(recipe.steps.len(), 2);
    assert_eq!(recipe.steps[0].number, None);
    assert_eq!(recipe.steps[1].instruction, "Butter it while hot.");
    assert!(recipe.nutrition.is_none());

    let html = recipe_snap::render_html(&recipe, "");
    assert!(html.contains("2 slices bread"));
    assert!(html.contains("Butter it while hot."));
}

