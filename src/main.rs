use log::{debug, error};
use std::env;
use std::path::Path;

use recipe_snap::render::{DocumentRenderer, HtmlFileBackend};
use recipe_snap::{ClientConfig, RecipeClient};

const USAGE: &str = "Usage:
  recipe-snap scan <image>
  recipe-snap recipe <title> <ingredient,ingredient,...> [--export <dir>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(USAGE)?;

    let config = ClientConfig::load()?;
    debug!("Using model {} at {}", config.model, config.base_url);
    let client = RecipeClient::new(config.clone())?;

    match command.as_str() {
        "scan" => {
            let image = args.get(1).ok_or(USAGE)?;
            let scan = client.scan_image_file(Path::new(image)).await?;
            println!("{}", serde_json::to_string_pretty(&scan)?);
        }
        "recipe" => {
            let title = args.get(1).ok_or(USAGE)?;
            let ingredients: Vec<String> = args
                .get(2)
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let recipe = client.fetch_full_recipe(title, &ingredients).await?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);

            if let Some(position) = args.iter().position(|arg| arg == "--export") {
                let dir = args.get(position + 1).ok_or(USAGE)?;
                let renderer = DocumentRenderer::new(
                    Box::new(HtmlFileBackend::new(dir)),
                    config.export.footer.clone(),
                );
                let handle = renderer.render(&recipe).await?;
                eprintln!("Document written to {}", handle.path.display());
            }
        }
        other => {
            error!("Unknown command: {}", other);
            return Err(USAGE.into());
        }
    }

    Ok(())
}
