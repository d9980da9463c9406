use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ingredients detected in a photo plus ranked recipe ideas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientScanResult {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub ingredients: Vec<String>,
    /// Display order is the model's ranking
    #[serde(rename = "recipes", default, deserialize_with = "lenient::list")]
    pub recipe_summaries: Vec<RecipeSummary>,
}

impl IngredientScanResult {
    /// Give summaries without an id their 1-based position
    pub(crate) fn with_positional_ids(mut self) -> Self {
        for (index, summary) in self.recipe_summaries.iter_mut().enumerate() {
            if summary.id.trim().is_empty() {
                summary.id = (index + 1).to_string();
            }
        }
        self
    }

    /// Build the payload for the detail view of the recipe at `index`
    pub fn select(&self, index: usize) -> Option<RecipeSelection> {
        self.recipe_summaries
            .get(index)
            .map(|summary| RecipeSelection {
                summary: summary.clone(),
                ingredients: self.ingredients.clone(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub emoji: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

/// A chosen summary together with the ingredients of the scan it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSelection {
    pub summary: RecipeSummary,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRecipe {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub emoji: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub servings: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prep_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cook_time: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "ingredients", default, deserialize_with = "lenient::list")]
    pub ingredient_lines: Vec<IngredientLine>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tips: Vec<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub nutrition: Option<Nutrition>,
}

impl FullRecipe {
    pub const DEFAULT_SERVINGS: u32 = 2;

    /// Servings, with missing or zero treated as the default of 2
    pub fn servings_or_default(&self) -> u32 {
        self.servings
            .filter(|&n| n >= 1)
            .unwrap_or(Self::DEFAULT_SERVINGS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(default, deserialize_with = "lenient::string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub item: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Shown as provided; not guaranteed contiguous
    #[serde(default, deserialize_with = "lenient::count")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub protein: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub carbs: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub fat: String,
}

impl lenient::Entry for RecipeSummary {
    fn from_text(title: String) -> Self {
        RecipeSummary {
            title,
            ..Default::default()
        }
    }
}

impl lenient::Entry for IngredientLine {
    fn from_text(item: String) -> Self {
        IngredientLine {
            item,
            ..Default::default()
        }
    }
}

impl lenient::Entry for Step {
    fn from_text(instruction: String) -> Self {
        Step {
            number: None,
            instruction,
        }
    }
}

/// Badge colours for a difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
}

/// Recipe difficulty. Unrecognised values are kept rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Difficulty::default()
        } else if trimmed.eq_ignore_ascii_case("easy") {
            Difficulty::Easy
        } else if trimmed.eq_ignore_ascii_case("medium") {
            Difficulty::Medium
        } else if trimmed.eq_ignore_ascii_case("hard") {
            Difficulty::Hard
        } else {
            Difficulty::Other(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Other(raw) => raw,
        }
    }

    /// Unknown levels share the Easy badge
    pub fn palette(&self) -> Palette {
        match self {
            Difficulty::Medium => Palette {
                background: "rgba(243,156,18,0.15)",
                text: "#F39C12",
            },
            Difficulty::Hard => Palette {
                background: "rgba(231,76,60,0.15)",
                text: "#E74C3C",
            },
            Difficulty::Easy | Difficulty::Other(_) => Palette {
                background: "rgba(39,174,96,0.15)",
                text: "#27AE60",
            },
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(|raw| Difficulty::parse(&raw))
    }
}

/// Decoders that accept whatever shape the model happened to emit
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn leading_number(text: &str) -> Option<f64> {
        let trimmed = text.trim_start();
        let end = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        trimmed[..end].parse().ok()
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(scalar_to_string).unwrap_or_default())
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
            _ => Vec::new(),
        })
    }

    /// List entries the model may also emit as a bare string
    pub trait Entry: DeserializeOwned + Default {
        fn from_text(text: String) -> Self;
    }

    /// One entry per array item; items of the wrong shape become defaults
    fn entry<T: Entry>(value: Value) -> T {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            other => scalar_to_string(other).map(T::from_text).unwrap_or_default(),
        }
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Entry,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items.into_iter().map(entry).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
            Some(single) => vec![entry(single)],
        })
    }

    /// An object, or `None` for any other shape
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => leading_number(&s),
            _ => None,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(number(deserializer)?
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.round() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_result_preserves_order() {
        let scan: IngredientScanResult = serde_json::from_value(json!({
            "ingredients": ["egg", "tomato"],
            "recipes": [
                {"id": "1", "title": "Shakshuka", "difficulty": "Medium"},
                {"id": "2", "title": "Omelette", "difficulty": "easy"},
                {"title": "Tomato Soup", "difficulty": "Hard"}
            ]
        }))
        .unwrap();
        let scan = scan.with_positional_ids();

        let titles: Vec<_> = scan.recipe_summaries.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Shakshuka", "Omelette", "Tomato Soup"]);
        assert_eq!(scan.recipe_summaries[1].difficulty, Difficulty::Easy);
        assert_eq!(scan.recipe_summaries[2].id, "3");
    }

    #[test]
    fn test_unknown_difficulty_is_tolerated() {
        let summary: RecipeSummary =
            serde_json::from_value(json!({"title": "Soufflé", "difficulty": "Expert"})).unwrap();
        assert_eq!(summary.difficulty, Difficulty::Other("Expert".to_string()));
        assert_eq!(summary.difficulty.label(), "Expert");
        assert_eq!(summary.difficulty.palette(), Difficulty::Easy.palette());
    }

    #[test]
    fn test_missing_difficulty_defaults_to_medium() {
        let summary: RecipeSummary = serde_json::from_value(json!({"title": "Toast"})).unwrap();
        assert_eq!(summary.difficulty, Difficulty::Medium);

        let blank: RecipeSummary =
            serde_json::from_value(json!({"title": "Toast", "difficulty": null})).unwrap();
        assert_eq!(blank.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_full_recipe_accepts_loose_shapes() {
        let recipe: FullRecipe = serde_json::from_value(json!({
            "title": "Shakshuka",
            "servings": "4",
            "prepTime": "10 min",
            "ingredients": [{"amount": 2, "unit": "", "item": "eggs"}],
            "steps": [{"number": "1", "instruction": "Heat oil."}, {"instruction": "Crack eggs."}],
            "tips": ["Use a lid", 3],
            "nutrition": {"calories": "350 kcal", "protein": "15g"}
        }))
        .unwrap();

        assert_eq!(recipe.servings_or_default(), 4);
        assert_eq!(recipe.prep_time, "10 min");
        assert_eq!(recipe.cook_time, "");
        assert_eq!(recipe.ingredient_lines[0].amount, "2");
        assert_eq!(recipe.steps[0].number, Some(1));
        assert_eq!(recipe.steps[1].number, None);
        assert_eq!(recipe.tips, ["Use a lid", "3"]);
        let nutrition = recipe.nutrition.unwrap();
        assert_eq!(nutrition.calories, Some(350.0));
        assert_eq!(nutrition.fat, "");
    }

    #[test]
    fn test_empty_object_is_a_valid_recipe() {
        let recipe: FullRecipe = serde_json::from_str("{}").unwrap();
        assert_eq!(recipe.servings_or_default(), 2);
        assert!(recipe.steps.is_empty());
        assert!(recipe.nutrition.is_none());
    }

    #[test]
    fn test_null_nutrition_is_absent() {
        let recipe: FullRecipe = serde_json::from_value(json!({"nutrition": null})).unwrap();
        assert!(recipe.nutrition.is_none());
    }

    #[test]
    fn test_select_carries_scan_ingredients() {
        let scan = IngredientScanResult {
            ingredients: vec!["egg".to_string()],
            recipe_summaries: vec![RecipeSummary {
                id: "1".to_string(),
                title: "Omelette".to_string(),
                ..Default::default()
            }],
        };

        let selection = scan.select(0).unwrap();
        assert_eq!(selection.summary.title, "Omelette");
        assert_eq!(selection.ingredients, ["egg"]);
        assert!(scan.select(1).is_none());
    }

    #[test]
    fn test_difficulty_serializes_as_label() {
        let value = serde_json::to_value(Difficulty::Hard).unwrap();
        assert_eq!(value, json!("Hard"));
    }

    #[test]
    fn test_bare_string_entries_are_coerced() {
        let recipe: FullRecipe = serde_json::from_value(json!({
            "title": "Toast",
            "ingredients": ["2 slices bread", {"amount": "1", "unit": "tbsp", "item": "butter"}],
            "steps": ["Toast bread", "Butter it"]
        }))
        .unwrap();

        assert_eq!(recipe.ingredient_lines[0].item, "2 slices bread");
        assert_eq!(recipe.ingredient_lines[0].amount, "");
        assert_eq!(recipe.ingredient_lines[1].unit, "tbsp");
        assert_eq!(
            recipe.steps,
            [
                Step {
                    number: None,
                    instruction: "Toast bread".to_string()
                },
                Step {
                    number: None,
                    instruction: "Butter it".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_scalar_nutrition_is_absent() {
        for nutrition in [json!("n/a"), json!(350), json!(["350 kcal"])] {
            let recipe: FullRecipe =
                serde_json::from_value(json!({"title": "Toast", "nutrition": nutrition})).unwrap();
            assert!(recipe.nutrition.is_none());
        }
    }

    #[test]
    fn test_odd_summaries_keep_their_slot() {
        let scan: IngredientScanResult = serde_json::from_value(json!({
            "ingredients": ["bread"],
            "recipes": [{"title": "A"}, null, "Toast", [1, 2]]
        }))
        .unwrap();
        let scan = scan.with_positional_ids();

        assert_eq!(scan.recipe_summaries.len(), 4);
        assert_eq!(scan.recipe_summaries[1].id, "2");
        assert_eq!(scan.recipe_summaries[1].title, "");
        assert_eq!(scan.recipe_summaries[2].title, "Toast");
        assert_eq!(scan.recipe_summaries[3].id, "4");
    }

    #[test]
    fn test_single_step_object_becomes_a_list() {
        let recipe: FullRecipe =
            serde_json::from_value(json!({"steps": {"instruction": "Serve."}})).unwrap();
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.steps[0].instruction, "Serve.");
    }
}
