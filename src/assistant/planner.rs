//! Generate a learning path for a topic, asking the language model for a JSON item list.

use super::{CompletionRequest, LanguageModel, PromptMessage};
use crate::error::{AppError, LlmError};
use crate::models::{GenerateQuery, ItemType, LearningPathCreate, LearningPathItemCreate, LearningPathStatus};
use crate::service::MAX_TITLE_CHARS;
use serde_json::Value;

const SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];
const TIME_COMMITMENTS: &[&str] = &["low", "medium", "high"];
const MIN_DURATION: i64 = 5;
const MAX_DURATION: i64 = 240;
const DEFAULT_DURATION: i64 = 120;
/// Leaves room for the " Learning Path" suffix within the title limit.
pub const MAX_TOPIC_CHARS: usize = 180;

const PLANNER_SYSTEM_PROMPT: &str =
    "You are a helpful learning assistant that creates personalized learning paths. Always respond with valid JSON.";

/// Validated generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    pub topic: String,
    pub level: String,
    pub time_commitment: String,
}

impl PathRequest {
    /// Topic must have 2 to 180 characters; unknown level and commitment fall back to defaults.
    pub fn from_query(query: &GenerateQuery) -> Result<Self, AppError> {
        let topic = query.topic.trim();
        let length = topic.chars().count();
        if length < 2 {
            return Err(AppError::BadRequest(
                "Topic must be a non-empty string with at least 2 characters".into(),
            ));
        }
        if length > MAX_TOPIC_CHARS {
            return Err(AppError::BadRequest(format!(
                "Topic must be at most {} characters",
                MAX_TOPIC_CHARS
            )));
        }
        let mut level = query.current_level.trim().to_lowercase();
        if !SKILL_LEVELS.contains(&level.as_str()) {
            tracing::warn!(level = %level, "unknown skill level; using beginner");
            level = "beginner".into();
        }
        let mut time_commitment = query.time_commitment.trim().to_lowercase();
        if !TIME_COMMITMENTS.contains(&time_commitment.as_str()) {
            tracing::warn!(time_commitment = %time_commitment, "unknown time commitment; using medium");
            time_commitment = "medium".into();
        }
        Ok(PathRequest {
            topic: topic.to_string(),
            level,
            time_commitment,
        })
    }

    fn prompt(&self) -> String {
        let types: Vec<&str> = ItemType::ALL.iter().map(ItemType::as_str).collect();
        format!(
            "Create a personalized learning path for someone who wants to learn \"{topic}\".\n\
             Current skill level: {level}\n\
             Time commitment: {time}\n\n\
             Please provide a structured learning path with the following format:\n\
             - Each item should have a type (course, article, video, exercise, project)\n\
             - A title and description for each item\n\
             - Estimated time to complete each item (in minutes)\n\
             - A logical order for the items\n\n\
             Format the response as a valid JSON array of objects with these required fields:\n\
             - item_type: one of {types:?}\n\
             - title: string\n\
             - description: string\n\
             - resource_url: string (can be empty)\n\
             - estimated_duration: number (in minutes, between 5 and 240)\n\
             - order: number (starting from 0)\n\n\
             Example:\n\
             [\n  {{\n    \"item_type\": \"course\",\n    \"title\": \"Introduction to {topic}\",\n    \
             \"description\": \"Learn the basics of {topic}...\",\n    \
             \"resource_url\": \"https://example.com/intro\",\n    \
             \"estimated_duration\": 90,\n    \"order\": 0\n  }}\n]",
            topic = self.topic,
            level = self.level,
            time = self.time_commitment,
            types = types,
        )
    }

    fn title(&self) -> String {
        format!("{} Learning Path", title_case(&self.topic))
    }

    fn description(&self) -> String {
        format!("A personalized learning path for {} at {} level.", self.topic, self.level)
    }
}

/// Ask the model for items; any failure or an empty result gives the default path.
pub async fn generate_path(llm: Option<&dyn LanguageModel>, request: &PathRequest) -> LearningPathCreate {
    tracing::info!(
        topic = %request.topic,
        level = %request.level,
        time_commitment = %request.time_commitment,
        "generating learning path"
    );
    let Some(llm) = llm else {
        return default_path(request);
    };
    let completion = CompletionRequest {
        messages: vec![
            PromptMessage::system(PLANNER_SYSTEM_PROMPT),
            PromptMessage::user(request.prompt()),
        ],
        temperature: 0.7,
        max_tokens: 1500,
    };
    let items = match llm.complete(completion).await.and_then(|content| parse_items(&content)) {
        Ok(items) => items,
        Err(error) => {
            tracing::error!(%error, "learning path generation failed; using default path");
            return default_path(request);
        }
    };
    if items.is_empty() {
        tracing::warn!("no valid items generated; using default path");
        return default_path(request);
    }
    LearningPathCreate {
        title: request.title(),
        description: Some(request.description()),
        status: LearningPathStatus::Draft,
        items,
    }
}

pub fn default_path(request: &PathRequest) -> LearningPathCreate {
    LearningPathCreate {
        title: request.title(),
        description: Some(request.description()),
        status: LearningPathStatus::Draft,
        items: vec![LearningPathItemCreate {
            item_type: ItemType::Course,
            title: format!("Introduction to {}", request.topic),
            description: Some(format!(
                "A comprehensive introduction to {} for {} learners.",
                request.topic, request.level
            )),
            resource_url: None,
            estimated_duration: Some(DEFAULT_DURATION),
            order: 0,
            is_completed: false,
        }],
    }
}

/// Read the JSON array between the first `[` and the last `]`. Items missing a required field,
/// with an unknown type, an empty or overlong title, or non-numeric duration/order are skipped.
pub fn parse_items(content: &str) -> Result<Vec<LearningPathItemCreate>, LlmError> {
    let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) else {
        return Err(LlmError::Parse("no JSON array in response".into()));
    };
    if end < start {
        return Err(LlmError::Parse("no JSON array in response".into()));
    }
    let values: Vec<Value> =
        serde_json::from_str(content[start..=end].trim()).map_err(|e| LlmError::Parse(e.to_string()))?;

    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match parse_item(value) {
            Some(item) => items.push(item),
            None => tracing::warn!(index, "skipping invalid generated item"),
        }
    }
    Ok(items)
}

fn parse_item(value: &Value) -> Option<LearningPathItemCreate> {
    let object = value.as_object()?;
    for key in ["item_type", "title", "description", "estimated_duration", "order"] {
        if !object.contains_key(key) {
            return None;
        }
    }
    let item_type: ItemType = object["item_type"].as_str()?.parse().ok()?;
    let title = text(&object["title"]);
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return None;
    }
    let resource_url = object
        .get("resource_url")
        .map(text)
        .filter(|url| !url.is_empty());
    Some(LearningPathItemCreate {
        item_type,
        title,
        description: Some(text(&object["description"])),
        resource_url,
        estimated_duration: Some(integer(&object["estimated_duration"])?.clamp(MIN_DURATION, MAX_DURATION)),
        order: integer(&object["order"])?.max(0),
        is_completed: false,
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}
