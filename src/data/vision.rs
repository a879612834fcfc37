//! LLM collaborator: the alternate candidate source.
//!
//! Sends a page image (vision mode) or the OCR'd page text (text mode) to
//! the OpenAI chat-completions API and turns the loosely-typed reply into
//! [`RawCandidate`]s. The candidates flow through the same reconciler and
//! validator as the regex path, so this module does no validation of its own
//! beyond shaping the data. Transport and API errors propagate unmodified;
//! retry policy belongs to the caller.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{RawCandidate, SourcePattern};
use crate::error::AppError;
use crate::validate::parse_quantity;

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o";

/// The prompt stresses hours 14 and 15, which OCR and vision models alike
/// tend to drop, and forbids invented values.
const PROMPT: &str = "\
Analyze this image of a revenue log and extract all hourly revenue entries.

VERY IMPORTANT: Look extremely carefully for hours 14 (2 PM) and 15 (3 PM).
These hours may appear as \"14 HRS\", \"14 HR\", \"14H\", \"l4 HRS\", \"M HRS\",
or similar patterns.

Each entry should have:
- Hour (numeric value only, like 9, 10, 11, 14, 15)
- Quantity (numeric value only, or null if missing)
- Revenue (dollar amount, including the $ symbol)

Only extract what you can actually see - do not make up or estimate values.
Format your response as a JSON array of objects.";

/// Text-mode variant of the prompt, for pages that were already OCR'd.
const TEXT_PROMPT: &str = "\
Extract ALL hourly revenue data from the following text that was OCR'd from
a scanned revenue log.

VERY IMPORTANT: Pay extremely close attention to hours 14 (2 PM) and 15
(3 PM), which may be formatted as \"14 HRS\", \"l4 HRS\" (OCR confusing 1
with l), \"M HRS\", or in 12-hour form.

Return the data as a JSON object with a \"data\" array; each entry has:
- \"Hour\": number (e.g., 9, 10, 11, 14, 15)
- \"Quantity\": number or null if missing
- \"Revenue\": dollar amount including the $ symbol

DO NOT make up or estimate any values. Only extract what is actually present
in the text.

Here's the text:
";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct VisionClient {
    client: Client,
    api_key: String,
}

impl VisionClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::usage("Missing OPENAI_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Query the vision model with one page image (JPEG bytes) and return
    /// the candidates it reports, in reply order.
    pub fn extract_candidates(&self, image_bytes: &[u8]) -> Result<Vec<RawCandidate>, AppError> {
        let image_b64 = BASE64.encode(image_bytes);
        let body = json!({
            "model": MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PROMPT },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpeg;base64,{image_b64}") }
                    }
                ]
            }]
        });

        let content = self.complete(body)?;
        Ok(candidates_from_content(&content))
    }

    /// Query the model with already-OCR'd page text instead of an image.
    /// Same reply handling as the vision mode; only the request differs.
    pub fn extract_candidates_from_text(&self, text: &str) -> Result<Vec<RawCandidate>, AppError> {
        let body = json!({
            "model": MODEL,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a precise data extraction system that outputs only JSON."
                },
                { "role": "user", "content": format!("{TEXT_PROMPT}{text}") }
            ],
            "response_format": { "type": "json_object" }
        });

        let content = self.complete(body)?;
        Ok(candidates_from_content(&content))
    }

    fn complete(&self, body: Value) -> Result<String, AppError> {
        let response = self
            .client
            .post(BASE_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AppError::runtime(format!("LLM API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::runtime(format!(
                "LLM API returned HTTP {}.",
                response.status(),
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AppError::runtime(format!("Invalid LLM API response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::runtime("LLM API response contained no choices."))
    }
}

/// Find the JSON payload inside the model's reply and convert it.
///
/// The model usually answers with a bare JSON array, sometimes wrapped in
/// prose, sometimes inside an object under an array-valued key. Anything
/// unrecognizable yields no candidates rather than an error; an empty page
/// is a legitimate result.
pub fn candidates_from_content(content: &str) -> Vec<RawCandidate> {
    if let Some(items) = extract_json_array(content) {
        return candidates_from_values(&items);
    }
    Vec::new()
}

fn extract_json_array(content: &str) -> Option<Vec<Value>> {
    // Prefer a bracketed array anywhere in the reply.
    if let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) {
        if start < end {
            if let Ok(Value::Array(items)) = serde_json::from_str(&content[start..=end]) {
                return Some(items);
            }
        }
    }

    // Fall back to an object holding an array under some key.
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&content[start..=end]) {
                if let Some(Value::Array(items)) = map.get("data") {
                    return Some(items.clone());
                }
                for value in map.values() {
                    if let Value::Array(items) = value {
                        return Some(items.clone());
                    }
                }
            }
        }
    }

    None
}

fn candidates_from_values(items: &[Value]) -> Vec<RawCandidate> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| candidate_from_value(item, idx))
        .collect()
}

fn candidate_from_value(item: &Value, idx: usize) -> Option<RawCandidate> {
    let obj = item.as_object()?;

    let hour = match field(obj, "hour")? {
        Value::Number(n) => u8::try_from(n.as_u64()?).ok()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    // Quantity may arrive numeric, textual with separators, or null.
    let quantity = match field(obj, "quantity") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => parse_quantity(s),
        _ => None,
    };

    // Revenue may arrive with or without a `$` prefix; keep it textual and
    // let the validator normalize it.
    let amount_text = match field(obj, "revenue")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Some(RawCandidate {
        hour,
        quantity,
        amount_text,
        source: SourcePattern::Vision,
        offset: idx,
    })
}

/// Case-insensitive field lookup ("Hour" vs "hour").
fn field<'a>(obj: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}
