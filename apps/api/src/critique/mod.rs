//! AI Critique Client: asks the remote model for a qualitative review of a resume.
//!
//! `critique` never fails. Unparseable output and transport errors both degrade to
//! a displayable `CritiqueResult` whose scores fall back to the rule-based values,
//! or to a neutral default when none were supplied.

pub mod parse;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::analysis::scoring::{AtsScore, ScoreBreakdown, ScoreCategory};
use crate::analysis::sections::SectionMap;
use crate::config::ConfigurationError;
use crate::critique::parse::extract_json_object;
use crate::critique::prompts::{build_critique_prompt, CRITIQUE_SYSTEM};
use crate::llm_client::{CompletionBackend, CompletionRequest, LlmClient};

/// Score reported when neither the model nor the caller supplied one.
pub const NEUTRAL_ATS_SCORE: AtsScore = 50;

/// Characters of raw model output kept when the output has no usable JSON.
const RAW_IMPRESSION_CHARS: usize = 500;

const UNPARSED_STRENGTH: &str = "Resume uploaded successfully";
const UNPARSED_WEAKNESS: &str = "Unable to parse detailed analysis";
const UNPARSED_RECOMMENDATION: &str = "Please ensure resume has clear sections";

/// The heuristic score handed to the model as a reference and used as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBasedScore {
    pub ats_score: AtsScore,
    pub breakdown: ScoreBreakdown,
}

/// Which path produced a `CritiqueResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueOrigin {
    /// The model answered with a JSON object.
    Model,
    /// The model answered, but nothing in the answer parsed as a JSON object.
    Unparsed,
    /// The call itself failed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub ats_score: AtsScore,
    pub score_breakdown: ScoreBreakdown,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_sections: Vec<String>,
    pub recommendations: Vec<String>,
    pub keywords_found: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub overall_impression: String,
    pub origin: CritiqueOrigin,
}

/// Settings for the critique client. Validated by `CritiqueClient::new`.
#[derive(Debug, Clone)]
pub struct CritiqueConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CritiqueConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::Missing("GROQ_API_KEY".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                key: "LLM_MODEL".to_string(),
                reason: "model identifier cannot be blank".to_string(),
            });
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                key: "LLM_API_URL".to_string(),
                reason: "endpoint URL cannot be blank".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigurationError::Invalid {
                key: "LLM_TEMPERATURE".to_string(),
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigurationError::Invalid {
                key: "LLM_MAX_TOKENS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builds prompts, calls the completion backend once, and turns the answer into a
/// `CritiqueResult`. Cheap to clone.
#[derive(Clone)]
pub struct CritiqueClient {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CritiqueClient {
    /// Validates `config` and builds an HTTP-backed client.
    pub fn new(config: CritiqueConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let llm = LlmClient::new(config.api_url.clone(), config.api_key.clone(), config.timeout)
            .map_err(|e| ConfigurationError::Invalid {
                key: "LLM_API_URL".to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self::with_backend(Arc::new(llm), &config))
    }

    /// Builds a client over an arbitrary backend. `config` is not re-validated.
    pub fn with_backend(backend: Arc<dyn CompletionBackend>, config: &CritiqueConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn critique(
        &self,
        sections: &SectionMap,
        rule: Option<RuleBasedScore>,
    ) -> CritiqueResult {
        let prompt = build_critique_prompt(sections, rule.as_ref());
        let request = CompletionRequest {
            system: CRITIQUE_SYSTEM,
            prompt: &prompt,
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Requesting critique ({} prompt chars)", prompt.len());
        match self.backend.complete(&request).await {
            Ok(text) => interpret_response(&text, rule),
            Err(e) => {
                warn!("Critique request failed: {e}");
                failed_critique(&e.to_string(), rule)
            }
        }
    }
}

fn fallback_scores(rule: Option<RuleBasedScore>) -> (AtsScore, ScoreBreakdown) {
    rule.map(|r| (r.ats_score, r.breakdown))
        .unwrap_or((NEUTRAL_ATS_SCORE, ScoreBreakdown::default()))
}

/// Turns raw model output into a result using the three-tier parsing policy.
pub fn interpret_response(raw: &str, rule: Option<RuleBasedScore>) -> CritiqueResult {
    match extract_json_object(raw) {
        Some(object) => {
            info!("Critique parsed from model output");
            critique_from_object(&object, rule)
        }
        None => {
            warn!("Model output contained no JSON object; using raw text");
            unparsed_critique(raw, rule)
        }
    }
}

fn critique_from_object(object: &Map<String, Value>, rule: Option<RuleBasedScore>) -> CritiqueResult {
    let (fallback_score, fallback_breakdown) = fallback_scores(rule);
    let ats_score = object
        .get("ats_score")
        .and_then(as_points)
        .map(|s| s.min(100))
        .unwrap_or(fallback_score);
    let score_breakdown = object
        .get("score_breakdown")
        .and_then(Value::as_object)
        .map(breakdown_from_object)
        .unwrap_or(fallback_breakdown);

    CritiqueResult {
        ats_score,
        score_breakdown,
        strengths: string_list(object, "strengths"),
        weaknesses: string_list(object, "weaknesses"),
        missing_sections: string_list(object, "missing_sections"),
        recommendations: string_list(object, "recommendations"),
        keywords_found: string_list(object, "keywords_found"),
        keywords_missing: string_list(object, "keywords_missing"),
        overall_impression: object
            .get("overall_impression")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        origin: CritiqueOrigin::Model,
    }
}

/// Reads a non-negative point value, accepting integers, floats and numeric strings.
fn as_points(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn breakdown_from_object(object: &Map<String, Value>) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();
    for category in ScoreCategory::ALL {
        if let Some(points) = object.get(category.key()).and_then(as_points) {
            breakdown.set(category, points);
        }
    }
    breakdown
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn unparsed_critique(raw: &str, rule: Option<RuleBasedScore>) -> CritiqueResult {
    let (ats_score, score_breakdown) = fallback_scores(rule);
    CritiqueResult {
        ats_score,
        score_breakdown,
        strengths: vec![UNPARSED_STRENGTH.to_string()],
        weaknesses: vec![UNPARSED_WEAKNESS.to_string()],
        missing_sections: vec![],
        recommendations: vec![UNPARSED_RECOMMENDATION.to_string()],
        keywords_found: vec![],
        keywords_missing: vec![],
        overall_impression: raw.chars().take(RAW_IMPRESSION_CHARS).collect(),
        origin: CritiqueOrigin::Unparsed,
    }
}

fn failed_critique(error: &str, rule: Option<RuleBasedScore>) -> CritiqueResult {
    let (ats_score, score_breakdown) = fallback_scores(rule);
    CritiqueResult {
        ats_score,
        score_breakdown,
        strengths: vec![],
        weaknesses: vec![],
        missing_sections: vec![],
        recommendations: vec![format!("Error during analysis: {error}")],
        keywords_found: vec![],
        keywords_missing: vec![],
        overall_impression: format!("Analysis failed: {error}"),
        origin: CritiqueOrigin::Failed,
    }
}
