//! Analysis pipeline: orchestrates one document from extracted text to report.
//!
//! Flow: segment → score → suggest → critique (rule score attached) → report.
//! Every stage after extraction degrades instead of failing, so this always succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::scoring::{
    category_scores, score, AtsScore, CategoryScore, ScoreBand, ScoreBreakdown,
};
use crate::analysis::sections::{segment, Section, SectionMap};
use crate::analysis::suggestions::suggest;
use crate::critique::{CritiqueClient, CritiqueResult, RuleBasedScore};

/// Characters of each section shown in `section_previews`.
pub const PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPreview {
    pub section: Section,
    pub label: String,
    pub preview: String,
}

/// Everything the presentation layer needs for one analyzed resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub ats_score: AtsScore,
    pub band: ScoreBand,
    pub band_label: String,
    pub score_breakdown: ScoreBreakdown,
    pub category_scores: Vec<CategoryScore>,
    pub suggestions: Vec<String>,
    pub critique: CritiqueResult,
    pub section_previews: Vec<SectionPreview>,
    pub sections: SectionMap,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn analyze_text(text: &str, critic: &CritiqueClient) -> AnalysisReport {
    let analysis_id = Uuid::new_v4();

    let sections = segment(text);
    let populated: Vec<&str> = sections.populated().map(|(s, _)| s.key()).collect();
    info!(%analysis_id, "Segmented resume: populated sections {:?}", populated);

    let (ats_score, score_breakdown) = score(&sections);
    info!(%analysis_id, "Rule-based ATS score: {ats_score}/100");

    let suggestions = suggest(&sections, ats_score);

    let rule = RuleBasedScore {
        ats_score,
        breakdown: score_breakdown,
    };
    let critique = critic.critique(&sections, Some(rule)).await;
    info!(
        %analysis_id,
        "Critique complete: origin={:?}, critique score={}",
        critique.origin, critique.ats_score
    );

    let band = ScoreBand::from_score(ats_score);
    AnalysisReport {
        analysis_id,
        analyzed_at: Utc::now(),
        ats_score,
        band,
        band_label: band.label().to_string(),
        score_breakdown,
        category_scores: category_scores(&score_breakdown),
        suggestions,
        critique,
        section_previews: section_previews(&sections),
        sections,
    }
}

/// Previews for every non-empty section, truncated to `PREVIEW_CHARS` with "...".
pub fn section_previews(sections: &SectionMap) -> Vec<SectionPreview> {
    sections
        .populated()
        .map(|(section, content)| {
            let preview = match content.char_indices().nth(PREVIEW_CHARS) {
                Some((cut, _)) => format!("{}...", &content[..cut]),
                None => content.to_string(),
            };
            SectionPreview {
                section,
                label: section.label().to_string(),
                preview,
            }
        })
        .collect()
}
