//! Heuristic Scorer: deterministic, rule-based ATS score over a `SectionMap`.
//!
//! Six categories with fixed ceilings (15/15/30/20/15/5) add up to at most 100.
//! All lengths are measured in characters, not bytes.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::sections::SectionMap;

/// Sum of a `ScoreBreakdown`, always in `0..=100`.
pub type AtsScore = u32;

const CONTACT_LINK_WORDS: &[&str] = &["linkedin", "github", "portfolio"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    ContactInfo,
    Summary,
    Experience,
    Education,
    Skills,
    Formatting,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::ContactInfo,
        ScoreCategory::Summary,
        ScoreCategory::Experience,
        ScoreCategory::Education,
        ScoreCategory::Skills,
        ScoreCategory::Formatting,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ScoreCategory::ContactInfo => "contact_info",
            ScoreCategory::Summary => "summary",
            ScoreCategory::Experience => "experience",
            ScoreCategory::Education => "education",
            ScoreCategory::Skills => "skills",
            ScoreCategory::Formatting => "formatting",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::ContactInfo => "Contact Info",
            ScoreCategory::Summary => "Summary",
            ScoreCategory::Experience => "Experience",
            ScoreCategory::Education => "Education",
            ScoreCategory::Skills => "Skills",
            ScoreCategory::Formatting => "Formatting",
        }
    }

    pub fn max_points(self) -> u32 {
        match self {
            ScoreCategory::ContactInfo => 15,
            ScoreCategory::Summary => 15,
            ScoreCategory::Experience => 30,
            ScoreCategory::Education => 20,
            ScoreCategory::Skills => 15,
            ScoreCategory::Formatting => 5,
        }
    }
}

/// Points per category. Each value stays within `0..=category.max_points()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub contact_info: u32,
    pub summary: u32,
    pub experience: u32,
    pub education: u32,
    pub skills: u32,
    pub formatting: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, category: ScoreCategory) -> u32 {
        match category {
            ScoreCategory::ContactInfo => self.contact_info,
            ScoreCategory::Summary => self.summary,
            ScoreCategory::Experience => self.experience,
            ScoreCategory::Education => self.education,
            ScoreCategory::Skills => self.skills,
            ScoreCategory::Formatting => self.formatting,
        }
    }

    /// Sets a category, clamping to its ceiling.
    pub fn set(&mut self, category: ScoreCategory, points: u32) {
        let points = points.min(category.max_points());
        match category {
            ScoreCategory::ContactInfo => self.contact_info = points,
            ScoreCategory::Summary => self.summary = points,
            ScoreCategory::Experience => self.experience = points,
            ScoreCategory::Education => self.education = points,
            ScoreCategory::Skills => self.skills = points,
            ScoreCategory::Formatting => self.formatting = points,
        }
    }

    pub fn total(&self) -> AtsScore {
        ScoreCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// One row of a breakdown, shaped for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub label: String,
    pub points: u32,
    pub max_points: u32,
}

pub fn category_scores(breakdown: &ScoreBreakdown) -> Vec<CategoryScore> {
    ScoreCategory::ALL
        .iter()
        .map(|c| CategoryScore {
            category: *c,
            label: c.label().to_string(),
            points: breakdown.get(*c),
            max_points: c.max_points(),
        })
        .collect()
}

/// Coarse rating of an ATS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: AtsScore) -> Self {
        match score {
            s if s >= 80 => ScoreBand::Excellent,
            s if s >= 60 => ScoreBand::Good,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid regex")
    })
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| {
        Regex::new(r"\b\d{10}\b|\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("valid regex")
    })
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Scores a section map. Pure: the same map always yields the same result.
pub fn score(sections: &SectionMap) -> (AtsScore, ScoreBreakdown) {
    let mut breakdown = ScoreBreakdown::default();

    breakdown.set(ScoreCategory::ContactInfo, score_contact(&sections.contact_info));

    if char_len(&sections.summary) > 50 {
        breakdown.set(ScoreCategory::Summary, 15);
    }

    if !sections.experience.is_empty() {
        let points = match char_len(&sections.experience) {
            n if n > 200 => 30,
            n if n > 100 => 20,
            _ => 10,
        };
        breakdown.set(ScoreCategory::Experience, points);
    }

    if char_len(&sections.education) > 30 {
        breakdown.set(ScoreCategory::Education, 20);
    }

    if !sections.skills.is_empty() {
        let points = match skill_count(&sections.skills) {
            n if n > 10 => 15,
            n if n > 5 => 10,
            _ => 5,
        };
        breakdown.set(ScoreCategory::Skills, points);
    }

    let full_len = char_len(&sections.full_text);
    if full_len > 500 && full_len < 5000 {
        breakdown.set(ScoreCategory::Formatting, 5);
    }

    (breakdown.total(), breakdown)
}

fn score_contact(contact: &str) -> u32 {
    if contact.is_empty() {
        return 0;
    }
    let mut points = 0;
    if email_pattern().is_match(contact) {
        points += 5;
    }
    if phone_pattern().is_match(contact) {
        points += 5;
    }
    let lower = contact.to_lowercase();
    if CONTACT_LINK_WORDS.iter().any(|w| lower.contains(w)) {
        points += 5;
    }
    points
}

/// Density proxy: comma pieces plus line pieces. An entry that is both comma- and
/// newline-delimited is counted twice.
pub fn skill_count(skills: &str) -> usize {
    skills.split(',').count() + skills.split('\n').count()
}
