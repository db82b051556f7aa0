// Critique prompt templates.
// All prompts for the critique module are defined here.

use crate::analysis::scoring::ScoreCategory;
use crate::analysis::sections::SectionMap;
use crate::critique::RuleBasedScore;

/// Character budget for the experience section inside the prompt.
pub const EXPERIENCE_PROMPT_BUDGET: usize = 1000;

const NOT_FOUND: &str = "Not found";

pub const CRITIQUE_SYSTEM: &str = "\
You are a strict, highly critical ATS (Applicant Tracking System) evaluator and senior recruiter. \
You judge resumes the way a demanding hiring committee would: you reward concrete, quantified \
evidence and penalize vagueness, filler, and missing sections. \
You MUST respond with valid JSON only, with no markdown fences, no explanations outside the JSON object.";

const RESPONSE_SCHEMA: &str = r#"Provide analysis in this JSON format:
{
    "ats_score": <integer 0-100>,
    "score_breakdown": {
        "contact_info": <integer 0-15>,
        "summary": <integer 0-15>,
        "experience": <integer 0-30>,
        "education": <integer 0-20>,
        "skills": <integer 0-15>,
        "formatting": <integer 0-5>
    },
    "strengths": ["list of strengths"],
    "weaknesses": ["list of weaknesses"],
    "missing_sections": ["list of missing or incomplete sections"],
    "recommendations": ["specific actionable recommendations"],
    "keywords_found": ["important keywords present"],
    "keywords_missing": ["important keywords that should be added"],
    "overall_impression": "brief overall assessment"
}

Be specific and actionable in your recommendations."#;

fn or_not_found(text: &str) -> &str {
    if text.is_empty() {
        NOT_FOUND
    } else {
        text
    }
}

fn truncated(text: &str, budget: usize) -> String {
    if text.is_empty() {
        return NOT_FOUND.to_string();
    }
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn reference_block(rule: &RuleBasedScore) -> String {
    let lines = ScoreCategory::ALL
        .iter()
        .map(|c| format!("- {}: {}/{}", c.key(), rule.breakdown.get(*c), c.max_points()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "RULE-BASED REFERENCE SCORE: {}/100\n{lines}\n\n\
         This reference comes from a simple length-and-pattern heuristic. Weigh it, but do NOT \
         defer to it: form your own ats_score and score_breakdown from the content itself.\n\
         Apply strict scoring norms. Most resumes should score below 80; reserve 80+ for \
         resumes with quantified achievements in every role, a targeted summary, and complete \
         sections. Never inflate a score to be encouraging.\n\n",
        rule.ats_score
    )
}

/// Builds the user prompt for one critique call.
pub fn build_critique_prompt(sections: &SectionMap, rule: Option<&RuleBasedScore>) -> String {
    let reference = rule.map(reference_block).unwrap_or_default();
    format!(
        "Analyze this resume and provide detailed, critical feedback in JSON format.\n\n\
         {reference}\
         Resume Sections:\n\
         - Contact Info: {contact}\n\
         - Summary: {summary}\n\
         - Experience: {experience}\n\
         - Education: {education}\n\
         - Skills: {skills}\n\
         - Certifications: {certifications}\n\
         - Projects: {projects}\n\n\
         {RESPONSE_SCHEMA}",
        contact = or_not_found(&sections.contact_info),
        summary = or_not_found(&sections.summary),
        experience = truncated(&sections.experience, EXPERIENCE_PROMPT_BUDGET),
        education = or_not_found(&sections.education),
        skills = or_not_found(&sections.skills),
        certifications = or_not_found(&sections.certifications),
        projects = or_not_found(&sections.projects),
    )
}
