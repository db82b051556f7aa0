use crate::analysis::scoring::AtsScore;
use crate::analysis::sections::SectionMap;

pub const CONTACT_SUGGESTION: &str =
    "Add complete contact information including email, phone, and LinkedIn profile";
pub const SUMMARY_SUGGESTION: &str =
    "Add a professional summary (2-3 sentences) highlighting your key strengths";
pub const EXPERIENCE_SUGGESTION: &str =
    "Expand work experience section with detailed achievements and responsibilities";
pub const EDUCATION_SUGGESTION: &str =
    "Add education details including degree, institution, and graduation year";
pub const SKILLS_SUGGESTION: &str =
    "Add a comprehensive skills section with relevant technical and soft skills";
pub const CERTIFICATIONS_SUGGESTION: &str =
    "Consider adding certifications section if you have any relevant certifications";
pub const PROJECTS_SUGGESTION: &str = "Add projects section to showcase practical experience";

/// Appended together whenever the score falls below `GENERAL_TIPS_THRESHOLD`.
pub const GENERAL_TIPS: [&str; 3] = [
    "Use standard section headings like 'Work Experience', 'Education', 'Skills'",
    "Use bullet points to describe achievements",
    "Include action verbs and quantifiable results",
];

pub const GENERAL_TIPS_THRESHOLD: AtsScore = 60;

/// Minimum character counts below which a section earns a suggestion.
const MIN_CONTACT_CHARS: usize = 20;
const MIN_SUMMARY_CHARS: usize = 50;
const MIN_EXPERIENCE_CHARS: usize = 100;
const MIN_EDUCATION_CHARS: usize = 30;
const MIN_SKILLS_CHARS: usize = 30;

fn too_short(text: &str, min_chars: usize) -> bool {
    text.is_empty() || text.chars().count() < min_chars
}

/// Builds the improvement list for a resume. Order is fixed and each check adds at
/// most one entry, except the low-score tips which are added as a group.
pub fn suggest(sections: &SectionMap, ats_score: AtsScore) -> Vec<String> {
    let checks = [
        (too_short(&sections.contact_info, MIN_CONTACT_CHARS), CONTACT_SUGGESTION),
        (too_short(&sections.summary, MIN_SUMMARY_CHARS), SUMMARY_SUGGESTION),
        (too_short(&sections.experience, MIN_EXPERIENCE_CHARS), EXPERIENCE_SUGGESTION),
        (too_short(&sections.education, MIN_EDUCATION_CHARS), EDUCATION_SUGGESTION),
        (too_short(&sections.skills, MIN_SKILLS_CHARS), SKILLS_SUGGESTION),
        (sections.certifications.is_empty(), CERTIFICATIONS_SUGGESTION),
        (sections.projects.is_empty(), PROJECTS_SUGGESTION),
    ];

    let mut suggestions: Vec<String> = checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, text)| text.to_string())
        .collect();

    if ats_score < GENERAL_TIPS_THRESHOLD {
        suggestions.extend(GENERAL_TIPS.iter().map(|t| t.to_string()));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sections::segment;

    fn complete_sections() -> SectionMap {
        SectionMap {
            contact_info: "Jane Roe | jane@example.com | 555-123-4567".to_string(),
            summary: "Backend engineer focused on reliable, observable distributed systems."
                .to_string(),
            experience: "x".repeat(150),
            education: "MSc Computer Science, Example University, 2016".to_string(),
            skills: "Rust, Go, PostgreSQL, Kafka, Kubernetes, Terraform".to_string(),
            certifications: "CKA".to_string(),
            projects: "tiny-db: an LSM storage engine".to_string(),
            ..SectionMap::default()
        }
    }

    #[test]
    fn test_empty_document_gets_every_suggestion() {
        let suggestions = suggest(&segment(""), 0);
        assert_eq!(suggestions.len(), 10);
        assert_eq!(suggestions[0], CONTACT_SUGGESTION);
        assert_eq!(suggestions[6], PROJECTS_SUGGESTION);
        assert_eq!(&suggestions[7..], &GENERAL_TIPS.map(String::from));
    }

    #[test]
    fn test_complete_resume_with_good_score_gets_nothing() {
        assert!(suggest(&complete_sections(), 60).is_empty());
    }

    #[test]
    fn test_low_score_adds_all_three_tips() {
        let suggestions = suggest(&complete_sections(), 59);
        assert_eq!(suggestions, GENERAL_TIPS.map(String::from).to_vec());
    }

    #[test]
    fn test_thresholds_are_strict_less_than() {
        let mut sections = complete_sections();
        sections.summary = "s".repeat(50);
        assert!(suggest(&sections, 100).is_empty());
        sections.summary = "s".repeat(49);
        assert_eq!(suggest(&sections, 100), vec![SUMMARY_SUGGESTION.to_string()]);
    }

    #[test]
    fn test_order_is_fixed() {
        let mut sections = complete_sections();
        sections.projects.clear();
        sections.contact_info.clear();
        sections.skills = "Rust".to_string();
        assert_eq!(
            suggest(&sections, 80),
            vec![
                CONTACT_SUGGESTION.to_string(),
                SKILLS_SUGGESTION.to_string(),
                PROJECTS_SUGGESTION.to_string(),
            ]
        );
    }

    #[test]
    fn test_suggest_is_deterministic() {
        let sections = segment("Jane\nSUMMARY\nshort");
        assert_eq!(suggest(&sections, 20), suggest(&sections, 20));
    }
}
