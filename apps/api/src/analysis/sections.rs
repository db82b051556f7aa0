//! Section Segmenter: partitions flat resume text into a fixed set of labeled sections.
//!
//! Header detection is line-oriented: a line that mentions a known header synonym
//! moves the cursor to that section and is consumed; every other non-blank line is
//! appended to the section under the cursor.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of leading lines copied into `contact_info` before the header scan.
///
/// These lines are copied verbatim, so a line in this window can also show up in
/// whichever section the scan assigns it to. Short resumes without a "Contact"
/// header depend on this.
pub const CONTACT_SEED_LINES: usize = 5;

/// The closed set of section keys a resume is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    ContactInfo,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Other,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::ContactInfo,
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Certifications,
        Section::Projects,
        Section::Other,
    ];

    /// Header patterns are tested in this order; the first hit wins.
    pub const HEADER_PRIORITY: [Section; 7] = [
        Section::ContactInfo,
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Certifications,
        Section::Projects,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::ContactInfo => "contact_info",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Certifications => "certifications",
            Section::Projects => "projects",
            Section::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::ContactInfo => "Contact Info",
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Certifications => "Certifications",
            Section::Projects => "Projects",
            Section::Other => "Other",
        }
    }

    /// Header synonyms. `Other` has none and is only reachable as the initial cursor.
    fn header_synonyms(self) -> &'static [&'static str] {
        match self {
            Section::ContactInfo => &["contact", "personal information", "personal details"],
            Section::Summary => &[
                "summary",
                "profile",
                "objective",
                "about",
                "professional summary",
            ],
            Section::Experience => &[
                "experience",
                "work experience",
                "employment",
                "work history",
                "professional experience",
            ],
            Section::Education => &["education", "academic", "qualification"],
            Section::Skills => &[
                "skills",
                "technical skills",
                "core competencies",
                "expertise",
            ],
            Section::Certifications => &["certification", "certificates", "licenses"],
            Section::Projects => &["projects", "personal projects", "academic projects"],
            Section::Other => &[],
        }
    }
}

/// Resume text partitioned into the eight fixed sections, plus the unsegmented input.
///
/// Every field is always present; an absent section is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub contact_info: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub certifications: String,
    pub projects: String,
    pub other: String,
    pub full_text: String,
}

impl SectionMap {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::ContactInfo => &self.contact_info,
            Section::Summary => &self.summary,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Skills => &self.skills,
            Section::Certifications => &self.certifications,
            Section::Projects => &self.projects,
            Section::Other => &self.other,
        }
    }

    fn slot_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::ContactInfo => &mut self.contact_info,
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Skills => &mut self.skills,
            Section::Certifications => &mut self.certifications,
            Section::Projects => &mut self.projects,
            Section::Other => &mut self.other,
        }
    }

    /// Sections with content, in canonical order.
    pub fn populated(&self) -> impl Iterator<Item = (Section, &str)> + '_ {
        Section::ALL
            .into_iter()
            .map(move |s| (s, self.get(s)))
            .filter(|(_, content)| !content.is_empty())
    }
}

fn header_patterns() -> &'static [(Section, Regex)] {
    static PATTERNS: OnceLock<Vec<(Section, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        Section::HEADER_PRIORITY
            .into_iter()
            .map(|section| {
                let alternatives = section
                    .header_synonyms()
                    .iter()
                    .map(|s| regex::escape(s))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"(?i)\b(?:{alternatives})s?\b");
                (section, Regex::new(&pattern).expect("valid header regex"))
            })
            .collect()
    })
}

/// Returns the section a line announces, if it reads as a header.
pub fn detect_header(line: &str) -> Option<Section> {
    let normalized = line.trim().to_lowercase();
    header_patterns()
        .iter()
        .find(|(_, re)| re.is_match(&normalized))
        .map(|(section, _)| *section)
}

/// Splits resume text into a `SectionMap`. Total over any input, including "".
pub fn segment(text: &str) -> SectionMap {
    let lines: Vec<&str> = text.split('\n').collect();

    // Indexed by `Section as usize`, which follows `Section::ALL`.
    let mut buffers: [Vec<&str>; 8] = Default::default();
    buffers[Section::ContactInfo as usize].extend(lines.iter().take(CONTACT_SEED_LINES));

    let mut current = Section::Other;
    for &line in &lines {
        if let Some(section) = detect_header(line) {
            current = section;
            continue;
        }
        if !line.trim().is_empty() {
            buffers[current as usize].push(line);
        }
    }

    let mut map = SectionMap {
        full_text: text.to_string(),
        ..SectionMap::default()
    };
    for section in Section::ALL {
        *map.slot_mut(section) = buffers[section as usize].join("\n").trim().to_string();
    }
    map
}
