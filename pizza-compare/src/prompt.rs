//! Prompt rendering for pizza comparisons.
//!
//! The prompt is a fixed template describing the comparison task, with a
//! numbered criteria section spliced in. Rendering is a pure function of its
//! inputs: criterion text is inserted verbatim.
//!
//! ```text
//! 1. Crust
//!    - visible
//!    - golden
//! ```

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;

/// Prompt template variant.
///
/// Both variants ask for an analysis of the reference image, an analysis of
/// the comparison image against it, a Valid/Not Valid verdict, and a word
/// budget. They differ in budget, structure, and recommended sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Short element-presence analysis, at most 250 words.
    #[default]
    Concise,
    /// Per-criterion breakdown before the verdict, at most 300 words.
    Detailed,
}

impl PromptTemplate {
    /// Name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
        }
    }

    /// Maximum number of words the model is asked to produce.
    #[must_use]
    pub const fn word_limit(&self) -> u32 {
        match self {
            Self::Concise => 250,
            Self::Detailed => 300,
        }
    }

    /// Recommended `max_tokens` for requests using this template.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        match self {
            Self::Concise => 400,
            Self::Detailed => 450,
        }
    }

    /// Recommended sampling temperature for requests using this template.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        match self {
            Self::Concise => 0.7,
            Self::Detailed => 0.3,
        }
    }

    /// Render the full prompt for two images and a checklist.
    #[must_use]
    pub fn render(&self, image1_name: &str, image2_name: &str, criteria: &Criteria) -> String {
        let section = render_criteria_section(criteria);
        let words = self.word_limit();

        match self {
            Self::Concise => format!(
                "You are a pizza expert analyzing two pizza images ({image1_name} and {image2_name}). \
                 Provide a concise analysis (maximum {words} words) based on the following criteria:\n\
                 \n\
                 Essential Elements to Compare:\n\
                 {section}\n\
                 \n\
                 Required Output Format:\n\
                 [ANALYSIS]\n\
                 Reference Image: List visible elements and their characteristics\n\
                 Comparison Image: Note presence/absence of elements compared to reference\n\
                 Conclusion: State if image meets criteria (Valid/Not Valid Pizza)\n\
                 \n\
                 Important: Focus only on provided criteria. Be objective and concise.\n"
            ),
            Self::Detailed => format!(
                "You are a pizza quality inspector. The first image ({image1_name}) is the reference \
                 pizza; the second image ({image2_name}) must be checked against it. \
                 Keep the whole answer under {words} words.\n\
                 \n\
                 Criteria:\n\
                 {section}\n\
                 \n\
                 Required Output Format:\n\
                 [ANALYSIS]\n\
                 Reference Image: Describe how each criterion appears in the reference\n\
                 Comparison Image: For each numbered criterion, state Match, Partial or Missing with a short reason\n\
                 [VERDICT]\n\
                 Conclusion: Valid Pizza or Not Valid Pizza, followed by one sentence of justification\n\
                 \n\
                 Important: Judge only the listed criteria and ignore background, plating and lighting.\n"
            ),
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(Self::Concise),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!(
                "unknown template '{other}', expected one of: concise, detailed"
            )),
        }
    }
}

/// Render the numbered criteria section.
///
/// One `"{n}. {name}"` line per criterion in insertion order, each followed
/// by a `"   - {description}"` line per description. An empty checklist
/// renders as an empty string.
#[must_use]
pub fn render_criteria_section(criteria: &Criteria) -> String {
    let mut section = String::new();
    for (idx, criterion) in criteria.iter().enumerate() {
        let _ = writeln!(section, "{}. {}", idx + 1, criterion.name);
        for desc in &criterion.descriptions {
            let _ = writeln!(section, "   - {desc}");
        }
    }
    section
}

/// Render the default comparison prompt for two images.
#[must_use]
pub fn build_comparison_prompt(image1_name: &str, image2_name: &str, criteria: &Criteria) -> String {
    PromptTemplate::default().render(image1_name, image2_name, criteria)
}
