//! Offline keyword extraction of a SOAP note
//!
//! Used whenever the generative path is unavailable or its answer is
//! unusable. The transcript is split into sentences on `.`, `!` and `?` when
//! followed by whitespace or the end of the text, so decimals such as
//! "2.5 mg" and titles such as "Dr." stay intact. Each sentence is assigned
//! to the first section (in S, O, A, P order) whose keyword list it mentions,
//! so a sentence never appears twice. Sections with no sentence get a fixed
//! placeholder, which keeps every field non-empty.
// Literal pattern only
#![allow(clippy::expect_used)]

use crate::models::{ClinicalEntities, ClinicalNote, SoapNote};
use lazy_static::lazy_static;
use regex::Regex;

pub const SUMMARY_MAX_CHARS: usize = 200;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence pattern");
}

/// Words whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &["dr", "mr", "mrs", "ms", "st", "vs", "approx", "e.g", "i.e"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

impl Section {
    const ALL: [Section; 4] = [Self::Subjective, Self::Objective, Self::Assessment, Self::Plan];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Subjective => &[
                "patient states",
                "reports",
                "complains",
                "family reports",
                "feels",
                "denies",
                "describes",
            ],
            Self::Objective => &[
                "observed",
                "vital signs",
                "appears",
                "examination",
                "blood pressure",
                "temperature",
                "respirations",
            ],
            Self::Assessment => &["condition", "status", "improvement", "decline", "prognosis"],
            Self::Plan => &["will", "continue", "follow up", "follow-up", "schedule", "refer"],
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Subjective => "No subjective information documented in this visit.",
            Self::Objective => "No objective findings documented in this visit.",
            Self::Assessment => "No assessment documented in this visit.",
            Self::Plan => "No plan documented in this visit.",
        }
    }
}

fn ends_with_abbreviation(text: &str) -> bool {
    text.split_whitespace()
        .last()
        .is_some_and(|word| ABBREVIATIONS.contains(&word.to_lowercase().as_str()))
}

fn sentences(transcript: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(transcript) {
        let body = transcript.get(start..boundary.start()).unwrap_or_default();
        let single_period = boundary.as_str().trim_end() == ".";
        if single_period && boundary.end() < transcript.len() && ends_with_abbreviation(body) {
            continue;
        }
        sentences.push(body.trim());
        start = boundary.end();
    }
    sentences.push(transcript.get(start..).unwrap_or_default().trim());
    sentences.retain(|sentence| !sentence.is_empty());
    sentences
}

fn classify(sentence: &str) -> Option<Section> {
    let lower = sentence.to_lowercase();
    Section::ALL
        .into_iter()
        .find(|section| section.keywords().iter().any(|keyword| lower.contains(keyword)))
}

/// The transcript itself when short, else its first 200 characters and "..."
pub fn summarize(transcript: &str) -> String {
    let transcript = transcript.trim();
    if transcript.chars().count() <= SUMMARY_MAX_CHARS {
        return transcript.to_string();
    }
    let mut summary: String = transcript.chars().take(SUMMARY_MAX_CHARS).collect();
    summary.push_str("...");
    summary
}

/// Build a best-effort note without any network access
pub fn extract(transcript: &str) -> ClinicalNote {
    let classified: Vec<(Section, &str)> = sentences(transcript)
        .into_iter()
        .filter_map(|sentence| classify(sentence).map(|section| (section, sentence)))
        .collect();

    let section_text = |section: Section| {
        let matches: Vec<&str> = classified
            .iter()
            .filter(|(assigned, _)| *assigned == section)
            .map(|(_, sentence)| *sentence)
            .collect();
        if matches.is_empty() {
            section.placeholder().to_string()
        } else {
            matches.join(". ")
        }
    };

    ClinicalNote {
        soap: Some(SoapNote {
            subjective: section_text(Section::Subjective),
            objective: section_text(Section::Objective),
            assessment: section_text(Section::Assessment),
            plan: section_text(Section::Plan),
        }),
        visit_summary: Some(summarize(transcript)),
        recommendations: Vec::new(),
        follow_up_actions: Vec::new(),
        clinical_entities: Some(ClinicalEntities::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn soap(transcript: &str) -> SoapNote {
        extract(transcript).soap.unwrap()
    }

    #[test]
    fn test_reference_transcript() {
        let note = soap(
            "Patient states pain is worsening. Vitals stable, appears comfortable. Plan: continue morphine PRN.",
        );
        assert!(note.subjective.contains("Patient states pain is worsening"));
        assert!(note.objective.contains("Vitals stable, appears comfortable"));
        assert!(note.plan.contains("Plan: continue morphine PRN"));
        assert_eq!(note.assessment, Section::Assessment.placeholder());
    }

    #[test]
    fn test_matches_are_joined_in_order() {
        let note = soap("Patient reports nausea! Family reports poor sleep? Resting quietly.");
        assert_eq!(note.subjective, "Patient reports nausea. Family reports poor sleep");
    }

    #[test]
    fn test_first_matching_section_wins() {
        // "appears" (objective) and "decline" (assessment) in one sentence
        let note = soap("Appears to be in gradual decline.");
        assert_eq!(note.objective, "Appears to be in gradual decline");
        assert_eq!(note.assessment, Section::Assessment.placeholder());
    }

    #[rstest]
    #[case("")]
    #[case("   ...   !!! ")]
    #[case("Quiet visit with music playing")]
    fn test_fields_are_never_empty(#[case] transcript: &str) {
        let note = soap(transcript);
        for (_, text) in note.sections() {
            assert!(!text.trim().is_empty());
        }
    }

    #[rstest]
    #[case::decimal_dose("Will give morphine 2.5 mg SL q2h PRN.", "plan", "Will give morphine 2.5 mg SL q2h PRN")]
    #[case::decimal_vital("Temperature 37.5 degrees. Will continue.", "objective", "Temperature 37.5 degrees")]
    #[case::title("Dr. Patel will follow up Friday.", "plan", "Dr. Patel will follow up Friday")]
    #[case::trailing_abbreviation("Family reports she saw Dr.", "subjective", "Family reports she saw Dr")]
    fn test_sentence_boundaries_keep_inner_periods(
        #[case] transcript: &str,
        #[case] section: &str,
        #[case] expected: &str,
    ) {
        let note = soap(transcript);
        let text = note
            .sections()
            .into_iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(section))
            .map(|(_, text)| text.to_string())
            .unwrap();
        assert_eq!(text, expected);
    }

    #[test]
    fn test_decimal_dose_is_not_split_across_sections() {
        let note = soap("Will give morphine 2.5 mg SL q2h PRN.");
        assert!(note.plan.contains("2.5 mg"));
        assert_eq!(note.objective, Section::Objective.placeholder());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let note = soap("BLOOD PRESSURE 96/60. WILL SCHEDULE chaplain visit.");
        assert_eq!(note.objective, "BLOOD PRESSURE 96/60");
        assert_eq!(note.plan, "WILL SCHEDULE chaplain visit");
    }

    #[test]
    fn test_summary_truncation() {
        let short = "Patient resting comfortably.";
        assert_eq!(summarize(short), short);

        let long = "a".repeat(250);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.ends_with("..."));

        let exact = "é".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(summarize(&exact), exact);
    }

    #[test]
    fn test_secondary_fields_are_empty_containers() {
        let note = extract("Patient states fatigue.");
        assert!(note.recommendations.is_empty());
        assert!(note.follow_up_actions.is_empty());
        assert_eq!(note.clinical_entities, Some(ClinicalEntities::default()));
    }
}
