// Mechanical completeness check of a note; no clinical judgement
use crate::models::{ClinicalNote, ValidationReport};

/// Trimmed length below which a SOAP field counts as missing
pub const MIN_FIELD_CHARS: usize = 10;

const LABELS: [&str; 4] = ["Subjective", "Objective", "Assessment", "Plan"];

fn suggestion(label: &str) -> &'static str {
    match label {
        "Subjective" => "Add the patient's or family's reported symptoms, concerns and goals.",
        "Objective" => "Add observed findings such as vital signs, appearance and examination results.",
        "Assessment" => "Add the nurse's assessment of the patient's current status and comfort.",
        _ => "Add the plan of care: interventions, medication changes and follow-up.",
    }
}

pub fn validate(note: &ClinicalNote) -> ValidationReport {
    let missing_fields: Vec<String> = match &note.soap {
        None => LABELS.iter().map(|label| label.to_string()).collect(),
        Some(soap) => soap
            .sections()
            .into_iter()
            .filter(|(_, text)| text.trim().chars().count() < MIN_FIELD_CHARS)
            .map(|(label, _)| label.to_string())
            .collect(),
    };

    let suggestions = missing_fields
        .iter()
        .map(|label| suggestion(label).to_string())
        .collect();

    ValidationReport {
        is_valid: missing_fields.is_empty(),
        missing_fields,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoapNote;
    use rstest::rstest;

    fn note(subjective: &str, objective: &str, assessment: &str, plan: &str) -> ClinicalNote {
        ClinicalNote {
            soap: Some(SoapNote {
                subjective: subjective.into(),
                objective: objective.into(),
                assessment: assessment.into(),
                plan: plan.into(),
            }),
            ..ClinicalNote::default()
        }
    }

    #[test]
    fn test_short_plan_is_flagged() {
        let report = validate(&note(
            "Reports pain 6/10 at rest",
            "Respirations 22, mottled feet",
            "Pain poorly controlled",
            "ok",
        ));
        assert_eq!(report.missing_fields, vec!["Plan"]);
        assert_eq!(report.suggestions.len(), 1);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_missing_soap_flags_all_in_order() {
        let report = validate(&ClinicalNote::default());
        assert_eq!(report.missing_fields, LABELS.to_vec());
        assert_eq!(report.suggestions.len(), 4);
    }

    #[rstest]
    #[case("exactly10!", true)]
    #[case("nine char", false)]
    #[case("   padded   ", false)]
    #[case("          ", false)]
    fn test_threshold_uses_trimmed_length(#[case] plan: &str, #[case] valid: bool) {
        let report = validate(&note("long enough text", "long enough text", "long enough text", plan));
        assert_eq!(report.is_valid, valid);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let n = note("short", "long enough text", "tiny", "long enough text");
        assert_eq!(validate(&n), validate(&n));
        assert_eq!(validate(&n).missing_fields, vec!["Subjective", "Assessment"]);
    }
}
