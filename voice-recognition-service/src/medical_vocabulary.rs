/// Palliative-care vocabulary for speech recognition biasing
///
/// Whisper-style services accept a short free-text prompt that shifts
/// recognition toward the words it contains. Hospice visits are dense with
/// drug names, symptom terms and scale names that general models mishear
/// ("hydromorphone" → "hydro more phone"), so every request carries this list.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VocabularyCategory {
    Medications,
    Symptoms,
    ComfortCare,
    AssessmentScales,
    Routes,
}

impl VocabularyCategory {
    pub const ALL: [VocabularyCategory; 5] = [
        VocabularyCategory::Medications,
        VocabularyCategory::Symptoms,
        VocabularyCategory::ComfortCare,
        VocabularyCategory::AssessmentScales,
        VocabularyCategory::Routes,
    ];
}

/// Fixed hospice/palliative vocabulary
pub struct PalliativeVocabulary;

impl PalliativeVocabulary {
    pub fn terms(category: VocabularyCategory) -> &'static [&'static str] {
        match category {
            VocabularyCategory::Medications => &[
                "morphine",
                "hydromorphone",
                "oxycodone",
                "fentanyl patch",
                "methadone",
                "lorazepam",
                "haloperidol",
                "glycopyrrolate",
                "scopolamine",
                "ondansetron",
                "dexamethasone",
                "senna",
            ],
            VocabularyCategory::Symptoms => &[
                "dyspnea",
                "breakthrough pain",
                "terminal restlessness",
                "agitation",
                "delirium",
                "nausea",
                "constipation",
                "anorexia",
                "fatigue",
                "terminal secretions",
                "Cheyne-Stokes respirations",
                "mottling",
                "edema",
            ],
            VocabularyCategory::ComfortCare => &[
                "hospice",
                "palliative care",
                "comfort care",
                "DNR",
                "advance directive",
                "goals of care",
                "bereavement",
                "respite care",
                "spiritual care",
            ],
            VocabularyCategory::AssessmentScales => &[
                "ESAS",
                "Edmonton Symptom Assessment System",
                "Palliative Performance Scale",
                "PPS",
                "PAINAD",
            ],
            VocabularyCategory::Routes => &["PRN", "subcutaneous", "sublingual", "transdermal"],
        }
    }

    pub fn all_terms() -> impl Iterator<Item = &'static str> {
        VocabularyCategory::ALL
            .into_iter()
            .flat_map(|category| Self::terms(category).iter().copied())
    }

    /// Prompt sent with every transcription request
    pub fn prompt_hint() -> String {
        let terms: Vec<&str> = Self::all_terms().collect();
        format!(
            "Hospice and palliative care nursing visit. Vocabulary: {}.",
            terms.join(", ")
        )
    }
}
