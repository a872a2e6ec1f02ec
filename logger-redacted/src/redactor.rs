// Literal patterns only
#![allow(clippy::expect_used)]

use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern");
    static ref PHONE_REGEX: Regex =
        Regex::new(r"(?:\+1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b")
            .expect("phone pattern");
    static ref MRN_REGEX: Regex =
        Regex::new(r"(?i)\bMRN[:#\s-]*\d{4,}\b").expect("mrn pattern");
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

/// PII/PHI redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_mrn: bool,
    /// Replace matches with a short stable hash so the same value can be
    /// correlated across log lines without being readable.
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_mrn: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for log messages
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", |_| "***@***".to_string());
        }

        // SSN runs before phone numbers so 3-2-4 digit groups keep their label.
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", |_| "***-**-****".to_string());
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", |_| "(***) ***-****".to_string());
        }

        if self.config.redact_mrn {
            result = self.replace(&MRN_REGEX, &result, "MRN", |_| "MRN******".to_string());
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn replace(
        &self,
        pattern: &Regex,
        text: &str,
        label: &str,
        mask: impl Fn(&str) -> String,
    ) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{label}[{}]", hash_value(matched))
                } else {
                    mask(matched)
                }
            })
            .to_string()
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // First 8 bytes keep the marker short.
    general_purpose::STANDARD_NO_PAD.encode(digest.get(..8).unwrap_or_default())
}

/// Redact with the default configuration
pub fn redact(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

/// Redacted, character-bounded preview of free text (transcripts, notes) for log fields
///
/// The whole text is redacted before it is cut, so an identifier straddling
/// the cut is never partially exposed.
pub fn redact_preview(text: &str, max_chars: usize) -> String {
    let redacted = redact(text);
    let mut preview: String = redacted.chars().take(max_chars).collect();
    if redacted.chars().nth(max_chars).is_some() {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[rstest]
    #[case("Daughter email jane.doe@example.com for updates", "***@***")]
    #[case("Call the family at (555) 123-4567", "(***) ***-****")]
    #[case("SSN on file 123-45-6789", "***-**-****")]
    #[case("Chart MRN 00123456 reviewed", "MRN******")]
    fn test_masks_identifiers(#[case] input: &str, #[case] expected: &str) {
        let redacted = masking_redactor().redact(input);
        assert!(redacted.contains(expected), "{redacted}");
    }

    #[test]
    fn test_hash_is_stable_for_correlation() {
        let redactor = PiiRedactor::new(RedactionConfig::default());
        let first = redactor.redact("reach me at nurse@hospice.org");
        let second = redactor.redact("nurse@hospice.org called back");
        assert!(!first.contains("nurse@hospice.org"));
        let marker = first.split_whitespace().last().unwrap();
        assert!(marker.starts_with("EMAIL["));
        assert!(second.contains(marker));
    }

    #[test]
    fn test_clinical_text_is_untouched() {
        let text = "Patient reports pain 6/10, morphine 5 mg PRN given at 14:30.";
        assert_eq!(masking_redactor().redact(text), text);
    }

    #[test]
    fn test_preview_truncates_by_characters() {
        let preview = redact_preview("Patient states pain is worsening", 7);
        assert_eq!(preview, "Patient…");
        assert_eq!(redact_preview("short", 20), "short");
    }

    #[rstest]
    #[case("Spoke with daughter at (555) 123-4567 about comfort care.", 35, &["123-45", "4567", "555"])]
    #[case("Chart MRN 00123456 reviewed with hospice physician", 14, &["0012", "3456"])]
    fn test_preview_never_leaks_identifier_cut_at_the_boundary(
        #[case] text: &str,
        #[case] max_chars: usize,
        #[case] fragments: &[&str],
    ) {
        let preview = redact_preview(text, max_chars);
        for fragment in fragments {
            assert!(!preview.contains(fragment), "{preview}");
        }
        assert!(preview.ends_with('…'));
    }
}
