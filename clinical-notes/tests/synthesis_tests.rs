use async_trait::async_trait;
use clinical_notes::{
    validate, CompletionClient, CompletionError, CompletionPrompt, EntityExtraction, EntityExtractor, NoteSource, NoteSynthesizer,
    PatientContext, VisitPipeline,
};
use rstest::rstest;
use std::sync::{Arc, Mutex};
use voice_recognition_service::{
    AudioPayload, RecognizedSpeech, TranscriptionConfig, TranscriptionError, TranscriptionProvider,
    TranscriptionRequest, TranscriptionResult, TranscriptionService,
};

const TRANSCRIPT: &str =
    "Patient states pain is worsening. Vitals stable, appears comfortable. Plan: continue morphine PRN.";

/// Completion fake answering every call with the same canned outcome
enum Canned {
    Text(&'static str),
    Fail,
}

struct ScriptedClient {
    canned: Canned,
    prompts: Mutex<Vec<CompletionPrompt>>,
}

impl ScriptedClient {
    fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            canned,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &CompletionPrompt, _schema_hint: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        match self.canned {
            Canned::Text(text) => Ok(text.to_string()),
            Canned::Fail => Err(CompletionError::Upstream {
                status: 503,
                message: "overloaded".into(),
            }),
        }
    }
}

const GOOD_NOTE: &str = r#"```json
{
  "soap": {
    "subjective": "Patient reports worsening pain, 7/10.",
    "objective": "Vital signs stable. Appears comfortable at rest.",
    "assessment": "Pain inadequately controlled on current regimen.",
    "plan": "Continue morphine PRN and notify hospice physician."
  },
  "visitSummary": "Routine visit, pain worsening.",
  "recommendations": ["Review breakthrough dosing"],
  "followUpActions": ["Call physician today"],
  "clinicalEntities": {"symptoms": ["pain"], "medications": ["morphine"]}
}
```"#;

#[tokio::test]
async fn test_generated_note_is_used_when_complete() {
    let client = ScriptedClient::new(Canned::Text(GOOD_NOTE));
    let synthesizer = NoteSynthesizer::new(client.clone());

    let context = PatientContext {
        name: "Ada Lovelace".into(),
        primary_condition: "pancreatic cancer".into(),
        ..PatientContext::default()
    };
    let note = synthesizer.synthesize(TRANSCRIPT, Some(&context)).await;

    assert_eq!(note.source, NoteSource::Generated);
    assert!(note.fallback_reason.is_none());
    assert_eq!(note.value.follow_up_actions, vec!["Call physician today"]);
    let entities = note.value.clinical_entities.unwrap();
    assert!(entities.interventions.is_empty());

    let prompts = client.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].user.contains("Ada Lovelace"));
    assert!(prompts[0].user.contains(TRANSCRIPT));
}

#[rstest]
#[case::upstream_failure(Canned::Fail, "overloaded")]
#[case::prose(Canned::Text("Sorry, I can't help with that."), "no JSON object")]
#[case::bad_json(Canned::Text("{\"soap\": [1, 2]}"), "expected shape")]
#[case::no_soap(Canned::Text("{\"visitSummary\": \"x\"}"), "soap is missing")]
#[case::empty_field(
    Canned::Text(r#"{"soap":{"subjective":"Reports pain","objective":"Calm","assessment":"Stable","plan":"  "}}"#),
    "plan is empty"
)]
#[tokio::test]
async fn test_unusable_answers_fall_back(#[case] canned: Canned, #[case] reason: &str) {
    let client = ScriptedClient::new(canned);
    let note = NoteSynthesizer::new(client.clone()).synthesize(TRANSCRIPT, None).await;

    assert_eq!(note.source, NoteSource::Fallback);
    let recorded = note.fallback_reason.clone().unwrap();
    assert!(recorded.contains(reason), "{recorded}");

    let soap = note.value.soap.unwrap();
    assert!(soap.subjective.contains("Patient states pain is worsening"));
    assert!(soap.plan.contains("continue morphine PRN"));

    // one attempt, no retries
    assert_eq!(client.prompts.lock().unwrap().len(), 1);
}

#[rstest]
#[case("")]
#[case("Resting.")]
#[case(TRANSCRIPT)]
#[tokio::test]
async fn test_every_synthesized_note_has_four_non_empty_fields(#[case] transcript: &str) {
    for client in [ScriptedClient::new(Canned::Fail), ScriptedClient::new(Canned::Text(GOOD_NOTE))] {
        let note = NoteSynthesizer::new(client).synthesize(transcript, None).await;
        let soap = note.value.soap.unwrap();
        for (label, text) in soap.sections() {
            assert!(!text.trim().is_empty(), "{label} empty");
        }
    }
}

#[rstest]
#[case::failure(Canned::Fail)]
#[case::non_json(Canned::Text("symptoms: pain"))]
#[tokio::test]
async fn test_entity_extraction_degrades_to_empty(#[case] canned: Canned) {
    let extraction = EntityExtractor::new(ScriptedClient::new(canned)).extract("Morphine given.").await;

    assert_eq!(extraction.source, NoteSource::Fallback);
    assert_eq!(extraction.value, EntityExtraction::default());
}

#[tokio::test]
async fn test_entity_confidence_is_clamped() {
    let client = ScriptedClient::new(Canned::Text(
        r#"{"symptoms":["dyspnea"],"medications":["morphine 5 mg SL"],"vitals":["RR 24"],"interventions":[],"confidence":1.7}"#,
    ));
    let extractor = EntityExtractor::new(client.clone());
    let extraction = extractor.extract("Dyspnea, RR 24, morphine 5 mg SL given.").await;

    assert_eq!(extraction.source, NoteSource::Generated);
    assert_eq!(extraction.value.confidence, 1.0);
    assert_eq!(extraction.value.vitals, vec!["RR 24"]);
    assert!(client.prompts.lock().unwrap()[0].temperature <= 0.1);
}

struct FixedSpeech(Result<&'static str, u16>);

#[async_trait]
impl TranscriptionProvider for FixedSpeech {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn transcribe(&self, _: &AudioPayload, _: &TranscriptionRequest) -> TranscriptionResult<RecognizedSpeech> {
        match self.0 {
            Ok(text) => Ok(RecognizedSpeech {
                text: text.to_string(),
                duration_seconds: Some(42.0),
            }),
            Err(status) => Err(TranscriptionError::Upstream {
                status,
                message: "speech service down".into(),
            }),
        }
    }
}

fn pipeline(speech: FixedSpeech, completion: Arc<ScriptedClient>) -> VisitPipeline {
    VisitPipeline::new(
        TranscriptionService::with_provider(TranscriptionConfig::default(), Arc::new(speech)),
        NoteSynthesizer::new(completion.clone()),
        EntityExtractor::new(completion),
    )
}

#[tokio::test]
async fn test_pipeline_documents_a_visit_with_fallbacks() {
    let pipeline = pipeline(FixedSpeech(Ok(TRANSCRIPT)), ScriptedClient::new(Canned::Fail));

    let doc = pipeline
        .document_visit(&AudioPayload::wav(vec![1, 2, 3]), None)
        .await
        .unwrap();

    assert_eq!(doc.transcript.text, TRANSCRIPT);
    assert_eq!(doc.transcript.duration_seconds, Some(42.0));
    assert!(doc.note.is_fallback());
    assert!(doc.entities.is_fallback());
    assert_eq!(doc.validation, validate(&doc.note.value));
}

#[tokio::test]
async fn test_pipeline_stops_when_transcription_fails() {
    let completion = ScriptedClient::new(Canned::Text(GOOD_NOTE));
    let pipeline = pipeline(FixedSpeech(Err(502)), completion.clone());

    let err = pipeline
        .document_visit(&AudioPayload::wav(vec![1]), None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("speech service down"));
    assert!(completion.prompts.lock().unwrap().is_empty());
}
