use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::{Duration, timeout};
use url::Url;

use super::{
    dependencies::{ImageSearch, PredictionService, SpeechSynth, SubmitDependencies},
    manager::SubmissionManager,
    pipeline::perform_submission,
    types::{SubmitError, SubmitOutcome, SubmitRequest, SubmitStatus},
};
use crate::draw::{PenSettings, WHITE};
use crate::input::StrokeRenderer;
use crate::util::Point;

#[derive(Clone)]
struct MockPredictor {
    labels: Vec<String>,
    should_fail: bool,
    payloads: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PredictionService for MockPredictor {
    async fn predict(&self, data_url: &str) -> Result<Vec<String>, SubmitError> {
        self.payloads.lock().unwrap().push(data_url.to_string());
        if self.should_fail {
            Err(SubmitError::InvalidResponse("service unavailable".to_string()))
        } else {
            Ok(self.labels.clone())
        }
    }
}

#[derive(Clone)]
struct MockSearch {
    /// Queries that fail outright
    failing: Vec<String>,
    /// Queries with no results
    empty: Vec<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ImageSearch for MockSearch {
    async fn find_image(&self, query: &str) -> Result<Option<String>, SubmitError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing.iter().any(|q| q == query) {
            Err(SubmitError::InvalidResponse("rate limited".to_string()))
        } else if self.empty.iter().any(|q| q == query) {
            Ok(None)
        } else {
            Ok(Some(format!("https://img.test/{}", query.replace(' ', "-"))))
        }
    }
}

#[derive(Clone)]
struct MockSpeech {
    should_fail: bool,
    fetches: Arc<Mutex<usize>>,
}

#[async_trait]
impl SpeechSynth for MockSpeech {
    fn speech_url(&self, words: &str) -> Result<Url, SubmitError> {
        let mut url = Url::parse("https://tts.test/speak")?;
        url.query_pairs_mut().append_pair("q", words);
        Ok(url)
    }

    async fn fetch_speech(&self, _url: &Url) -> Result<Vec<u8>, SubmitError> {
        *self.fetches.lock().unwrap() += 1;
        if self.should_fail {
            Err(SubmitError::InvalidResponse("no audio".to_string()))
        } else {
            Ok(b"ID3-fake-mp3".to_vec())
        }
    }
}

fn predictor(labels: &[&str]) -> MockPredictor {
    MockPredictor {
        labels: labels.iter().map(|s| s.to_string()).collect(),
        should_fail: false,
        payloads: Arc::new(Mutex::new(Vec::new())),
    }
}

fn search() -> MockSearch {
    MockSearch {
        failing: Vec::new(),
        empty: Vec::new(),
        queries: Arc::new(Mutex::new(Vec::new())),
    }
}

fn speech() -> MockSpeech {
    MockSpeech {
        should_fail: false,
        fetches: Arc::new(Mutex::new(0)),
    }
}

fn deps(
    predictor: MockPredictor,
    search: Option<MockSearch>,
    speech: MockSpeech,
) -> SubmitDependencies {
    SubmitDependencies {
        predictor: Arc::new(predictor),
        image_search: search.map(|s| Arc::new(s) as Arc<dyn ImageSearch>),
        speech: Arc::new(speech),
    }
}

fn request() -> SubmitRequest {
    SubmitRequest {
        data_url: "data:image/png;base64,AAAA".to_string(),
        speech_dir: None,
    }
}

#[tokio::test]
async fn submission_returns_cards_in_label_order() {
    let search = search();
    let queries = search.queries.clone();
    let deps = deps(
        predictor(&["cat", "hot_air_balloon", "dog"]),
        Some(search),
        speech(),
    );

    let result = perform_submission(request(), Arc::new(deps)).await.unwrap();
    assert_eq!(result.labels, vec!["cat", "hot_air_balloon", "dog"]);
    let words: Vec<_> = result.cards.iter().map(|c| c.words.as_str()).collect();
    assert_eq!(words, vec!["cat", "hot air balloon", "dog"]);
    assert_eq!(
        result.cards[1].image_url.as_deref(),
        Some("https://img.test/hot-air-balloon")
    );
    assert_eq!(
        result.cards[1].speech_url.as_str(),
        "https://tts.test/speak?q=hot+air+balloon"
    );
    assert!(result.cards.iter().all(|c| c.speech_file.is_none()));

    let mut seen = queries.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["cat", "dog", "hot air balloon"]);
}

#[tokio::test]
async fn failed_or_empty_search_drops_only_that_card() {
    let mut search = search();
    search.failing = vec!["dog".to_string()];
    search.empty = vec!["axe".to_string()];
    let deps = deps(predictor(&["cat", "dog", "axe", "sun"]), Some(search), speech());

    let result = perform_submission(request(), Arc::new(deps)).await.unwrap();
    assert_eq!(result.labels.len(), 4);
    let labels: Vec<_> = result.cards.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["cat", "sun"]);
}

#[tokio::test]
async fn disabled_search_keeps_cards_without_pictures() {
    let deps = deps(predictor(&["tree"]), None, speech());
    let result = perform_submission(request(), Arc::new(deps)).await.unwrap();
    assert_eq!(result.cards.len(), 1);
    assert!(result.cards[0].image_url.is_none());
}

#[tokio::test]
async fn prediction_failure_fails_submission() {
    let mut predictor = predictor(&[]);
    predictor.should_fail = true;
    let search = search();
    let queries = search.queries.clone();
    let deps = deps(predictor, Some(search), speech());

    let err = perform_submission(request(), Arc::new(deps)).await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidResponse(_)));
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn speech_clips_are_saved_when_requested() {
    let temp = tempfile::tempdir().unwrap();
    let speech = speech();
    let fetches = speech.fetches.clone();
    let deps = deps(predictor(&["ice_cream", "moon"]), None, speech);

    let result = perform_submission(request().with_speech_dir(temp.path()), Arc::new(deps))
        .await
        .unwrap();
    assert_eq!(*fetches.lock().unwrap(), 2);
    let clip = result.cards[0].speech_file.clone().unwrap();
    assert_eq!(clip, temp.path().join("01_ice_cream.mp3"));
    assert_eq!(std::fs::read(clip).unwrap(), b"ID3-fake-mp3");
}

#[tokio::test]
async fn labels_with_colliding_names_get_separate_clips() {
    let temp = tempfile::tempdir().unwrap();
    let deps = deps(predictor(&["ice cream", "ice_cream", " "]), None, speech());

    let result = perform_submission(request().with_speech_dir(temp.path()), Arc::new(deps))
        .await
        .unwrap();
    let clips: Vec<_> = result
        .cards
        .iter()
        .map(|c| c.speech_file.clone().unwrap())
        .collect();
    assert_eq!(
        clips,
        vec![
            temp.path().join("01_ice_cream.mp3"),
            temp.path().join("02_ice_cream.mp3"),
            temp.path().join("03.mp3"),
        ]
    );
    assert!(clips.iter().all(|clip| clip.exists()));
}

#[tokio::test]
async fn speech_failure_keeps_card() {
    let temp = tempfile::tempdir().unwrap();
    let mut speech = speech();
    speech.should_fail = true;
    let deps = deps(predictor(&["moon"]), None, speech);

    let result = perform_submission(request().with_speech_dir(temp.path()), Arc::new(deps))
        .await
        .unwrap();
    assert_eq!(result.cards.len(), 1);
    assert!(result.cards[0].speech_file.is_none());
}

#[tokio::test]
async fn request_from_renderer_posts_surface_png() {
    let mut renderer = StrokeRenderer::new(64, 64, WHITE, PenSettings::default()).unwrap();
    renderer.begin_stroke(Point::new(10.0, 10.0));
    renderer.extend_stroke(Point::new(50.0, 50.0));
    renderer.end_stroke();

    let predictor = predictor(&["line"]);
    let payloads = predictor.payloads.clone();
    let request = SubmitRequest::from_renderer(&renderer).unwrap();
    perform_submission(request, Arc::new(deps(predictor, None, speech())))
        .await
        .unwrap();

    let payloads = payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0], renderer.export_data_url().unwrap());
}

#[tokio::test]
async fn manager_starts_idle() {
    let (manager, _outcomes) = SubmissionManager::new(
        &tokio::runtime::Handle::current(),
        deps(predictor(&[]), None, speech()),
    );
    assert_eq!(manager.get_status().await, SubmitStatus::Idle);
    assert!(manager.last_outcome().await.is_none());
}

#[tokio::test]
async fn status_is_in_flight_as_soon_as_submit_returns() {
    let (manager, mut outcomes) = SubmissionManager::new(
        &tokio::runtime::Handle::current(),
        deps(predictor(&["cat"]), None, speech()),
    );

    manager.submit(request()).unwrap();
    assert_eq!(manager.get_status().await, SubmitStatus::InFlight(1));
    timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manager.get_status().await, SubmitStatus::Done);

    // A follow-up request must not read as the previous `Done`.
    manager.submit(request()).unwrap();
    assert_eq!(manager.get_status().await, SubmitStatus::InFlight(1));
    timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manager.get_status().await, SubmitStatus::Done);
}

#[test]
fn rejected_submit_does_not_count_as_in_flight() {
    let manager = SubmissionManager::with_closed_channel_for_test();
    assert!(manager.submit(request()).is_err());
    let status = futures::executor::block_on(manager.get_status());
    assert_eq!(status, SubmitStatus::Idle);
}

#[tokio::test]
async fn manager_reports_success_over_channel() {
    let (manager, mut outcomes) = SubmissionManager::new(
        &tokio::runtime::Handle::current(),
        deps(predictor(&["cat"]), Some(search()), speech()),
    );

    let id = manager.submit(request()).unwrap();
    let submission = timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .expect("outcome in time")
        .expect("channel open");
    assert_eq!(submission.id, id);
    match submission.outcome {
        SubmitOutcome::Success(result) => assert_eq!(result.cards.len(), 1),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(manager.get_status().await, SubmitStatus::Done);
    assert_eq!(manager.last_outcome().await.map(|s| s.id), Some(id));
}

#[tokio::test]
async fn manager_reports_failure_over_channel() {
    let mut predictor = predictor(&[]);
    predictor.should_fail = true;
    let (manager, mut outcomes) = SubmissionManager::new(
        &tokio::runtime::Handle::current(),
        deps(predictor, None, speech()),
    );

    manager.submit(request()).unwrap();
    let submission = timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    match submission.outcome {
        SubmitOutcome::Failed(message) => assert!(message.contains("service unavailable")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(manager.try_take_outcome().is_some());
    assert!(manager.try_take_outcome().is_none());
}

#[tokio::test]
async fn double_submit_delivers_both_with_distinct_ids() {
    let (manager, mut outcomes) = SubmissionManager::new(
        &tokio::runtime::Handle::current(),
        deps(predictor(&["cat"]), None, speech()),
    );

    let first = manager.submit(request()).unwrap();
    let second = manager.submit(request()).unwrap();
    assert_ne!(first, second);

    let mut ids = Vec::new();
    for _ in 0..2 {
        let submission = timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        ids.push(submission.id);
    }
    ids.sort();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(manager.get_status().await, SubmitStatus::Done);
}

#[test]
fn submit_fails_when_manager_stopped() {
    let manager = SubmissionManager::with_closed_channel_for_test();
    assert!(matches!(
        manager.submit(request()),
        Err(SubmitError::ManagerStopped)
    ));
}
