use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::model::{Difficulty, Question, QuestionBank, QuestionId, SavedSession};
use services::{AdvanceOutcome, SessionController, SessionError, StageKind, SubmitOutcome};
use storage::{InMemorySessionStore, SessionStore, StorageError};

fn easy_bank() -> Arc<QuestionBank> {
    let questions = [1, 0, 2]
        .into_iter()
        .enumerate()
        .map(|(i, correct)| {
            Question::new(
                QuestionId::new(i as u64 + 1),
                format!("Question {}", i + 1),
                vec!["a".into(), "b".into(), "c".into()],
                correct,
                Difficulty::Easy,
                None,
            )
            .unwrap()
        })
        .collect();
    Arc::new(QuestionBank::new(questions).unwrap())
}

async fn controller(store: &InMemorySessionStore) -> SessionController {
    SessionController::new(easy_bank(), Arc::new(store.clone())).await
}

fn start_easy(ctrl: &mut SessionController) {
    ctrl.begin_selection().unwrap();
    ctrl.choose_difficulty(Difficulty::Easy).unwrap();
    assert_eq!(ctrl.stage_kind(), StageKind::Playing);
}

fn assert_invariants(ctrl: &SessionController) {
    if let Some(session) = ctrl.session() {
        let correct = session.answers().iter().filter(|a| a.is_correct()).count();
        assert_eq!(session.score(), correct);
        if session.pending().is_none() {
            assert_eq!(session.answers().len(), session.current_index());
        }
    }
}

#[tokio::test]
async fn full_easy_run_finishes_and_clears_slot() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);

    for option in [1, 1] {
        ctrl.submit_answer(option).unwrap();
        assert_invariants(&ctrl);
        assert_eq!(ctrl.advance().await.unwrap(), AdvanceOutcome::Next);
        assert_invariants(&ctrl);
        assert!(store.raw_payload().unwrap().is_some());
    }

    ctrl.submit_answer(2).unwrap();
    assert_eq!(ctrl.advance().await.unwrap(), AdvanceOutcome::Finished);

    assert_eq!(ctrl.stage_kind(), StageKind::Finished);
    let result = ctrl.result().unwrap();
    assert_eq!(result.score(), 2);
    assert_eq!(result.answers().len(), 3);
    assert!(store.load().await.unwrap().is_none());
    assert!(!ctrl.has_saved_session());
}

#[tokio::test]
async fn saved_slot_after_second_question_resumes_exactly() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);

    ctrl.submit_answer(1).unwrap();
    ctrl.advance().await.unwrap();

    let saved = store.load().await.unwrap().expect("saved after advance");
    assert_eq!(saved.current_index(), 1);
    assert_eq!(saved.score(), 1);
    assert_eq!(saved.difficulty(), Difficulty::Easy);
    assert_eq!(saved.answers().len(), 1);

    // Answer question 2 without advancing, then "reload".
    ctrl.submit_answer(0).unwrap();
    drop(ctrl);

    let mut reloaded = controller(&store).await;
    assert!(reloaded.has_saved_session());
    reloaded.resume().await.unwrap();

    let session = reloaded.session().unwrap();
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.score(), 1);
    assert_eq!(session.difficulty(), Difficulty::Easy);
    assert_eq!(session.answers(), saved.answers());
    assert!(session.pending().is_none());
}

#[tokio::test]
async fn repeated_submission_changes_nothing() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);

    assert!(matches!(
        ctrl.submit_answer(0).unwrap(),
        SubmitOutcome::Accepted(p) if !p.is_correct
    ));
    assert_eq!(ctrl.submit_answer(1).unwrap(), SubmitOutcome::Ignored);

    let session = ctrl.session().unwrap();
    assert_eq!(session.score(), 0);
    assert_eq!(session.answers().len(), 1);
}

#[tokio::test]
async fn empty_difficulty_finishes_with_zero_percent() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    ctrl.begin_selection().unwrap();
    ctrl.choose_difficulty(Difficulty::Hard).unwrap();

    assert_eq!(ctrl.stage_kind(), StageKind::Finished);
    let results = ctrl.results().unwrap();
    assert_eq!(results.total, 0);
    assert_eq!(results.score, 0);
    assert!(results.percentage.abs() < f64::EPSILON);
    assert_eq!(ctrl.review_mistakes().unwrap_err(), SessionError::NoMistakes);
}

#[tokio::test]
async fn events_outside_their_stage_are_rejected() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;

    assert_eq!(
        ctrl.submit_answer(0).unwrap_err(),
        SessionError::InvalidTransition {
            stage: StageKind::Start,
            event: "submit_answer"
        }
    );
    assert!(ctrl.advance().await.is_err());
    assert!(ctrl.restart().is_err());
    assert_eq!(ctrl.stage_kind(), StageKind::Start);

    start_easy(&mut ctrl);
    assert_eq!(ctrl.advance().await.unwrap_err(), SessionError::NoPendingAnswer);
    assert!(ctrl.resume().await.is_err());
    assert_eq!(
        ctrl.submit_answer(7).unwrap_err(),
        SessionError::InvalidOption {
            index: 7,
            options: 3
        }
    );
    assert_eq!(ctrl.stage_kind(), StageKind::Playing);
}

#[tokio::test]
async fn difficulty_select_back_returns_to_start() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    ctrl.begin_selection().unwrap();
    ctrl.back().unwrap();
    assert_eq!(ctrl.stage_kind(), StageKind::Start);
    assert!(ctrl.back().is_err());
}

#[tokio::test]
async fn review_and_restart_cycle() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);
    for option in [1, 1, 2] {
        ctrl.submit_answer(option).unwrap();
        ctrl.advance().await.unwrap();
    }

    let results = ctrl.results().unwrap();
    assert_eq!(results.mistakes.len(), 1);
    assert_eq!(results.mistakes[0].question_id, QuestionId::new(2));
    assert_eq!(results.mistakes[0].correct, "a");

    ctrl.review_mistakes().unwrap();
    assert_eq!(ctrl.stage_kind(), StageKind::Review);
    assert!(ctrl.restart().is_err());
    ctrl.back_to_results().unwrap();
    assert_eq!(ctrl.stage_kind(), StageKind::Finished);

    let share = ctrl.share_payload().unwrap();
    assert_eq!((share.score, share.total), (2, 3));

    ctrl.restart().unwrap();
    assert_eq!(ctrl.stage_kind(), StageKind::Start);
    assert!(ctrl.result().is_none());
}

#[tokio::test]
async fn perfect_run_has_nothing_to_review() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);
    for option in [1, 0, 2] {
        ctrl.submit_answer(option).unwrap();
        ctrl.advance().await.unwrap();
    }
    assert_eq!(ctrl.review_mistakes().unwrap_err(), SessionError::NoMistakes);
    assert_eq!(ctrl.stage_kind(), StageKind::Finished);
}

#[tokio::test]
async fn malformed_slot_is_treated_as_absent() {
    let store = InMemorySessionStore::with_raw_payload("{\"currentIndex\":");
    let mut ctrl = controller(&store).await;
    assert!(!ctrl.has_saved_session());
    assert_eq!(ctrl.resume().await.unwrap_err(), SessionError::NoSavedSession);
    assert_eq!(ctrl.stage_kind(), StageKind::Start);
    assert!(store.raw_payload().unwrap().is_none());
}

#[tokio::test]
async fn inconsistent_slot_is_cleared() {
    let store = InMemorySessionStore::with_raw_payload(
        r#"{"currentIndex":1,"score":1,"difficulty":"easy","answers":[]}"#,
    );
    let mut ctrl = controller(&store).await;
    assert!(!ctrl.has_saved_session());
    assert!(store.raw_payload().unwrap().is_none());

    assert_eq!(ctrl.resume().await.unwrap_err(), SessionError::NoSavedSession);
    assert_eq!(ctrl.stage_kind(), StageKind::Start);
}

#[tokio::test]
async fn saved_session_from_other_bank_is_discarded() {
    let store = InMemorySessionStore::new();
    let foreign = Question::new(
        QuestionId::new(99),
        "Elsewhere",
        vec!["x".into(), "y".into()],
        0,
        Difficulty::Easy,
        None,
    )
    .unwrap();
    let answer = quiz_core::model::AnswerRecord::new(foreign, 0).unwrap();
    let saved = SavedSession::new(1, 1, Difficulty::Easy, vec![answer]).unwrap();
    store.save(&saved).await.unwrap();

    let mut ctrl = controller(&store).await;
    assert!(ctrl.has_saved_session());
    assert_eq!(ctrl.resume().await.unwrap_err(), SessionError::NoSavedSession);
    assert!(!ctrl.has_saved_session());
    assert!(store.raw_payload().unwrap().is_none());
}

#[tokio::test]
async fn abandon_clears_saved_session() {
    let store = InMemorySessionStore::new();
    let mut ctrl = controller(&store).await;
    start_easy(&mut ctrl);
    ctrl.submit_answer(1).unwrap();
    ctrl.advance().await.unwrap();
    assert!(ctrl.has_saved_session());

    let mut fresh = controller(&store).await;
    fresh.abandon_saved().await.unwrap();
    assert!(!fresh.has_saved_session());
    assert!(store.load().await.unwrap().is_none());
}

/// Store whose backend is always unreachable.
#[derive(Default)]
struct BrokenStore {
    calls: AtomicUsize,
}

#[async_trait]
impl SessionStore for BrokenStore {
    async fn save(&self, _snapshot: &SavedSession) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Connection("disk unplugged".into()))
    }

    async fn load(&self) -> Result<Option<SavedSession>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Connection("disk unplugged".into()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Connection("disk unplugged".into()))
    }
}

#[tokio::test]
async fn broken_store_falls_back_to_memory_only() {
    let store = Arc::new(BrokenStore::default());
    let mut ctrl = SessionController::new(easy_bank(), store.clone()).await;
    assert!(!ctrl.has_saved_session());

    start_easy(&mut ctrl);
    for option in [1, 1, 2] {
        ctrl.submit_answer(option).unwrap();
        ctrl.advance().await.unwrap();
    }

    assert_eq!(ctrl.stage_kind(), StageKind::Finished);
    assert_eq!(ctrl.result().unwrap().score(), 2);
    // start-up load + two saves + one clear
    assert_eq!(store.calls.load(Ordering::SeqCst), 4);
}
