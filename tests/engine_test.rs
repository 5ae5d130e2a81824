//! Tests for the round lifecycle engine.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use word_tree::game::timer;
use word_tree::{
    EngineDelays, GameEngine, GameError, GameStore, GuessOutcome, InMemoryChannel, Language,
    LetterStatus, RelayMessage, SyncChannel, TimeoutOutcome,
};

/// Engine over a fresh in-memory store with transition delays shrunk so the
/// tests can observe scheduled resets without waiting out real display times.
fn test_engine() -> (GameEngine, Arc<InMemoryChannel>) {
    let store = GameStore::open_in_memory().expect("Failed to open store");
    let sync = Arc::new(InMemoryChannel::default());
    let delays = EngineDelays {
        reset_after_win: Duration::from_millis(60),
        reset_after_fail: Duration::from_millis(60),
        timer_restart: Duration::from_millis(20),
    };
    let engine = GameEngine::with_delays(store, sync.clone(), delays);
    (engine, sync)
}

/// One-group game with a word already assigned. Returns session, group, and
/// word ids.
async fn game_with_word(engine: &GameEngine, word_text: &str) -> (String, String, String) {
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let session_id = snapshot.session().id().clone();
    let group_id = snapshot.groups()[0].id().clone();
    let word = engine
        .store()
        .add_word(word_text, Language::Tm)
        .expect("Add failed")
        .expect("Should insert");
    assert!(
        engine
            .assign_word(&session_id, word.id())
            .await
            .expect("Assign failed")
    );
    (session_id, group_id, word.id().clone())
}

/// Starts the timer and fires a guarded timeout for the given word.
async fn force_timeout(engine: &GameEngine, session_id: &str, word_id: &str) -> TimeoutOutcome {
    assert!(engine.start_timer(session_id).await.expect("Start failed"));
    engine
        .handle_timeout(session_id, word_id)
        .await
        .expect("Timeout failed")
}

#[tokio::test]
async fn test_create_game_notifies_subscribers() {
    let (engine, sync) = test_engine();
    let mut rx = sync.subscribe();

    let snapshot = engine
        .create_game(&["Reds".to_string(), "Blues".to_string()])
        .await
        .expect("Create failed");

    let message = rx.recv().await.expect("Should receive a notification");
    match message {
        RelayMessage::FullState {
            session_id,
            game_session,
            groups,
            ..
        } => {
            assert_eq!(&session_id, snapshot.session().id());
            assert_eq!(*game_session.current_round(), 1);
            assert_eq!(groups.len(), 2);
        }
        other => panic!("Expected a full state push, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_game_rejects_blank_names() {
    let (engine, _sync) = test_engine();
    let result = engine.create_game(&["  ".to_string()]).await;
    assert!(matches!(result, Err(GameError::Validation(_))));
}

#[tokio::test]
async fn test_assign_word_enforces_round_length() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let session_id = snapshot.session().id().clone();

    let five = engine
        .store()
        .add_word("STONE", Language::En)
        .expect("Add failed")
        .expect("Should insert");
    // Round 1 plays 4-letter words.
    let result = engine.assign_word(&session_id, five.id()).await;
    assert!(matches!(result, Err(GameError::Validation(_))));

    let four = engine
        .store()
        .add_word("TREE", Language::En)
        .expect("Add failed")
        .expect("Should insert");
    assert!(
        engine
            .assign_word(&session_id, four.id())
            .await
            .expect("Assign failed")
    );
}

#[tokio::test]
async fn test_assign_word_unknown_word_is_skipped() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let assigned = engine
        .assign_word(snapshot.session().id(), "no-such-word")
        .await
        .expect("Assign failed");
    assert!(!assigned);
}

#[tokio::test]
async fn test_guess_validation_leaves_state_untouched() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, _) = game_with_word(&engine, "ABAT").await;

    assert!(matches!(
        engine.submit_guess(&session_id, "   ").await,
        Err(GameError::Validation(_))
    ));
    assert!(matches!(
        engine.submit_guess(&session_id, "ABATLY").await,
        Err(GameError::Validation(_))
    ));

    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*state.attempts_used(), 0);
    assert!(state.guesses().is_empty());
}

#[tokio::test]
async fn test_guess_without_word_is_skipped() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let outcome = engine
        .submit_guess(snapshot.session().id(), "ABAT")
        .await
        .expect("Submit failed");
    assert_eq!(outcome, GuessOutcome::Skipped);
}

#[tokio::test]
async fn test_unknown_session_is_skipped() {
    let (engine, _sync) = test_engine();
    let outcome = engine
        .submit_guess("missing", "ABAT")
        .await
        .expect("Submit failed");
    assert_eq!(outcome, GuessOutcome::Skipped);
    assert!(!engine.start_timer("missing").await.expect("Start failed"));
}

#[tokio::test]
async fn test_wrong_then_correct_guess_scores() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, _) = game_with_word(&engine, "ABAT").await;

    let first = engine
        .submit_guess(&session_id, "BABA")
        .await
        .expect("Submit failed");
    assert_eq!(
        first,
        GuessOutcome::Wrong {
            attempts_used: 1,
            exhausted: false
        }
    );

    // Case-insensitive: the guess is normalized to uppercase.
    let second = engine
        .submit_guess(&session_id, "abat")
        .await
        .expect("Submit failed");
    assert_eq!(
        second,
        GuessOutcome::Correct {
            points: 100,
            attempts_used: 2
        }
    );

    let groups = engine.store().groups(&session_id).expect("Groups failed");
    assert_eq!(*groups[0].score(), 100);

    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(state.guesses().len(), 2);
    let statuses: Vec<LetterStatus> = state.guesses()[0]
        .results()
        .iter()
        .map(|r| *r.status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            LetterStatus::Present,
            LetterStatus::Present,
            LetterStatus::Absent,
            LetterStatus::Present,
        ]
    );
}

#[tokio::test]
async fn test_win_schedules_round_reset() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, _) = game_with_word(&engine, "ABAT").await;

    engine
        .submit_guess(&session_id, "ABAT")
        .await
        .expect("Submit failed");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(state.current_word().is_none());
    assert_eq!(*state.attempts_used(), 0);
    assert!(state.guesses().is_empty());
}

#[tokio::test]
async fn test_guess_exhaustion() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, _) = game_with_word(&engine, "ABAT").await;

    for attempt in 1..=5 {
        let outcome = engine
            .submit_guess(&session_id, "XXXX")
            .await
            .expect("Submit failed");
        assert_eq!(
            outcome,
            GuessOutcome::Wrong {
                attempts_used: attempt,
                exhausted: false
            }
        );
    }
    let last = engine
        .submit_guess(&session_id, "XXXX")
        .await
        .expect("Submit failed");
    assert_eq!(
        last,
        GuessOutcome::Wrong {
            attempts_used: 6,
            exhausted: true
        }
    );

    // A guess landing in the fail display window is dropped, not recorded.
    let extra = engine
        .submit_guess(&session_id, "XXXX")
        .await
        .expect("Submit failed");
    assert_eq!(extra, GuessOutcome::Skipped);
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*state.attempts_used(), 6);

    // The failed round resets after the display delay.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(state.current_word().is_none());
    assert_eq!(*state.attempts_used(), 0);
}

#[tokio::test]
async fn test_timeout_records_synthetic_attempt_and_restarts_timer() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, word_id) = game_with_word(&engine, "ABAT").await;

    let outcome = force_timeout(&engine, &session_id, &word_id).await;
    assert_eq!(
        outcome,
        TimeoutOutcome::Recorded {
            attempts_used: 1,
            exhausted: false
        }
    );

    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*state.attempts_used(), 1);
    assert_eq!(state.guesses().len(), 1);
    assert_eq!(state.guesses()[0].word(), "    ");
    assert!(
        state.guesses()[0]
            .results()
            .iter()
            .all(|r| *r.status() == LetterStatus::Timeout)
    );
    assert!(!*state.timer_active());

    // The timer restarts on its own once the restart delay passes.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(*state.timer_active());
}

#[tokio::test]
async fn test_timeout_guard_drops_stale_timeouts() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, word_id) = game_with_word(&engine, "ABAT").await;

    // Timer not running: the word did not actually expire.
    let outcome = engine
        .handle_timeout(&session_id, &word_id)
        .await
        .expect("Timeout failed");
    assert_eq!(outcome, TimeoutOutcome::Skipped);

    // Wrong word: the round moved on before the timeout landed.
    assert!(engine.start_timer(&session_id).await.expect("Start failed"));
    let outcome = engine
        .handle_timeout(&session_id, "some-older-word")
        .await
        .expect("Timeout failed");
    assert_eq!(outcome, TimeoutOutcome::Skipped);

    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*state.attempts_used(), 0);
    assert!(state.guesses().is_empty());
}

#[tokio::test]
async fn test_timeout_exhaustion_clears_word_immediately() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, word_id) = game_with_word(&engine, "ABAT").await;

    for attempt in 1..=5 {
        let outcome = force_timeout(&engine, &session_id, &word_id).await;
        assert_eq!(
            outcome,
            TimeoutOutcome::Recorded {
                attempts_used: attempt,
                exhausted: false
            }
        );
    }
    let last = force_timeout(&engine, &session_id, &word_id).await;
    assert_eq!(
        last,
        TimeoutOutcome::Recorded {
            attempts_used: 6,
            exhausted: true
        }
    );

    // No display delay on the timeout path: the word is gone at once, while
    // the attempt count stays until the round is reset.
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(state.current_word().is_none());
    assert_eq!(*state.attempts_used(), 6);
}

#[tokio::test]
async fn test_timeout_without_word_is_skipped() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let outcome = engine
        .handle_timeout(snapshot.session().id(), "any-word")
        .await
        .expect("Timeout failed");
    assert_eq!(outcome, TimeoutOutcome::Skipped);
}

#[tokio::test]
async fn test_timer_requires_assigned_word() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    assert!(
        !engine
            .start_timer(snapshot.session().id())
            .await
            .expect("Start failed")
    );
}

#[tokio::test]
async fn test_pause_resume_preserves_remaining_time() {
    let (engine, _sync) = test_engine();
    let (session_id, group_id, _) = game_with_word(&engine, "ABAT").await;

    assert!(engine.start_timer(&session_id).await.expect("Start failed"));
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(*state.timer_active());
    assert!(state.timer_started_at().is_some());

    assert!(engine.pause_timer(&session_id).await.expect("Pause failed"));
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(!*state.timer_active());
    assert!(
        state.timer_started_at().is_some(),
        "Pause keeps the reference point"
    );

    // A second pause is a no-op.
    assert!(!engine.pause_timer(&session_id).await.expect("Pause failed"));

    assert!(engine.resume_timer(&session_id).await.expect("Resume failed"));
    let state = engine
        .store()
        .round_state(&session_id, &group_id)
        .expect("Read failed")
        .expect("Should exist");
    assert!(*state.timer_active());
    let remaining = timer::remaining_secs(*state.timer_started_at(), Utc::now().naive_utc());
    assert!(
        (29..=30).contains(&remaining),
        "Expected nearly the full duration, got {remaining}s"
    );
}

#[tokio::test]
async fn test_advance_round_caps_at_three() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Solo".to_string()])
        .await
        .expect("Create failed");
    let session_id = snapshot.session().id().clone();

    assert_eq!(
        engine
            .advance_round(&session_id)
            .await
            .expect("Advance failed"),
        Some(2)
    );
    assert_eq!(
        engine
            .advance_round(&session_id)
            .await
            .expect("Advance failed"),
        Some(3)
    );
    assert_eq!(
        engine
            .advance_round(&session_id)
            .await
            .expect("Advance failed"),
        None
    );
    let session = engine
        .store()
        .session(&session_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*session.current_round(), 3);
}

#[tokio::test]
async fn test_change_group_validates_membership() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Reds".to_string(), "Blues".to_string()])
        .await
        .expect("Create failed");
    let session_id = snapshot.session().id().clone();
    let second = snapshot.groups()[1].id().clone();

    assert!(
        !engine
            .change_group(&session_id, "not-a-group")
            .await
            .expect("Change failed")
    );
    assert!(
        engine
            .change_group(&session_id, &second)
            .await
            .expect("Change failed")
    );
    let session = engine
        .store()
        .session(&session_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(session.current_group_id().as_deref(), Some(second.as_str()));
}

#[tokio::test]
async fn test_restart_game_zeroes_scores_and_round() {
    let (engine, _sync) = test_engine();
    let snapshot = engine
        .create_game(&["Reds".to_string(), "Blues".to_string()])
        .await
        .expect("Create failed");
    let session_id = snapshot.session().id().clone();
    let group_id = snapshot.groups()[0].id().clone();

    engine
        .store()
        .add_score(&group_id, 200)
        .expect("Score failed");
    engine
        .advance_round(&session_id)
        .await
        .expect("Advance failed");

    assert!(
        engine
            .restart_game(&session_id)
            .await
            .expect("Restart failed")
    );

    let session = engine
        .store()
        .session(&session_id)
        .expect("Read failed")
        .expect("Should exist");
    assert_eq!(*session.current_round(), 1);
    let groups = engine.store().groups(&session_id).expect("Groups failed");
    assert!(groups.iter().all(|g| *g.score() == 0));
}

#[tokio::test]
async fn test_round_with_wrong_guess_timeout_then_win() {
    let (engine, _sync) = test_engine();
    let (session_id, _group_id, word_id) = game_with_word(&engine, "ABAT").await;

    engine
        .submit_guess(&session_id, "BABA")
        .await
        .expect("Submit failed");
    let timed_out = force_timeout(&engine, &session_id, &word_id).await;
    assert_eq!(
        timed_out,
        TimeoutOutcome::Recorded {
            attempts_used: 2,
            exhausted: false
        }
    );

    let outcome = engine
        .submit_guess(&session_id, "ABAT")
        .await
        .expect("Submit failed");
    // Two attempts burned (one guess, one timeout): 120 - 2 * 20.
    assert_eq!(
        outcome,
        GuessOutcome::Correct {
            points: 80,
            attempts_used: 3
        }
    );

    let groups = engine.store().groups(&session_id).expect("Groups failed");
    assert_eq!(*groups[0].score(), 80);
}
