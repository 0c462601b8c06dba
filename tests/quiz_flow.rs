use std::collections::HashSet;
use std::fs;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use wordquiz::QuizError;
use wordquiz::deck::record::{IdRange, WordRecord};
use wordquiz::deck::source::{Corpus, DataSource, DeckFile};
use wordquiz::engine::answer::AnswerMatch;
use wordquiz::engine::sampler::{QuizMode, SampleRequest};
use wordquiz::session::question::QuizDirection;
use wordquiz::session::quiz::{EngineOptions, QuizEngine, QuizPhase, QuizState};
use wordquiz::session::result::{QuizSummary, to_retest_corpus};

fn animals() -> Vec<WordRecord> {
    vec![
        WordRecord::new(1, "cat", "猫"),
        WordRecord::new(2, "dog", "犬"),
        WordRecord::new(3, "egg", "卵"),
        WordRecord::new(4, "book", "本"),
    ]
}

fn numbered(n: u32) -> Vec<WordRecord> {
    (1..=n)
        .map(|i| WordRecord::new(i, &format!("word{i}"), &format!("語{i}")))
        .collect()
}

fn request(start: u32, end: u32, count: usize, mode: QuizMode) -> SampleRequest {
    SampleRequest {
        range: IdRange::new(start, end),
        count,
        mode,
    }
}

fn engine(seed: u64) -> QuizEngine {
    QuizEngine::seeded(seed, EngineOptions::default())
}

/// Answers every remaining question, correctly when `right(position)` says so.
fn play(engine: &mut QuizEngine, state: &mut QuizState, right: impl Fn(usize) -> bool) {
    while state.phase() == QuizPhase::InProgress {
        let (position, answer) = {
            let session = state.session().unwrap();
            let question = session.current_question().unwrap();
            (session.current_index(), question.correct_answer.clone())
        };
        let given = if right(position) {
            answer
        } else {
            format!("not {answer}")
        };
        engine.submit_answer(state, &given).unwrap();
    }
}

#[test]
fn two_questions_from_four_word_deck() {
    for seed in 0..10 {
        let corpus = animals();
        let mut engine = engine(seed);
        let mut state = QuizState::default();
        engine
            .launch(
                &mut state,
                &corpus,
                &request(1, 4, 2, QuizMode::Normal),
                QuizDirection::TermToMeaning,
            )
            .unwrap();

        let session = state.session().unwrap();
        assert_eq!(session.total(), 2);

        let terms: HashSet<&str> = ["cat", "dog", "egg", "book"].into_iter().collect();
        let meanings: HashSet<&str> = ["猫", "犬", "卵", "本"].into_iter().collect();
        let question = session.current_question().unwrap();
        assert!(terms.contains(question.prompt.as_str()));
        assert_eq!(question.choices.len(), 4);
        assert!(question.choices.iter().all(|c| meanings.contains(c.as_str())));
        assert_eq!(
            question
                .choices
                .iter()
                .filter(|c| **c == question.correct_answer)
                .count(),
            1
        );
    }
}

#[test]
fn oversized_count_is_clamped_to_pool() {
    let corpus = animals();
    let mut engine = engine(3);
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 4, 10, QuizMode::Normal),
            QuizDirection::TermToMeaning,
        )
        .unwrap();
    assert_eq!(state.session().unwrap().total(), 4);
}

#[test]
fn range_outside_deck_leaves_state_untouched() {
    let corpus = animals();
    let mut engine = engine(3);
    let mut state = QuizState::default();
    let err = engine
        .launch(
            &mut state,
            &corpus,
            &request(50, 60, 2, QuizMode::Normal),
            QuizDirection::TermToMeaning,
        )
        .unwrap_err();
    assert!(matches!(err, QuizError::EmptyRange { .. }));
    assert!(err.is_recoverable());
    assert_eq!(state.phase(), QuizPhase::NotStarted);
}

#[test]
fn avoid_asked_exhausts_pool_until_reset() {
    let corpus = numbered(5);
    let mut engine = engine(11);
    let req = request(1, 5, 5, QuizMode::AvoidAsked);

    let mut state = QuizState::default();
    engine
        .launch(&mut state, &corpus, &req, QuizDirection::TermToMeaning)
        .unwrap();
    assert_eq!(state.session().unwrap().total(), 5);
    play(&mut engine, &mut state, |_| true);
    state.reset();

    let err = engine
        .launch(&mut state, &corpus, &req, QuizDirection::TermToMeaning)
        .unwrap_err();
    assert!(matches!(
        err,
        QuizError::EmptyRange {
            mode: QuizMode::AvoidAsked,
            ..
        }
    ));

    engine.history().reset();
    engine
        .launch(&mut state, &corpus, &req, QuizDirection::TermToMeaning)
        .unwrap();
    assert_eq!(state.session().unwrap().total(), 5);
}

#[test]
fn abandoned_avoid_asked_session_still_spends_its_words() {
    let corpus = numbered(6);
    let mut engine = engine(2);
    let req = request(1, 6, 3, QuizMode::AvoidAsked);

    let mut state = QuizState::default();
    engine
        .launch(&mut state, &corpus, &req, QuizDirection::TermToMeaning)
        .unwrap();
    let first: HashSet<u32> = state
        .session()
        .unwrap()
        .records()
        .iter()
        .map(|r| r.id)
        .collect();
    state.reset();

    engine
        .launch(&mut state, &corpus, &req, QuizDirection::TermToMeaning)
        .unwrap();
    let second: HashSet<u32> = state
        .session()
        .unwrap()
        .records()
        .iter()
        .map(|r| r.id)
        .collect();
    assert!(first.is_disjoint(&second));
}

#[test]
fn retest_quizzes_exactly_the_missed_words() {
    let corpus = numbered(10);
    let mut engine = engine(21);
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 10, 6, QuizMode::Normal),
            QuizDirection::TermToMeaning,
        )
        .unwrap();
    play(&mut engine, &mut state, |position| position % 2 == 0);

    let summary = QuizSummary::from_session(state.session().unwrap());
    assert_eq!(summary.correct_count, 3);
    assert_eq!(summary.missed.len(), 3);
    assert_eq!(summary.report().lines().count(), 3);

    let missed_ids: HashSet<u32> = summary.missed.iter().map(|m| m.id).collect();
    let ledger_ids: HashSet<u32> = to_retest_corpus(engine.ledger())
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(missed_ids, ledger_ids);

    state.reset();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 10, 10, QuizMode::RetestMissed),
            QuizDirection::TermToMeaning,
        )
        .unwrap();
    let retest_ids: HashSet<u32> = state
        .session()
        .unwrap()
        .records()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(retest_ids, missed_ids);

    play(&mut engine, &mut state, |_| true);
    assert!(engine.ledger().is_empty());
}

#[test]
fn tally_holds_after_every_answer() {
    let corpus = numbered(8);
    let mut engine = engine(5);
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 8, 8, QuizMode::Normal),
            QuizDirection::MeaningToTerm,
        )
        .unwrap();

    let mut answered = 0;
    while state.phase() == QuizPhase::InProgress {
        let answer = state
            .session()
            .unwrap()
            .current_question()
            .unwrap()
            .correct_answer
            .clone();
        let given = if answered % 3 == 0 { "wrong" } else { answer.as_str() };
        let outcome = engine.submit_answer(&mut state, given).unwrap();
        answered += 1;

        let session = state.session().unwrap();
        assert_eq!(session.current_index(), answered);
        assert_eq!(session.correct_count() + session.missed().len(), answered);
        assert_eq!(outcome.finished, answered == 8);
    }
    assert_eq!(state.phase(), QuizPhase::Finished);
}

#[test]
fn reset_is_idempotent_and_keeps_progress() {
    let corpus = numbered(4);
    let mut engine = engine(8);
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 4, 2, QuizMode::AvoidAsked),
            QuizDirection::TermToMeaning,
        )
        .unwrap();
    engine.submit_answer(&mut state, "wrong").unwrap();

    state.reset();
    state.reset();
    assert_eq!(state.phase(), QuizPhase::NotStarted);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.ledger().len(), 1);
}

#[test]
fn case_insensitive_matching_accepts_folded_answers() {
    let corpus = vec![WordRecord::new(1, "Tokyo", "東京")];
    let options = EngineOptions {
        answer_match: AnswerMatch::CaseInsensitive,
        ..EngineOptions::default()
    };
    let mut engine = QuizEngine::seeded(1, options);
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            &corpus,
            &request(1, 1, 1, QuizMode::Normal),
            QuizDirection::MeaningToTerm,
        )
        .unwrap();
    let outcome = engine.submit_answer(&mut state, "  tokyo ").unwrap();
    assert!(outcome.correct);
}

#[test]
fn same_seed_gives_same_session() {
    let corpus = numbered(30);
    let run = |seed| {
        let mut engine = engine(seed);
        let mut state = QuizState::default();
        engine
            .launch(
                &mut state,
                &corpus,
                &request(1, 30, 5, QuizMode::Normal),
                QuizDirection::TermToMeaning,
            )
            .unwrap();
        let session = state.session().unwrap();
        let ids: Vec<u32> = session.records().iter().map(|r| r.id).collect();
        let choices = session.current_question().unwrap().choices.clone();
        (ids, choices)
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn deck_file_feeds_a_quiz() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("travel.json");
    fs::write(
        &path,
        r#"[
            {"id": 1, "term": "train", "meaning": "電車"},
            {"id": "2", "term": "ticket", "meaning": "切符"},
            [3, "station", "noun", "駅"],
            {"id": 4, "term": "broken"},
            {"id": 5.0, "term": "map", "meaning": "地図"}
        ]"#,
    )
    .unwrap();

    let corpus: Corpus = DeckFile::new(&path).load_corpus().unwrap();
    assert_eq!(corpus.len(), 4);
    assert_eq!(corpus.dropped(), 1);
    assert_eq!(corpus.id_bounds(), Some(IdRange::new(1, 5)));

    let mut engine = QuizEngine::new(SmallRng::seed_from_u64(0), EngineOptions::default());
    let mut state = QuizState::default();
    engine
        .launch(
            &mut state,
            corpus.records(),
            &request(1, 5, 5, QuizMode::Normal),
            QuizDirection::TermToMeaning,
        )
        .unwrap();
    assert_eq!(state.session().unwrap().total(), 4);
}
