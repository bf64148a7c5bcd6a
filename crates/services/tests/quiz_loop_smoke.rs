use std::sync::Arc;

use quiz_core::model::{PlayContext, QuizId, QuizVisibility, UserId};
use quiz_core::session::{NextOutcome, QuizSession, SessionPhase};
use quiz_core::time::fixed_now;
use reqwest::StatusCode;
use services::{ApiConfig, BankLoadError, Clock, InMemoryQuizApi, QuizLoopService};

const QUIZ: u64 = 21;

fn api_with_quiz() -> InMemoryQuizApi {
    let api = InMemoryQuizApi::new();
    api.insert_quiz(
        QuizId::new(QUIZ),
        [("A", "p1"), ("B", "p2"), ("C", "p3"), ("D", "p4"), ("E", "p5")],
    );
    api
}

fn loop_service(api: &InMemoryQuizApi) -> QuizLoopService {
    let config = ApiConfig::new("http://quiz.test/").unwrap();
    QuizLoopService::new(Clock::fixed(fixed_now()), config, Arc::new(api.clone())).with_seed(2024)
}

fn public_context(viewer: u64) -> PlayContext {
    PlayContext::new(QuizVisibility::Public, QuizId::new(QUIZ), "Droit civil")
        .with_title("Arrêts")
        .with_author(UserId::new(1))
        .with_viewer(UserId::new(viewer))
}

/// Plays to the end, answering the first `hits` questions right and the rest wrong.
async fn play(service: &QuizLoopService, session: &mut QuizSession, hits: usize) -> NextOutcome {
    let mut served = 0;
    loop {
        let question = session.current_question().unwrap().clone();
        if served < hits {
            service.answer(session, &question.correct);
        } else {
            let miss = question
                .options
                .iter()
                .find(|o| **o != question.correct)
                .unwrap();
            service.answer(session, miss);
        }
        served += 1;

        let result = service.next(session).unwrap();
        if let NextOutcome::Complete(_) = result.outcome {
            if let Some(report) = result.report {
                report.await.unwrap();
            }
            return result.outcome;
        }
    }
}

#[tokio::test]
async fn perfect_run_on_own_quiz_is_not_reported() {
    let api = api_with_quiz();
    let service = loop_service(&api);

    let mut session = service.start(public_context(1)).await.unwrap();
    let outcome = play(&service, &mut session, 5).await;

    let NextOutcome::Complete(completion) = outcome else {
        panic!("session did not complete");
    };
    assert_eq!(completion.final_score.to_string(), "5/5");
    assert!(session.pool().is_empty());
    assert!(api.submitted().is_empty());
    assert_eq!(api.fetches(), [(QuizVisibility::Public, QuizId::new(QUIZ))]);
}

#[tokio::test]
async fn server_error_redirects_to_length_error_page() {
    let api = api_with_quiz();
    api.fail_fetch_with(StatusCode::INTERNAL_SERVER_ERROR);
    let service = loop_service(&api);

    let failure = service.start(public_context(2)).await.unwrap_err();

    assert_eq!(
        failure.redirect_to.as_str(),
        "http://quiz.test/quiz/quizlengtherror"
    );
    assert!(matches!(
        failure.source,
        BankLoadError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)
    ));
}

#[tokio::test]
async fn other_player_results_are_posted() {
    let api = api_with_quiz();
    let service = loop_service(&api);

    let mut session = service.start(public_context(2)).await.unwrap();
    let outcome = play(&service, &mut session, 3).await;

    let NextOutcome::Complete(completion) = outcome else {
        panic!("session did not complete");
    };
    assert_eq!(completion.final_score.to_string(), "3/5");
    let submitted = api.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].questions_served(), 5);
    assert_eq!(submitted[0].questions_correct(), 3);
    assert_eq!(submitted[0].subject(), "Droit civil");
}

#[tokio::test]
async fn failed_stats_post_still_completes() {
    let api = api_with_quiz();
    api.fail_stats();
    let service = loop_service(&api);

    let mut session = service.start(public_context(2)).await.unwrap();
    play(&service, &mut session, 3).await;

    assert_eq!(session.phase(), SessionPhase::Complete);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.final_score.unwrap().to_string(), "3/5");
    assert!(api.submitted().is_empty());
}

#[tokio::test]
async fn private_quiz_uses_private_endpoint_and_never_reports() {
    let api = api_with_quiz();
    let service = loop_service(&api);
    let context = PlayContext::new(QuizVisibility::Private, QuizId::new(QUIZ), "Droit civil");

    let mut session = service.start(context).await.unwrap();
    play(&service, &mut session, 2).await;

    assert_eq!(api.fetches(), [(QuizVisibility::Private, QuizId::new(QUIZ))]);
    assert!(api.submitted().is_empty());
}
