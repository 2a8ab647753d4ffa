use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::question_service::QuestionService;
use super::session_service::{ensure_active, load_owned};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::metrics::LIFELINES_USED_TOTAL;
use crate::models::lifeline::{FiftyFiftyResponse, Lifeline, LifelineResponse, SkipResponse};
use crate::models::{CurrentQuestion, GameSession, SessionUpdate};
use crate::store::GameStore;

pub struct LifelineService {
    store: Arc<dyn GameStore>,
    game: GameConfig,
}

impl LifelineService {
    pub fn new(store: Arc<dyn GameStore>, game: GameConfig) -> Self {
        Self { store, game }
    }

    pub async fn use_lifeline(
        &self,
        user_id: &str,
        session_id: &str,
        lifeline: Lifeline,
    ) -> GameResult<LifelineResponse> {
        let session = load_owned(self.store.as_ref(), session_id, user_id).await?;
        ensure_active(&session)?;

        let already_used = match lifeline {
            Lifeline::FiftyFifty => session.lifeline_50_used,
            Lifeline::Skip => session.lifeline_skip_used,
        };
        if already_used {
            return Err(GameError::InvalidTransition(format!(
                "{} lifeline already used in this session",
                lifeline.as_str()
            )));
        }

        let current = session.current_question.clone().ok_or_else(|| {
            GameError::InvalidTransition(format!("session {} has no pending question", session_id))
        })?;

        let response = match lifeline {
            Lifeline::FiftyFifty => self.fifty_fifty(&session, current).await?,
            Lifeline::Skip => self.skip(&session).await?,
        };

        LIFELINES_USED_TOTAL
            .with_label_values(&[lifeline.as_str()])
            .inc();
        tracing::info!(%session_id, %user_id, lifeline = lifeline.as_str(), "Lifeline used");

        Ok(response)
    }

    /// Drops one random wrong option from the current question.
    async fn fifty_fifty(
        &self,
        session: &GameSession,
        mut current: CurrentQuestion,
    ) -> GameResult<LifelineResponse> {
        let wrong: Vec<String> = current
            .options
            .iter()
            .filter(|o| o.id != current.correct_id)
            .map(|o| o.id.clone())
            .collect();

        let removed = {
            let mut rng = StdRng::from_os_rng();
            wrong.choose(&mut rng).cloned().ok_or_else(|| {
                GameError::InvalidTransition("current question has no wrong option left".into())
            })?
        };

        current.options.retain(|o| o.id != removed);
        current.lifelines_used.push(Lifeline::FiftyFifty);
        let options = current.options.clone();

        self.store
            .update_session(
                &session.id,
                SessionUpdate {
                    lifeline_50_used: Some(true),
                    current_question: Some(Some(current)),
                    ..Default::default()
                },
            )
            .await?;

        Ok(LifelineResponse::FiftyFifty(FiftyFiftyResponse {
            removed_option_id: removed,
            options,
        }))
    }

    /// Replaces the current question. Nothing is written if no replacement
    /// can be built.
    async fn skip(&self, session: &GameSession) -> GameResult<LifelineResponse> {
        let questions = QuestionService::new(self.store.clone(), self.game.clone());
        let mut generated = questions.generate(session, "skip").await?;

        if let Some(Some(current)) = generated.update.current_question.as_mut() {
            current.lifelines_used.push(Lifeline::Skip);
        }
        let update = SessionUpdate {
            lifeline_skip_used: Some(true),
            ..generated.update
        };
        self.store.update_session(&session.id, update).await?;

        Ok(LifelineResponse::Skip(SkipResponse {
            question: generated.question,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::record;
    use crate::models::question::{Category, CategoryKind, Gender, SeedData};
    use crate::models::StartSessionRequest;
    use crate::services::session_service::SessionService;
    use crate::store::InMemoryStore;

    async fn started(ids: &[&str]) -> (Arc<InMemoryStore>, LifelineService, String) {
        let store = Arc::new(InMemoryStore::with_seed(SeedData {
            categories: vec![Category {
                id: "jeans".into(),
                name: "Jeans".into(),
                kind: CategoryKind::Regular,
                is_active: true,
                show_on_homepage: true,
            }],
            questions: ids
                .iter()
                .map(|id| record(id, "jeans", Gender::Female, None))
                .collect(),
        }));
        let started = SessionService::new(store.clone(), GameConfig::default())
            .start(
                "u1",
                &StartSessionRequest {
                    category_id: "jeans".into(),
                },
            )
            .await
            .unwrap();
        let svc = LifelineService::new(store.clone(), GameConfig::default());
        (store, svc, started.session.id)
    }

    #[tokio::test]
    async fn fifty_fifty_keeps_answer_and_one_wrong_option() {
        let (store, svc, id) = started(&["a", "b", "c"]).await;

        let res = svc.use_lifeline("u1", &id, Lifeline::FiftyFifty).await.unwrap();
        let LifelineResponse::FiftyFifty(res) = res else {
            panic!("expected fifty_fifty response");
        };
        assert_eq!(res.options.len(), 2);

        let stored = store.get_session(&id).await.unwrap().unwrap();
        let current = stored.current_question.unwrap();
        assert!(stored.lifeline_50_used);
        assert!(current.has_option(&current.correct_id));
        assert_ne!(res.removed_option_id, current.correct_id);
        assert_eq!(stored.asked_questions.len(), 1);
    }

    #[tokio::test]
    async fn second_fifty_fifty_changes_nothing() {
        let (store, svc, id) = started(&["a", "b", "c"]).await;
        svc.use_lifeline("u1", &id, Lifeline::FiftyFifty).await.unwrap();
        let before = store.get_session(&id).await.unwrap().unwrap();

        let err = svc
            .use_lifeline("u1", &id, Lifeline::FiftyFifty)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, GameError::InvalidTransition(_)));

        let after = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(
            before.current_question.unwrap().options,
            after.current_question.unwrap().options
        );
    }

    #[tokio::test]
    async fn skip_replaces_question_once() {
        let (store, svc, id) = started(&["a", "b", "c", "d"]).await;

        svc.use_lifeline("u1", &id, Lifeline::Skip).await.unwrap();
        let after_skip = store.get_session(&id).await.unwrap().unwrap();
        assert!(after_skip.lifeline_skip_used);
        assert_eq!(after_skip.asked_questions.len(), 2);
        assert_eq!(after_skip.score, 0);

        let err = svc.use_lifeline("u1", &id, Lifeline::Skip).await.err().unwrap();
        assert!(matches!(err, GameError::InvalidTransition(_)));
        let after_retry = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(after_retry.asked_questions, after_skip.asked_questions);
    }

    #[tokio::test]
    async fn failed_skip_leaves_session_untouched() {
        let (store, svc, id) = started(&["a", "b", "c"]).await;
        // exhaust the pool so no replacement can be built
        let mut session = store.get_session(&id).await.unwrap().unwrap();
        let asked: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|q| crate::models::AskedCombination {
                question_id: q.to_string(),
                color: String::new(),
            })
            .collect();
        store
            .update_session(
                &id,
                SessionUpdate {
                    asked_questions: Some(asked.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        session.asked_questions = asked;

        let err = svc.use_lifeline("u1", &id, Lifeline::Skip).await.err().unwrap();
        assert!(matches!(err, GameError::InsufficientContent(_)));

        let stored = store.get_session(&id).await.unwrap().unwrap();
        assert!(!stored.lifeline_skip_used);
        assert_eq!(stored.asked_questions, session.asked_questions);
    }

    #[tokio::test]
    async fn answer_event_lists_every_lifeline_on_the_question() {
        let (store, svc, id) = started(&["a", "b", "c", "d"]).await;
        svc.use_lifeline("u1", &id, Lifeline::Skip).await.unwrap();
        svc.use_lifeline("u1", &id, Lifeline::FiftyFifty).await.unwrap();

        let current = store
            .get_session(&id)
            .await
            .unwrap()
            .unwrap()
            .current_question
            .unwrap();
        assert_eq!(
            current.lifelines_used,
            vec![Lifeline::Skip, Lifeline::FiftyFifty]
        );

        crate::services::answer_service::AnswerService::new(store.clone(), GameConfig::default())
            .submit_answer(
                "u1",
                &id,
                &crate::models::answer::SubmitAnswerRequest {
                    selected_id: Some(current.correct_id.clone()),
                    response_time_ms: Some(800),
                },
            )
            .await
            .unwrap();

        let events = store.answer_events_for_session(&id).await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].lifelines_used,
            vec![Lifeline::Skip, Lifeline::FiftyFifty]
        );
    }
}
