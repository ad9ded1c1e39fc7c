use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{
    analysis::{AnalysisOutcome, ImageUpload},
    common::entities::app_errors::CoreError,
    conversation::{
        entities::{Fragment, Phase, Turn, TurnContent},
        messages,
        value_objects::{Action, ConversationSnapshot, Dispatch, RejectReason},
    },
    session::{
        entities::{Mode, Session},
        ports::SessionClient,
    },
};

/// Linear chat flow for one user: owns the turn history, the current phase
/// and the backend session.
///
/// Every mutating action has a single suspend point (the backend call).
/// While that call is in flight `loading` is set and any other action is
/// rejected with [`RejectReason::Busy`] instead of being queued.
pub struct Conversation<C>
where
    C: SessionClient,
{
    client: C,
    mode: Mode,
    phase: Phase,
    turns: Vec<Arc<Turn>>,
    loading: bool,
    session: Option<Session>,
    last_analyzed_subject: Option<String>,
    snapshots: watch::Sender<ConversationSnapshot>,
}

impl<C> Conversation<C>
where
    C: SessionClient,
{
    pub fn new(client: C) -> Self {
        let (snapshots, _) = watch::channel(ConversationSnapshot {
            mode: Mode::None,
            phase: Phase::AwaitingMode,
            loading: false,
            turns: Vec::new(),
            last_analyzed_subject: None,
            available_actions: vec![Action::SelectMode, Action::Reset],
        });

        Self {
            client,
            mode: Mode::None,
            phase: Phase::AwaitingMode,
            turns: Vec::new(),
            loading: false,
            session: None,
            last_analyzed_subject: None,
            snapshots,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn turns(&self) -> &[Arc<Turn>] {
        &self.turns
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn last_analyzed_subject(&self) -> Option<&str> {
        self.last_analyzed_subject.as_deref()
    }

    /// Receiver that observes every state change, including the transient
    /// processing state while a backend call is in flight.
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            mode: self.mode,
            phase: self.phase,
            loading: self.loading,
            turns: self.turns.clone(),
            last_analyzed_subject: self.last_analyzed_subject.clone(),
            available_actions: self.available_actions(),
        }
    }

    pub fn available_actions(&self) -> Vec<Action> {
        if self.loading {
            return Vec::new();
        }

        let mut actions = match self.phase {
            Phase::AwaitingMode => vec![Action::SelectMode],
            Phase::AwaitingFoodImage => vec![Action::SubmitFoodImage],
            Phase::AwaitingElectronicsDetails => vec![Action::SubmitElectronicsDetails],
            Phase::ActiveChat => vec![Action::SendMessage],
            Phase::Processing => Vec::new(),
        };
        if self.last_analyzed_subject.is_some() && self.session.is_some() {
            actions.push(Action::RequestRecipe);
        }
        actions.push(Action::Reset);

        actions
    }

    pub async fn select_mode(&mut self, mode: Mode) -> Dispatch {
        if let Err(reason) = self.ensure_phase(Phase::AwaitingMode) {
            return Dispatch::Rejected(reason);
        }
        let (Some(welcome), Some(waiting)) = (messages::welcome(mode), Phase::first_waiting(mode))
        else {
            return Dispatch::Rejected(RejectReason::NoMode);
        };

        self.mode = mode;
        self.turns.clear();
        self.push(Turn::assistant(TurnContent::text(welcome)));
        self.loading = true;
        self.publish();

        match self.client.start_session(mode).await {
            Ok(session) => {
                self.session = Some(session);
                self.finish(waiting);
            }
            Err(e) => {
                tracing::error!(mode = mode.as_str(), "Failed to start chat session: {}", e);
                self.push(Turn::assistant(TurnContent::error(
                    messages::CONNECTION_FAILED,
                )));
                self.finish(Phase::AwaitingMode);
            }
        }

        Dispatch::Accepted
    }

    pub async fn submit_food_image(&mut self, image: ImageUpload) -> Dispatch {
        if let Err(reason) = self.ensure_phase(Phase::AwaitingFoodImage) {
            return Dispatch::Rejected(reason);
        }
        if image.is_empty() {
            return Dispatch::Rejected(RejectReason::EmptyInput);
        }
        if self.session.is_none() {
            return Dispatch::Rejected(RejectReason::NoSession);
        }

        self.push(Turn::user(TurnContent::image(&image)));
        self.begin();

        let result = match self.session.as_mut() {
            Some(session) => self.client.analyze_food(session, image).await,
            None => Err(missing_session()),
        };

        let next = match result {
            Ok(AnalysisOutcome::Structured(result)) => {
                let product_name = result.product_name.clone();
                self.push(Turn::assistant(TurnContent::FoodCard { result }));
                self.last_analyzed_subject = Some(product_name.clone());
                self.push(Turn::assistant(TurnContent::RecipeOffer {
                    product_name,
                    text: messages::RECIPE_OFFER.to_string(),
                }));
                Phase::ActiveChat
            }
            Ok(AnalysisOutcome::Fallback(text)) => {
                self.push(Turn::assistant(TurnContent::text(text)));
                Phase::ActiveChat
            }
            Err(e) => {
                tracing::error!("Food analysis error: {}", e);
                self.push(Turn::assistant(TurnContent::error(
                    messages::FOOD_ANALYSIS_FAILED,
                )));
                Phase::AwaitingFoodImage
            }
        };

        self.finish(next);
        Dispatch::Accepted
    }

    pub async fn submit_electronics_details(
        &mut self,
        model_name: &str,
        image: Option<ImageUpload>,
    ) -> Dispatch {
        if let Err(reason) = self.ensure_phase(Phase::AwaitingElectronicsDetails) {
            return Dispatch::Rejected(reason);
        }
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return Dispatch::Rejected(RejectReason::EmptyInput);
        }
        if self.session.is_none() {
            return Dispatch::Rejected(RejectReason::NoSession);
        }

        let user_content = match image.filter(|image| !image.is_empty()) {
            Some(image) => TurnContent::Composite {
                fragments: vec![
                    Fragment::image(&image),
                    Fragment::Text {
                        text: messages::electronics_model_caption(model_name),
                    },
                ],
            },
            None => TurnContent::text(messages::electronics_request(model_name)),
        };
        self.push(Turn::user(user_content));
        self.begin();

        let result = match self.session.as_mut() {
            Some(session) => self.client.analyze_electronics(session, model_name).await,
            None => Err(missing_session()),
        };

        let next = match result {
            Ok(AnalysisOutcome::Structured(result)) => {
                self.push(Turn::assistant(TurnContent::ElectronicsCard { result }));
                self.push(Turn::assistant(TurnContent::text(
                    messages::ELECTRONICS_FOLLOW_UP,
                )));
                Phase::ActiveChat
            }
            Ok(AnalysisOutcome::Fallback(text)) => {
                self.push(Turn::assistant(TurnContent::text(text)));
                Phase::ActiveChat
            }
            Err(e) => {
                tracing::error!(model_name, "Electronics analysis error: {}", e);
                self.push(Turn::assistant(TurnContent::error(
                    messages::ELECTRONICS_ANALYSIS_FAILED,
                )));
                Phase::AwaitingElectronicsDetails
            }
        };

        self.finish(next);
        Dispatch::Accepted
    }

    /// Asks for a healthier recipe for the last analyzed product. Repeated
    /// calls run again; suppressing a second click is up to the caller.
    pub async fn request_recipe(&mut self) -> Dispatch {
        if self.loading {
            return Dispatch::Rejected(RejectReason::Busy);
        }
        let Some(subject) = self.last_analyzed_subject.clone() else {
            return Dispatch::Rejected(RejectReason::NoSubject);
        };
        if self.session.is_none() {
            return Dispatch::Rejected(RejectReason::NoSession);
        }

        self.push(Turn::user(TurnContent::text(messages::recipe_request(
            &subject,
        ))));
        self.begin();

        let prompt = messages::recipe_prompt(&subject);
        let result = match self.session.as_mut() {
            Some(session) => self.client.continue_chat(session, &prompt).await,
            None => Err(missing_session()),
        };

        match result {
            Ok(reply) => self.push(Turn::assistant(TurnContent::text(reply))),
            Err(e) => {
                tracing::error!("Recipe generation error: {}", e);
                self.push(Turn::assistant(TurnContent::error(messages::RECIPE_FAILED)));
            }
        }

        self.finish(Phase::ActiveChat);
        Dispatch::Accepted
    }

    pub async fn send_message(&mut self, text: &str) -> Dispatch {
        if let Err(reason) = self.ensure_phase(Phase::ActiveChat) {
            return Dispatch::Rejected(reason);
        }
        let text = text.trim();
        if text.is_empty() {
            return Dispatch::Rejected(RejectReason::EmptyInput);
        }
        if self.session.is_none() {
            return Dispatch::Rejected(RejectReason::NoSession);
        }

        self.push(Turn::user(TurnContent::text(text)));
        self.begin();

        let result = match self.session.as_mut() {
            Some(session) => self.client.continue_chat(session, text).await,
            None => Err(missing_session()),
        };

        match result {
            Ok(reply) => self.push(Turn::assistant(TurnContent::text(reply))),
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                self.push(Turn::assistant(TurnContent::error(messages::CHAT_FAILED)));
            }
        }

        self.finish(Phase::ActiveChat);
        Dispatch::Accepted
    }

    /// Drops the session and history and returns to mode selection.
    pub fn reset(&mut self) -> Dispatch {
        if self.loading {
            return Dispatch::Rejected(RejectReason::Busy);
        }

        if let Some(session) = self.session.take() {
            tracing::info!(session_id = %session.id, "session dropped");
        }
        self.mode = Mode::None;
        self.phase = Phase::AwaitingMode;
        self.turns.clear();
        self.last_analyzed_subject = None;
        self.publish();

        Dispatch::Accepted
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), RejectReason> {
        if self.loading {
            return Err(RejectReason::Busy);
        }
        if self.phase != expected {
            return Err(RejectReason::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(Arc::new(turn));
    }

    fn begin(&mut self) {
        self.loading = true;
        self.phase = Phase::Processing;
        self.publish();
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.loading = false;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

fn missing_session() -> CoreError {
    CoreError::BackendError("no active session".to_string())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use super::*;
    use crate::domain::{
        analysis::{
            AnalysisSummary, ElectronicsAnalysisResult, FoodAnalysisResult, HarmfulIngredient,
            Score, prompts::food_fallback_message,
        },
        conversation::entities::Speaker,
    };

    enum Reply<T> {
        Ready(Result<T, CoreError>),
        Pending,
    }

    /// Session client answering from per-operation scripts.
    #[derive(Default)]
    struct ScriptedClient {
        starts: Mutex<VecDeque<Result<(), CoreError>>>,
        food: Mutex<VecDeque<Result<AnalysisOutcome<FoodAnalysisResult>, CoreError>>>,
        electronics: Mutex<VecDeque<Result<AnalysisOutcome<ElectronicsAnalysisResult>, CoreError>>>,
        chat: Mutex<VecDeque<Reply<String>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn starting() -> Self {
            let client = Self::default();
            client.starts.lock().unwrap().push_back(Ok(()));
            client
        }

        fn with_food(self, reply: Result<AnalysisOutcome<FoodAnalysisResult>, CoreError>) -> Self {
            self.food.lock().unwrap().push_back(reply);
            self
        }

        fn with_electronics(
            self,
            reply: Result<AnalysisOutcome<ElectronicsAnalysisResult>, CoreError>,
        ) -> Self {
            self.electronics.lock().unwrap().push_back(reply);
            self
        }

        fn with_chat(self, reply: Reply<String>) -> Self {
            self.chat.lock().unwrap().push_back(reply);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SessionClient for ScriptedClient {
        async fn start_session(&self, mode: Mode) -> Result<Session, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self
                .starts
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected start_session call");
            reply.map(|_| Session::new(mode, "test instruction"))
        }

        async fn analyze_food(
            &self,
            _session: &mut Session,
            _image: ImageUpload,
        ) -> Result<AnalysisOutcome<FoodAnalysisResult>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.food
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected analyze_food call")
        }

        async fn analyze_electronics(
            &self,
            _session: &mut Session,
            model_name: &str,
        ) -> Result<AnalysisOutcome<ElectronicsAnalysisResult>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(model_name.to_string());
            self.electronics
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected analyze_electronics call")
        }

        async fn continue_chat(
            &self,
            _session: &mut Session,
            message: &str,
        ) -> Result<String, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(message.to_string());
            let reply = self
                .chat
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected continue_chat call");
            match reply {
                Reply::Ready(result) => result,
                Reply::Pending => std::future::pending().await,
            }
        }
    }

    fn cookies() -> FoodAnalysisResult {
        FoodAnalysisResult {
            product_name: "Cookies".to_string(),
            health_score: Score::new(42),
            beneficial_ingredients: Vec::new(),
            harmful_ingredients: vec![HarmfulIngredient {
                name: "Sugar".to_string(),
                risk: "High glycemic index".to_string(),
            }],
            summary: AnalysisSummary {
                merits: vec!["Low fat".to_string()],
                demerits: vec!["High sugar".to_string()],
            },
        }
    }

    fn laptop() -> ElectronicsAnalysisResult {
        ElectronicsAnalysisResult {
            eco_score: Score::new(64),
            device_type: "Laptop".to_string(),
            analysis: AnalysisSummary {
                merits: vec!["Recycled aluminium".to_string()],
                demerits: vec!["Soldered storage".to_string()],
            },
            carbon_footprint: "160 kg CO2e".to_string(),
            annual_energy_consumption: "20 kWh/year".to_string(),
        }
    }

    fn jpeg() -> ImageUpload {
        ImageUpload::new(Some("image/jpeg".to_string()), vec![0xff, 0xd8])
    }

    async fn food_conversation(client: ScriptedClient) -> Conversation<ScriptedClient> {
        let mut conversation = Conversation::new(client);
        assert!(conversation.select_mode(Mode::Food).await.is_accepted());
        conversation
    }

    async fn analyzed_food_conversation(client: ScriptedClient) -> Conversation<ScriptedClient> {
        let mut conversation = food_conversation(client.with_food(Ok(AnalysisOutcome::Structured(
            cookies(),
        ))))
        .await;
        assert!(conversation.submit_food_image(jpeg()).await.is_accepted());
        conversation
    }

    #[tokio::test]
    async fn test_select_mode_moves_to_first_waiting_phase() {
        for (mode, phase) in [
            (Mode::Food, Phase::AwaitingFoodImage),
            (Mode::Electronics, Phase::AwaitingElectronicsDetails),
        ] {
            let mut conversation = Conversation::new(ScriptedClient::starting());
            assert_eq!(conversation.select_mode(mode).await, Dispatch::Accepted);

            assert_eq!(conversation.phase(), phase);
            assert_eq!(conversation.mode(), mode);
            assert!(conversation.session().is_some());
            assert!(!conversation.is_loading());
            assert_eq!(conversation.turns().len(), 1);
            assert_eq!(conversation.turns()[0].speaker, Speaker::Assistant);
            assert_eq!(
                conversation.turns()[0].content,
                TurnContent::text(messages::welcome(mode).unwrap())
            );
        }
    }

    #[tokio::test]
    async fn test_select_mode_connection_failure_stays_awaiting_mode() {
        let client = ScriptedClient::default();
        client
            .starts
            .lock()
            .unwrap()
            .push_back(Err(CoreError::ConnectionError("invalid key".to_string())));
        client.starts.lock().unwrap().push_back(Ok(()));
        let mut conversation = Conversation::new(client);

        assert!(conversation.select_mode(Mode::Food).await.is_accepted());

        assert_eq!(conversation.phase(), Phase::AwaitingMode);
        assert!(conversation.session().is_none());
        assert!(!conversation.is_loading());
        assert_eq!(
            conversation.turns()[1].content,
            TurnContent::error(messages::CONNECTION_FAILED)
        );

        assert!(conversation.select_mode(Mode::Food).await.is_accepted());
        assert_eq!(conversation.phase(), Phase::AwaitingFoodImage);
        assert_eq!(conversation.turns().len(), 1);
    }

    #[tokio::test]
    async fn test_select_none_mode_is_rejected() {
        let mut conversation = Conversation::new(ScriptedClient::default());

        assert_eq!(
            conversation.select_mode(Mode::None).await,
            Dispatch::Rejected(RejectReason::NoMode)
        );
        assert!(conversation.turns().is_empty());
        assert_eq!(conversation.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_food_image_in_wrong_phase_is_rejected() {
        let mut conversation = Conversation::new(ScriptedClient::starting());
        conversation.select_mode(Mode::Electronics).await;
        let calls = conversation.client.calls();

        assert_eq!(
            conversation.submit_food_image(jpeg()).await,
            Dispatch::Rejected(RejectReason::WrongPhase {
                expected: Phase::AwaitingFoodImage,
                actual: Phase::AwaitingElectronicsDetails,
            })
        );
        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.client.calls(), calls);
    }

    #[tokio::test]
    async fn test_structured_food_result_appends_three_turns() {
        let conversation = analyzed_food_conversation(ScriptedClient::starting()).await;
        let turns = conversation.turns();

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].speaker, Speaker::User);
        assert!(matches!(turns[1].content, TurnContent::Image { .. }));
        let TurnContent::FoodCard { result } = &turns[2].content else {
            panic!("expected a food card");
        };
        assert_eq!(result.health_score.value(), 42);
        assert_eq!(result.harmful_ingredients.len(), 1);
        assert_eq!(result.summary.merits.len(), 1);
        assert_eq!(result.summary.demerits.len(), 1);
        assert_eq!(
            turns[3].content,
            TurnContent::RecipeOffer {
                product_name: "Cookies".to_string(),
                text: messages::RECIPE_OFFER.to_string(),
            }
        );
        assert_eq!(conversation.last_analyzed_subject(), Some("Cookies"));
        assert_eq!(conversation.phase(), Phase::ActiveChat);
        assert!(!conversation.is_loading());
        assert!(
            conversation
                .available_actions()
                .contains(&Action::RequestRecipe)
        );
    }

    #[tokio::test]
    async fn test_food_fallback_appends_single_text_turn() {
        let raw = "{\"productName\": \"Cookies\"";
        let client = ScriptedClient::starting()
            .with_food(Ok(AnalysisOutcome::Fallback(food_fallback_message(raw))));
        let mut conversation = food_conversation(client).await;

        conversation.submit_food_image(jpeg()).await;

        assert_eq!(conversation.turns().len(), 3);
        let TurnContent::Text { text } = &conversation.turns()[2].content else {
            panic!("expected fallback text");
        };
        assert!(text.contains(raw));
        assert_eq!(conversation.phase(), Phase::ActiveChat);
        assert!(conversation.last_analyzed_subject().is_none());
    }

    #[tokio::test]
    async fn test_food_transport_failure_rolls_back_for_retry() {
        let client = ScriptedClient::starting()
            .with_food(Err(CoreError::BackendError("timeout".to_string())))
            .with_food(Ok(AnalysisOutcome::Structured(cookies())));
        let mut conversation = food_conversation(client).await;

        conversation.submit_food_image(jpeg()).await;
        assert_eq!(conversation.phase(), Phase::AwaitingFoodImage);
        assert!(!conversation.is_loading());
        assert_eq!(
            conversation.turns().last().unwrap().content,
            TurnContent::error(messages::FOOD_ANALYSIS_FAILED)
        );

        assert!(conversation.submit_food_image(jpeg()).await.is_accepted());
        assert_eq!(conversation.phase(), Phase::ActiveChat);
    }

    #[tokio::test]
    async fn test_electronics_structured_result_with_image() {
        let client = ScriptedClient::starting().with_electronics(Ok(AnalysisOutcome::Structured(
            laptop(),
        )));
        let mut conversation = Conversation::new(client);
        conversation.select_mode(Mode::Electronics).await;

        let dispatch = conversation
            .submit_electronics_details("  MacBook Air M2 ", Some(jpeg()))
            .await;

        assert!(dispatch.is_accepted());
        let turns = conversation.turns();
        assert_eq!(turns.len(), 4);
        let TurnContent::Composite { fragments } = &turns[1].content else {
            panic!("expected composite user turn");
        };
        assert!(matches!(fragments[0], Fragment::Image { .. }));
        assert_eq!(
            fragments[1],
            Fragment::Text {
                text: "Model: MacBook Air M2".to_string()
            }
        );
        assert!(matches!(turns[2].content, TurnContent::ElectronicsCard { .. }));
        assert_eq!(
            turns[3].content,
            TurnContent::text(messages::ELECTRONICS_FOLLOW_UP)
        );
        assert_eq!(
            conversation.client.prompts.lock().unwrap().as_slice(),
            ["MacBook Air M2"]
        );
        assert_eq!(conversation.phase(), Phase::ActiveChat);
    }

    #[tokio::test]
    async fn test_electronics_fallback_advances_to_chat() {
        let raw = "I could not find that device.";
        let client = ScriptedClient::starting()
            .with_electronics(Ok(AnalysisOutcome::Fallback(raw.to_string())));
        let mut conversation = Conversation::new(client);
        conversation.select_mode(Mode::Electronics).await;

        conversation
            .submit_electronics_details("Obscure 3000", None)
            .await;

        let turns = conversation.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(
            turns[1].content,
            TurnContent::text("Analyzing: Obscure 3000")
        );
        assert_eq!(turns[2].content, TurnContent::text(raw));
        assert_eq!(conversation.phase(), Phase::ActiveChat);
    }

    #[tokio::test]
    async fn test_electronics_transport_failure_rolls_back() {
        let client = ScriptedClient::starting()
            .with_electronics(Err(CoreError::BackendError("503".to_string())));
        let mut conversation = Conversation::new(client);
        conversation.select_mode(Mode::Electronics).await;

        conversation.submit_electronics_details("Pixel 8", None).await;

        assert_eq!(conversation.phase(), Phase::AwaitingElectronicsDetails);
        assert!(!conversation.is_loading());
    }

    #[tokio::test]
    async fn test_blank_model_name_is_rejected() {
        let mut conversation = Conversation::new(ScriptedClient::starting());
        conversation.select_mode(Mode::Electronics).await;

        assert_eq!(
            conversation.submit_electronics_details("   ", None).await,
            Dispatch::Rejected(RejectReason::EmptyInput)
        );
        assert_eq!(conversation.turns().len(), 1);
    }

    #[tokio::test]
    async fn test_request_recipe_runs_each_time_it_is_called() {
        let client = ScriptedClient::starting()
            .with_chat(Reply::Ready(Ok("Oat cookies: ...".to_string())))
            .with_chat(Reply::Ready(Err(CoreError::BackendError("reset".to_string()))));
        let mut conversation = analyzed_food_conversation(client).await;

        assert!(conversation.request_recipe().await.is_accepted());
        assert!(conversation.request_recipe().await.is_accepted());

        let turns = conversation.turns();
        assert_eq!(turns.len(), 8);
        assert_eq!(
            turns[4].content,
            TurnContent::text("Yes, please generate a healthier recipe for Cookies.")
        );
        assert_eq!(turns[5].content, TurnContent::text("Oat cookies: ..."));
        assert_eq!(
            turns[7].content,
            TurnContent::error(messages::RECIPE_FAILED)
        );
        assert!(
            conversation.client.prompts.lock().unwrap()[0]
                .starts_with("That sounds great. Please provide a simple, healthy, homemade recipe for Cookies.")
        );
        assert_eq!(conversation.phase(), Phase::ActiveChat);
        assert!(!conversation.is_loading());
    }

    #[tokio::test]
    async fn test_request_recipe_without_subject_is_noop() {
        let mut conversation = food_conversation(ScriptedClient::starting()).await;

        assert_eq!(
            conversation.request_recipe().await,
            Dispatch::Rejected(RejectReason::NoSubject)
        );
        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.phase(), Phase::AwaitingFoodImage);
    }

    #[tokio::test]
    async fn test_send_message_trims_and_replies() {
        let client =
            ScriptedClient::starting().with_chat(Reply::Ready(Ok("Yes, it is.".to_string())));
        let mut conversation = analyzed_food_conversation(client).await;

        assert_eq!(
            conversation.send_message("   ").await,
            Dispatch::Rejected(RejectReason::EmptyInput)
        );
        assert!(
            conversation
                .send_message("  Is it vegan?  ")
                .await
                .is_accepted()
        );

        let turns = conversation.turns();
        assert_eq!(turns[4].content, TurnContent::text("Is it vegan?"));
        assert_eq!(turns[5].speaker, Speaker::Assistant);
        assert_eq!(turns[5].content, TurnContent::text("Yes, it is."));
    }

    #[tokio::test]
    async fn test_send_message_before_chat_is_rejected() {
        let mut conversation = food_conversation(ScriptedClient::starting()).await;

        assert!(matches!(
            conversation.send_message("hello").await,
            Dispatch::Rejected(RejectReason::WrongPhase { .. })
        ));
    }

    #[tokio::test]
    async fn test_in_flight_request_blocks_other_actions() {
        let client = ScriptedClient::starting().with_chat(Reply::Pending);
        let mut conversation = analyzed_food_conversation(client).await;
        let snapshots = conversation.subscribe();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            conversation.send_message("Tell me more"),
        )
        .await;
        assert!(abandoned.is_err());

        {
            let snapshot = snapshots.borrow();
            assert!(snapshot.loading);
            assert_eq!(snapshot.phase, Phase::Processing);
            assert!(snapshot.available_actions.is_empty());
        }

        let calls = conversation.client.calls();
        let turns = conversation.turns().len();
        assert_eq!(
            conversation.send_message("again").await,
            Dispatch::Rejected(RejectReason::Busy)
        );
        assert_eq!(
            conversation.request_recipe().await,
            Dispatch::Rejected(RejectReason::Busy)
        );
        assert_eq!(conversation.reset(), Dispatch::Rejected(RejectReason::Busy));
        assert_eq!(conversation.client.calls(), calls);
        assert_eq!(conversation.turns().len(), turns);
    }

    #[tokio::test]
    async fn test_reset_returns_to_mode_selection() {
        let mut conversation = analyzed_food_conversation(ScriptedClient::starting()).await;
        let snapshots = conversation.subscribe();

        assert!(conversation.reset().is_accepted());

        assert_eq!(conversation.phase(), Phase::AwaitingMode);
        assert_eq!(conversation.mode(), Mode::None);
        assert!(conversation.turns().is_empty());
        assert!(conversation.session().is_none());
        assert!(conversation.last_analyzed_subject().is_none());
        assert_eq!(*snapshots.borrow(), conversation.snapshot());
    }

    #[tokio::test]
    async fn test_snapshot_publishes_final_state() {
        let mut conversation = Conversation::new(ScriptedClient::starting());
        let snapshots = conversation.subscribe();

        conversation.select_mode(Mode::Food).await;

        let snapshot = snapshots.borrow().clone();
        assert_eq!(snapshot.phase, Phase::AwaitingFoodImage);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.turns.len(), 1);
        assert_eq!(
            snapshot.available_actions,
            vec![Action::SubmitFoodImage, Action::Reset]
        );
    }

    #[tokio::test]
    async fn test_snapshots_share_turns() {
        let mut conversation =
            analyzed_food_conversation(ScriptedClient::starting()).await;
        let snapshots = conversation.subscribe();

        let snapshot = conversation.snapshot();
        assert!(Arc::ptr_eq(&snapshot.turns[1], &conversation.turns()[1]));
        assert!(Arc::ptr_eq(
            &snapshots.borrow().turns[1],
            &conversation.turns()[1]
        ));
        assert!(matches!(
            snapshot.turns[1].content,
            TurnContent::Image { .. }
        ));

        assert!(conversation.reset().is_accepted());
        assert_eq!(snapshot.turns.len(), 4);
    }
}
