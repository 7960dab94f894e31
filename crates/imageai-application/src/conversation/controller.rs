use super::events::ConversationEvent;
use super::pending::{GenerationOutcome, PendingGeneration};
use futures::FutureExt;
use imageai_core::conversation::{
    DEFAULT_SUGGESTIONS, GenerationRequest, Message, MessageLog, RejectionReason,
};
use imageai_core::generation::{GeneratedImage, GenerationClient, GenerationError};
use imageai_core::identity::SessionGate;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Mutable state guarded by a single lock.
///
/// The pending request and the log are only changed while this lock is held,
/// which makes "check nothing is pending, append the prompt, mark pending"
/// one atomic step.
#[derive(Debug, Default)]
struct ControllerState {
    /// The in-flight request, if any
    active: Option<GenerationRequest>,
    /// Input text not yet submitted
    draft: String,
    /// Bumped by `reset`; requests started under an older epoch are orphaned
    epoch: u64,
}

struct ControllerInner {
    log: MessageLog,
    state: Mutex<ControllerState>,
    client: Arc<dyn GenerationClient>,
    gate: Arc<dyn SessionGate>,
    events: broadcast::Sender<ConversationEvent>,
}

/// Orchestrates prompt submission for one conversation.
///
/// `ConversationController` is responsible for:
/// - Validating prompts and enforcing that only one generation runs at a time
/// - Appending the user prompt before generation starts
/// - Appending exactly one assistant reply when generation resolves
/// - Tracking the draft input and starter suggestions
///
/// Each submission moves through `Idle -> Pending -> {Succeeded, Failed} -> Idle`.
/// The controller is cheap to clone; clones share the same conversation.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<ControllerInner>,
}

impl ConversationController {
    /// Creates a controller with an empty conversation.
    ///
    /// # Arguments
    ///
    /// * `client` - The image generation provider
    /// * `gate` - Source of the signed-in identity, used for attribution
    pub fn new(client: Arc<dyn GenerationClient>, gate: Arc<dyn SessionGate>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(ControllerInner {
                log: MessageLog::new(),
                state: Mutex::new(ControllerState::default()),
                client,
                gate,
                events,
            }),
        }
    }

    /// Submits a prompt for image generation.
    ///
    /// On acceptance the user message is already in the log when this
    /// returns, and generation runs on a spawned task. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - `EmptyPrompt` if `text` is blank (checked first, regardless of state)
    /// - `GenerationInProgress` if another request is pending
    ///
    /// A rejected submission changes nothing.
    pub async fn submit_prompt(&self, text: &str) -> Result<PendingGeneration, RejectionReason> {
        let prompt = text.trim();
        if prompt.is_empty() {
            tracing::debug!("[ConversationController] Rejected empty prompt");
            return Err(RejectionReason::EmptyPrompt);
        }

        let author = self
            .inner
            .gate
            .current_identity()
            .await
            .map(|identity| identity.display_label);

        let mut state = self.inner.state.lock().await;
        if let Some(active) = &state.active {
            tracing::debug!(
                "[ConversationController] Rejected prompt while request {} is pending",
                active.id
            );
            return Err(RejectionReason::GenerationInProgress);
        }

        let user_message = Message::user(prompt, author);
        let request = GenerationRequest::pending(prompt, user_message.id.clone());

        self.inner.log.append(user_message.clone()).await;
        self.inner.emit(ConversationEvent::MessageAppended(user_message));

        state.active = Some(request.clone());
        let epoch = state.epoch;
        self.inner.emit(ConversationEvent::GenerationStarted {
            request_id: request.id.clone(),
            prompt: request.prompt.clone(),
        });
        drop(state);

        tracing::info!(
            "[ConversationController] Accepted prompt: request_id={}, provider={}",
            request.id,
            self.inner.client.provider_name()
        );

        let request_id = request.id.clone();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run_generation(request, epoch).await });

        Ok(PendingGeneration::new(request_id, prompt.to_string(), handle))
    }

    /// Submits the current draft and clears it on acceptance.
    ///
    /// The draft is kept when the submission is rejected.
    pub async fn submit_draft(&self) -> Result<PendingGeneration, RejectionReason> {
        let draft = self.draft().await;
        let pending = self.submit_prompt(&draft).await?;

        let mut state = self.inner.state.lock().await;
        if state.draft == draft {
            state.draft.clear();
        }
        Ok(pending)
    }

    /// Returns true while a generation request is pending.
    pub async fn is_generating(&self) -> bool {
        self.inner.state.lock().await.active.is_some()
    }

    /// Prompt of the pending request, for the "generating" indicator.
    pub async fn pending_prompt(&self) -> Option<String> {
        let state = self.inner.state.lock().await;
        state.active.as_ref().map(|request| request.prompt.clone())
    }

    /// Puts a suggestion into the draft input without submitting it.
    pub async fn apply_suggestion(&self, text: &str) {
        tracing::debug!("[ConversationController] Applying suggestion to draft");
        self.set_draft(text).await;
    }

    pub async fn set_draft(&self, text: &str) {
        self.inner.state.lock().await.draft = text.to_string();
    }

    pub async fn draft(&self) -> String {
        self.inner.state.lock().await.draft.clone()
    }

    /// Starter prompts offered on an empty conversation.
    pub fn suggestions(&self) -> &'static [&'static str] {
        &DEFAULT_SUGGESTIONS
    }

    /// Snapshot of the conversation log.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.log.all().await
    }

    /// Clears the log to start a new conversation ("New Chat").
    ///
    /// Returns the messages of the conversation that was closed so the
    /// caller can archive them.
    ///
    /// # Errors
    ///
    /// `GenerationInProgress` while a request is pending; the reply of that
    /// request belongs to the current conversation.
    pub async fn start_new_session(&self) -> Result<Vec<Message>, RejectionReason> {
        let state = self.inner.state.lock().await;
        if state.active.is_some() {
            return Err(RejectionReason::GenerationInProgress);
        }

        let closed = self.inner.log.all().await;
        self.inner.log.clear().await;
        self.inner.emit(ConversationEvent::ConversationCleared);
        drop(state);

        tracing::info!(
            "[ConversationController] Started new conversation ({} messages closed)",
            closed.len()
        );
        Ok(closed)
    }

    /// Discards the conversation unconditionally.
    ///
    /// Used when the session ends. A request still in flight is orphaned: its
    /// outcome is dropped instead of being appended to the next conversation.
    pub async fn reset(&self) {
        let mut state = self.inner.state.lock().await;
        state.epoch += 1;
        if let Some(active) = state.active.take() {
            tracing::warn!(
                "[ConversationController] Reset while request {} was pending; its result will be discarded",
                active.id
            );
        }
        state.draft.clear();
        self.inner.log.clear().await;
        self.inner.emit(ConversationEvent::ConversationCleared);
    }

    /// Subscribes to conversation events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.inner.events.subscribe()
    }
}

impl ControllerInner {
    fn emit(&self, event: ConversationEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn run_generation(&self, mut request: GenerationRequest, epoch: u64) -> GenerationOutcome {
        let result = self.call_client(&request.prompt).await;

        let mut state = self.state.lock().await;
        let still_active = state.epoch == epoch
            && state
                .active
                .as_ref()
                .is_some_and(|active| active.id == request.id);
        if !still_active {
            match &result {
                Ok(_) => tracing::warn!(
                    "[ConversationController] Discarding result of orphaned request {}",
                    request.id
                ),
                Err(e) => tracing::warn!(
                    "[ConversationController] Discarding failure of orphaned request {}: {}",
                    request.id,
                    e
                ),
            }
            return GenerationOutcome::Orphaned {
                request_id: request.id,
            };
        }

        let (message, outcome) = match result {
            Ok(image) => {
                let message = Message::assistant_image(
                    request.user_message_id.clone(),
                    image.response_text,
                    image.image_ref,
                );
                self.resolve(&mut request, true);
                let outcome = GenerationOutcome::Succeeded {
                    request: request.clone(),
                    message: message.clone(),
                };
                (message, outcome)
            }
            Err(error) => {
                tracing::warn!(
                    "[ConversationController] Generation failed for request {}: {}",
                    request.id,
                    error
                );
                let message = Message::assistant_failure(
                    request.user_message_id.clone(),
                    failure_text(&request.prompt, &error),
                );
                self.resolve(&mut request, false);
                let outcome = GenerationOutcome::Failed {
                    request: request.clone(),
                    message: message.clone(),
                    error,
                };
                (message, outcome)
            }
        };

        self.log.append(message.clone()).await;
        self.emit(ConversationEvent::MessageAppended(message));
        state.active = None;
        self.emit(ConversationEvent::GenerationFinished {
            request_id: request.id.clone(),
            status: request.status,
        });
        drop(state);

        tracing::info!(
            "[ConversationController] Request {} resolved: {:?}",
            request.id,
            request.status
        );
        outcome
    }

    /// Calls the provider, turning a panic into a failed generation so the
    /// request still resolves. A success without an image reference counts
    /// as a failure.
    async fn call_client(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        match AssertUnwindSafe(self.client.generate(prompt))
            .catch_unwind()
            .await
        {
            Ok(Ok(image)) if image.image_ref.as_str().trim().is_empty() => {
                tracing::warn!(
                    "[ConversationController] Provider {} returned an empty image reference",
                    self.client.provider_name()
                );
                Err(GenerationError::InvalidResponse(
                    "the provider returned no image".to_string(),
                ))
            }
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "[ConversationController] Provider {} panicked during generation",
                    self.client.provider_name()
                );
                Err(GenerationError::provider(None, "the image provider crashed"))
            }
        }
    }

    fn resolve(&self, request: &mut GenerationRequest, succeeded: bool) {
        let transition = if succeeded {
            request.succeed()
        } else {
            request.fail()
        };
        if let Err(e) = transition {
            tracing::error!("[ConversationController] {}", e);
        }
    }
}

fn failure_text(prompt: &str, error: &GenerationError) -> String {
    format!("Sorry, I couldn't generate an image for \"{prompt}\". {error}")
}
