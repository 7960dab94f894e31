#![allow(dead_code)]

use async_trait::async_trait;
use imageai_core::conversation::ImageRef;
use imageai_core::generation::{GeneratedImage, GenerationClient, GenerationError};
use tokio::sync::{Mutex, mpsc, oneshot};

/// A generate() call waiting for the test to resolve it.
pub struct PendingCall {
    pub prompt: String,
    responder: oneshot::Sender<Result<GeneratedImage, GenerationError>>,
}

impl PendingCall {
    pub fn succeed(self, image_url: &str) {
        let _ = self.responder.send(Ok(GeneratedImage {
            response_text: format!("Here is \"{}\"", self.prompt),
            image_ref: ImageRef::new(image_url),
        }));
    }

    pub fn fail(self, error: GenerationError) {
        let _ = self.responder.send(Err(error));
    }
}

/// Generation client whose calls are resolved by the test.
pub struct ControlledGenerationClient {
    calls: mpsc::UnboundedSender<PendingCall>,
}

/// Receiving side of a [`ControlledGenerationClient`].
pub struct CallQueue {
    receiver: Mutex<mpsc::UnboundedReceiver<PendingCall>>,
}

impl CallQueue {
    /// Waits for the next generate() call.
    pub async fn next(&self) -> PendingCall {
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .expect("client dropped")
    }
}

pub fn controlled_client() -> (ControlledGenerationClient, CallQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ControlledGenerationClient { calls: tx },
        CallQueue {
            receiver: Mutex::new(rx),
        },
    )
}

#[async_trait]
impl GenerationClient for ControlledGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        let (responder, response) = oneshot::channel();
        self.calls
            .send(PendingCall {
                prompt: prompt.to_string(),
                responder,
            })
            .map_err(|_| GenerationError::Transport("test queue closed".into()))?;
        response
            .await
            .unwrap_or_else(|_| Err(GenerationError::Transport("call dropped".into())))
    }

    fn provider_name(&self) -> &str {
        "controlled"
    }
}

/// Client that panics on every call.
pub struct PanickingClient;

#[async_trait]
impl GenerationClient for PanickingClient {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, GenerationError> {
        panic!("provider bug");
    }

    fn provider_name(&self) -> &str {
        "panicking"
    }
}
