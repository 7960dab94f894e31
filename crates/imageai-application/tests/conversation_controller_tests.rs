mod common;

use common::{PanickingClient, controlled_client};
use imageai_application::{ConversationController, ConversationEvent, GenerationOutcome};
use imageai_core::conversation::{GenerationStatus, MessageRole, RejectionReason};
use imageai_core::generation::GenerationError;
use imageai_interaction::{LocalSessionGate, MockGenerationClient};
use std::sync::Arc;
use std::time::Duration;

fn gate() -> Arc<LocalSessionGate> {
    Arc::new(LocalSessionGate::signed_in("ada@example.com"))
}

#[tokio::test]
async fn test_successful_generation_appends_prompt_then_image() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let pending = controller
        .submit_prompt("A dragon made of crystal and light")
        .await
        .expect("prompt should be accepted");

    // The prompt is logged before generation resolves
    let messages = controller.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].text, "A dragon made of crystal and light");
    assert_eq!(messages[0].author.as_deref(), Some("ada@example.com"));
    assert!(controller.is_generating().await);

    let call = calls.next().await;
    assert_eq!(call.prompt, "A dragon made of crystal and light");
    call.succeed("https://img.example/dragon.png");

    let outcome = pending.wait().await.unwrap();
    assert!(outcome.is_success());

    let messages = controller.messages().await;
    assert_eq!(messages.len(), 2);
    let reply = &messages[1];
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(
        reply.image_ref.as_ref().map(|r| r.as_str()),
        Some("https://img.example/dragon.png")
    );
    assert_eq!(reply.in_reply_to.as_deref(), Some(messages[0].id.as_str()));
    assert!(!controller.is_generating().await);
}

#[tokio::test]
async fn test_second_submission_while_pending_is_rejected() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let pending = controller.submit_prompt("cats").await.unwrap();
    let second = controller.submit_prompt("dogs").await;

    assert_eq!(second.err(), Some(RejectionReason::GenerationInProgress));
    let messages = controller.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "cats");

    calls.next().await.succeed("https://img.example/cats.png");
    pending.wait().await.unwrap();

    let messages = controller.messages().await;
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.text != "dogs"));
}

#[tokio::test]
async fn test_failed_generation_is_logged_and_controller_recovers() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let pending = controller.submit_prompt("x").await.unwrap();
    calls
        .next()
        .await
        .fail(GenerationError::Timeout(Duration::from_secs(30)));

    match pending.wait().await.unwrap() {
        GenerationOutcome::Failed { request, error, .. } => {
            assert_eq!(request.status, GenerationStatus::Failed);
            assert_eq!(error, GenerationError::Timeout(Duration::from_secs(30)));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let messages = controller.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "x");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert!(messages[1].image_ref.is_none());
    assert!(messages[1].text.contains("timed out"));
    assert!(!controller.is_generating().await);

    let retry = controller.submit_prompt("y").await;
    assert!(retry.is_ok());
    calls.next().await.succeed("https://img.example/y.png");
    retry.unwrap().wait().await.unwrap();
}

#[tokio::test]
async fn test_blank_prompts_are_rejected_in_any_state() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    for blank in ["", "   ", "\n\t"] {
        assert_eq!(
            controller.submit_prompt(blank).await.err(),
            Some(RejectionReason::EmptyPrompt)
        );
    }
    assert!(controller.messages().await.is_empty());

    let pending = controller.submit_prompt("cats").await.unwrap();
    assert_eq!(
        controller.submit_prompt("  ").await.err(),
        Some(RejectionReason::EmptyPrompt)
    );
    assert_eq!(controller.messages().await.len(), 1);

    calls.next().await.succeed("https://img.example/cats.png");
    pending.wait().await.unwrap();
}

#[tokio::test]
async fn test_log_only_grows_across_a_conversation() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());
    let mut snapshots = vec![controller.messages().await];

    for (i, prompt) in ["one", "two", "three"].into_iter().enumerate() {
        let pending = controller.submit_prompt(prompt).await.unwrap();
        snapshots.push(controller.messages().await);
        let _ = controller.submit_prompt("rejected").await;
        snapshots.push(controller.messages().await);

        let call = calls.next().await;
        if i % 2 == 0 {
            call.succeed("https://img.example/ok.png");
        } else {
            call.fail(GenerationError::Transport("reset by peer".into()));
        }
        pending.wait().await.unwrap();
        snapshots.push(controller.messages().await);
    }

    for pair in snapshots.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        assert!(later.len() >= earlier.len());
        assert_eq!(&later[..earlier.len()], &earlier[..]);
    }

    // Each prompt is immediately followed by its reply
    let messages = snapshots.last().unwrap();
    assert_eq!(messages.len(), 6);
    for pair in messages.chunks(2) {
        assert_eq!(pair[0].role, MessageRole::User);
        assert_eq!(pair[1].role, MessageRole::Assistant);
        assert_eq!(pair[1].in_reply_to.as_deref(), Some(pair[0].id.as_str()));
    }
}

#[tokio::test]
async fn test_suggestion_only_fills_the_draft() {
    let (client, _calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let suggestion = controller.suggestions()[4];
    assert_eq!(suggestion, "A dragon made of crystal and light");
    controller.apply_suggestion(suggestion).await;

    assert_eq!(controller.draft().await, suggestion);
    assert!(controller.messages().await.is_empty());
    assert!(!controller.is_generating().await);
}

#[tokio::test]
async fn test_submit_draft_clears_it_only_on_acceptance() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    controller.set_draft("   ").await;
    assert_eq!(
        controller.submit_draft().await.err(),
        Some(RejectionReason::EmptyPrompt)
    );
    assert_eq!(controller.draft().await, "   ");

    controller.apply_suggestion("An astronaut riding a horse on Mars").await;
    let pending = controller.submit_draft().await.unwrap();
    assert_eq!(controller.draft().await, "");
    assert_eq!(pending.prompt(), "An astronaut riding a horse on Mars");

    controller.set_draft("next idea").await;
    assert_eq!(
        controller.submit_draft().await.err(),
        Some(RejectionReason::GenerationInProgress)
    );
    assert_eq!(controller.draft().await, "next idea");

    calls.next().await.succeed("https://img.example/mars.png");
    pending.wait().await.unwrap();
}

#[tokio::test]
async fn test_pending_prompt_tracks_the_request() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());
    assert!(controller.pending_prompt().await.is_none());

    let pending = controller.submit_prompt("  cats  ").await.unwrap();
    assert_eq!(controller.pending_prompt().await.as_deref(), Some("cats"));

    calls.next().await.succeed("https://img.example/cats.png");
    pending.wait().await.unwrap();
    assert!(controller.pending_prompt().await.is_none());
}

#[tokio::test]
async fn test_dropping_the_handle_does_not_cancel_generation() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());
    let mut events = controller.subscribe();

    drop(controller.submit_prompt("cats").await.unwrap());
    calls.next().await.succeed("https://img.example/cats.png");

    loop {
        if let ConversationEvent::GenerationFinished { status, .. } = events.recv().await.unwrap() {
            assert_eq!(status, GenerationStatus::Succeeded);
            break;
        }
    }
    assert_eq!(controller.messages().await.len(), 2);
    assert!(!controller.is_generating().await);
}

#[tokio::test]
async fn test_events_follow_the_state_machine() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());
    let mut events = controller.subscribe();

    let pending = controller.submit_prompt("cats").await.unwrap();
    calls.next().await.succeed("https://img.example/cats.png");
    pending.wait().await.unwrap();

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(received.len(), 4);
    assert!(matches!(&received[0], ConversationEvent::MessageAppended(m) if m.role == MessageRole::User));
    assert!(matches!(&received[1], ConversationEvent::GenerationStarted { prompt, .. } if prompt == "cats"));
    assert!(matches!(&received[2], ConversationEvent::MessageAppended(m) if m.has_image()));
    assert!(matches!(
        &received[3],
        ConversationEvent::GenerationFinished { status: GenerationStatus::Succeeded, .. }
    ));
}

#[tokio::test]
async fn test_start_new_session_is_refused_while_generating() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let pending = controller.submit_prompt("cats").await.unwrap();
    assert_eq!(
        controller.start_new_session().await.err(),
        Some(RejectionReason::GenerationInProgress)
    );

    calls.next().await.succeed("https://img.example/cats.png");
    pending.wait().await.unwrap();

    let closed = controller.start_new_session().await.unwrap();
    assert_eq!(closed.len(), 2);
    assert!(controller.messages().await.is_empty());
}

#[tokio::test]
async fn test_reset_orphans_the_in_flight_request() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let stale = controller.submit_prompt("cats").await.unwrap();
    let stale_call = calls.next().await;

    controller.reset().await;
    assert!(!controller.is_generating().await);
    assert!(controller.messages().await.is_empty());

    let fresh = controller.submit_prompt("dogs").await.unwrap();
    let fresh_call = calls.next().await;

    // The old provider call resolves first but must not leak into the new conversation
    stale_call.succeed("https://img.example/cats.png");
    let outcome = stale.wait().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Orphaned { .. }));
    assert!(controller.is_generating().await);
    assert_eq!(controller.messages().await.len(), 1);

    fresh_call.succeed("https://img.example/dogs.png");
    fresh.wait().await.unwrap();

    let messages = controller.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "dogs");
    assert!(messages[1].image_ref.as_ref().unwrap().as_str().ends_with("dogs.png"));
}

#[tokio::test]
async fn test_panicking_provider_still_resolves_as_failure() {
    let controller = ConversationController::new(Arc::new(PanickingClient), gate());

    let pending = controller.submit_prompt("cats").await.unwrap();
    let outcome = pending.wait().await.unwrap();

    assert!(matches!(outcome, GenerationOutcome::Failed { .. }));
    assert!(!controller.is_generating().await);
    assert_eq!(controller.messages().await.len(), 2);
}

#[tokio::test]
async fn test_success_without_an_image_is_recorded_as_failure() {
    let (client, calls) = controlled_client();
    let controller = ConversationController::new(Arc::new(client), gate());

    let pending = controller.submit_prompt("cats").await.unwrap();
    calls.next().await.succeed("   ");

    match pending.wait().await.unwrap() {
        GenerationOutcome::Failed { error, message, .. } => {
            assert!(matches!(error, GenerationError::InvalidResponse(_)));
            assert!(message.image_ref.is_none());
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!controller.is_generating().await);
}

#[tokio::test(start_paused = true)]
async fn test_mock_provider_end_to_end() {
    let client = Arc::new(MockGenerationClient::default());
    let controller = ConversationController::new(client.clone(), Arc::new(LocalSessionGate::new()));

    let pending = controller.submit_prompt("A magical forest with glowing mushrooms").await.unwrap();
    assert!(controller.is_generating().await);

    let outcome = pending.wait().await.unwrap();
    let reply = outcome.message().unwrap();
    assert!(reply.has_image());
    assert_eq!(
        reply.text,
        "I've generated an image based on your prompt: \"A magical forest with glowing mushrooms\""
    );
    assert_eq!(client.call_count(), 1);

    let messages = controller.messages().await;
    assert!(messages[0].author.is_none());
    assert!(!controller.is_generating().await);
}
