//! Inference, conversation persistence, history and settings flows.

use std::sync::Arc;

use pptee_application::AppContext;
use pptee_core::PpteeError;
use pptee_core::config::PpteeConfig;
use pptee_core::conversation::MessageRole;
use pptee_core::history::{HistoryFilter, InferenceStatus};
use pptee_core::kv::KeyValueStore;
use pptee_core::security::TeeState;
use pptee_core::workflow::{FailAtStep, FailureInjector, NeverFail, StepStatus, step_ids};
use pptee_infrastructure::{FileKeyValueStore, MemoryKeyValueStore};
use tempfile::TempDir;

/// Logs in and provisions the environment on `store`, then returns a context
/// over the same store that uses `injector`.
async fn ready_context(
    store: Arc<dyn KeyValueStore>,
    injector: Arc<dyn FailureInjector>,
) -> AppContext {
    let provisioning =
        AppContext::assemble(store.clone(), PpteeConfig::instant(), Arc::new(NeverFail), None);
    provisioning
        .session
        .login("user@example.com", "x")
        .await
        .unwrap();
    assert!(provisioning.setup.run().await.unwrap().environment_ready);

    AppContext::assemble(store, PpteeConfig::instant(), injector, None)
}

#[tokio::test]
async fn test_inference_requires_ready_environment() {
    let ctx = AppContext::assemble(
        Arc::new(MemoryKeyValueStore::new()),
        PpteeConfig::instant(),
        Arc::new(NeverFail),
        None,
    );
    ctx.session.login("user@example.com", "x").await.unwrap();

    let err = ctx.inference.infer("gpt-4", "hello").await.unwrap_err();
    assert_eq!(err, PpteeError::EnvironmentNotReady);
}

#[tokio::test]
async fn test_inference_validates_input() {
    let ctx = ready_context(Arc::new(MemoryKeyValueStore::new()), Arc::new(NeverFail)).await;

    assert!(
        ctx.inference
            .infer("gpt-5", "hello")
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        ctx.inference
            .infer("gpt-4", "   ")
            .await
            .unwrap_err()
            .is_validation()
    );
    assert!(ctx.inference.messages("gpt-4").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_completed_inference_appends_exchange() {
    let ctx = ready_context(Arc::new(MemoryKeyValueStore::new()), Arc::new(NeverFail)).await;

    let outcome = ctx
        .inference
        .infer("claude-3", "Summarise the quarterly report")
        .await
        .unwrap();
    assert!(outcome.workflow.is_completed());
    let response = outcome.response.unwrap();
    assert!(response.contains("Claude-3"));

    let messages = ctx.inference.messages("claude-3").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "Summarise the quarterly report");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, response);

    let steps = messages[1].steps.as_ref().unwrap();
    assert_eq!(steps.len(), 6);
    assert!(steps.iter().all(|step| step.status == StepStatus::Completed));
    assert!(steps[0].encrypted_preview.is_some());
}

#[tokio::test]
async fn test_failed_inference_appends_nothing() {
    let ctx = ready_context(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(FailAtStep::new(step_ids::RAG_INFERENCE)),
    )
    .await;

    let outcome = ctx.inference.infer("llama-3", "hello").await.unwrap();
    assert!(outcome.workflow.is_failed());
    assert!(outcome.response.is_none());
    assert_eq!(
        outcome.workflow.failure_message(),
        Some("Model inference failed inside the Cloud TEE")
    );
    assert_eq!(outcome.workflow.steps[4].status, StepStatus::Pending);
    assert!(ctx.inference.messages("llama-3").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_conversation_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("local_storage.json");

    {
        let store = Arc::new(FileKeyValueStore::open(path.clone()).await.unwrap());
        let ctx = ready_context(store, Arc::new(NeverFail)).await;
        ctx.inference.infer("gpt-4", "first question").await.unwrap();
        ctx.inference.infer("gpt-4", "second question").await.unwrap();
    }

    let store = Arc::new(FileKeyValueStore::open(path).await.unwrap());
    let ctx = AppContext::assemble(store, PpteeConfig::instant(), Arc::new(NeverFail), None);

    let session = ctx.session.status().await.unwrap();
    assert!(session.environment_ready);

    let messages = ctx.inference.messages("gpt-4").await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0], "first question");
    assert_eq!(contents[2], "second question");

    let dashboard = ctx.dashboard.summary().await.unwrap();
    assert_eq!(dashboard.total_inferences, 2);
    let gpt = dashboard
        .model_usage
        .iter()
        .find(|usage| usage.model_id == "gpt-4")
        .unwrap();
    assert_eq!(gpt.inferences, 2);
    assert_eq!(dashboard.recent.len(), 4);
    assert_eq!(dashboard.recent[0].query, "second question");
}

#[tokio::test]
async fn test_history_lists_recorded_runs_before_samples() {
    let ctx = ready_context(Arc::new(MemoryKeyValueStore::new()), Arc::new(NeverFail)).await;
    ctx.inference
        .infer("llama-3", "Explain remote attestation")
        .await
        .unwrap();

    let all = ctx.history.list(&HistoryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 9);
    assert_eq!(all[0].query, "Explain remote attestation");
    assert_eq!(all[0].model, "Llama-3");
    assert_eq!(all[0].status, InferenceStatus::Success);

    let failed = ctx
        .history
        .list(&HistoryFilter {
            status: Some(InferenceStatus::Failed),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, "6");

    let summary = ctx
        .history
        .summary(&HistoryFilter {
            model: Some("Llama-3".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.success, 1);
}

#[tokio::test]
async fn test_settings_edit_validate_and_reset() {
    let ctx = ready_context(Arc::new(MemoryKeyValueStore::new()), Arc::new(NeverFail)).await;

    let settings = ctx.settings.set("inference.max_tokens", "4096").await.unwrap();
    assert_eq!(settings.inference.max_tokens, 4096);
    assert_eq!(ctx.settings.show().await.unwrap().inference.max_tokens, 4096);

    let err = ctx
        .settings
        .set("inference.temperature", "3.5")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(ctx.settings.show().await.unwrap().inference.temperature, 0.7);

    let reset = ctx.settings.reset().await.unwrap();
    assert_eq!(reset.inference.max_tokens, 2048);
    assert_eq!(ctx.settings.show().await.unwrap(), reset);

    ctx.session.logout().await.unwrap();
    assert!(ctx.settings.show().await.unwrap_err().is_gate());
}

#[tokio::test]
async fn test_security_overview_reflects_session() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
    let ctx = ready_context(store, Arc::new(NeverFail)).await;

    let overview = ctx.security.overview().await.unwrap();
    assert_eq!(overview.device.state, TeeState::Active);
    assert_eq!(overview.cloud.state, TeeState::Active);
    assert_eq!(overview.data_flow.len(), 7);
    assert_eq!(overview.encryption[0].value, "AES-256-GCM");

    ctx.session.logout().await.unwrap();
    assert_eq!(
        ctx.security.overview().await.unwrap_err(),
        PpteeError::Unauthenticated
    );

    ctx.session.login("user@example.com", "x").await.unwrap();
    let overview = ctx.security.overview().await.unwrap();
    assert_eq!(overview.device.state, TeeState::Inactive);
}
