//! Chat dispatcher: primary backend, then secondary provider, then fallback.
//!
//! Every user message walks the same path:
//!
//! ```text
//! IDLE -> WAITING_RATE_LIMIT -> CALLING_PRIMARY -> SUCCESS
//!                                      |
//!                                      +-> CALLING_SECONDARY -> SUCCESS
//!                                                 |
//!                                                 +-> FALLBACK
//! ```
//!
//! At most one remote request is in flight per dispatcher. A message that
//! arrives while another is being answered does not queue: it gets a
//! keyword-matched fallback reply straight away. The in-flight flag and the
//! rate gate live under one mutex and are checked and updated in a single
//! critical section, so two callers can never both pass the gate.
//!
//! Remote errors never escape. The caller always receives text.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{Instrument, info_span};

use kafra_types::chat::ChatMessage;
use kafra_types::config::ClientConfig;
use kafra_types::llm::{CompletionRequest, LlmError, Message};

use super::matcher::PatternMatcher;
use super::phrases::{BUSY_NOTICE, DISABLED_NOTICE, FallbackCategory, FallbackTable};
use super::rate_gate::{GateStatus, RateGate};
use crate::llm::box_provider::BoxLlmProvider;

/// Which path produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    /// The primary backend answered.
    Primary { provider: String },
    /// The secondary provider answered after the primary failed.
    Secondary { provider: String },
    /// Both remote paths failed or were skipped.
    Fallback {
        category: FallbackCategory,
        provider_disabled: bool,
    },
    /// Another request was already in flight.
    Busy { category: FallbackCategory },
    /// No remote backend is configured.
    Offline { category: FallbackCategory },
}

impl ReplySource {
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ReplySource::Primary { .. } | ReplySource::Secondary { .. }
        )
    }
}

/// A reply together with the path that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Tunables for a [`ChatDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub min_interval: Duration,
    pub max_consecutive_errors: u32,
    /// Ceiling for each individual remote call; `None` waits indefinitely.
    pub remote_timeout: Option<Duration>,
    /// Prior messages sent along with the new one.
    pub history_limit: usize,
    pub max_tokens: u32,
    /// Persona prompt for providers that accept one.
    pub system_prompt: Option<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for DispatcherConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            min_interval: config.min_interval(),
            max_consecutive_errors: config.max_consecutive_errors,
            remote_timeout: config.remote_timeout(),
            history_limit: config.history_limit,
            max_tokens: config.max_tokens,
            system_prompt: None,
        }
    }
}

/// Snapshot of the dispatcher for the `/status` command.
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatus {
    pub gate: GateStatus,
    pub in_flight: bool,
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

#[derive(Debug)]
struct DispatchState {
    gate: RateGate,
    in_flight: bool,
}

/// Clears the in-flight flag when the request finishes or is dropped.
struct InFlightGuard<'a> {
    state: &'a Mutex<DispatchState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight = false;
    }
}

/// Routes user messages to remote providers with a keyword fallback.
///
/// Construct once at startup and share it by handle (`Arc<ChatDispatcher>`).
pub struct ChatDispatcher {
    primary: Option<BoxLlmProvider>,
    secondary: Option<BoxLlmProvider>,
    matcher: PatternMatcher,
    phrases: FallbackTable,
    state: Mutex<DispatchState>,
    remote_timeout: Option<Duration>,
    history_limit: usize,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl ChatDispatcher {
    /// Create a dispatcher with no remote backends (offline until
    /// `with_primary` / `with_secondary` are called).
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            primary: None,
            secondary: None,
            matcher: PatternMatcher::builtin(),
            phrases: FallbackTable::builtin(),
            state: Mutex::new(DispatchState {
                gate: RateGate::new(config.min_interval, config.max_consecutive_errors),
                in_flight: false,
            }),
            remote_timeout: config.remote_timeout,
            history_limit: config.history_limit,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt,
        }
    }

    pub fn with_primary(mut self, provider: BoxLlmProvider) -> Self {
        self.primary = Some(provider);
        self
    }

    pub fn with_secondary(mut self, provider: BoxLlmProvider) -> Self {
        self.secondary = Some(provider);
        self
    }

    pub fn with_matcher(mut self, matcher: PatternMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_phrases(mut self, phrases: FallbackTable) -> Self {
        self.phrases = phrases;
        self
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer a user message. Never fails.
    pub async fn get_response(&self, user_input: &str, history: &[ChatMessage]) -> String {
        self.respond(user_input, history).await.text
    }

    /// Answer a user message and report which path produced the reply.
    pub async fn respond(&self, user_input: &str, history: &[ChatMessage]) -> Reply {
        if self.primary.is_none() && self.secondary.is_none() {
            let (category, text) = self.matcher.respond(user_input, &self.phrases);
            return Reply {
                text,
                source: ReplySource::Offline { category },
            };
        }

        let Some(wait) = self.begin_request() else {
            let (category, text) = self.matcher.respond(user_input, &self.phrases);
            tracing::debug!(%category, "Request already in flight, answering from fallback");
            return Reply {
                text: format!("{BUSY_NOTICE}\n{text}"),
                source: ReplySource::Busy { category },
            };
        };
        let _in_flight = InFlightGuard { state: &self.state };

        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Waiting out rate gate");
            tokio::time::sleep(wait).await;
        }

        let request = self.build_request(user_input, history);

        if let Some(primary) = &self.primary {
            match self.call(primary, &request).await {
                Ok(text) => {
                    self.lock().gate.record_success();
                    return Reply {
                        text,
                        source: ReplySource::Primary {
                            provider: primary.name().to_string(),
                        },
                    };
                }
                Err(err) => {
                    tracing::warn!(
                        provider = %primary.name(),
                        error = %err,
                        "Primary backend failed"
                    );
                }
            }
        }

        if let Some(secondary) = &self.secondary {
            let disabled = self.lock().gate.is_provider_disabled();
            if disabled {
                tracing::debug!(
                    provider = %secondary.name(),
                    "Secondary provider disabled after repeated failures, skipping"
                );
            } else {
                match self.call(secondary, &request).await {
                    Ok(text) => {
                        self.lock().gate.record_success();
                        return Reply {
                            text,
                            source: ReplySource::Secondary {
                                provider: secondary.name().to_string(),
                            },
                        };
                    }
                    Err(err) => {
                        tracing::warn!(
                            provider = %secondary.name(),
                            error = %err,
                            "Secondary provider failed"
                        );
                    }
                }
            }
        }

        let (consecutive_errors, provider_disabled) = {
            let mut state = self.lock();
            state.gate.record_failure();
            (
                state.gate.consecutive_errors,
                state.gate.is_provider_disabled(),
            )
        };
        tracing::info!(
            consecutive_errors,
            provider_disabled,
            "All remote providers failed, answering from fallback"
        );

        let (category, text) = self.matcher.respond(user_input, &self.phrases);
        let text = if provider_disabled {
            format!("{text}\n\n{DISABLED_NOTICE}")
        } else {
            text
        };
        Reply {
            text,
            source: ReplySource::Fallback {
                category,
                provider_disabled,
            },
        }
    }

    /// Claim the in-flight slot and reserve the next rate-gate slot in one
    /// critical section. Returns how long to wait, or `None` when busy.
    fn begin_request(&self) -> Option<Duration> {
        let mut state = self.lock();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;

        let now = tokio::time::Instant::now().into_std();
        let wait = state.gate.should_wait(now);
        state.gate.record_attempt(now + wait);
        Some(wait)
    }

    fn build_request(&self, user_input: &str, history: &[ChatMessage]) -> CompletionRequest {
        let skip = history.len().saturating_sub(self.history_limit);
        let mut messages: Vec<Message> = history[skip..]
            .iter()
            .map(ChatMessage::to_llm_message)
            .collect();
        messages.push(Message::user(user_input.trim()));

        let mut request = CompletionRequest::from_messages(messages, self.max_tokens);
        request.system = self.system_prompt.clone();
        request
    }

    async fn call(
        &self,
        provider: &BoxLlmProvider,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = provider.model(),
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.message_count = request.messages.len(),
        );
        let call = provider.complete(request).instrument(span);

        let response = match self.remote_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| LlmError::Timeout(limit))??,
            None => call.await?,
        };

        let text = response.content.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Operator action: clear the failure counter and interval clock.
    pub fn reset(&self) {
        self.lock().gate.reset();
        tracing::info!("Dispatcher rate gate reset");
    }

    pub fn is_provider_disabled(&self) -> bool {
        self.lock().gate.is_provider_disabled()
    }

    pub fn status(&self) -> DispatcherStatus {
        let state = self.lock();
        let now = tokio::time::Instant::now().into_std();
        DispatcherStatus {
            gate: state.gate.status(now),
            in_flight: state.in_flight,
            primary: self.primary.as_ref().map(|p| p.name().to_string()),
            secondary: self.secondary.as_ref().map(|p| p.name().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::matcher::KeywordRule;
    use crate::llm::provider::LlmProvider;
    use kafra_types::llm::{CompletionResponse, Usage};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    // --- Mock providers ---

    #[derive(Clone)]
    enum MockResult {
        Reply(String),
        Fail,
        Hang,
    }

    struct MockProvider {
        name: String,
        result: MockResult,
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
        started: Option<Arc<Notify>>,
        release: Option<Arc<Notify>>,
    }

    impl MockProvider {
        fn new(name: &str, result: MockResult) -> Self {
            Self {
                name: name.to_string(),
                result,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                started: None,
                release: None,
            }
        }

        fn ok(name: &str, reply: &str) -> Self {
            Self::new(name, MockResult::Reply(reply.to_string()))
        }

        fn failing(name: &str) -> Self {
            Self::new(name, MockResult::Fail)
        }

        fn counter(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            if let Some(started) = &self.started {
                started.notify_one();
            }
            if let Some(release) = &self.release {
                release.notified().await;
            }
            match &self.result {
                MockResult::Reply(text) => Ok(CompletionResponse {
                    id: format!("resp-{}", self.name),
                    content: text.clone(),
                    model: "mock-model".to_string(),
                    usage: Usage::default(),
                }),
                MockResult::Fail => Err(LlmError::Provider {
                    message: "503 Service Unavailable".to_string(),
                }),
                MockResult::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn config() -> DispatcherConfig {
        DispatcherConfig {
            min_interval: Duration::ZERO,
            max_consecutive_errors: 3,
            remote_timeout: Some(Duration::from_secs(5)),
            history_limit: 10,
            max_tokens: 256,
            system_prompt: None,
        }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_primary_success() {
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::ok("kafra_server", "  สวัสดีค่ะ  ")))
            .with_secondary(BoxLlmProvider::new(MockProvider::ok("gemini", "unused")));

        let reply = dispatcher.respond("hello", &[]).await;
        assert_eq!(reply.text, "สวัสดีค่ะ");
        assert_eq!(
            reply.source,
            ReplySource::Primary {
                provider: "kafra_server".to_string()
            }
        );
        assert!(!dispatcher.status().in_flight);
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_fails() {
        let secondary = MockProvider::ok("gemini", "from gemini");
        let secondary_calls = secondary.counter();
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::failing("kafra_server")))
            .with_secondary(BoxLlmProvider::new(secondary));

        let reply = dispatcher.respond("hello", &[]).await;
        assert_eq!(reply.text, "from gemini");
        assert!(matches!(reply.source, ReplySource::Secondary { .. }));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.status().gate.consecutive_errors, 0);
    }

    #[tokio::test]
    async fn test_empty_primary_reply_counts_as_failure() {
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::ok("kafra_server", "   ")))
            .with_secondary(BoxLlmProvider::new(MockProvider::ok("gemini", "backup")));

        let reply = dispatcher.respond("hello", &[]).await;
        assert_eq!(reply.text, "backup");
    }

    #[tokio::test]
    async fn test_fallback_when_all_fail() {
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::failing("kafra_server")))
            .with_secondary(BoxLlmProvider::new(MockProvider::failing("gemini")));

        let reply = dispatcher.respond("ขอบคุณค่ะ", &[]).await;
        assert_eq!(
            reply.source,
            ReplySource::Fallback {
                category: FallbackCategory::Thanks,
                provider_disabled: false,
            }
        );
        assert!(!reply.text.contains(DISABLED_NOTICE));
        assert_eq!(dispatcher.status().gate.consecutive_errors, 1);
    }

    #[tokio::test]
    async fn test_secondary_skipped_once_threshold_reached() {
        let secondary = MockProvider::failing("gemini");
        let secondary_calls = secondary.counter();
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::failing("kafra_server")))
            .with_secondary(BoxLlmProvider::new(secondary));

        for _ in 0..3 {
            dispatcher.respond("hello", &[]).await;
        }
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 3);
        assert!(dispatcher.is_provider_disabled());

        for _ in 0..5 {
            let reply = dispatcher.respond("hello", &[]).await;
            assert!(reply.text.ends_with(DISABLED_NOTICE));
            assert!(matches!(
                reply.source,
                ReplySource::Fallback {
                    provider_disabled: true,
                    ..
                }
            ));
        }
        assert_eq!(
            secondary_calls.load(Ordering::SeqCst),
            3,
            "secondary must not be called while disabled"
        );
    }

    #[tokio::test]
    async fn test_primary_still_tried_while_secondary_disabled() {
        let primary = MockProvider::failing("kafra_server");
        let primary_calls = primary.counter();
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            max_consecutive_errors: 1,
            ..config()
        })
        .with_primary(BoxLlmProvider::new(primary))
        .with_secondary(BoxLlmProvider::new(MockProvider::failing("gemini")));

        dispatcher.respond("a", &[]).await;
        dispatcher.respond("b", &[]).await;
        assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_reenables_secondary() {
        let secondary = MockProvider::failing("gemini");
        let secondary_calls = secondary.counter();
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            max_consecutive_errors: 1,
            ..config()
        })
        .with_primary(BoxLlmProvider::new(MockProvider::failing("kafra_server")))
        .with_secondary(BoxLlmProvider::new(secondary));

        dispatcher.respond("hello", &[]).await;
        dispatcher.respond("hello", &[]).await;
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);

        dispatcher.reset();
        assert_eq!(dispatcher.status().gate.consecutive_errors, 0);
        dispatcher.respond("hello", &[]).await;
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_success_after_failures_resets_counter() {
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            max_consecutive_errors: 10,
            ..config()
        })
        .with_primary(BoxLlmProvider::new(MockProvider::failing("kafra_server")))
        .with_secondary(BoxLlmProvider::new(MockProvider::failing("gemini")));

        dispatcher.respond("a", &[]).await;
        dispatcher.respond("b", &[]).await;
        assert_eq!(dispatcher.status().gate.consecutive_errors, 2);

        let recovered = ChatDispatcher {
            primary: Some(BoxLlmProvider::new(MockProvider::ok("kafra_server", "ok"))),
            ..dispatcher
        };
        recovered.respond("c", &[]).await;
        assert_eq!(recovered.status().gate.consecutive_errors, 0);
    }

    #[tokio::test]
    async fn test_offline_mode_uses_fallback_without_counting() {
        let dispatcher = ChatDispatcher::new(config());
        let reply = dispatcher.respond("", &[]).await;
        assert_eq!(
            reply.source,
            ReplySource::Offline {
                category: FallbackCategory::Default
            }
        );
        assert_eq!(dispatcher.status().gate.consecutive_errors, 0);
    }

    #[tokio::test]
    async fn test_second_call_while_in_flight_returns_fallback_immediately() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut primary = MockProvider::ok("kafra_server", "slow answer");
        primary.started = Some(started.clone());
        primary.release = Some(release.clone());
        let primary_calls = primary.counter();

        let dispatcher = Arc::new(
            ChatDispatcher::new(config()).with_primary(BoxLlmProvider::new(primary)),
        );

        let first = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.respond("first question", &[]).await })
        };
        started.notified().await;
        assert!(dispatcher.status().in_flight);

        let second = dispatcher.respond("สวัสดี", &[]).await;
        assert_eq!(
            second.source,
            ReplySource::Busy {
                category: FallbackCategory::Greeting
            }
        );
        assert!(second.text.starts_with(BUSY_NOTICE));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert!(!first.is_finished());

        release.notify_one();
        let first = first.await.unwrap();
        assert_eq!(first.text, "slow answer");
        assert!(!dispatcher.status().in_flight);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_gate_spaces_consecutive_calls() {
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            min_interval: Duration::from_secs(2),
            ..config()
        })
        .with_primary(BoxLlmProvider::new(MockProvider::ok("kafra_server", "hi")));

        let start = tokio::time::Instant::now();
        dispatcher.respond("one", &[]).await;
        assert!(start.elapsed() < Duration::from_secs(1));

        dispatcher.respond("two", &[]).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_remote_call_times_out_into_fallback() {
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::new(
                "kafra_server",
                MockResult::Hang,
            )));

        let reply = dispatcher.respond("hello", &[]).await;
        assert!(matches!(reply.source, ReplySource::Fallback { .. }));
        assert!(!dispatcher.status().in_flight);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_error_keeps_sub_second_limit() {
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            remote_timeout: Some(Duration::from_millis(250)),
            ..config()
        });
        let provider = BoxLlmProvider::new(MockProvider::new("gemini", MockResult::Hang));
        let request = CompletionRequest::from_messages(vec![Message::user("hi")], 16);

        let err = dispatcher.call(&provider, &request).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(limit) if limit == Duration::from_millis(250)));
        assert_eq!(err.to_string(), "request timed out after 250ms");
    }

    #[tokio::test]
    async fn test_custom_matcher_picks_fallback_category() {
        let dispatcher = ChatDispatcher::new(config()).with_matcher(PatternMatcher::new(vec![
            KeywordRule::new(FallbackCategory::Goodbye, &["ciao"]),
        ]));

        let reply = dispatcher.respond("Ciao Kafra", &[]).await;
        assert_eq!(
            reply.source,
            ReplySource::Offline {
                category: FallbackCategory::Goodbye
            }
        );

        // The builtin greeting keywords are gone with the builtin rules.
        let reply = dispatcher.respond("สวัสดีค่ะ", &[]).await;
        assert_eq!(
            reply.source,
            ReplySource::Offline {
                category: FallbackCategory::Default
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_request_releases_in_flight_flag() {
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            remote_timeout: None,
            ..config()
        })
        .with_primary(BoxLlmProvider::new(MockProvider::new(
            "kafra_server",
            MockResult::Hang,
        )));

        let result =
            tokio::time::timeout(Duration::from_millis(20), dispatcher.respond("hi", &[])).await;
        assert!(result.is_err());
        assert!(!dispatcher.status().in_flight);
    }

    #[tokio::test]
    async fn test_history_is_trimmed_and_mapped() {
        let primary = MockProvider::ok("kafra_server", "ok");
        let seen = primary.seen.clone();
        let dispatcher = ChatDispatcher::new(DispatcherConfig {
            history_limit: 2,
            system_prompt: Some("persona".to_string()),
            ..config()
        })
        .with_primary(BoxLlmProvider::new(primary));

        let history = vec![
            ChatMessage::user("one"),
            ChatMessage::bot("two"),
            ChatMessage::user("three"),
            ChatMessage::bot("four"),
        ];
        dispatcher.respond("  five  ", &history).await;

        let requests = seen.lock().unwrap();
        let request = &requests[0];
        let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["three", "four", "five"]);
        assert_eq!(request.messages[1].role, kafra_types::llm::MessageRole::Assistant);
        assert_eq!(request.system.as_deref(), Some("persona"));
        assert_eq!(request.max_tokens, 256);
    }

    #[tokio::test]
    async fn test_get_response_returns_text_only() {
        let dispatcher = ChatDispatcher::new(config())
            .with_primary(BoxLlmProvider::new(MockProvider::ok("kafra_server", "hey")));
        assert_eq!(dispatcher.get_response("hello", &[]).await, "hey");
    }

    #[test]
    fn test_config_from_client_config() {
        let client = ClientConfig {
            remote_timeout_secs: 0,
            ..ClientConfig::default()
        };
        let config = DispatcherConfig::from(&client);
        assert!(config.remote_timeout.is_none());
        assert_eq!(config.max_consecutive_errors, 3);
        assert_eq!(config.min_interval, Duration::from_secs(1));
    }
}
