use crate::core::similarity::ScoredChunk;
use crate::models::{ReplySuggestion, ReplyTone};
use crate::utils::{Error, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Character budget of the extractive fallback answer
const EXTRACT_BUDGET: usize = 450;
/// Confidence attached to the hardcoded reply templates
const TEMPLATE_REPLY_CONFIDENCE: f32 = 0.8;

/// Chat completion seam
///
/// Injected into the composer and the ticket router so tests can substitute
/// deterministic fakes; the client lifetime is owned by the composition root.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    fn name(&self) -> &str;

    /// Run one system+user exchange and return the model's text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat completer
pub struct OpenAiChatCompleter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiChatCompleter {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
            model,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChatCompleter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.to_string())
                    .build()
                    .map_err(|e| Error::llm_api(format!("failed to build request: {e}")))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user.to_string())
                    .build()
                    .map_err(|e| Error::llm_api(format!("failed to build request: {e}")))?
                    .into(),
            ])
            .temperature(0.3)
            .build()
            .map_err(|e| Error::llm_api(format!("failed to build request: {e}")))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| Error::llm_api(format!("chat request timed out after {:?}", self.timeout)))?
            .map_err(|e| Error::llm_api(format!("OpenAI API error: {e}")))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::llm_api("no content in chat response"))
    }
}

/// A chat completer for keyless runtime; every call reports unavailability
/// so callers exercise their documented fallbacks
pub struct UnavailableChatCompleter;

#[async_trait]
impl ChatCompleter for UnavailableChatCompleter {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(Error::llm_api("no chat provider configured"))
    }
}

/// Composes user-facing answers from ranked chunks
///
/// The primary path asks the chat model to answer strictly from the supplied
/// context; on any provider failure it degrades to an extractive answer
/// assembled from the chunks themselves. Composition never fails.
pub struct AnswerComposer {
    chat: Arc<dyn ChatCompleter>,
}

impl AnswerComposer {
    pub fn new(chat: Arc<dyn ChatCompleter>) -> Self {
        Self { chat }
    }

    /// Produce an answer for the question from the ranked chunks
    pub async fn compose(&self, question: &str, ranked: &[ScoredChunk]) -> String {
        if ranked.is_empty() {
            return no_context_answer();
        }

        let context = assemble_context(ranked);
        let system = "You are an internal helpdesk assistant. Answer the employee's \
                      question using ONLY the provided documentation excerpts. If the \
                      excerpts do not contain the answer, say so explicitly and suggest \
                      contacting the responsible department. Keep the answer short and \
                      practical.";
        let user = format!("{context}\n\nQuestion: {question}\n\nAnswer:");

        match self.chat.complete(system, &user).await {
            Ok(answer) => {
                info!(provider = self.chat.name(), "Composed grounded answer");
                answer
            }
            Err(e) => {
                warn!(error = %e, "Chat provider failed, using extractive answer");
                extractive_answer(question, ranked)
            }
        }
    }

    /// Generate three tone-varied reply suggestions for a ticket
    ///
    /// On chat failure, three fixed templates at confidence 0.8 are returned
    /// so the endpoint always has something to offer.
    pub async fn suggest_replies(&self, subject: &str, body: &str) -> Vec<ReplySuggestion> {
        let system = "You draft reply suggestions for helpdesk agents. Respond with a \
                      JSON array of exactly three objects, one per tone, shaped as \
                      {\"tone\": \"professional\"|\"empathetic\"|\"technical\", \
                      \"text\": string, \"confidence\": number between 0 and 1}. \
                      Respond with JSON only.";
        let user = format!("Ticket subject: {subject}\nTicket body: {body}");

        match self.chat.complete(system, &user).await {
            Ok(raw) => match parse_reply_suggestions(&raw) {
                Some(suggestions) => suggestions,
                None => {
                    warn!("Could not parse reply suggestions, using templates");
                    template_replies(subject)
                }
            },
            Err(e) => {
                warn!(error = %e, "Chat provider failed, using template replies");
                template_replies(subject)
            }
        }
    }
}

/// Numbered context block handed to the chat model
fn assemble_context(ranked: &[ScoredChunk]) -> String {
    let mut context = String::from("Documentation excerpts:\n\n");
    for (i, scored) in ranked.iter().enumerate() {
        context.push_str(&format!("[{}] {}\n\n", i + 1, scored.chunk.content));
    }
    context
}

/// Fallback answer when no chunk is in scope at all
fn no_context_answer() -> String {
    "I could not find documentation covering this question. Please contact the \
     appropriate department directly for assistance."
        .to_string()
}

/// Extractive fallback: a topic lead sentence plus the most relevant raw
/// chunk text, capped to a fixed character budget
fn extractive_answer(question: &str, ranked: &[ScoredChunk]) -> String {
    let lowered = question.to_lowercase();
    let lead = if lowered.contains("monitor")
        || lowered.contains("hardware")
        || lowered.contains("ekran")
        || lowered.contains("laptop")
    {
        "Hardware requests are handled by IT; the relevant documentation says the following. "
    } else if lowered.contains("vpn") || lowered.contains("network") || lowered.contains("internet")
    {
        "For network and VPN issues, the documentation offers these steps. "
    } else if lowered.contains("password") || lowered.contains("login") || lowered.contains("parol")
    {
        "For account and password issues, the documentation notes the following. "
    } else {
        ""
    };

    let mut body = String::new();
    for scored in ranked {
        if body.chars().count() >= EXTRACT_BUDGET {
            break;
        }
        if !body.is_empty() {
            body.push(' ');
        }
        body.push_str(scored.chunk.content.trim());
    }
    let mut excerpt: String = body.chars().take(EXTRACT_BUDGET).collect();
    if body.chars().count() > EXTRACT_BUDGET {
        excerpt.push('…');
    }

    format!("{lead}Based on documentation: {excerpt}")
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    tone: String,
    text: String,
    confidence: f32,
}

/// Parse the model's JSON reply-suggestion array, tolerating code fences
fn parse_reply_suggestions(raw: &str) -> Option<Vec<ReplySuggestion>> {
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let parsed: Vec<RawSuggestion> = serde_json::from_str(trimmed).ok()?;
    if parsed.len() != 3 {
        return None;
    }

    let suggestions: Vec<ReplySuggestion> = parsed
        .into_iter()
        .filter_map(|s| {
            let tone = match s.tone.as_str() {
                "professional" => ReplyTone::Professional,
                "empathetic" => ReplyTone::Empathetic,
                "technical" => ReplyTone::Technical,
                _ => return None,
            };
            Some(ReplySuggestion {
                tone,
                text: s.text,
                confidence: s.confidence.clamp(0.0, 1.0),
            })
        })
        .collect();

    (suggestions.len() == 3).then_some(suggestions)
}

/// Three fixed reply templates used when the chat provider is unavailable
fn template_replies(subject: &str) -> Vec<ReplySuggestion> {
    vec![
        ReplySuggestion {
            tone: ReplyTone::Professional,
            text: format!(
                "Thank you for reporting \"{subject}\". We have received your ticket and \
                 will follow up with next steps shortly."
            ),
            confidence: TEMPLATE_REPLY_CONFIDENCE,
        },
        ReplySuggestion {
            tone: ReplyTone::Empathetic,
            text: format!(
                "We understand how disruptive \"{subject}\" can be, and we are sorry for \
                 the inconvenience. Your ticket is with the right team now."
            ),
            confidence: TEMPLATE_REPLY_CONFIDENCE,
        },
        ReplySuggestion {
            tone: ReplyTone::Technical,
            text: format!(
                "Ticket \"{subject}\" has been logged. Please reply with any error \
                 messages, affected device names and the time the issue started so we \
                 can investigate."
            ),
            confidence: TEMPLATE_REPLY_CONFIDENCE,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentChunk;
    use uuid::Uuid;

    struct ScriptedChat {
        response: Option<String>,
    }

    #[async_trait]
    impl ChatCompleter for ScriptedChat {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.response
                .clone()
                .ok_or_else(|| Error::llm_api("scripted failure"))
        }
    }

    fn scored(content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: DocumentChunk::new(Uuid::new_v4(), 0, content.to_string()),
            similarity: 0.8,
        }
    }

    #[tokio::test]
    async fn llm_answer_is_passed_through() {
        let composer = AnswerComposer::new(Arc::new(ScriptedChat {
            response: Some("Grounded answer.".to_string()),
        }));
        let answer = composer.compose("question?", &[scored("context")]).await;
        assert_eq!(answer, "Grounded answer.");
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_extractive_answer() {
        let composer = AnswerComposer::new(Arc::new(ScriptedChat { response: None }));
        let answer = composer
            .compose(
                "Why does my VPN keep disconnecting?",
                &[scored("VPN connection troubleshooting steps: restart the client.")],
            )
            .await;
        assert!(answer.contains("Based on documentation:"));
        assert!(answer.contains("VPN connection troubleshooting steps"));
    }

    #[tokio::test]
    async fn no_context_yields_redirect_not_fabrication() {
        let composer = AnswerComposer::new(Arc::new(ScriptedChat { response: None }));
        let answer = composer.compose("anything", &[]).await;
        assert!(answer.contains("contact the appropriate department"));
    }

    #[test]
    fn extractive_answer_respects_budget() {
        let long = "word ".repeat(400);
        let answer = extractive_answer("generic question", &[scored(&long)]);
        assert!(answer.chars().count() < EXTRACT_BUDGET + 100);
        assert!(answer.ends_with('…'));
    }

    #[tokio::test]
    async fn reply_suggestions_fall_back_to_templates() {
        let composer = AnswerComposer::new(Arc::new(ScriptedChat { response: None }));
        let replies = composer.suggest_replies("Broken monitor", "It flickers").await;
        assert_eq!(replies.len(), 3);
        assert!(replies.iter().all(|r| (r.confidence - 0.8).abs() < 1e-6));
        assert!(replies.iter().any(|r| r.tone == ReplyTone::Professional));
        assert!(replies.iter().any(|r| r.tone == ReplyTone::Empathetic));
        assert!(replies.iter().any(|r| r.tone == ReplyTone::Technical));
    }

    #[tokio::test]
    async fn valid_json_reply_suggestions_are_parsed() {
        let json = r#"[
            {"tone": "professional", "text": "a", "confidence": 0.9},
            {"tone": "empathetic", "text": "b", "confidence": 0.7},
            {"tone": "technical", "text": "c", "confidence": 1.4}
        ]"#;
        let composer = AnswerComposer::new(Arc::new(ScriptedChat {
            response: Some(json.to_string()),
        }));
        let replies = composer.suggest_replies("s", "b").await;
        assert_eq!(replies.len(), 3);
        assert!((replies[2].confidence - 1.0).abs() < 1e-6);
    }
}
