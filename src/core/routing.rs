use crate::core::answer::ChatCompleter;
use crate::models::{Department, RoutingDecision, RoutingStrategy};
use crate::storage::Storage;
use crate::utils::{Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Base confidence of a rule match, before the per-keyword bonus
const RULE_BASE_CONFIDENCE: usize = 60;
/// Confidence bonus per matched rule keyword
const RULE_KEYWORD_BONUS: usize = 15;
/// Ceiling for rule-match confidence
const RULE_MAX_CONFIDENCE: usize = 95;
/// Confidence of a heuristic keyword hit
const HEURISTIC_CONFIDENCE: u8 = 55;
/// Confidence of the General catch-all
const HEURISTIC_GENERAL_CONFIDENCE: u8 = 40;
/// Confidence of the total-failure IT default
const DEFAULT_CONFIDENCE: u8 = 20;

/// Per-department keyword lists for the last-resort heuristic, checked in
/// this order
const IT_TERMS: &[&str] = &[
    "password", "login", "computer", "laptop", "monitor", "printer", "network",
    "vpn", "email", "software", "error", "bug", "komputer", "parol", "sebeke",
    "xeta",
];
const HR_TERMS: &[&str] = &[
    "leave", "vacation", "holiday", "recruit", "onboarding", "contract",
    "mezuniyyet", "ezamiyyet", "iseqebul",
];
const FINANCE_TERMS: &[&str] = &[
    "invoice", "payment", "salary", "budget", "expense", "reimburse", "maas",
    "odenis", "xerc",
];

/// Routes tickets to a department
///
/// Tries administrator-maintained keyword rules first, then AI
/// classification, then hardcoded keyword heuristics. Total pipeline failure
/// routes to IT at low confidence: the designed default for unroutable
/// tickets, never a silent drop.
pub struct TicketRouter {
    storage: Arc<dyn Storage>,
    chat: Arc<dyn ChatCompleter>,
}

impl TicketRouter {
    pub fn new(storage: Arc<dyn Storage>, chat: Arc<dyn ChatCompleter>) -> Self {
        Self { storage, chat }
    }

    /// Decide the department for a ticket; never fails
    pub async fn route(&self, subject: &str, body: &str) -> RoutingDecision {
        match self.route_inner(subject, body).await {
            Ok(decision) => {
                info!(
                    department = %decision.department,
                    confidence = decision.confidence,
                    strategy = ?decision.strategy,
                    "Ticket routed"
                );
                decision
            }
            Err(e) => {
                error!(error = %e, "Routing pipeline failed, defaulting to IT");
                RoutingDecision {
                    department: Department::It,
                    confidence: DEFAULT_CONFIDENCE,
                    matched_rule: None,
                    reasoning: "Routing failed; defaulted to IT for manual triage".to_string(),
                    strategy: RoutingStrategy::Default,
                }
            }
        }
    }

    async fn route_inner(&self, subject: &str, body: &str) -> Result<RoutingDecision> {
        let haystack = format!("{subject} {body}").to_lowercase();

        // First active rule with any keyword hit wins; rules are not ranked
        // against each other beyond their stored priority order
        let rules = self.storage.active_routing_rules().await?;
        for rule in rules {
            let matched: Vec<String> = rule
                .keyword_list()
                .into_iter()
                .filter(|keyword| haystack.contains(keyword.as_str()))
                .collect();
            if !matched.is_empty() {
                let confidence = (RULE_BASE_CONFIDENCE + RULE_KEYWORD_BONUS * matched.len())
                    .min(RULE_MAX_CONFIDENCE) as u8;
                return Ok(RoutingDecision {
                    department: rule.department,
                    confidence,
                    matched_rule: Some(rule.name.clone()),
                    reasoning: format!("Matched rule keywords: {}", matched.join(", ")),
                    strategy: RoutingStrategy::Rule,
                });
            }
        }

        match self.classify_with_ai(subject, body).await {
            Ok(decision) => Ok(decision),
            Err(e) => {
                warn!(error = %e, "AI classification failed, using keyword heuristics");
                Ok(heuristic_decision(&haystack))
            }
        }
    }

    /// Ask the chat model for a structured department classification
    async fn classify_with_ai(&self, subject: &str, body: &str) -> Result<RoutingDecision> {
        let system = "You classify helpdesk tickets into exactly one department: HR, IT, \
                      Finance or General. Respond with JSON only, shaped as {\"department\": \
                      \"HR\"|\"IT\"|\"Finance\"|\"General\", \"confidence\": number between 0 \
                      and 100, \"reasoning\": string}.";
        let user = format!("Subject: {subject}\nBody: {body}");

        let raw = self.chat.complete(system, &user).await?;
        let classification = parse_classification(&raw)?;

        let department = Department::parse(&classification.department).ok_or_else(|| {
            Error::llm_api(format!(
                "model returned unknown department: {}",
                classification.department
            ))
        })?;

        Ok(RoutingDecision {
            department,
            confidence: clamp_model_confidence(classification.confidence),
            matched_rule: None,
            reasoning: classification.reasoning,
            strategy: RoutingStrategy::Ai,
        })
    }

    /// Apply a confirmed-outcome accuracy nudge to a rule (+5 correct,
    /// -3 incorrect, clamped to 0..=100) and return the new accuracy
    pub async fn record_feedback(&self, rule_id: Uuid, was_correct: bool) -> Result<u8> {
        let mut rule = self
            .storage
            .routing_rule(rule_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("routing rule {rule_id}")))?;

        rule.nudge_accuracy(was_correct);
        let accuracy = rule.accuracy;
        self.storage.update_routing_rule(rule).await?;

        info!(%rule_id, was_correct, accuracy, "Routing rule accuracy updated");
        Ok(accuracy)
    }
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    department: String,
    confidence: f32,
    reasoning: String,
}

/// Parse the model's JSON classification, tolerating code fences
fn parse_classification(raw: &str) -> Result<RawClassification> {
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed)
        .map_err(|e| Error::llm_api(format!("unparseable classification: {e}")))
}

/// Clamp a model-reported confidence to 0..=100, guarding NaN
fn clamp_model_confidence(confidence: f32) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    confidence.round().clamp(0.0, 100.0) as u8
}

/// Fixed-priority keyword heuristic: IT, then HR, then Finance, else General
fn heuristic_decision(haystack: &str) -> RoutingDecision {
    let checks: &[(&[&str], Department)] = &[
        (IT_TERMS, Department::It),
        (HR_TERMS, Department::Hr),
        (FINANCE_TERMS, Department::Finance),
    ];

    for (terms, department) in checks {
        if let Some(term) = terms.iter().find(|t| haystack.contains(**t)) {
            return RoutingDecision {
                department: *department,
                confidence: HEURISTIC_CONFIDENCE,
                matched_rule: None,
                reasoning: format!("Heuristic keyword match: {term}"),
                strategy: RoutingStrategy::Heuristic,
            };
        }
    }

    RoutingDecision {
        department: Department::General,
        confidence: HEURISTIC_GENERAL_CONFIDENCE,
        matched_rule: None,
        reasoning: "No keyword matched; assigned to General".to_string(),
        strategy: RoutingStrategy::Heuristic,
    }
}
