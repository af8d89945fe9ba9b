use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed department set tickets can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "Finance")]
    Finance,
    #[serde(rename = "General")]
    General,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Hr => "HR",
            Department::It => "IT",
            Department::Finance => "Finance",
            Department::General => "General",
        }
    }

    /// Parse a department name case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hr" | "human resources" => Some(Department::Hr),
            "it" => Some(Department::It),
            "finance" => Some(Department::Finance),
            "general" => Some(Department::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// A helpdesk ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub subject: String,
    pub body: String,
    pub department: Option<Department>,
    pub status: TicketStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Create a new open ticket
    pub fn new(subject: String, body: String, created_by: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject,
            body,
            department: None,
            status: TicketStatus::Open,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// A keyword routing rule maintained by administrators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRule {
    pub id: Uuid,
    pub name: String,
    /// Comma-separated keyword list, matched as substrings
    pub keywords: String,
    pub department: Department,
    pub priority: i32,
    pub is_active: bool,
    /// Online accuracy estimate, 0..=100; nudged +5 on a confirmed-correct
    /// route and -3 on a confirmed-incorrect one, never recomputed
    pub accuracy: u8,
}

impl RoutingRule {
    pub fn new(name: &str, keywords: &str, department: Department) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            keywords: keywords.to_string(),
            department,
            priority: 0,
            is_active: true,
            accuracy: 50,
        }
    }

    /// The rule's keywords, lowercased and trimmed
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Apply a confirmed-outcome accuracy nudge, clamped to 0..=100
    pub fn nudge_accuracy(&mut self, was_correct: bool) {
        let adjusted = if was_correct {
            i16::from(self.accuracy) + 5
        } else {
            i16::from(self.accuracy) - 3
        };
        self.accuracy = adjusted.clamp(0, 100) as u8;
    }
}

/// Which routing strategy produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// An active keyword rule matched
    Rule,
    /// The chat model classified the ticket
    Ai,
    /// Hardcoded per-department keyword lists
    Heuristic,
    /// The whole pipeline failed; IT is the designed default
    Default,
}

/// Result of routing one ticket (ephemeral)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub department: Department,
    /// 0..=100 regardless of which strategy produced it
    pub confidence: u8,
    pub matched_rule: Option<String>,
    pub reasoning: String,
    pub strategy: RoutingStrategy,
}

/// Tone of a suggested ticket reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyTone {
    Professional,
    Empathetic,
    Technical,
}

impl ReplyTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyTone::Professional => "professional",
            ReplyTone::Empathetic => "empathetic",
            ReplyTone::Technical => "technical",
        }
    }
}

/// A tone-varied reply suggestion for a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySuggestion {
    pub tone: ReplyTone,
    pub text: String,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_parsing_is_case_insensitive() {
        assert_eq!(Department::parse("it"), Some(Department::It));
        assert_eq!(Department::parse("  HR "), Some(Department::Hr));
        assert_eq!(Department::parse("finance"), Some(Department::Finance));
        assert_eq!(Department::parse("legal"), None);
    }

    #[test]
    fn accuracy_nudges_stay_in_range() {
        let mut rule = RoutingRule::new("logins", "password,login", Department::It);
        rule.accuracy = 99;
        rule.nudge_accuracy(true);
        assert_eq!(rule.accuracy, 100);

        rule.accuracy = 1;
        rule.nudge_accuracy(false);
        assert_eq!(rule.accuracy, 0);

        rule.accuracy = 50;
        rule.nudge_accuracy(true);
        assert_eq!(rule.accuracy, 55);
        rule.nudge_accuracy(false);
        assert_eq!(rule.accuracy, 52);
    }

    #[test]
    fn keyword_list_trims_and_lowercases() {
        let rule = RoutingRule::new("logins", "Password, LOGIN , ", Department::It);
        assert_eq!(rule.keyword_list(), vec!["password", "login"]);
    }
}
