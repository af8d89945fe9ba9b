pub mod document;
pub mod qa;
pub mod ticket;

pub use document::{Document, DocumentChunk};
pub use qa::{clamp_confidence, AnswerSource, QaHistoryRecord, QaResult, RetrievalStrategy};
pub use ticket::{
    Department, ReplySuggestion, ReplyTone, RoutingDecision, RoutingRule, RoutingStrategy, Ticket,
    TicketStatus,
};
