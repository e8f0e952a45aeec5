// Chat assistant prompt constants.

pub const CHAT_SYSTEM: &str = "You are a helpful assistant for job seekers.";

pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Phrases that route a chat message through the job search first.
pub const SEARCH_INTENT_KEYWORDS: &[&str] = &[
    "search", "find", "show me", "job", "jobs", "position", "opening",
];

/// Hits summarized into the prompt for search-intent messages.
pub const SEARCH_CONTEXT_HITS: u32 = 3;

pub const CONTEXT_DESCRIPTION_CHARS: usize = 100;

pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, I can't reach the assistant right now. Please try again in a moment.";
