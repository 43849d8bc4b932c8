//! Active-symbol resolution
//!
//! Decides which ticker symbol a turn is about: an explicit mention in
//! the utterance wins, an anaphoric utterance ("what about it?") falls
//! back to the session's current subject, and anything else leaves the
//! session untouched. After the agent replies, a tool invocation that
//! carried a symbol argument is the authoritative update for the next
//! turn.

use regex::Regex;
use tracing::{debug, warn};

use crate::session::{Session, SessionManager, SessionPatch};
use crate::symbol::{SymbolExtractor, UppercaseRunExtractor};
use crate::turn::AssistantOutput;
use crate::Result;

/// Reference phrases that point back at an earlier subject
const PRONOUN_PATTERN: &str =
    r"(?i)\b(it|that|them|they|this|those|the stock|the company|the previous one|the last one)\b";

/// Common conversational words the default extractor skips
///
/// Without this the first capitalized-after-folding word of almost any
/// question ("WHAT", "TELL") would win. The list is not a dictionary:
/// all-caps words outside it ("OK", "CEO") still misfire, which is the
/// accepted cost of the heuristic.
const DEFAULT_STOPWORDS: &[&str] = &[
    "A", "AN", "AND", "ABOUT", "ARE", "AT", "BY", "CAN", "DO", "DOES", "FOR", "FROM", "GIVE",
    "HOW", "IN", "IS", "IT", "ITS", "ME", "MUCH", "OF", "ON", "OR", "PLEASE", "PRICE", "SHOW",
    "STOCK", "TELL", "THAT", "THE", "THEM", "THEY", "THIS", "THOSE", "TO", "US", "WAS", "WHAT",
    "WHEN", "WHERE", "WHICH", "WHO", "WHY", "WILL", "WITH", "YOU",
];

/// Resolves the active symbol for each turn
pub struct SymbolResolver {
    extractor: Box<dyn SymbolExtractor>,
    pronouns: Regex,
}

impl SymbolResolver {
    /// Resolver with the default heuristic extractor
    pub fn new() -> Self {
        Self::with_extractor(Box::new(UppercaseRunExtractor::with_stopwords(
            DEFAULT_STOPWORDS.iter().copied(),
        )))
    }

    /// Resolver with a custom extraction strategy
    pub fn with_extractor(extractor: Box<dyn SymbolExtractor>) -> Self {
        Self {
            extractor,
            pronouns: Regex::new(PRONOUN_PATTERN).unwrap(),
        }
    }

    /// Whether the utterance refers back to an earlier subject
    fn is_anaphoric(&self, text: &str) -> bool {
        self.pronouns.is_match(text)
    }

    /// Resolve the active symbol for this turn and persist a change
    ///
    /// Returns the session to use for the rest of the turn; when the
    /// symbol changed, that is the freshly re-read record so later
    /// steps observe the update.
    pub async fn resolve_and_update(
        &self,
        sessions: &SessionManager,
        session: Session,
        utterance: &str,
    ) -> Result<Session> {
        let mut resolved = self.extractor.extract(utterance);
        if resolved.is_none() && self.is_anaphoric(utterance) {
            resolved = session.active_symbol.clone();
        }

        let Some(symbol) = resolved else {
            return Ok(session);
        };

        if session.active_symbol.as_deref() == Some(symbol.as_str()) {
            return Ok(session);
        }

        debug!("Resolved active symbol for {}: {}", session.id, symbol);
        let updated = sessions
            .update_fields(&session.id, SessionPatch::active_symbol(symbol))
            .await?;
        Ok(updated.unwrap_or(session))
    }

    /// Record the symbol a tool invocation was made with
    ///
    /// Uppercases the argument, appends it to `referenced_symbols`
    /// (deduplicated, insertion order kept) and makes it the active
    /// symbol. Takes precedence over the pre-call heuristic for the
    /// next turn.
    pub async fn record_tool_symbol(
        &self,
        sessions: &SessionManager,
        session_id: &str,
        output: &AssistantOutput,
    ) -> Result<()> {
        let Some(symbol) = output.tool_symbol() else {
            return Ok(());
        };
        let symbol = symbol.to_uppercase();
        if !is_valid_symbol(&symbol) {
            warn!("Ignoring malformed tool symbol: {:?}", symbol);
            return Ok(());
        }

        let Some(current) = sessions.get(session_id).await? else {
            return Ok(());
        };

        let mut referenced = current.referenced_symbols;
        if !referenced.contains(&symbol) {
            referenced.push(symbol.clone());
        }

        sessions
            .update_fields(
                session_id,
                SessionPatch {
                    active_symbol: Some(Some(symbol)),
                    referenced_symbols: Some(referenced),
                    ..SessionPatch::default()
                },
            )
            .await?;
        Ok(())
    }
}

impl Default for SymbolResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticker symbols are uppercase alphanumeric tokens of length 1-20
pub fn is_valid_symbol(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 20
        && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
