//! Failure classification.
//!
//! Every raw [`FetchError`] passes through a [`Classifier`] before it reaches
//! the engine. Service-specific response patterns are data, not code: each
//! service ships a default rule table and configuration may prepend more.

use autoclaim_core::{ClaimFailure, FailureKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

// ============================================================================
// Rules
// ============================================================================

/// Serializable form of a [`ResponseRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Application or HTTP code the rule requires, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Regular expression matched against the remote message.
    pub pattern: String,
    /// Classification applied on match.
    pub kind: FailureKind,
}

/// One response pattern: `(code?, message regex) -> FailureKind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct ResponseRule {
    code: Option<i64>,
    pattern: Regex,
    kind: FailureKind,
}

impl ResponseRule {
    /// Compiles a rule.
    pub fn new(code: Option<i64>, pattern: &str, kind: FailureKind) -> Result<Self, regex::Error> {
        Ok(Self {
            code,
            pattern: Regex::new(pattern)?,
            kind,
        })
    }

    /// Rule matching an exact message.
    pub fn exact(code: Option<i64>, message: &str, kind: FailureKind) -> Result<Self, regex::Error> {
        Self::new(code, &format!("^{}$", regex::escape(message)), kind)
    }

    /// The classification this rule applies.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns true when `message` matches and the code constraint (if any)
    /// equals one of `codes`.
    pub fn matches(&self, codes: &[i64], message: &str) -> bool {
        if let Some(required) = self.code {
            if !codes.contains(&required) {
                return false;
            }
        }
        self.pattern.is_match(message)
    }
}

impl TryFrom<RuleSpec> for ResponseRule {
    type Error = regex::Error;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        Self::new(spec.code, &spec.pattern, spec.kind)
    }
}

impl From<ResponseRule> for RuleSpec {
    fn from(rule: ResponseRule) -> Self {
        Self {
            code: rule.code,
            pattern: rule.pattern.as_str().to_string(),
            kind: rule.kind,
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Maps raw fetch errors to [`ClaimFailure`]s.
///
/// Rules are tried in order; the first match wins. Errors no rule matches
/// fall back to a fixed policy: transport errors, timeouts, 408/429/5xx and
/// malformed bodies are transient, everything else is fatal.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: Vec<ResponseRule>,
}

impl Classifier {
    /// Creates a classifier from an ordered rule table.
    pub fn new(rules: Vec<ResponseRule>) -> Self {
        Self { rules }
    }

    /// Returns a classifier whose `overrides` are tried before the current rules.
    #[must_use]
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = ResponseRule>) -> Self {
        let mut rules: Vec<ResponseRule> = overrides.into_iter().collect();
        rules.append(&mut self.rules);
        self.rules = rules;
        self
    }

    /// The rule table, in match order.
    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }

    /// Classifies a remote message by rule table only.
    pub fn classify_message(&self, codes: &[i64], message: &str) -> Option<FailureKind> {
        self.rules
            .iter()
            .find(|rule| rule.matches(codes, message))
            .map(ResponseRule::kind)
    }

    /// Classifies a raw error.
    pub fn classify(&self, error: &FetchError) -> ClaimFailure {
        let kind = match error {
            FetchError::Http(e) => {
                if e.is_builder() {
                    FailureKind::Fatal
                } else {
                    FailureKind::Transient
                }
            }
            FetchError::Status {
                status,
                code,
                message,
            } => {
                let mut codes = vec![i64::from(*status)];
                codes.extend(code);
                self.classify_message(&codes, message)
                    .unwrap_or_else(|| status_fallback(*status))
            }
            FetchError::Rejected { code, message } => self
                .classify_message(&[*code], message)
                .unwrap_or(FailureKind::Fatal),
            FetchError::InvalidResponse(_) | FetchError::Json(_) => FailureKind::Transient,
            FetchError::InvalidUrl(_)
            | FetchError::InvalidHeader { .. }
            | FetchError::Credentials(_) => FailureKind::Fatal,
        };

        let message = error
            .remote_message()
            .map_or_else(|| error.to_string(), str::to_string);
        ClaimFailure::new(kind, message)
    }
}

fn status_fallback(status: u16) -> FailureKind {
    match status {
        408 | 429 | 500..=599 => FailureKind::Transient,
        _ => FailureKind::Fatal,
    }
}

// ============================================================================
// Tests
// ============================================================================
