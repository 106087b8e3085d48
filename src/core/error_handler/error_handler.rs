use crate::shared::constants::{MAX_ERRORS, MAX_ERROR_MESSAGE_LENGTH};
use crate::shared::error::SecurityError;
use crate::shared::types::Severity;
use crate::shared::utils::{current_timestamp_millis, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keywords marking a message as security related
const SECURITY_KEYWORDS: &[&str] = &[
    "auth", "password", "key", "encrypt", "decrypt", "token", "session", "csrf", "xss",
    "injection", "sql", "validation", "sanitize",
];

/// Context attached to a recorded error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    pub timestamp: DateTime<Utc>,
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub details: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            action: None,
            user_id: None,
            session_id: None,
            details: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn for_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }
}

/// A classified, retained error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: String,
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub is_security_error: bool,
    pub context: ErrorContext,
}

/// An explicitly typed security violation
///
/// Bypasses keyword inference; the raising code supplies the severity.
#[derive(Debug, Clone)]
pub struct SecurityViolation {
    pub violation_type: String,
    pub description: String,
    pub severity: Severity,
    pub context: Option<ErrorContext>,
}

/// Aggregate view over the retained records
#[derive(Debug, Clone, Serialize)]
pub struct ErrorStats {
    pub total: usize,
    pub by_severity: HashMap<Severity, usize>,
    pub recent_errors: usize,
}

/// Error intake with severity classification and bounded FIFO retention
///
/// Oldest records are silently evicted once capacity is reached. Intake
/// always returns normally, even for critical severity.
pub struct ErrorHandler {
    errors: Arc<RwLock<VecDeque<ErrorRecord>>>,
    max_errors: usize,
}

impl ErrorHandler {
    pub fn new(max_errors: usize) -> Self {
        Self {
            errors: Arc::new(RwLock::new(VecDeque::new())),
            max_errors,
        }
    }

    /// Record a typed toolkit error
    ///
    /// Severity comes from the error variant itself; the keyword heuristic
    /// only widens the security tag.
    pub async fn handle_error(&self, error: &SecurityError, context: Option<ErrorContext>) {
        let message = error.to_string();
        let record = ErrorRecord {
            id: generate_id(),
            code: format!("{}_{:X}", error.code_prefix(), current_timestamp_millis()),
            message: truncate_message(&message),
            severity: error.severity(),
            is_security_error: error.is_security_related() || is_security_related_text(&message),
            context: context.unwrap_or_default(),
        };
        self.record(record).await;
    }

    /// Record an error arriving from an untyped or external source
    ///
    /// Falls back to keyword inspection for severity classification.
    pub async fn handle_external(&self, message: &str, context: Option<ErrorContext>) {
        let record = ErrorRecord {
            id: generate_id(),
            code: format!("EXTERNAL_{:X}", current_timestamp_millis()),
            message: truncate_message(message),
            severity: classify_severity(message),
            is_security_error: is_security_related_text(message),
            context: context.unwrap_or_default(),
        };
        self.record(record).await;
    }

    /// Record an error produced by an external `anyhow`-based API
    pub async fn handle_untyped(&self, error: &anyhow::Error, context: Option<ErrorContext>) {
        self.handle_external(&error.to_string(), context).await;
    }

    /// Record an explicitly typed violation
    pub async fn handle_security_violation(&self, violation: SecurityViolation) {
        let record = ErrorRecord {
            id: generate_id(),
            code: format!("SEC_{}", violation.violation_type.to_uppercase()),
            message: truncate_message(&format!("Security violation: {}", violation.description)),
            severity: violation.severity,
            is_security_error: true,
            context: violation.context.unwrap_or_default(),
        };
        self.record(record).await;
    }

    async fn record(&self, record: ErrorRecord) {
        {
            let mut errors = self.errors.write().await;
            errors.push_back(record.clone());
            while errors.len() > self.max_errors {
                errors.pop_front();
            }
        }

        match record.severity {
            Severity::Critical => {
                log::error!("CRITICAL error [{}]: {}", record.code, record.message);
                self.trigger_security_alert(&record);
            }
            Severity::High => log::error!("HIGH severity error [{}]: {}", record.code, record.message),
            Severity::Medium => log::warn!("MEDIUM severity error [{}]: {}", record.code, record.message),
            Severity::Low => log::info!("LOW severity error [{}]: {}", record.code, record.message),
        }
    }

    /// Alerting hook for critical records; a genuine paging integration is
    /// an external collaborator
    fn trigger_security_alert(&self, record: &ErrorRecord) {
        log::error!(
            "SECURITY ALERT [{}] severity={} at {}: {}",
            record.code,
            record.severity,
            record.context.timestamp.to_rfc3339(),
            record.message
        );
    }

    /// Retained records, newest first, optionally filtered by severity
    pub async fn get_errors(&self, severity: Option<Severity>) -> Vec<ErrorRecord> {
        let errors = self.errors.read().await;
        errors
            .iter()
            .rev()
            .filter(|record| severity.map_or(true, |s| record.severity == s))
            .cloned()
            .collect()
    }

    /// Totals, per-severity counts and the trailing-hour count
    pub async fn get_error_stats(&self) -> ErrorStats {
        let errors = self.errors.read().await;

        let mut by_severity: HashMap<Severity, usize> =
            Severity::all().into_iter().map(|s| (s, 0)).collect();
        for record in errors.iter() {
            *by_severity.entry(record.severity).or_insert(0) += 1;
        }

        let one_hour_ago = Utc::now() - chrono::Duration::hours(1);
        let recent_errors = errors
            .iter()
            .filter(|record| record.context.timestamp > one_hour_ago)
            .count();

        ErrorStats {
            total: errors.len(),
            by_severity,
            recent_errors,
        }
    }

    pub async fn clear_errors(&self) {
        self.errors.write().await.clear();
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(MAX_ERRORS)
    }
}

/// Keyword-heuristic severity classification for untyped error text
pub fn classify_severity(message: &str) -> Severity {
    let message = message.to_lowercase();

    if message.contains("authentication") || message.contains("authorization") {
        return Severity::Critical;
    }
    if ["encryption", "decryption", "key", "password"]
        .iter()
        .any(|term| message.contains(term))
    {
        return Severity::High;
    }
    if ["validation", "input", "sanitize"]
        .iter()
        .any(|term| message.contains(term))
    {
        return Severity::Medium;
    }
    Severity::Low
}

/// Keyword membership check for the security tag
pub fn is_security_related_text(message: &str) -> bool {
    let message = message.to_lowercase();
    SECURITY_KEYWORDS.iter().any(|keyword| message.contains(keyword))
}

fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_error_severity_comes_from_the_variant() {
        let handler = ErrorHandler::default();
        handler
            .handle_error(&SecurityError::AuthenticationFailure, None)
            .await;

        let errors = handler.get_errors(None).await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Critical);
        assert!(errors[0].is_security_error);
        assert!(errors[0].code.starts_with("AUTH_TAG_"));
    }

    #[tokio::test]
    async fn test_keyword_fallback_classification() {
        assert_eq!(classify_severity("authorization denied"), Severity::Critical);
        assert_eq!(classify_severity("encryption module failed"), Severity::High);
        assert_eq!(classify_severity("input rejected by sanitize step"), Severity::Medium);
        assert_eq!(classify_severity("disk is getting full"), Severity::Low);

        let handler = ErrorHandler::default();
        handler.handle_external("password store unreachable", None).await;
        let errors = handler.get_errors(None).await;
        assert_eq!(errors[0].severity, Severity::High);
        assert!(errors[0].is_security_error);
    }

    #[tokio::test]
    async fn test_ring_buffer_evicts_oldest() {
        let handler = ErrorHandler::new(3);
        for index in 0..5 {
            handler
                .handle_external(&format!("plain failure {}", index), None)
                .await;
        }

        let errors = handler.get_errors(None).await;
        assert_eq!(errors.len(), 3);
        // newest first, oldest two evicted
        assert!(errors[0].message.contains("failure 4"));
        assert!(errors[2].message.contains("failure 2"));
    }

    #[tokio::test]
    async fn test_untyped_intake_uses_keyword_classification() {
        let handler = ErrorHandler::default();
        let error = anyhow::anyhow!("authentication backend timed out");
        handler.handle_untyped(&error, None).await;

        let errors = handler.get_errors(None).await;
        assert_eq!(errors[0].severity, Severity::Critical);
        assert!(errors[0].code.starts_with("EXTERNAL_"));
    }

    #[tokio::test]
    async fn test_security_violation_intake() {
        let handler = ErrorHandler::default();
        handler
            .handle_security_violation(SecurityViolation {
                violation_type: "xss".to_string(),
                description: "script tag in comment field".to_string(),
                severity: Severity::High,
                context: Some(ErrorContext::for_action("submit_comment")),
            })
            .await;

        let errors = handler.get_errors(Some(Severity::High)).await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "SEC_XSS");
        assert!(errors[0].is_security_error);
        assert_eq!(errors[0].context.action.as_deref(), Some("submit_comment"));
    }

    #[tokio::test]
    async fn test_get_errors_filters_by_severity() {
        let handler = ErrorHandler::default();
        handler.handle_error(&SecurityError::validation("bad input"), None).await;
        handler.handle_error(&SecurityError::crypto("derivation failed"), None).await;

        assert_eq!(handler.get_errors(Some(Severity::Medium)).await.len(), 1);
        assert_eq!(handler.get_errors(Some(Severity::High)).await.len(), 1);
        assert_eq!(handler.get_errors(Some(Severity::Critical)).await.len(), 0);
        assert_eq!(handler.get_errors(None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_error_stats() {
        let handler = ErrorHandler::default();
        handler.handle_error(&SecurityError::validation("bad input"), None).await;
        handler.handle_error(&SecurityError::AuthenticationFailure, None).await;
        handler.handle_external("nothing special", None).await;

        let stats = handler.get_error_stats().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_severity[&Severity::Medium], 1);
        assert_eq!(stats.by_severity[&Severity::Critical], 1);
        assert_eq!(stats.by_severity[&Severity::Low], 1);
        assert_eq!(stats.recent_errors, 3);
    }

    #[tokio::test]
    async fn test_clear_errors() {
        let handler = ErrorHandler::default();
        handler.handle_external("one", None).await;
        handler.clear_errors().await;
        assert!(handler.get_errors(None).await.is_empty());
        assert_eq!(handler.get_error_stats().await.total, 0);
    }

    #[tokio::test]
    async fn test_long_messages_are_truncated() {
        let handler = ErrorHandler::default();
        handler.handle_external(&"x".repeat(2000), None).await;
        let errors = handler.get_errors(None).await;
        assert_eq!(errors[0].message.chars().count(), MAX_ERROR_MESSAGE_LENGTH);
    }
}
