//! Findings, verification items and the enumerations they are built from.
//!
//! ## Types
//!
//! - [`AutomatedFinding`]: one upstream result for one WCAG criterion (input)
//! - [`VerificationItem`]: the reviewable unit derived from a finding
//! - [`SavedVerification`]: a persisted decision snapshot keyed by item id
//!
//! Upstream JSON is camelCase and not always well formed, so the input types
//! are lenient: missing fields fall back to defaults and unknown status strings
//! map to a catch-all variant instead of failing the whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::confidence::{deserialize_normalized, deserialize_percent};
use crate::history::{VerificationHistory, VerificationHistoryEntry};

/// WCAG conformance level of a criterion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub enum WcagLevel {
    #[default]
    A,
    AA,
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        };
        write!(f, "{}", s)
    }
}

/// Raw status reported by the analysis producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingStatus {
    Pass,
    Fail,
    #[default]
    NotTested,
    NotApplicable,
    /// Anything the producer emits that is not one of the above.
    Other,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::NotTested => "not_tested",
            Self::NotApplicable => "not_applicable",
            Self::Other => "other",
        }
    }
}

impl From<String> for FindingStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pass" | "passed" => Self::Pass,
            "fail" | "failed" => Self::Fail,
            "not_tested" | "untested" => Self::NotTested,
            "not_applicable" | "n/a" | "na" => Self::NotApplicable,
            _ => Self::Other,
        }
    }
}

impl From<FindingStatus> for String {
    fn from(status: FindingStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Whether the producer asked for human verification.
///
/// The producer's `needsVerification` flag is `true`, `false` or absent;
/// absent and `null` both map to [`NeedsVerification::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum NeedsVerification {
    Required,
    NotRequired,
    #[default]
    Unspecified,
}

impl NeedsVerification {
    /// Resolve the flag into a queue-inclusion decision.
    ///
    /// Every finding the producer surfaces gets at least a pass-through review
    /// unless the producer explicitly opted it out, so `Unspecified` is
    /// included.
    ///
    /// # Examples
    ///
    /// ```
    /// use a11y_verify_common::NeedsVerification;
    ///
    /// assert!(NeedsVerification::Required.requires_review());
    /// assert!(NeedsVerification::Unspecified.requires_review());
    /// assert!(!NeedsVerification::NotRequired.requires_review());
    /// ```
    pub fn requires_review(self) -> bool {
        !matches!(self, Self::NotRequired)
    }
}

impl From<Option<bool>> for NeedsVerification {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Required,
            Some(false) => Self::NotRequired,
            None => Self::Unspecified,
        }
    }
}

impl From<NeedsVerification> for Option<bool> {
    fn from(flag: NeedsVerification) -> Self {
        match flag {
            NeedsVerification::Required => Some(true),
            NeedsVerification::NotRequired => Some(false),
            NeedsVerification::Unspecified => None,
        }
    }
}

/// Outcome suggested by a not-applicable analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NaSuggestedStatus {
    NotApplicable,
    Applicable,
    Uncertain,
}

impl NaSuggestedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "not_applicable",
            Self::Applicable => "applicable",
            Self::Uncertain => "uncertain",
        }
    }
}

impl From<String> for NaSuggestedStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "not_applicable" | "n/a" | "na" => Self::NotApplicable,
            "applicable" => Self::Applicable,
            _ => Self::Uncertain,
        }
    }
}

impl From<NaSuggestedStatus> for String {
    fn from(status: NaSuggestedStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Automated recommendation that a criterion does not apply to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaSuggestion {
    pub suggested_status: NaSuggestedStatus,
    /// Confidence in the suggestion, 0-100.
    #[serde(default, deserialize_with = "deserialize_percent")]
    pub confidence: u8,
    #[serde(default)]
    pub rationale: String,
}

impl NaSuggestion {
    pub fn not_applicable(confidence: u8, rationale: impl Into<String>) -> Self {
        Self {
            suggested_status: NaSuggestedStatus::NotApplicable,
            confidence: confidence.min(100),
            rationale: rationale.into(),
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        self.suggested_status == NaSuggestedStatus::NotApplicable
    }
}

/// A single issue reference attached to a finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl IssueRef {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// One automated accessibility result for one criterion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedFinding {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub criterion_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: WcagLevel,
    #[serde(default)]
    pub status: FindingStatus,
    /// Raw score as emitted; may be a fraction or a percentage.
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub needs_verification: NeedsVerification,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub related_issues: Vec<IssueRef>,
    #[serde(default)]
    pub fixed_issues: Vec<IssueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub na_suggestion: Option<NaSuggestion>,
}

impl AutomatedFinding {
    /// Create a finding with an id, criterion, status and raw score.
    ///
    /// # Examples
    ///
    /// ```
    /// use a11y_verify_common::{AutomatedFinding, FindingStatus};
    ///
    /// let finding = AutomatedFinding::new("f-1", "1.4.1", FindingStatus::Pass, 0.95)
    ///     .with_name("Use of Color");
    /// assert_eq!(finding.criterion_id.as_deref(), Some("1.4.1"));
    /// ```
    pub fn new(
        id: impl Into<String>,
        criterion_id: impl Into<String>,
        status: FindingStatus,
        confidence_score: f64,
    ) -> Self {
        Self {
            id: Some(id.into()),
            criterion_id: Some(criterion_id.into()),
            status,
            confidence_score: Some(confidence_score),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_level(mut self, level: WcagLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_needs_verification(mut self, flag: NeedsVerification) -> Self {
        self.needs_verification = flag;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_related_issues(mut self, issues: Vec<IssueRef>) -> Self {
        self.related_issues = issues;
        self
    }

    pub fn with_fixed_issues(mut self, issues: Vec<IssueRef>) -> Self {
        self.fixed_issues = issues;
        self
    }

    pub fn with_na_suggestion(mut self, suggestion: NaSuggestion) -> Self {
        self.na_suggestion = Some(suggestion);
        self
    }
}

/// Triage severity. Ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Serious,
    #[default]
    Moderate,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "serious" => Ok(Self::Serious),
            "moderate" => Ok(Self::Moderate),
            "minor" => Ok(Self::Minor),
            _ => Err(format!(
                "Invalid severity '{}'. Valid values: critical, serious, moderate, minor",
                s
            )),
        }
    }
}

/// Four-way bucket derived from the numeric confidence score.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    #[default]
    Manual,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "manual" => Ok(Self::Manual),
            _ => Err(format!(
                "Invalid confidence level '{}'. Valid values: high, medium, low, manual",
                s
            )),
        }
    }
}

/// Automated result as shown to the reviewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomatedResult {
    Pass,
    Fail,
    Warning,
    #[default]
    NotTested,
}

impl AutomatedResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warning => "warning",
            Self::NotTested => "not_tested",
        }
    }
}

impl fmt::Display for AutomatedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review status of a verification item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    VerifiedPass,
    VerifiedFail,
    VerifiedPartial,
    Deferred,
}

impl VerificationStatus {
    /// Check if this is one of the `verified_*` outcomes.
    ///
    /// # Examples
    ///
    /// ```
    /// use a11y_verify_common::VerificationStatus;
    ///
    /// assert!(VerificationStatus::VerifiedPartial.is_verified());
    /// assert!(!VerificationStatus::Deferred.is_verified());
    /// ```
    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            Self::VerifiedPass | Self::VerifiedFail | Self::VerifiedPartial
        )
    }

    /// Fail and partial decisions must explain themselves.
    pub fn requires_notes(&self) -> bool {
        matches!(self, Self::VerifiedFail | Self::VerifiedPartial)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::VerifiedPass => "verified_pass",
            Self::VerifiedFail => "verified_fail",
            Self::VerifiedPartial => "verified_partial",
            Self::Deferred => "deferred",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "verified_pass" | "pass" => Ok(Self::VerifiedPass),
            "verified_fail" | "fail" => Ok(Self::VerifiedFail),
            "verified_partial" | "partial" => Ok(Self::VerifiedPartial),
            "deferred" => Ok(Self::Deferred),
            _ => Err(format!(
                "Invalid status '{}'. Valid values: verified_pass, verified_fail, verified_partial, deferred",
                s
            )),
        }
    }
}

/// Tool or technique the reviewer used to check the criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationMethod {
    #[serde(rename = "NVDA")]
    Nvda,
    #[serde(rename = "JAWS")]
    Jaws,
    #[serde(rename = "VoiceOver")]
    VoiceOver,
    #[serde(rename = "TalkBack")]
    TalkBack,
    #[serde(rename = "Narrator")]
    Narrator,
    #[serde(rename = "Keyboard Only")]
    KeyboardOnly,
    #[serde(rename = "Color Contrast Analyzer")]
    ContrastAnalyzer,
    #[default]
    #[serde(rename = "Manual Review")]
    ManualReview,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nvda => "NVDA",
            Self::Jaws => "JAWS",
            Self::VoiceOver => "VoiceOver",
            Self::TalkBack => "TalkBack",
            Self::Narrator => "Narrator",
            Self::KeyboardOnly => "Keyboard Only",
            Self::ContrastAnalyzer => "Color Contrast Analyzer",
            Self::ManualReview => "Manual Review",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "nvda" => Ok(Self::Nvda),
            "jaws" => Ok(Self::Jaws),
            "voiceover" => Ok(Self::VoiceOver),
            "talkback" => Ok(Self::TalkBack),
            "narrator" => Ok(Self::Narrator),
            "keyboard" | "keyboardonly" => Ok(Self::KeyboardOnly),
            "contrast" | "colorcontrastanalyzer" | "colourcontrastanalyser" => {
                Ok(Self::ContrastAnalyzer)
            }
            "manual" | "manualreview" => Ok(Self::ManualReview),
            _ => Err(format!(
                "Invalid method '{}'. Valid values: nvda, jaws, voiceover, talkback, narrator, keyboard, contrast, manual",
                s
            )),
        }
    }
}

/// Persisted decision snapshot, keyed by item id in a saved-decision map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVerification {
    pub status: VerificationStatus,
    #[serde(default)]
    pub method: VerificationMethod,
    #[serde(default)]
    pub notes: String,
    pub verified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
}

impl SavedVerification {
    /// Snapshot a committed history entry.
    pub fn from_entry(entry: &VerificationHistoryEntry) -> Self {
        Self {
            status: entry.status,
            method: entry.method,
            notes: entry.notes.clone(),
            verified_at: entry.verified_at,
            verified_by: Some(entry.verified_by.clone()),
        }
    }

    /// Rehydrate the snapshot as the single history entry of `item_id`.
    ///
    /// The entry id is derived from the item id so repeated rehydration of
    /// the same snapshot yields identical entries.
    pub fn to_entry(&self, item_id: &str) -> VerificationHistoryEntry {
        VerificationHistoryEntry {
            id: format!("{}-saved", item_id),
            status: self.status,
            method: self.method,
            notes: self.notes.clone(),
            verified_by: self
                .verified_by
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            verified_at: self.verified_at,
        }
    }
}

/// The reviewable unit derived from a finding plus any human decision.
///
/// The current status, method and notes are read from the last history
/// entry, so they can never disagree with the decision log. A fresh item is
/// `pending` with empty notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemWire", into = "ItemWire")]
pub struct VerificationItem {
    pub id: String,
    pub criterion_id: String,
    pub criterion_name: String,
    pub wcag_level: WcagLevel,
    pub severity: Severity,
    pub confidence_level: ConfidenceLevel,
    /// Always on the 0-100 scale.
    pub confidence_score: u8,
    pub automated_result: AutomatedResult,
    pub automated_notes: String,
    pub issues: Vec<IssueRef>,
    pub fixed_issues: Vec<IssueRef>,
    pub na_suggestion: Option<NaSuggestion>,
    history: VerificationHistory,
    synthesized_history: bool,
}

impl VerificationItem {
    /// Create a pending item with default classification fields.
    pub fn new(id: impl Into<String>, criterion_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            criterion_id: criterion_id.into(),
            criterion_name: String::new(),
            wcag_level: WcagLevel::default(),
            severity: Severity::default(),
            confidence_level: ConfidenceLevel::default(),
            confidence_score: 0,
            automated_result: AutomatedResult::default(),
            automated_notes: String::new(),
            issues: Vec::new(),
            fixed_issues: Vec::new(),
            na_suggestion: None,
            history: VerificationHistory::new(),
            synthesized_history: false,
        }
    }

    /// Start the item's history from a previously committed decision.
    pub fn with_decision(mut self, entry: VerificationHistoryEntry) -> Self {
        self.history.append(entry);
        self
    }

    pub fn status(&self) -> VerificationStatus {
        self.history
            .latest()
            .map(|e| e.status)
            .unwrap_or_default()
    }

    pub fn method(&self) -> Option<VerificationMethod> {
        self.history.latest().map(|e| e.method)
    }

    pub fn notes(&self) -> &str {
        self.history.latest().map(|e| e.notes.as_str()).unwrap_or("")
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.history.latest().map(|e| e.verified_at)
    }

    pub fn history(&self) -> &VerificationHistory {
        &self.history
    }

    /// True when the backend sent a bare status and the log was rebuilt from it.
    pub fn has_synthesized_history(&self) -> bool {
        self.synthesized_history
    }

    pub fn is_verified(&self) -> bool {
        self.status().is_verified()
    }

    pub fn is_pending(&self) -> bool {
        self.status().is_pending()
    }

    /// Append a committed decision.
    pub fn record(&mut self, entry: VerificationHistoryEntry) {
        self.history.append(entry);
    }

    /// Continue `other`'s review on this item: its decision log replaces ours.
    ///
    /// Used when a freshly classified candidate supersedes a live item that
    /// already carries decisions, and when a remote confirmation extends the
    /// live log.
    pub fn carry_review_from(&mut self, other: &VerificationItem) {
        self.history = other.history.clone();
        self.synthesized_history = other.synthesized_history;
    }
}

/// Serialized form of [`VerificationItem`], as exchanged with the backend.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemWire {
    id: String,
    #[serde(default)]
    criterion_id: String,
    #[serde(default)]
    criterion_name: String,
    #[serde(default)]
    wcag_level: WcagLevel,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    confidence_level: ConfidenceLevel,
    #[serde(default, deserialize_with = "deserialize_normalized")]
    confidence_score: u8,
    #[serde(default)]
    automated_result: AutomatedResult,
    #[serde(default)]
    automated_notes: String,
    #[serde(default)]
    status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<VerificationMethod>,
    #[serde(default)]
    notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    history: VerificationHistory,
    #[serde(default)]
    issues: Vec<IssueRef>,
    #[serde(default)]
    fixed_issues: Vec<IssueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    na_suggestion: Option<NaSuggestion>,
}

impl From<ItemWire> for VerificationItem {
    fn from(wire: ItemWire) -> Self {
        let mut history = wire.history;
        let synthesized_history = history.is_empty() && !wire.status.is_pending();
        // A bare status without a log still represents a committed decision.
        if synthesized_history {
            history = VerificationHistory::single(VerificationHistoryEntry {
                id: format!("{}-remote", wire.id),
                status: wire.status,
                method: wire.method.unwrap_or_default(),
                notes: wire.notes,
                verified_by: wire.verified_by.unwrap_or_else(|| "unknown".to_string()),
                verified_at: wire.verified_at.unwrap_or_else(Utc::now),
            });
        }

        Self {
            id: wire.id,
            criterion_id: wire.criterion_id,
            criterion_name: wire.criterion_name,
            wcag_level: wire.wcag_level,
            severity: wire.severity,
            confidence_level: wire.confidence_level,
            confidence_score: wire.confidence_score,
            automated_result: wire.automated_result,
            automated_notes: wire.automated_notes,
            issues: wire.issues,
            fixed_issues: wire.fixed_issues,
            na_suggestion: wire.na_suggestion,
            history,
            synthesized_history,
        }
    }
}

impl From<VerificationItem> for ItemWire {
    fn from(item: VerificationItem) -> Self {
        let latest = item.history.latest().cloned();
        Self {
            status: item.status(),
            method: latest.as_ref().map(|e| e.method),
            notes: latest.as_ref().map(|e| e.notes.clone()).unwrap_or_default(),
            verified_by: latest.as_ref().map(|e| e.verified_by.clone()),
            verified_at: latest.as_ref().map(|e| e.verified_at),
            id: item.id,
            criterion_id: item.criterion_id,
            criterion_name: item.criterion_name,
            wcag_level: item.wcag_level,
            severity: item.severity,
            confidence_level: item.confidence_level,
            confidence_score: item.confidence_score,
            automated_result: item.automated_result,
            automated_notes: item.automated_notes,
            history: item.history,
            issues: item.issues,
            fixed_issues: item.fixed_issues,
            na_suggestion: item.na_suggestion,
        }
    }
}
