//! Natural-language summary generation for submitted assessments.
//!
//! # Responsibility
//! - Build the teacher-persona prompt from records and catalog targets.
//! - Call a text-generation provider once and downgrade every failure to a
//!   fixed fallback sentence.
//!
//! # Invariants
//! - [`generate_summary`] never fails; callers always receive text.
//! - Exactly one provider attempt per call. No retry.
//! - Log lines carry failure kinds only, never child names or notes.

use crate::model::assessment::AssessmentRecord;
use crate::model::target::Target;
use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;

pub use gemini::GeminiSummaryProvider;

/// Fallback used when the provider call fails.
pub const FAILURE_FALLBACK: &str = "Đã hoàn thành đánh giá định kỳ cho học sinh.";
/// Fallback used when the provider answers with no text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Đã ghi nhận kết quả đánh giá cho trẻ.";
/// Name used in the prompt when the child is unknown.
pub const UNKNOWN_CHILD_NAME: &str = "Trẻ";

/// Why a provider call produced no usable summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// No provider is configured (missing API key or disabled).
    NotConfigured,
    /// Request could not be sent or the connection failed.
    Transport(String),
    /// Provider answered with a non-success status.
    Status { code: u16, body: String },
    /// Response body could not be decoded.
    MalformedResponse(String),
    /// Response decoded but carried no text.
    EmptyResponse,
}

impl SummaryError {
    /// Short stable identifier for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyResponse => "empty_response",
        }
    }

    fn fallback_text(&self) -> &'static str {
        match self {
            Self::EmptyResponse => EMPTY_RESPONSE_FALLBACK,
            _ => FAILURE_FALLBACK,
        }
    }
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "summary provider is not configured"),
            Self::Transport(message) => write!(f, "summary request failed: {message}"),
            Self::Status { code, body } => {
                write!(f, "summary provider returned status {code}: {body}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "summary response is malformed: {message}")
            }
            Self::EmptyResponse => write!(f, "summary response contained no text"),
        }
    }
}

impl Error for SummaryError {}

/// Result of one summary attempt. Both arms carry displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(String),
    Fallback { text: String, reason: SummaryError },
}

impl SummaryOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Text-generation backend.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Stable provider name for logs.
    fn name(&self) -> &'static str;

    /// Sends `prompt` and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Provider used when summaries are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSummaryProvider;

#[async_trait]
impl SummaryProvider for DisabledSummaryProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
        Err(SummaryError::NotConfigured)
    }
}

/// Generates a summary for one child's records, falling back on any failure.
///
/// A reply that is empty after trimming counts as [`SummaryError::EmptyResponse`].
pub async fn generate_summary(
    provider: &dyn SummaryProvider,
    child_name: Option<&str>,
    records: &[AssessmentRecord],
    targets: &[Target],
) -> SummaryOutcome {
    let prompt = build_prompt(child_name.unwrap_or(UNKNOWN_CHILD_NAME), records, targets);
    let outcome = match provider.generate(&prompt).await {
        Ok(text) if text.trim().is_empty() => Err(SummaryError::EmptyResponse),
        Ok(text) => Ok(text.trim().to_string()),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(text) => {
            info!(
                "event=summary_generate module=summary status=ok provider={} records={}",
                provider.name(),
                records.len()
            );
            SummaryOutcome::Generated(text)
        }
        Err(reason) => {
            warn!(
                "event=summary_generate module=summary status=fallback provider={} error_code={}",
                provider.name(),
                reason.kind()
            );
            SummaryOutcome::Fallback {
                text: reason.fallback_text().to_string(),
                reason,
            }
        }
    }
}

/// Builds the prompt sent to the provider.
///
/// One line per record: `- <target content>: <status>` with an optional
/// `(Ghi chú: <note>)`. Records whose target is missing render empty content.
pub fn build_prompt(child_name: &str, records: &[AssessmentRecord], targets: &[Target]) -> String {
    let details = records
        .iter()
        .map(|record| {
            let content = targets
                .iter()
                .find(|target| target.id == record.target_id)
                .map_or("", |target| target.content.as_str());
            match record.note.as_deref().filter(|note| !note.is_empty()) {
                Some(note) => format!("- {content}: {} (Ghi chú: {note})", record.status),
                None => format!("- {content}: {}", record.status),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Bạn là một giáo viên mầm non Việt Nam giàu kinh nghiệm, am hiểu Thông tư 51/2020/TT-BGDĐT.\n\
         Dựa trên kết quả đánh giá thực tế của trẻ dưới đây, hãy viết một đoạn nhận xét chuyên môn (3-4 câu) ngắn gọn, súc tích và mang tính chất khuyến khích.\n\
         Nhận xét cần chỉ rõ ưu điểm nổi bật và những mặt trẻ cần rèn luyện thêm dựa trên \"Kết quả mong đợi\" của chương trình GDMN.\n\
         \n\
         Học sinh: {child_name}\n\
         Kết quả đánh giá chi tiết:\n\
         {details}\n\
         \n\
         Yêu cầu: Văn phong sư phạm, thân thiện với phụ huynh, đúng thuật ngữ giáo dục Việt Nam."
    )
}
