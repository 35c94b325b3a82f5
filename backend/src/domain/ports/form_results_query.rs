//! Driving port for aggregated results.

use async_trait::async_trait;

use crate::domain::{ChartSlice, CsvExport, Error, FormId, QuestionId, ResponseTable, UserId};

/// Owner-only projections over a form's responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormResultsQuery: Send + Sync {
    /// One row per response with a cell per question.
    async fn table(&self, owner: &UserId, form_id: &FormId) -> Result<ResponseTable, Error>;

    /// Answer frequencies for a choice question.
    async fn chart(
        &self,
        owner: &UserId,
        form_id: &FormId,
        question_id: &QuestionId,
    ) -> Result<Vec<ChartSlice>, Error>;

    /// All responses rendered as CSV.
    async fn export_csv(&self, owner: &UserId, form_id: &FormId) -> Result<CsvExport, Error>;
}
