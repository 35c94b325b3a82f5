//! Read-side projections over stored responses: the results table, per-question
//! chart distributions and the CSV export.
//!
//! Answers are looked up by `(response, question id)`. A question added after a
//! response was recorded, or an optional question the respondent skipped,
//! yields a placeholder instead of shifting columns.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use super::form::{Form, FormResponse, Question, QuestionId, ResponseId};

/// Cell text for a missing answer in the results table.
pub const TABLE_PLACEHOLDER: &str = "-";
/// Cell text for a missing answer in the CSV export.
pub const CSV_PLACEHOLDER: &str = "";
/// Title of the leading timestamp column.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";
/// Title of the leading id column in the CSV export.
pub const RESPONSE_ID_COLUMN: &str = "Response ID";

/// One table row per response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRow {
    /// Response the row was built from.
    pub response_id: ResponseId,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// One cell per question, in question order.
    pub cells: Vec<String>,
}

/// Tabular view of all responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    /// `Timestamp` followed by question texts.
    pub columns: Vec<String>,
    /// Rows in response order.
    pub rows: Vec<ResponseRow>,
}

/// Frequency of one distinct answer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    /// Answer value as stored.
    pub name: String,
    /// Number of responses with that value.
    pub value: usize,
}

/// Reasons a chart cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// The question is not part of the form.
    #[error("question not found")]
    UnknownQuestion,
    /// Charts are only defined for choice questions.
    #[error("charts are only available for choice questions")]
    NotAChoiceQuestion,
}

/// Rendered CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested download name.
    pub file_name: String,
    /// File body.
    pub body: String,
}

fn answer_index(response: &FormResponse) -> HashMap<QuestionId, &str> {
    response
        .answers
        .iter()
        .map(|answer| (answer.question_id, answer.value.as_str()))
        .collect()
}

fn cells<'a>(
    questions: &'a [Question],
    response: &'a FormResponse,
    placeholder: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    let answers = answer_index(response);
    questions.iter().map(move |question| {
        answers
            .get(&question.id)
            .copied()
            .unwrap_or(placeholder)
    })
}

/// Format a timestamp the way exports and tables display it.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the results table.
#[must_use]
pub fn table_projection(form: &Form, responses: &[FormResponse]) -> ResponseTable {
    let columns = std::iter::once(TIMESTAMP_COLUMN.to_owned())
        .chain(form.questions.iter().map(|question| question.text.clone()))
        .collect();
    let rows = responses
        .iter()
        .map(|response| ResponseRow {
            response_id: response.id,
            submitted_at: response.created_at,
            cells: cells(&form.questions, response, TABLE_PLACEHOLDER)
                .map(str::to_owned)
                .collect(),
        })
        .collect();
    ResponseTable { columns, rows }
}

/// Count answer values for a choice question in first-seen order.
///
/// Checkbox answers are stored comma-joined and counted as one compound value.
pub fn chart_distribution(
    form: &Form,
    responses: &[FormResponse],
    question_id: &QuestionId,
) -> Result<Vec<ChartSlice>, ChartError> {
    let question = form.question(question_id).ok_or(ChartError::UnknownQuestion)?;
    if !question.question_type.is_choice() {
        return Err(ChartError::NotAChoiceQuestion);
    }

    let mut slices: Vec<ChartSlice> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let values = responses
        .iter()
        .flat_map(|response| response.answers.iter())
        .filter(|answer| answer.question_id == *question_id)
        .map(|answer| answer.value.as_str());
    for value in values {
        if let Some(slice) = positions
            .get(value)
            .and_then(|position| slices.get_mut(*position))
        {
            slice.value += 1;
        } else {
            positions.insert(value, slices.len());
            slices.push(ChartSlice {
                name: value.to_owned(),
                value: 1,
            });
        }
    }
    Ok(slices)
}

/// Render all responses as CSV.
///
/// Fields are joined with commas and lines with `\n`. Values are written
/// verbatim; embedded commas, quotes and newlines are not escaped.
#[must_use]
pub fn csv_export(form: &Form, responses: &[FormResponse]) -> CsvExport {
    let header = [RESPONSE_ID_COLUMN, TIMESTAMP_COLUMN]
        .into_iter()
        .chain(form.questions.iter().map(|question| question.text.as_str()))
        .collect::<Vec<_>>()
        .join(",");
    let mut lines = Vec::with_capacity(responses.len() + 1);
    lines.push(header);
    for response in responses {
        let id = response.id.to_string();
        let timestamp = format_timestamp(response.created_at);
        let row = [id.as_str(), timestamp.as_str()]
            .into_iter()
            .chain(cells(&form.questions, response, CSV_PLACEHOLDER))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    CsvExport {
        file_name: csv_file_name(&form.title),
        body: lines.join("\n"),
    }
}

/// Download name for a form's export.
///
/// Control characters, quotes and path separators in the title are replaced
/// with `_` so the name always fits a `Content-Disposition` header.
#[must_use]
pub fn csv_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '"' | '\\' | '/') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{stem}-responses.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answer, AnswerId, FormId, QuestionType, UserId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn question(text: &str, question_type: QuestionType) -> Question {
        Question {
            id: QuestionId::random(),
            text: text.to_owned(),
            question_type,
            required: false,
            options: question_type
                .is_choice()
                .then(|| vec!["Red".to_owned(), "Blue".to_owned()]),
        }
    }

    fn response(form: &Form, answers: &[(usize, &str)], minute: u32) -> FormResponse {
        FormResponse {
            id: ResponseId::random(),
            form_id: form.id,
            created_at: Utc
                .with_ymd_and_hms(2024, 5, 1, 12, minute, 0)
                .single()
                .expect("valid timestamp"),
            answers: answers
                .iter()
                .map(|(index, value)| Answer {
                    id: AnswerId::random(),
                    question_id: form.questions[*index].id,
                    value: (*value).to_owned(),
                })
                .collect(),
        }
    }

    #[fixture]
    fn form() -> Form {
        let now = Utc::now();
        Form {
            id: FormId::random(),
            owner_id: UserId::random(),
            title: "Survey".to_owned(),
            description: None,
            published: true,
            created_at: now,
            updated_at: now,
            questions: vec![
                question("Name", QuestionType::Text),
                question("Colour", QuestionType::MultipleChoice),
                question("Extras", QuestionType::Checkbox),
            ],
            response_count: 0,
        }
    }

    #[rstest]
    fn table_has_timestamp_then_question_columns(form: Form) {
        let responses = vec![response(&form, &[(0, "Ada"), (1, "Red")], 1)];
        let table = table_projection(&form, &responses);

        assert_eq!(table.columns, ["Timestamp", "Name", "Colour", "Extras"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells, ["Ada", "Red", TABLE_PLACEHOLDER]);
        assert_eq!(table.rows[0].response_id, responses[0].id);
    }

    #[rstest]
    fn chart_counts_values_in_first_seen_order(form: Form) {
        let responses = vec![
            response(&form, &[(1, "Blue")], 1),
            response(&form, &[(1, "Red")], 2),
            response(&form, &[(1, "Blue")], 3),
        ];
        let chart = chart_distribution(&form, &responses, &form.questions[1].id).expect("chart");

        assert_eq!(
            chart,
            vec![
                ChartSlice { name: "Blue".to_owned(), value: 2 },
                ChartSlice { name: "Red".to_owned(), value: 1 },
            ]
        );
    }

    #[rstest]
    fn checkbox_answers_count_as_compound_values(form: Form) {
        let responses = vec![
            response(&form, &[(2, "Red,Blue")], 1),
            response(&form, &[(2, "Red")], 2),
        ];
        let chart = chart_distribution(&form, &responses, &form.questions[2].id).expect("chart");

        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].name, "Red,Blue");
    }

    #[rstest]
    fn chart_rejects_text_and_unknown_questions(form: Form) {
        assert_eq!(
            chart_distribution(&form, &[], &form.questions[0].id),
            Err(ChartError::NotAChoiceQuestion)
        );
        assert_eq!(
            chart_distribution(&form, &[], &QuestionId::random()),
            Err(ChartError::UnknownQuestion)
        );
    }

    #[rstest]
    fn csv_uses_empty_cells_for_missing_answers(mut form: Form) {
        let recorded = response(&form, &[(0, "Ada"), (1, "Red")], 5);
        form.questions.push(question("Added later", QuestionType::Text));

        let export = csv_export(&form, std::slice::from_ref(&recorded));
        let lines: Vec<&str> = export.body.split('\n').collect();

        assert_eq!(export.file_name, "Survey-responses.csv");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Response ID,Timestamp,Name,Colour,Extras,Added later");
        assert_eq!(
            lines[1],
            format!("{},2024-05-01T12:05:00Z,Ada,Red,,", recorded.id)
        );
    }

    #[rstest]
    fn csv_without_responses_is_just_the_header(form: Form) {
        let export = csv_export(&form, &[]);
        assert_eq!(export.body, "Response ID,Timestamp,Name,Colour,Extras");
    }

    #[rstest]
    #[case("Survey", "Survey-responses.csv")]
    #[case("Line one\nLine two", "Line one_Line two-responses.csv")]
    #[case("Say \"hi\"\r", "Say _hi__-responses.csv")]
    #[case("a/b\\c\tfeedback", "a_b_c_feedback-responses.csv")]
    fn csv_file_names_are_header_safe(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(csv_file_name(title), expected);
    }
}
