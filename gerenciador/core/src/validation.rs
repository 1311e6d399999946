use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// Format accepted for due dates submitted through forms.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Longest accepted name, matching the `nome` column.
pub const MAX_NAME_LEN: usize = 100;

/// Validation failures for a submitted record form.
///
/// The messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("O nome é obrigatório.")]
    EmptyName,
    #[error("O nome deve ter no máximo {max} caracteres.")]
    NameTooLong { max: usize },
    #[error("Formato de data inválido. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("A data de entrega não pode ser no passado!")]
    DueDateInPast(NaiveDate),
}

/// Validated fields for creating or editing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    pub name: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
}

/// Validates raw form values.
///
/// Dates before `today` are rejected; `today` itself is accepted. The due
/// time is the last second of the given day.
pub fn validate_record(
    name: &str,
    description: &str,
    due_date: &str,
    today: NaiveDate,
) -> Result<RecordInput, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }

    let due_date = parse_due_date(due_date)?;
    if due_date < today {
        return Err(ValidationError::DueDateInPast(due_date));
    }

    let description = description.trim();
    Ok(RecordInput {
        name: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        due_at: end_of_day(due_date),
    })
}

pub fn parse_due_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DUE_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Returns the last second of `date` in UTC.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(last_second).and_utc()
}
