// Shift module
// A scheduled staff assignment on one date, plus the draft/patch shapes used
// to create and edit it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque shift identifier assigned by the persistence layer.
///
/// Always a string, never compared numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShiftId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to a staff member owned outside the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Category of a shift. Only `ThemedTrivia` carries a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftType {
    #[default]
    Trivia,
    ThemedTrivia,
    MusicBingo,
    PrivateEvent,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Trivia => "trivia",
            ShiftType::ThemedTrivia => "themed-trivia",
            ShiftType::MusicBingo => "music-bingo",
            ShiftType::PrivateEvent => "private-event",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trivia" => Some(ShiftType::Trivia),
            "themed-trivia" => Some(ShiftType::ThemedTrivia),
            "music-bingo" => Some(ShiftType::MusicBingo),
            "private-event" => Some(ShiftType::PrivateEvent),
            _ => None,
        }
    }

    pub fn is_themed(&self) -> bool {
        matches!(self, ShiftType::ThemedTrivia)
    }
}

/// Form field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftField {
    Employee,
    Date,
    StartTime,
    EndTime,
    Type,
    Theme,
    Location,
}

/// Field-specific validation failure, shown next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: ShiftField,
    pub message: String,
}

impl ValidationError {
    fn new(field: ShiftField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A persisted shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shift {
    /// All fields except the id, ready to be created elsewhere.
    pub fn to_draft(&self) -> ShiftDraft {
        ShiftDraft {
            employee_id: self.employee_id.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            shift_type: self.shift_type,
            theme: self.theme.clone(),
            location: self.location.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Same as [`Shift::to_draft`] but placed on another date.
    pub fn draft_on(&self, date: NaiveDate) -> ShiftDraft {
        ShiftDraft {
            date,
            ..self.to_draft()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_draft().validate()
    }
}

/// Shift data before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDraft {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    #[serde(default)]
    pub theme: Option<String>,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShiftDraft {
    /// Create a trivia shift draft with the required fields.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use shift_calendar::models::shift::{EmployeeId, ShiftDraft, ShiftType};
    ///
    /// let draft = ShiftDraft::new(
    ///     EmployeeId::new("E1"),
    ///     NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
    ///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
    ///     "The Crown",
    /// )
    /// .with_type(ShiftType::ThemedTrivia)
    /// .with_theme("Eighties Movies");
    /// assert!(draft.validate().is_ok());
    /// ```
    pub fn new(
        employee_id: EmployeeId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        location: impl Into<String>,
    ) -> Self {
        Self {
            employee_id,
            date,
            start_time,
            end_time,
            shift_type: ShiftType::default(),
            theme: None,
            location: location.into(),
            notes: None,
        }
    }

    pub fn with_type(mut self, shift_type: ShiftType) -> Self {
        self.shift_type = shift_type;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn into_shift(self, id: ShiftId) -> Shift {
        Shift {
            id,
            employee_id: self.employee_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            shift_type: self.shift_type,
            theme: self.theme,
            location: self.location,
            notes: self.notes,
        }
    }

    /// Clear the theme for non-themed types and blank optional text.
    pub fn normalized(mut self) -> Self {
        if !self.shift_type.is_themed() {
            self.theme = None;
        }
        self.theme = self.theme.map(|t| t.trim().to_string());
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// Check the form invariants, reporting the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.employee_id.as_str().trim().is_empty() {
            return Err(ValidationError::new(
                ShiftField::Employee,
                "Please select an employee",
            ));
        }

        if self.end_time <= self.start_time {
            return Err(ValidationError::new(
                ShiftField::EndTime,
                "End time must be after start time",
            ));
        }

        let has_theme = self
            .theme
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if self.shift_type.is_themed() && !has_theme {
            return Err(ValidationError::new(
                ShiftField::Theme,
                "Please enter a theme for themed trivia",
            ));
        }
        if !self.shift_type.is_themed() && self.theme.is_some() {
            return Err(ValidationError::new(
                ShiftField::Theme,
                "Only themed trivia shifts can have a theme",
            ));
        }

        if self.location.trim().is_empty() {
            return Err(ValidationError::new(
                ShiftField::Location,
                "Please select a location",
            ));
        }

        Ok(())
    }
}

/// Raw text as entered in the shift editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftForm {
    pub employee_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
    pub theme: String,
    pub location: String,
    pub notes: String,
}

impl ShiftForm {
    /// Parse and validate the form into a draft.
    pub fn parse(&self) -> Result<ShiftDraft, ValidationError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::new(ShiftField::Date, "Please enter a valid date"))?;
        let start_time = parse_wall_clock(&self.start_time).ok_or_else(|| {
            ValidationError::new(ShiftField::StartTime, "Please enter a start time")
        })?;
        let end_time = parse_wall_clock(&self.end_time)
            .ok_or_else(|| ValidationError::new(ShiftField::EndTime, "Please enter an end time"))?;
        let shift_type = ShiftType::parse(self.shift_type.trim())
            .ok_or_else(|| ValidationError::new(ShiftField::Type, "Please select a shift type"))?;

        let theme = Some(self.theme.trim().to_string()).filter(|t| !t.is_empty());
        let draft = ShiftDraft {
            employee_id: EmployeeId::new(self.employee_id.trim()),
            date,
            start_time,
            end_time,
            shift_type,
            theme,
            location: self.location.trim().to_string(),
            notes: Some(self.notes.clone()),
        }
        .normalized();

        draft.validate()?;
        Ok(draft)
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Partial update applied to an existing shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftPatch {
    pub employee_id: Option<EmployeeId>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub shift_type: Option<ShiftType>,
    pub theme: Option<Option<String>>,
    pub location: Option<String>,
    pub notes: Option<Option<String>>,
}

impl ShiftPatch {
    /// Patch that only moves the shift to another date.
    pub fn move_to(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Return a copy of `shift` with this patch applied and normalized.
    pub fn applied_to(&self, shift: &Shift) -> Shift {
        let mut draft = shift.to_draft();
        if let Some(employee_id) = &self.employee_id {
            draft.employee_id = employee_id.clone();
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(start_time) = self.start_time {
            draft.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            draft.end_time = end_time;
        }
        if let Some(shift_type) = self.shift_type {
            draft.shift_type = shift_type;
        }
        if let Some(theme) = &self.theme {
            draft.theme = theme.clone();
        }
        if let Some(location) = &self.location {
            draft.location = location.clone();
        }
        if let Some(notes) = &self.notes {
            draft.notes = notes.clone();
        }
        draft.normalized().into_shift(shift.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_draft() -> ShiftDraft {
        ShiftDraft::new(
            EmployeeId::new("E1"),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time(19, 0),
            time(21, 0),
            "The Crown",
        )
    }

    #[test]
    fn test_valid_draft() {
        assert!(sample_draft().validate().is_ok());
    }

    #[test]
    fn test_missing_employee() {
        let mut draft = sample_draft();
        draft.employee_id = EmployeeId::new("  ");
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field, ShiftField::Employee);
    }

    #[test]
    fn test_end_before_start() {
        let mut draft = sample_draft();
        draft.end_time = time(18, 0);
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field, ShiftField::EndTime);
        assert_eq!(err.to_string(), "End time must be after start time");
    }

    #[test]
    fn test_themed_requires_theme() {
        let draft = sample_draft().with_type(ShiftType::ThemedTrivia);
        assert_eq!(draft.validate().unwrap_err().field, ShiftField::Theme);

        let blank = sample_draft()
            .with_type(ShiftType::ThemedTrivia)
            .with_theme("   ");
        assert_eq!(blank.validate().unwrap_err().field, ShiftField::Theme);
    }

    #[test]
    fn test_theme_rejected_on_plain_trivia() {
        let draft = sample_draft().with_theme("Harry Potter");
        assert_eq!(draft.validate().unwrap_err().field, ShiftField::Theme);
        assert!(draft.normalized().validate().is_ok());
    }

    #[test]
    fn test_missing_location() {
        let mut draft = sample_draft();
        draft.location = String::new();
        assert_eq!(draft.validate().unwrap_err().field, ShiftField::Location);
    }

    #[test]
    fn test_patch_clears_theme_when_type_changes() {
        let shift = sample_draft()
            .with_type(ShiftType::ThemedTrivia)
            .with_theme("Disney")
            .into_shift(ShiftId::new("s1"));
        let patch = ShiftPatch {
            shift_type: Some(ShiftType::MusicBingo),
            ..ShiftPatch::default()
        };
        let updated = patch.applied_to(&shift);
        assert_eq!(updated.shift_type, ShiftType::MusicBingo);
        assert_eq!(updated.theme, None);
        assert_eq!(updated.id, shift.id);
    }

    #[test]
    fn test_draft_on_keeps_everything_but_date() {
        let shift = sample_draft()
            .with_notes("Bring the buzzers")
            .into_shift(ShiftId::new("s1"));
        let target = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
        let draft = shift.draft_on(target);
        assert_eq!(draft.date, target);
        assert_eq!(draft.notes.as_deref(), Some("Bring the buzzers"));
        assert_eq!(draft.employee_id, shift.employee_id);
    }

    #[test]
    fn test_shift_json_uses_camel_case() {
        let shift = sample_draft().into_shift(ShiftId::new("abc"));
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(json["employeeId"], "E1");
        assert_eq!(json["date"], "2025-06-10");
        assert_eq!(json["type"], "trivia");
        assert!(json.get("theme").is_none());
    }

    fn sample_form() -> ShiftForm {
        ShiftForm {
            employee_id: "E1".to_string(),
            date: "2025-06-10".to_string(),
            start_time: "19:00".to_string(),
            end_time: "21:30".to_string(),
            shift_type: "themed-trivia".to_string(),
            theme: " Eighties ".to_string(),
            location: "The Crown".to_string(),
            notes: "  ".to_string(),
        }
    }

    #[test]
    fn test_form_parses_into_normalized_draft() {
        let draft = sample_form().parse().unwrap();
        assert_eq!(draft.end_time, time(21, 30));
        assert_eq!(draft.theme.as_deref(), Some("Eighties"));
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_form_reports_offending_field() {
        let mut form = sample_form();
        form.date = "June 10".to_string();
        assert_eq!(form.parse().unwrap_err().field, ShiftField::Date);

        let mut form = sample_form();
        form.start_time = String::new();
        assert_eq!(form.parse().unwrap_err().field, ShiftField::StartTime);

        let mut form = sample_form();
        form.shift_type = "karaoke".to_string();
        assert_eq!(form.parse().unwrap_err().field, ShiftField::Type);

        let mut form = sample_form();
        form.theme = String::new();
        assert_eq!(form.parse().unwrap_err().field, ShiftField::Theme);
    }

    #[test]
    fn test_form_drops_theme_for_other_types() {
        let mut form = sample_form();
        form.shift_type = "music-bingo".to_string();
        let draft = form.parse().unwrap();
        assert_eq!(draft.theme, None);
    }

    #[test]
    fn test_shift_type_round_trip_names() {
        for ty in [
            ShiftType::Trivia,
            ShiftType::ThemedTrivia,
            ShiftType::MusicBingo,
            ShiftType::PrivateEvent,
        ] {
            assert_eq!(ShiftType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ShiftType::parse("karaoke"), None);
    }
}
