//! Form validation for the report, patient, error-report and login forms.
//!
//! Validation never fails with a [`crate::TrackerError`]; it either produces a typed value or a
//! [`FormErrors`] map that the HTTP layer renders back to the visitor together with the submitted
//! values.

use crate::constants::{
    LONG_TEXT_MAX_LEN, MAX_AGE, PATIENT_FIELD_NAMES, SHORT_TEXT_MAX_LEN, SOURCE_MAX_LEN,
};
use crate::models::{CurrentStatus, Gender, NewErrorReport, PatientFields};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracker_types::{NonEmptyText, TextError};

/// Key under which errors not tied to a single field are collected.
pub const NON_FIELD_ERRORS: &str = "__all__";

const REQUIRED: &str = "This field is required.";

// ============================================================================
// SUBMITTED DATA
// ============================================================================

/// URL-encoded form data, keeping repeated keys and submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// The last value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `key`, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Submitted values grouped by key, for echoing back alongside errors.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in &self.pairs {
            map.entry(key.clone()).or_default().push(value.clone());
        }
        map
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormData {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Validation messages keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// Build a map holding a single non-field error.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add_non_field(message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

// ============================================================================
// FIELD RULES
// ============================================================================

/// The allowed values for a choice field.
///
/// The report form's district field uses [`Choices::from_submitted`]: the choice set is rebuilt
/// from the request itself, so any non-empty submitted district is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choices {
    values: Vec<String>,
}

impl Choices {
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A single-value choice set equal to what was submitted (empty if nothing was).
    pub fn from_submitted(submitted: Option<&str>) -> Self {
        Self::new(
            submitted
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        )
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

fn invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

fn too_long(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

fn submitted<'a>(data: &'a FormData, field: &str) -> Option<&'a str> {
    data.get(field).map(str::trim).filter(|v| !v.is_empty())
}

fn optional_text(
    data: &FormData,
    field: &str,
    max: usize,
    errors: &mut FormErrors,
) -> Option<String> {
    let value = submitted(data, field)?;
    let actual = value.chars().count();
    if actual > max {
        errors.add(field, too_long(max, actual));
        return None;
    }
    Some(value.to_string())
}

fn required_text(
    data: &FormData,
    field: &str,
    max: usize,
    errors: &mut FormErrors,
) -> Option<NonEmptyText> {
    match NonEmptyText::with_max_len(data.get(field).unwrap_or_default(), max) {
        Ok(text) => Some(text),
        Err(TextError::Empty) => {
            errors.add(field, REQUIRED);
            None
        }
        Err(TextError::TooLong { max, actual }) => {
            errors.add(field, too_long(max, actual));
            None
        }
    }
}

fn choice<T: Default>(
    data: &FormData,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
    errors: &mut FormErrors,
) -> T {
    match submitted(data, field) {
        None => T::default(),
        Some(value) => parse(value).unwrap_or_else(|| {
            errors.add(field, invalid_choice(value));
            T::default()
        }),
    }
}

fn age(data: &FormData, errors: &mut FormErrors) -> Option<u8> {
    let value = submitted(data, "age")?;
    let Ok(age) = value.parse::<i64>() else {
        errors.add("age", "Enter a whole number.");
        return None;
    };
    if age < 0 {
        errors.add("age", "Ensure this value is greater than or equal to 0.");
        return None;
    }
    match u8::try_from(age) {
        Ok(age) if age <= MAX_AGE => Some(age),
        _ => {
            errors.add(
                "age",
                format!("Ensure this value is less than or equal to {MAX_AGE}."),
            );
            None
        }
    }
}

fn date(data: &FormData, field: &str, errors: &mut FormErrors) -> Option<NaiveDate> {
    let value = submitted(data, field)?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date.");
            None
        }
    }
}

/// Shared patient-field validation. `district_choices` restricts `detected_district` when set.
fn validate_fields(
    data: &FormData,
    district_choices: Option<&Choices>,
) -> Result<PatientFields, FormErrors> {
    let mut errors = FormErrors::default();

    let name = optional_text(data, "name", SHORT_TEXT_MAX_LEN, &mut errors);
    let age = age(data, &mut errors);
    let gender = choice(data, "gender", Gender::parse, &mut errors);
    let detected_city = optional_text(data, "detected_city", SHORT_TEXT_MAX_LEN, &mut errors);
    let detected_district =
        required_text(data, "detected_district", SHORT_TEXT_MAX_LEN, &mut errors);
    let detected_state = required_text(data, "detected_state", SHORT_TEXT_MAX_LEN, &mut errors);
    let nationality = optional_text(data, "nationality", SHORT_TEXT_MAX_LEN, &mut errors);
    let current_status = choice(data, "current_status", CurrentStatus::parse, &mut errors);
    let diagnosed_date = date(data, "diagnosed_date", &mut errors);
    let notes = optional_text(data, "notes", LONG_TEXT_MAX_LEN, &mut errors);
    let source = optional_text(data, "source", SOURCE_MAX_LEN, &mut errors);

    if let (Some(choices), Some(district)) = (district_choices, &detected_district) {
        if !choices.contains(district.as_str()) {
            errors.add("detected_district", invalid_choice(district.as_str()));
        }
    }

    match (detected_district, detected_state) {
        (Some(detected_district), Some(detected_state)) if errors.is_empty() => Ok(PatientFields {
            name,
            age,
            gender,
            detected_city,
            detected_district,
            detected_state,
            nationality,
            current_status,
            diagnosed_date,
            notes,
            source,
        }),
        _ => Err(errors),
    }
}

// ============================================================================
// FORMS
// ============================================================================

/// The public report submission form.
pub struct ReportForm;

impl ReportForm {
    pub const NAME: &'static str = "report";

    /// Validate a submission. The district choice set is rebuilt from the submission itself.
    pub fn validate(data: &FormData) -> Result<PatientFields, FormErrors> {
        let districts = Choices::from_submitted(data.get("detected_district"));
        validate_fields(data, Some(&districts))
    }
}

/// The staff patient form used during review.
pub struct PatientForm;

impl PatientForm {
    pub const NAME: &'static str = "patient";

    pub fn validate(data: &FormData) -> Result<PatientFields, FormErrors> {
        validate_fields(data, None)
    }

    /// Initial form values for editing `fields`.
    pub fn initial(fields: &PatientFields) -> BTreeMap<String, String> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        BTreeMap::from([
            ("name".to_string(), optional(&fields.name)),
            (
                "age".to_string(),
                fields.age.map(|a| a.to_string()).unwrap_or_default(),
            ),
            ("gender".to_string(), fields.gender.as_str().to_string()),
            ("detected_city".to_string(), optional(&fields.detected_city)),
            (
                "detected_district".to_string(),
                fields.detected_district.as_str().to_string(),
            ),
            (
                "detected_state".to_string(),
                fields.detected_state.as_str().to_string(),
            ),
            ("nationality".to_string(), optional(&fields.nationality)),
            (
                "current_status".to_string(),
                fields.current_status.as_str().to_string(),
            ),
            (
                "diagnosed_date".to_string(),
                fields
                    .diagnosed_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
            ("notes".to_string(), optional(&fields.notes)),
            ("source".to_string(), optional(&fields.source)),
        ])
    }
}

/// The public correction form shown on a patient's detail page.
pub struct ErrorReportForm;

impl ErrorReportForm {
    pub const NAME: &'static str = "error_report";

    /// Validate `patient_id`, the repeated `errors` key and `correction`.
    ///
    /// Flagged fields keep their submission order; repeats are dropped.
    pub fn validate(data: &FormData) -> Result<NewErrorReport, FormErrors> {
        let mut errors = FormErrors::default();

        let patient_id = match submitted(data, "patient_id") {
            None => {
                errors.add("patient_id", REQUIRED);
                None
            }
            Some(value) => match value.parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                Ok(_) => {
                    errors.add("patient_id", "Ensure this value is greater than or equal to 1.");
                    None
                }
                Err(_) => {
                    errors.add("patient_id", "Enter a whole number.");
                    None
                }
            },
        };

        let mut flagged: Vec<String> = Vec::new();
        for value in data.get_all("errors") {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if !PATIENT_FIELD_NAMES.contains(&value) {
                errors.add("errors", invalid_choice(value));
            } else if !flagged.iter().any(|f| f == value) {
                flagged.push(value.to_string());
            }
        }
        if flagged.is_empty() && errors.get("errors").is_none() {
            errors.add("errors", REQUIRED);
        }

        let corrections = required_text(data, "correction", LONG_TEXT_MAX_LEN, &mut errors);

        match (patient_id, corrections) {
            (Some(patient_id), Some(corrections)) if errors.is_empty() => Ok(NewErrorReport {
                patient_id,
                error_fields: flagged,
                corrections,
            }),
            _ => Err(errors),
        }
    }
}

/// Username and password as submitted on the login form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct LoginForm;

impl LoginForm {
    pub const NAME: &'static str = "login";

    pub fn validate(data: &FormData) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();
        let username = submitted(data, "username");
        if username.is_none() {
            errors.add("username", REQUIRED);
        }
        // Passwords are not trimmed.
        let password = data.get("password").filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add("password", REQUIRED);
        }

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Description of one patient form field, for clients rendering the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub required: bool,
    pub max_length: Option<usize>,
    pub choices: Vec<&'static str>,
}

/// The patient fields in form order.
pub fn patient_field_specs() -> Vec<FieldSpec> {
    fn text(name: &'static str, label: &'static str, required: bool, max: usize) -> FieldSpec {
        FieldSpec {
            name,
            label,
            kind: "text",
            required,
            max_length: Some(max),
            choices: vec![],
        }
    }
    fn select(name: &'static str, label: &'static str, choices: Vec<&'static str>) -> FieldSpec {
        FieldSpec {
            name,
            label,
            kind: "choice",
            required: false,
            max_length: None,
            choices,
        }
    }

    vec![
        text("name", "Name", false, SHORT_TEXT_MAX_LEN),
        FieldSpec {
            name: "age",
            label: "Age",
            kind: "integer",
            required: false,
            max_length: None,
            choices: vec![],
        },
        select("gender", "Gender", Gender::ALL.map(Gender::as_str).to_vec()),
        text("detected_city", "Detected city", false, SHORT_TEXT_MAX_LEN),
        text("detected_district", "Detected district", true, SHORT_TEXT_MAX_LEN),
        text("detected_state", "Detected state", true, SHORT_TEXT_MAX_LEN),
        text("nationality", "Nationality", false, SHORT_TEXT_MAX_LEN),
        select(
            "current_status",
            "Current status",
            CurrentStatus::ALL.map(CurrentStatus::as_str).to_vec(),
        ),
        FieldSpec {
            name: "diagnosed_date",
            label: "Diagnosed date",
            kind: "date",
            required: false,
            max_length: None,
            choices: vec![],
        },
        text("notes", "Notes", false, LONG_TEXT_MAX_LEN),
        text("source", "Source", false, SOURCE_MAX_LEN),
    ]
}

/// Human-readable label for a patient field name.
pub fn field_label(name: &str) -> Option<&'static str> {
    patient_field_specs()
        .into_iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_data() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Ravi"),
            ("age", "34"),
            ("gender", "male"),
            ("detected_district", "Pune"),
            ("detected_state", "Maharashtra"),
            ("current_status", "hospitalized"),
            ("diagnosed_date", "2020-03-21"),
        ]
    }

    fn form(pairs: Vec<(&str, &str)>) -> FormData {
        FormData::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_form_data_get_returns_last_value_and_get_all_keeps_order() {
        let data = FormData::from([("errors", "age"), ("x", "1"), ("errors", "name"), ("x", "2")]);
        assert_eq!(data.get("x"), Some("2"));
        assert_eq!(data.get_all("errors"), vec!["age", "name"]);
        assert!(data.contains("errors"));
        assert!(!data.contains("missing"));
    }

    #[test]
    fn test_report_form_accepts_any_submitted_district() {
        let mut pairs = report_data();
        pairs[3] = ("detected_district", "Some Brand New District");
        let fields = ReportForm::validate(&form(pairs)).expect("should validate");
        assert_eq!(fields.detected_district.as_str(), "Some Brand New District");
        assert_eq!(fields.age, Some(34));
        assert_eq!(fields.gender, Gender::Male);
        assert_eq!(fields.diagnosed_date, NaiveDate::from_ymd_opt(2020, 3, 21));
    }

    #[test]
    fn test_report_form_requires_district_and_state() {
        let errors = ReportForm::validate(&form(vec![("name", "Ravi")])).unwrap_err();
        assert_eq!(errors.get("detected_district"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("detected_state"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_choices_from_submitted_is_single_valued() {
        let choices = Choices::from_submitted(Some(" Thane "));
        assert_eq!(choices.values(), &["Thane".to_string()]);
        assert!(choices.contains("Thane"));
        assert!(!choices.contains("Pune"));
        assert!(Choices::from_submitted(Some("  ")).values().is_empty());
    }

    #[test]
    fn test_patient_form_reports_each_invalid_field() {
        let errors = PatientForm::validate(&form(vec![
            ("age", "131"),
            ("gender", "robot"),
            ("detected_district", "Pune"),
            ("detected_state", "Maharashtra"),
            ("diagnosed_date", "21/03/2020"),
        ]))
        .unwrap_err();

        assert_eq!(
            errors.get("age").unwrap()[0],
            "Ensure this value is less than or equal to 130."
        );
        assert!(errors.get("gender").unwrap()[0].contains("robot"));
        assert_eq!(errors.get("diagnosed_date").unwrap()[0], "Enter a valid date.");
    }

    #[test]
    fn test_patient_form_defaults_blank_choices_and_limits_lengths() {
        let long_name = "x".repeat(SHORT_TEXT_MAX_LEN + 1);
        let errors = PatientForm::validate(&form(vec![
            ("name", long_name.as_str()),
            ("detected_district", "Pune"),
            ("detected_state", "Maharashtra"),
        ]))
        .unwrap_err();
        assert_eq!(
            errors.get("name").unwrap()[0],
            "Ensure this value has at most 100 characters (it has 101)."
        );

        let fields = PatientForm::validate(&form(vec![
            ("detected_district", "Pune"),
            ("detected_state", "Maharashtra"),
            ("gender", ""),
        ]))
        .unwrap();
        assert_eq!(fields.gender, Gender::Unknown);
        assert_eq!(fields.current_status, CurrentStatus::Hospitalized);
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_patient_form_initial_round_trips_through_validation() {
        let fields = ReportForm::validate(&form(report_data())).unwrap();
        let initial = PatientForm::initial(&fields);
        let data = FormData::new(initial.into_iter().collect());
        assert_eq!(PatientForm::validate(&data).unwrap(), fields);
    }

    #[test]
    fn test_error_report_form_keeps_submission_order() {
        let report = ErrorReportForm::validate(&FormData::from([
            ("patient_id", "3"),
            ("errors", "age"),
            ("errors", "name"),
            ("errors", "age"),
            ("correction", "Age is 43, name is Ravi K."),
        ]))
        .expect("should validate");
        assert_eq!(report.patient_id, 3);
        assert_eq!(report.error_fields, vec!["age", "name"]);
        assert_eq!(report.joined_error_fields(), "age,name");
    }

    #[test]
    fn test_error_report_form_rejects_bad_input() {
        let errors = ErrorReportForm::validate(&FormData::from([
            ("patient_id", "0"),
            ("errors", "password"),
        ]))
        .unwrap_err();
        assert!(errors.get("patient_id").is_some());
        assert!(errors.get("errors").unwrap()[0].contains("password"));
        assert_eq!(errors.get("correction"), Some(&[REQUIRED.to_string()][..]));

        let errors =
            ErrorReportForm::validate(&FormData::from([("patient_id", "2"), ("correction", "x")]))
                .unwrap_err();
        assert_eq!(errors.get("errors"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let errors = LoginForm::validate(&FormData::from([("username", "amit")])).unwrap_err();
        assert!(errors.get("password").is_some());

        let credentials =
            LoginForm::validate(&FormData::from([("username", " amit "), ("password", " pw ")]))
                .unwrap();
        assert_eq!(credentials.username, "amit");
        assert_eq!(credentials.password, " pw ");
    }

    #[test]
    fn test_field_specs_cover_every_patient_field() {
        let names: Vec<_> = patient_field_specs().iter().map(|s| s.name).collect();
        assert_eq!(names, PATIENT_FIELD_NAMES);
        assert_eq!(field_label("detected_state"), Some("Detected state"));
    }
}
