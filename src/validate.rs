//! Turns raw field mappings into validated, cleaned records.

use thiserror::Error;

use crate::models::{PartnerOrganization, ProjectOpportunity, RawRecord, RawValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("field `{field}` has the wrong shape, expected {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// Validates one raw organisation record.
///
/// Required: name, country, `organization_type`, `experience_level`; each
/// must be non-empty after trimming. List fields lose blank entries,
/// optional text fields default to empty.
pub fn validate_organization(record: &RawRecord) -> Result<PartnerOrganization, ValidationError> {
    Ok(PartnerOrganization {
        name: required_text(record, "name")?,
        country: required_text(record, "country")?,
        organization_type: required_text(record, "organization_type")?,
        experience_level: required_text(record, "experience_level")?,
        target_groups: list_field(record, "target_groups")?,
        activity_types: list_field(record, "activity_types")?,
        contact_info: optional_text(record, "contact_info")?,
        profile_url: optional_text(record, "profile_url")?,
        last_active: optional_marker(record, "last_active")?,
    })
}

/// Validates one raw project record. Required: title and `project_type`.
pub fn validate_project(record: &RawRecord) -> Result<ProjectOpportunity, ValidationError> {
    Ok(ProjectOpportunity {
        title: required_text(record, "title")?,
        project_type: required_text(record, "project_type")?,
        countries_involved: list_field(record, "countries_involved")?,
        deadline: optional_marker(record, "deadline")?,
        target_groups: list_field(record, "target_groups")?,
        themes: list_field(record, "themes")?,
        description: optional_text(record, "description")?,
        contact_organization: optional_text(record, "contact_organization")?,
        project_url: optional_text(record, "project_url")?,
        created_date: optional_text(record, "created_date")?,
    })
}

fn required_text(record: &RawRecord, field: &'static str) -> Result<String, ValidationError> {
    match record.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(RawValue::List(_)) => Err(ValidationError::WrongShape {
            field,
            expected: "text",
        }),
        Some(RawValue::Text(value)) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ValidationError::EmptyField(field))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

fn optional_text(record: &RawRecord, field: &'static str) -> Result<String, ValidationError> {
    match record.get(field) {
        None => Ok(String::new()),
        Some(RawValue::List(_)) => Err(ValidationError::WrongShape {
            field,
            expected: "text",
        }),
        Some(RawValue::Text(value)) => Ok(value.trim().to_string()),
    }
}

/// Optional marker fields (last-active, deadline) collapse to `None` when
/// absent or blank.
fn optional_marker(record: &RawRecord, field: &'static str) -> Result<Option<String>, ValidationError> {
    optional_text(record, field).map(|value| if value.is_empty() { None } else { Some(value) })
}

fn list_field(record: &RawRecord, field: &'static str) -> Result<Vec<String>, ValidationError> {
    match record.get(field) {
        None => Ok(Vec::new()),
        Some(RawValue::Text(_)) => Err(ValidationError::WrongShape {
            field,
            expected: "list",
        }),
        Some(RawValue::List(values)) => Ok(values
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_org_record() -> RawRecord {
        let mut r = RawRecord::new();
        r.set_text("name", "  Youth for Europe Foundation ");
        r.set_text("country", "Germany");
        r.set_text("organization_type", " NGO");
        r.set_text("experience_level", "Experienced ");
        r.set_list(
            "target_groups",
            vec!["Young people".into(), "   ".into(), " Youth workers ".into()],
        );
        r.set_list("activity_types", vec!["Training courses".into()]);
        r.set_text("contact_info", " info@yfe.de ");
        r.set_text("profile_url", "https://www.salto-youth.net/org/123");
        r.set_text("last_active", "2024-01-15");
        r
    }

    #[test]
    fn valid_organization_is_trimmed_and_cleaned() {
        let org = validate_organization(&full_org_record()).unwrap();
        assert_eq!(org.name, "Youth for Europe Foundation");
        assert_eq!(org.organization_type, "NGO");
        assert_eq!(org.target_groups, vec!["Young people", "Youth workers"]);
        assert_eq!(org.contact_info, "info@yfe.de");
        assert_eq!(org.last_active.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn blank_required_field_fails() {
        let mut r = full_org_record();
        r.set_text("country", "   ");
        assert_eq!(
            validate_organization(&r),
            Err(ValidationError::EmptyField("country"))
        );
    }

    #[test]
    fn missing_required_field_fails() {
        let mut r = RawRecord::new();
        r.set_text("name", "Lone Org");
        let err = validate_organization(&r).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("country"));
    }

    #[test]
    fn wrong_shape_fails() {
        let mut r = full_org_record();
        r.set_list("name", vec!["not".into(), "text".into()]);
        assert!(matches!(
            validate_organization(&r),
            Err(ValidationError::WrongShape { field: "name", .. })
        ));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let mut r = RawRecord::new();
        r.set_text("name", "Org");
        r.set_text("country", "France");
        r.set_text("organization_type", "School");
        r.set_text("experience_level", "Newcomer");
        let org = validate_organization(&r).unwrap();
        assert!(org.target_groups.is_empty());
        assert_eq!(org.contact_info, "");
        assert_eq!(org.profile_url, "");
        assert_eq!(org.last_active, None);
    }

    #[test]
    fn project_requires_title_and_type() {
        let mut r = RawRecord::new();
        r.set_text("title", "Digital Skills for Youth Workers");
        r.set_text("project_type", "");
        assert_eq!(
            validate_project(&r),
            Err(ValidationError::EmptyField("project_type"))
        );

        r.set_text("project_type", "KA152");
        let project = validate_project(&r).unwrap();
        assert_eq!(project.project_type, "KA152");
        assert_eq!(project.deadline, None);
        assert!(project.themes.is_empty());
    }

    #[test]
    fn blank_deadline_collapses_to_none() {
        let mut r = RawRecord::new();
        r.set_text("title", "T");
        r.set_text("project_type", "KA210");
        r.set_text("deadline", "  ");
        let project = validate_project(&r).unwrap();
        assert_eq!(project.deadline, None);
    }

    #[test]
    fn error_messages_name_the_field() {
        assert_eq!(
            ValidationError::MissingField("country").to_string(),
            "missing required field `country`"
        );
    }
}
