//! Course Domain Types
//!
//! Typed data contracts between pipeline stages:
//! `CourseSpec` (immutable input) → `TopicQuery` → `SearchHit` →
//! `OutcomeSet` (opaque prose) → `CourseOutline` (terminal schema).
//!
//! The terminal schema is validated against an explicit field list with
//! arity constraints before deserialization, so a coercion failure names
//! the offending field instead of silently accepting partial data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{LoomError, Result};

// =============================================================================
// Course Specification (pipeline input)
// =============================================================================

/// Immutable course metadata, constructed once per pipeline run.
/// All downstream stages read it; none mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSpec {
    pub title: String,
    pub description: String,
    pub instructor: String,
    /// Audience description calibrating outcome taxonomy tiers,
    /// e.g. "3rd year BS Computer Science students"
    pub target_audience: String,
    pub credit_units: u32,
    pub total_hours: u32,
    pub weekly_hours: u32,
    /// Citation style for references: "APA", "MLA", "Chicago", "Harvard"
    pub citation_style: String,
    /// Number of topics the query planner should aim for
    pub topic_count: usize,
}

impl CourseSpec {
    /// Validate the spec before a run starts. Fails fast on a zero
    /// weekly-hours value rather than dividing by zero later.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LoomError::Config("course title must not be empty".to_string()));
        }
        if self.weekly_hours == 0 {
            return Err(LoomError::Config(
                "weekly_hours must be greater than 0".to_string(),
            ));
        }
        if self.total_hours == 0 {
            return Err(LoomError::Config(
                "total_hours must be greater than 0".to_string(),
            ));
        }
        if self.topic_count == 0 {
            return Err(LoomError::Config(
                "topic_count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of weeks the schedule targets. Remainder hours are absorbed
    /// by the model's pacing, not enforced to be zero.
    pub fn week_count(&self) -> Result<u32> {
        if self.weekly_hours == 0 {
            return Err(LoomError::Config(
                "weekly_hours must be greater than 0".to_string(),
            ));
        }
        Ok(self.total_hours / self.weekly_hours)
    }

    /// Render the metadata block embedded in every prompt.
    pub fn details_block(&self) -> String {
        format!(
            "Course Title: {}\n\
             Course Description: {}\n\
             Instructor Name: {}\n\
             Credit Units: {}\n\
             Target Students: {}\n\
             Total Hours: {}\n\
             Class Hours per Week: {}",
            self.title,
            self.description,
            self.instructor,
            self.credit_units,
            self.target_audience,
            self.total_hours,
            self.weekly_hours,
        )
    }
}

// =============================================================================
// Intermediate Stage Types
// =============================================================================

/// One planned (topic, search query) pair. Ordering is meaningful: it
/// defines the instructional sequence, general → specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicQuery {
    pub topic: String,
    pub query: String,
}

/// One ranked scholarly search result snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_summary: Option<String>,
}

/// Opaque structured text produced by the outcome synthesizer: course-level
/// outcomes, per-topic outcomes, and citations. Consumed verbatim as a
/// prompt fragment by the outline planner. Not parsed at this stage:
/// enforcing JSON too early loses the model's ability to format with
/// embedded citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSet(pub String);

impl OutcomeSet {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for OutcomeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Course Outline (terminal schema)
// =============================================================================

/// One topic with its intended learning outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub ilos: Vec<String>,
}

/// One cited reference with an optional hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One weekly activity row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub week: String,
    pub topic: String,
    pub activity_description: String,
    pub expected_output: String,
    pub assessment_tools: String,
}

/// The terminal schema: the contract the renderer depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutline {
    pub course_title: String,
    pub course_description: String,
    pub instructor_name: String,
    pub credit_units: String,
    pub total_hours: String,
    pub weekly_hours: String,
    pub clos: Vec<String>,
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub references: Vec<Reference>,
    pub activities: Vec<Activity>,
}

/// Required top-level fields, in validation order.
const REQUIRED_FIELDS: &[&str] = &[
    "course_title",
    "course_description",
    "instructor_name",
    "credit_units",
    "total_hours",
    "weekly_hours",
    "clos",
    "topics",
    "activities",
];

/// Minimum intended learning outcomes per topic.
pub const MIN_ILOS_PER_TOPIC: usize = 2;

impl CourseOutline {
    /// Validate a coerced JSON value against the outline schema, then
    /// deserialize. Surfaces the first offending field on failure.
    pub fn from_value(mut value: Value) -> Result<Self> {
        validate_outline_value(&value)?;
        normalize_numeric_fields(&mut value);
        let outline: CourseOutline = serde_json::from_value(value)?;
        Ok(outline)
    }
}

/// Models sometimes emit numbers where the schema asks for strings.
fn normalize_numeric_fields(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    for field in ["credit_units", "total_hours", "weekly_hours"] {
        if let Some(v) = obj.get_mut(field) {
            if let Some(n) = v.as_number() {
                *v = Value::String(n.to_string());
            }
        }
    }
}

/// Check required fields and arity constraints of the coercion output.
pub fn validate_outline_value(value: &Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| LoomError::schema("<root>", "outline is not a JSON object"))?;

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(*field) {
            return Err(LoomError::schema(*field, "missing required field"));
        }
    }

    let clos = obj["clos"]
        .as_array()
        .ok_or_else(|| LoomError::schema("clos", "must be an array"))?;
    if clos.is_empty() {
        return Err(LoomError::schema("clos", "must not be empty"));
    }

    let topics = obj["topics"]
        .as_array()
        .ok_or_else(|| LoomError::schema("topics", "must be an array"))?;
    if topics.is_empty() {
        return Err(LoomError::schema("topics", "must not be empty"));
    }
    for (i, topic) in topics.iter().enumerate() {
        let ilos = topic
            .get("ilos")
            .and_then(|v| v.as_array())
            .ok_or_else(|| LoomError::schema(format!("topics[{i}].ilos"), "missing ILO list"))?;
        if ilos.len() < MIN_ILOS_PER_TOPIC {
            return Err(LoomError::schema(
                format!("topics[{i}].ilos"),
                format!("requires at least {MIN_ILOS_PER_TOPIC} ILOs, got {}", ilos.len()),
            ));
        }
    }

    let activities = obj["activities"]
        .as_array()
        .ok_or_else(|| LoomError::schema("activities", "must be an array"))?;
    if activities.is_empty() {
        return Err(LoomError::schema("activities", "must not be empty"));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_spec() -> CourseSpec {
        CourseSpec {
            title: "Intro to Databases".to_string(),
            description: "Relational fundamentals".to_string(),
            instructor: "Dr. Juan Dela Cruz".to_string(),
            target_audience: "3rd year BS Computer Science students".to_string(),
            credit_units: 3,
            total_hours: 54,
            weekly_hours: 3,
            citation_style: "APA".to_string(),
            topic_count: 5,
        }
    }

    pub(crate) fn sample_outline_value() -> Value {
        json!({
            "course_title": "Intro to Databases",
            "course_description": "Relational fundamentals",
            "instructor_name": "Dr. Juan Dela Cruz",
            "credit_units": "3",
            "total_hours": "54",
            "weekly_hours": "3",
            "clos": ["Design normalized relational schemas"],
            "topics": [
                {"topic": "Relational Model", "ilos": ["Describe relations", "Write relational algebra"]},
                {"topic": "SQL", "ilos": ["Write joins", "Use aggregation"]}
            ],
            "references": [
                {"reference": "Silberschatz, A. (2020). Database System Concepts.", "link": "https://example.org/dsc"}
            ],
            "activities": [
                {"week": "Week 1", "topic": "Relational Model", "activity_description": "Lecture and exercises",
                 "expected_output": "Problem set", "assessment_tools": "Rubric"}
            ]
        })
    }

    #[test]
    fn test_week_count() {
        let spec = sample_spec();
        assert_eq!(spec.week_count().unwrap(), 18);
    }

    #[test]
    fn test_zero_weekly_hours_fails_fast() {
        let mut spec = sample_spec();
        spec.weekly_hours = 0;
        assert!(matches!(spec.week_count(), Err(LoomError::Config(_))));
        assert!(matches!(spec.validate(), Err(LoomError::Config(_))));
    }

    #[test]
    fn test_details_block_contains_metadata() {
        let block = sample_spec().details_block();
        assert!(block.contains("Intro to Databases"));
        assert!(block.contains("Class Hours per Week: 3"));
    }

    #[test]
    fn test_valid_outline_round_trips() {
        let outline = CourseOutline::from_value(sample_outline_value()).unwrap();
        assert_eq!(outline.topics.len(), 2);
        assert_eq!(outline.references.len(), 1);
    }

    #[test]
    fn test_missing_field_names_field() {
        let mut value = sample_outline_value();
        value.as_object_mut().unwrap().remove("clos");
        let err = CourseOutline::from_value(value).unwrap_err();
        match err {
            LoomError::Schema { field, .. } => assert_eq!(field, "clos"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_ilo_arity_enforced() {
        let mut value = sample_outline_value();
        value["topics"][1]["ilos"] = json!(["only one"]);
        let err = CourseOutline::from_value(value).unwrap_err();
        match err {
            LoomError::Schema { field, .. } => assert_eq!(field, "topics[1].ilos"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_hours_normalized_to_strings() {
        let mut value = sample_outline_value();
        value["credit_units"] = json!(3);
        value["total_hours"] = json!(54);
        let outline = CourseOutline::from_value(value).unwrap();
        assert_eq!(outline.credit_units, "3");
        assert_eq!(outline.total_hours, "54");
    }

    #[test]
    fn test_empty_activities_rejected() {
        let mut value = sample_outline_value();
        value["activities"] = json!([]);
        assert!(CourseOutline::from_value(value).is_err());
    }
}
