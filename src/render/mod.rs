//! Outline Renderer
//!
//! Terminal pipeline stage: deterministic structural mapping from a
//! validated `CourseOutline` to document bytes (Markdown). No business
//! logic beyond formatting.
//!
//! Section order mirrors the document contract: details block, course
//! description, bulleted CLO list, numbered topic list with nested ILO
//! bullets, the weekly activity table in fixed column order, and a
//! references section with italicized citations and optional hyperlinks.
//!
//! Every field is checked before formatting; the first missing or empty
//! field raises a schema error naming it. Rendering the same outline
//! twice yields byte-identical output.

use crate::types::{CourseOutline, LoomError, Result};

/// Fixed column order of the weekly activity table.
const ACTIVITY_COLUMNS: [&str; 5] = [
    "Week No.",
    "Topic",
    "Activity Description",
    "Expected Output",
    "Assessment Tools",
];

/// Extension of the rendered document.
pub const OUTPUT_EXTENSION: &str = "md";

#[derive(Debug, Default)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the outline into document bytes.
    pub fn render(&self, outline: &CourseOutline) -> Result<Vec<u8>> {
        ensure_renderable(outline)?;

        let mut doc = String::new();

        doc.push_str("# Course Outline\n\n");

        // Details block
        doc.push_str("| | |\n|---|---|\n");
        doc.push_str(&format!(
            "| **Course title:** {} | **Instructor name:** {} |\n",
            escape_cell(&outline.course_title),
            escape_cell(&outline.instructor_name)
        ));
        doc.push_str(&format!(
            "| **Credit units:** {} | **Total hours:** {} |\n\n",
            escape_cell(&outline.credit_units),
            escape_cell(&outline.total_hours)
        ));

        doc.push_str("## Course Description\n\n");
        doc.push_str(&outline.course_description);
        doc.push_str("\n\n");

        doc.push_str("## Course Learning Outcomes (CLOs)\n\n");
        for clo in &outline.clos {
            doc.push_str(&format!("- {}\n", clo));
        }
        doc.push('\n');

        doc.push_str("## Topics / Modules and Intended Learning Outcomes\n\n");
        for (i, topic) in outline.topics.iter().enumerate() {
            doc.push_str(&format!("{}. {}\n", i + 1, topic.topic));
            for ilo in &topic.ilos {
                doc.push_str(&format!("   - {}\n", ilo));
            }
        }
        doc.push('\n');

        doc.push_str("## Weekly Activities\n\n");
        doc.push_str(&format!("| {} |\n", ACTIVITY_COLUMNS.join(" | ")));
        doc.push_str(&format!("|{}\n", "---|".repeat(ACTIVITY_COLUMNS.len())));
        for activity in &outline.activities {
            doc.push_str(&format!(
                "| {} | **{}** | {} | {} | {} |\n",
                escape_cell(&activity.week),
                escape_cell(&activity.topic),
                escape_cell(&activity.activity_description),
                escape_cell(&activity.expected_output),
                escape_cell(&activity.assessment_tools),
            ));
        }

        if !outline.references.is_empty() {
            doc.push_str("\n## References\n\n");
            for (i, reference) in outline.references.iter().enumerate() {
                match reference.link.as_deref().filter(|l| !l.is_empty()) {
                    Some(link) => doc.push_str(&format!(
                        "*{}* [[{}]]({})\n\n",
                        reference.reference,
                        i + 1,
                        link
                    )),
                    None => doc.push_str(&format!("*{}*\n\n", reference.reference)),
                }
            }
        }

        Ok(doc.into_bytes())
    }

    /// Derive the output filename when no explicit title is supplied.
    pub fn derive_filename(&self, outline: &CourseOutline) -> String {
        format!("{}.{}", sanitize_title(&outline.course_title), OUTPUT_EXTENSION)
    }
}

/// Check that every field the renderer references is present and non-empty,
/// naming the first offender.
fn ensure_renderable(outline: &CourseOutline) -> Result<()> {
    let scalars = [
        ("course_title", &outline.course_title),
        ("course_description", &outline.course_description),
        ("instructor_name", &outline.instructor_name),
        ("credit_units", &outline.credit_units),
        ("total_hours", &outline.total_hours),
        ("weekly_hours", &outline.weekly_hours),
    ];
    for (field, value) in scalars {
        if value.trim().is_empty() {
            return Err(LoomError::schema(field, "missing or empty"));
        }
    }

    if outline.clos.is_empty() {
        return Err(LoomError::schema("clos", "missing or empty"));
    }
    if outline.topics.is_empty() {
        return Err(LoomError::schema("topics", "missing or empty"));
    }
    for (i, topic) in outline.topics.iter().enumerate() {
        if topic.ilos.is_empty() {
            return Err(LoomError::schema(format!("topics[{i}].ilos"), "missing or empty"));
        }
    }
    if outline.activities.is_empty() {
        return Err(LoomError::schema("activities", "missing or empty"));
    }

    Ok(())
}

/// Keep table cells on one row: pipes and newlines would break the grid.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Filesystem-safe filename fragment from a course title.
fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_sep = true;
    for ch in title.trim().chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("Course_Outline");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, Reference, Topic};

    fn sample_outline() -> CourseOutline {
        CourseOutline {
            course_title: "Intro to Databases".to_string(),
            course_description: "Relational fundamentals".to_string(),
            instructor_name: "Dr. Juan Dela Cruz".to_string(),
            credit_units: "3".to_string(),
            total_hours: "45".to_string(),
            weekly_hours: "3".to_string(),
            clos: vec!["Design normalized relational schemas".to_string()],
            topics: vec![
                Topic {
                    topic: "Relational Model".to_string(),
                    ilos: vec!["Describe relations".to_string(), "Use algebra".to_string()],
                },
                Topic {
                    topic: "SQL".to_string(),
                    ilos: vec!["Write joins".to_string(), "Use aggregation".to_string()],
                },
            ],
            references: vec![
                Reference {
                    reference: "Silberschatz, A. (2020). Database System Concepts.".to_string(),
                    link: Some("https://example.org/dsc".to_string()),
                },
                Reference {
                    reference: "Date, C. J. (2021). SQL and Relational Theory.".to_string(),
                    link: None,
                },
            ],
            activities: vec![Activity {
                week: "Week 1".to_string(),
                topic: "Relational Model".to_string(),
                activity_description: "Lecture | exercises".to_string(),
                expected_output: "Problem set".to_string(),
                assessment_tools: "Rubric".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = OutlineRenderer::new();
        let outline = sample_outline();
        assert_eq!(renderer.render(&outline).unwrap(), renderer.render(&outline).unwrap());
    }

    #[test]
    fn test_render_structure() {
        let bytes = OutlineRenderer::new().render(&sample_outline()).unwrap();
        let doc = String::from_utf8(bytes).unwrap();

        assert!(doc.contains("# Course Outline"));
        assert!(doc.contains("## Course Learning Outcomes (CLOs)"));
        assert!(doc.contains("1. Relational Model"));
        assert!(doc.contains("   - Describe relations"));
        assert!(doc.contains("| Week No. | Topic | Activity Description | Expected Output | Assessment Tools |"));
        // pipes in cell content must not break the table
        assert!(doc.contains("Lecture \\| exercises"));
        // linked reference carries a hyperlinked index marker, unlinked does not
        assert!(doc.contains("*Silberschatz, A. (2020). Database System Concepts.* [[1]](https://example.org/dsc)"));
        assert!(doc.contains("*Date, C. J. (2021). SQL and Relational Theory.*\n"));
    }

    #[test]
    fn test_missing_field_names_field() {
        let renderer = OutlineRenderer::new();

        let mut outline = sample_outline();
        outline.clos.clear();
        match renderer.render(&outline).unwrap_err() {
            LoomError::Schema { field, .. } => assert_eq!(field, "clos"),
            other => panic!("expected schema error, got {other:?}"),
        }

        let mut outline = sample_outline();
        outline.topics[1].ilos.clear();
        match renderer.render(&outline).unwrap_err() {
            LoomError::Schema { field, .. } => assert_eq!(field, "topics[1].ilos"),
            other => panic!("expected schema error, got {other:?}"),
        }

        let mut outline = sample_outline();
        outline.course_title = "  ".to_string();
        assert!(renderer.render(&outline).is_err());
    }

    #[test]
    fn test_derive_filename_sanitizes_title() {
        let renderer = OutlineRenderer::new();
        let mut outline = sample_outline();
        assert_eq!(renderer.derive_filename(&outline), "Intro_to_Databases.md");

        outline.course_title = "  C++ & Systems: Part 2!  ".to_string();
        assert_eq!(renderer.derive_filename(&outline), "C_Systems_Part_2.md");
    }
}
