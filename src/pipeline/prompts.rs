//! Pipeline Prompts
//!
//! Prompt construction for every LLM call in the pipeline. Each builder
//! returns the full user prompt; system messages and formatting contracts
//! are set by the calling stage.

use crate::constants::pipeline::DESCRIPTION_WORD_LIMIT;
use crate::types::CourseSpec;

/// Query planning: decompose course metadata into (topic, query) pairs,
/// emitted under a strict JSON envelope.
pub fn build_query_prompt(spec: &CourseSpec) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a capable and experienced researcher and professional educator. \
         Provided are details regarding a course outline for which we need to look for references.\n\n",
    );
    prompt.push_str(
        "Figure out the topics that are relevant to this course and generate queries to search \
         for academic resources on Google Scholar.\n",
    );
    prompt.push_str(
        "For the arrangement of the topics, make sure the flow is appropriate for the course, \
         beginning with a general topic or overview and then moving on to more specific topics.\n",
    );
    prompt.push_str(&format!(
        "Generate {} queries and topics to search in Google Scholar.\n",
        spec.topic_count
    ));
    prompt.push_str(
        "Since the purpose of these queries is to find suitable references for the course, \
         limit each query to academic materials appropriate for use as references \
         (textbooks, journals, etc.).\n\n",
    );

    prompt.push_str("Output only the queries in the following JSON format:\n");
    prompt.push_str(
        "{\n    \"queries\": [\n        {\"topic\": \"topic 1\", \"query\": \"query 1\"},\n        \
         {\"topic\": \"topic 2\", \"query\": \"query 2\"}\n    ]\n}\n\n",
    );

    prompt.push_str("Course Details:\n");
    prompt.push_str(&spec.details_block());

    prompt
}

/// Reference filtering: discard stale or off-topic sources from the raw
/// aggregated search results. Bounds the generation prompt and suppresses
/// hallucinated citations by restricting it to a pre-vetted source list.
pub fn build_filter_prompt(spec: &CourseSpec, search_results: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Provided below are the search results for reference material from Google Scholar for \
         suggested topics for the provided course. Filter out sources that are not ideal to use \
         as reference material for this course; only keep recent and relevant academic materials \
         such as textbooks. Follow this format for your output:\n\n",
    );
    prompt.push_str("Title: \"Reference Title\"\n");
    prompt.push_str("Link: \"Reference Link\"\n");
    prompt.push_str("Snippet: \"Reference Snippet\"\n");
    prompt.push_str("Publication Summary: \"Reference Publication Summary\"\n\n");

    prompt.push_str("Course Details:\n");
    prompt.push_str(&spec.details_block());
    prompt.push_str("\n\nSearch Results:\n");
    prompt.push_str(search_results);

    prompt
}

/// Outcome generation: CLOs, per-topic ILOs, and citations, under the
/// two-tier taxonomy constraint calibrated by the target audience.
pub fn build_outcomes_prompt(spec: &CourseSpec, filtered_references: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a curricular development expert focused on authoring course outlines.\n\
         Provided below are course details for a course outline you will need to generate.\n\n",
    );
    prompt.push_str("Course Details:\n");
    prompt.push_str(&spec.details_block());
    prompt.push_str("\n\nYou are tasked to generate the following for a course outline for this course:\n");
    prompt.push_str(
        "1. Course Learning Outcomes (CLOs)\n\
         \x20   - CLOs are what students are expected to be able to do by the end of this course\n\
         \x20   - Keep them clear but concise\n",
    );
    prompt.push_str(&format!(
        "2. {} Topics/Modules and their Intended Learning Outcomes (ILOs)\n\
         \x20   - ILOs are what students are expected to be able to do by the end of this topic\n\
         \x20   - Each topic should have at least 2 ILOs\n\
         \x20   - Mark each topic with \"Topic #\" and each ILO with \"ILO #\"\n",
        spec.topic_count
    ));
    prompt.push_str(&format!(
        "3. References (at least 1 reference per topic, in {} format)\n\
         \x20   - Include the link if one is available\n\
         \x20   - Only keep the references most relevant for this course and topic\n\n",
        spec.citation_style
    ));

    prompt.push_str(
        "Incorporate the concepts of Bloom's Taxonomy in designing the course, using an \
         appropriate mix of Conceptual and Project learning outcomes. Conceptual LOs target the \
         first two levels of Bloom's Taxonomy (Remember, Understand) while Project LOs target \
         higher-order skills (Analyze, Evaluate, Create). Adjust the CLOs and ILOs to the skill \
         level of the target students: an introductory course should lean on Conceptual LOs to \
         build foundational knowledge, while an advanced course should lean on Project LOs that \
         improve upon and apply existing knowledge.\n\n",
    );

    prompt.push_str("Here are some examples of good LOs for different programs:\n\n");
    prompt.push_str(
        "Arts, Media, and Design\n\
         \x20   Discriminate among different Western music styles.\n\
         \x20   Discuss how historical and cultural events contextualize the creation of an artwork.\n\n\
         Business\n\
         \x20   Compare and contrast different types of business ownership.\n\
         \x20   Evaluate and classify various marketing strategies.\n\n\
         Computer and Information Sciences\n\
         \x20   Describe the scientific method and provide an example of its application.\n\
         \x20   Develop solutions for security, balancing technical and privacy issues as well as business concerns.\n\n\
         Engineering\n\
         \x20   Prepare engineering documents that coherently present information for technical and non-technical audiences.\n\
         \x20   Compile and summarize current bioengineering research to discuss the social, environmental, and legal impacts.\n\n\
         Health Sciences\n\
         \x20   Describe how nutrition and lifestyle choices impact the life cycle.\n\
         \x20   Assess gross muscle strength of upper and lower extremities when assisting a patient in ambulation.\n\n\
         Science\n\
         \x20   Distinguish between healthy and unhealthy physical, mental, and emotional patterns.\n\
         \x20   Calculate germination rates of various seeds.\n\
         \x20   Select appropriate mathematical routines to solve problems.\n\n\
         Social Sciences and Humanities\n\
         \x20   Outline the structure of the Constitution of the United States.\n\
         \x20   Formulate a stance on a political issue and support the position.\n\n",
    );

    prompt.push_str(
        "Provided below are the vetted reference materials for suggested topics to cover in this \
         course. Do not add sources not included below.\n\n",
    );
    prompt.push_str(filtered_references);

    prompt
}

/// Narrative pass: week-by-week activity schedule as free text.
/// The model may stretch one topic over multiple weeks or add topics not
/// included in the learning outcomes, for pacing.
pub fn build_schedule_prompt(spec: &CourseSpec, outcomes: &str, week_count: u32) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a highly-capable researcher and curricular development expert. Provided below \
         are course details for a course outline you will need to generate.\n\n",
    );
    prompt.push_str("Course Details:\n");
    prompt.push_str(&spec.details_block());
    prompt.push('\n');
    prompt.push_str(outcomes);
    prompt.push_str("\n\n-------------------\n\n");

    prompt.push_str("From the provided learning outcomes, create weekly activities for the course.\n");
    prompt.push_str(&format!(
        "This course is divided into a total of {} hours for the whole semester, {} hours per \
         week ({} weeks in total).\n\n",
        spec.total_hours, spec.weekly_hours, week_count
    ));
    prompt.push_str(
        "You may stretch one topic over the course of multiple weeks or add topics not included \
         in the learning outcomes.\n\
         Each activity should have a week number, topic, activity description, expected output \
         or assessment, and assessment tools.\n\n",
    );
    prompt.push_str(
        "You may make slight modifications to the provided course description for improvements \
         without removing any context, but avoid changing the course title, instructor name, and \
         weekly hours.\n",
    );

    prompt
}

/// Schema-coercion pass: reshape the narrative outline plus original
/// metadata/outcomes into the terminal JSON contract. Title, description,
/// and instructor are immutable across this pass.
pub fn build_coercion_prompt(spec: &CourseSpec, outcomes: &str, narrative: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Convert the provided course outline details into JSON format.\n\n");
    prompt.push_str("Follow the JSON formatting below exactly. Do not alter the provided course \
                     title, course description, or instructor name.\n\n");
    prompt.push_str(
        r#"{
    "course_title": "The provided course title",
    "course_description": "The provided course description",
    "instructor_name": "Instructor Name",
    "credit_units": "Credit Units",
    "total_hours": "Total Hours",
    "weekly_hours": "Weekly Hours",
    "clos": ["CLO 1", "CLO 2", "CLO 3"],
    "topics": [
        {"topic": "Topic 1", "ilos": ["ILO 1", "ILO 2"]},
        {"topic": "Topic 2", "ilos": ["ILO 1", "ILO 2"]}
    ],
    "references": [
        {"reference": "Reference 1", "link": "Link 1 (omit this key if no link is available)"}
    ],
    "activities": [
        {"week": "Week 1", "topic": "Topic 1", "activity_description": "activity description 1",
         "expected_output": "expected output 1", "assessment_tools": "assessment tools 1"},
        {"week": "Week 2", "topic": "Topic 2", "activity_description": "activity description 2",
         "expected_output": "expected output 2", "assessment_tools": "assessment tools 2"}
    ]
}
"#,
    );

    prompt.push_str("\nCourse Details:\n");
    prompt.push_str(&spec.details_block());
    prompt.push('\n');
    prompt.push_str(outcomes);
    prompt.push_str("\n\nCourse Outline:\n");
    prompt.push_str(narrative);

    prompt
}

/// Description drafting: used when the operator leaves the course
/// description empty.
pub fn build_description_prompt(title: &str, target_audience: &str) -> String {
    format!(
        "You are a highly-capable educator and curricular development expert. Create a \
         comprehensive but concise description for a course called \"{}\" which is meant for {}. \
         Keep the description within {} words, and provide a general overview of what one can \
         expect from this course.",
        title, target_audience, DESCRIPTION_WORD_LIMIT
    )
}
