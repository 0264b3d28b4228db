// All LLM prompt constants for the matching pipeline.
// Templates use `{placeholder}` markers filled with `.replace` before sending.

/// Shared instruction enforcing JSON-only output across every extraction call.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Profile facet extraction. Replace `{profile_text}` before sending.
pub const PROFILE_EXTRACTION_TEMPLATE: &str = r#"You are an expert recruiter assistant. Analyze the candidate profile below and extract its content into comparison facets.

{json_only}

Return a JSON object with this EXACT schema (no extra fields):
{
  "location": ["strings describing where the candidate is based"],
  "language": ["spoken languages with proficiency"],
  "education": ["degrees, fields of study, institutions"],
  "position": ["roles held, with company and duration"],
  "skills": ["individual technical or professional skills"],
  "certifications": ["formal certifications or licenses"]
}

Each value is an array of short strings. Use an empty array for facets the profile says nothing about. Do not invent content.

CANDIDATE PROFILE:
{profile_text}"#;

/// Job-description requirement extraction. Replace `{job_description}`.
pub const REQUIREMENT_EXTRACTION_TEMPLATE: &str = r#"You are an expert recruiter assistant. Analyze the job description below and extract its requirements into comparison facets.

{json_only}

Return a JSON object with this EXACT schema (no extra fields):
{
  "location": ["location or relocation requirements"],
  "language": ["required spoken languages"],
  "education": ["required degrees or fields of study"],
  "position": ["required prior roles or seniority"],
  "skills": ["required technical or professional skills"],
  "certifications": ["required certifications or licenses"]
}

Each value is an array of short requirement strings. Use an empty array for facets the job description does not constrain.

JOB DESCRIPTION:
{job_description}"#;

/// Per-(facet, profile) comparison. Replace `{facet}`, `{requirements}`,
/// `{profile_content}`.
pub const FACET_MATCH_TEMPLATE: &str = r#"You are an expert recruiter scoring one dimension of a candidate against a job's requirements.

{json_only}

DIMENSION: {facet}

JOB REQUIREMENTS for this dimension:
{requirements}

CANDIDATE CONTENT for this dimension:
{profile_content}

Score how well the candidate content satisfies the requirements. Return a JSON object with this EXACT schema:
{
  "matchPercentage": 85,
  "relevantContent": ["the candidate items that support the score"],
  "explanation": "One or two sentences justifying the score."
}

Rules:
- matchPercentage is a number from 0 to 100.
- If the job has no requirements for this dimension, score 100.
- If the candidate has no content for a required dimension, score 0.
- relevantContent quotes only items from the candidate content above."#;

/// Fills a template, joining list placeholders as bulleted lines.
pub fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = template.replace("{json_only}", JSON_ONLY_INSTRUCTION);
    for (key, value) in pairs {
        out = out.replace(key, value);
    }
    out
}

/// Renders requirement/content lists for prompt interpolation.
pub fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
