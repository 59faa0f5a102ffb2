// Resume field extraction prompt templates.

pub const RESUME_EXTRACT_SYSTEM: &str = "\
You are a precise resume data extractor. \
Read the resume text and return its key facts as structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const RESUME_EXTRACT_PROMPT: &str = r#"Extract the following fields from the resume text below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "summary": "string — short professional summary",
  "experience": number | null,   // total years of experience if mentioned
  "skills": ["string"],          // technical skills
  "links": ["string"]            // any URLs such as LinkedIn or GitHub, empty list if none
}

RULES:
1. "experience" is a whole number of years. Use null when the resume does not say.
2. List skills as they are written; do not merge or rename them.
3. Copy links verbatim.
4. Return ONLY the JSON object — nothing else, no code fences."#;
