// Shared prompt fragments. Each task's templates live in tailoring/prompts.rs.
// These rules are requests to the model only; tailoring::merge enforces them.

/// Appended to every prompt that expects a JSON object back.
pub const JSON_ONLY_RULE: &str = "\
    STRICT OUTPUT RULE: Return ONLY a valid JSON object. \
    No explanations, no markdown, no code fences, no commentary before or after it.";

/// Identity preservation and anti-fabrication rules for résumé rewriting.
pub const IDENTITY_RULES: &str = "\
- Keep all personal information, education, job titles, company names, locations and dates exactly the same.
- Do NOT invent employers, job titles, degrees or dates.
- Do NOT mention frameworks, tools or technologies that are not already present in the resume.
- Focus on results, impact, metrics and action-oriented phrasing (improved, delivered, implemented).
- Keep the tone professional, concise and accomplishment-based.";

/// Limits how often the target company is named.
pub const COMPANY_MENTION_RULE: &str = "Mention the company name at most once.";
