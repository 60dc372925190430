/// Strip the markdown fence a model may wrap its JSON in, despite being told not to.
///
/// Removes a leading literal "```json" plus any whitespace after it, and a
/// trailing "```" at the very end of the text, then trims. Text without
/// fences comes back trimmed and otherwise untouched.
pub fn clean_response(text: &str) -> &str {
    let body = match text.strip_prefix("```json") {
        Some(rest) => rest.trim_start(),
        None => text,
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}
