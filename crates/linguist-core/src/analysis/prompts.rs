use super::backend::PromptPart;

/// Fixed instruction sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = r#"You are an AI relationship analyst. Analyze the following chat conversation and provide insights.
You must respond with ONLY a valid JSON object. No markdown, no code blocks, no additional text.
The response must exactly match this structure:
{
  "interestLevel": "a clear phrase describing their level of interest",
  "flirtingScore": "a qualitative assessment of flirting",
  "redFlags": "list any concerning patterns or 'None detected' if none",
  "mood": "their current mood based on recent messages",
  "ghostingRisk": "assessment of ghosting probability",
  "insights": "2-3 sentences of general advice"
}"#;

const CHAT_LABEL: &str = "Chat to analyze:\n";
const JSON_REMINDER: &str =
    "\n\nRemember: Respond with ONLY the JSON object, no additional text or formatting.";

/// Build the two-part request: the fixed instruction, then the labelled chat.
pub fn build_analysis_parts(chat: &str) -> [PromptPart; 2] {
    [
        PromptPart::new(SYSTEM_PROMPT),
        PromptPart::new(format!("{CHAT_LABEL}{chat}{JSON_REMINDER}")),
    ]
}
