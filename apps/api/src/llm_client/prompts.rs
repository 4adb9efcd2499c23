// Cross-cutting prompt fragments. Feature prompts live next to the feature
// (resume/prompts.rs, candidates/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every extraction prompt so missing facts come back as null instead of guesses.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only report facts that appear in the provided text. \
    If a value is not present, set it to null. Do NOT invent or infer details \
    beyond what the rules below explicitly allow.";

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn json_system(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_keeps_role_first() {
        let system = json_system("You are a resume parser.");
        assert!(system.starts_with("You are a resume parser."));
        assert!(system.contains("valid JSON only"));
    }
}
