//! Operator instructions sent when a chat session opens.

use chrono::{DateTime, Utc};

/// Placeholder replaced by the screen context.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Built-in operator instructions.
pub const DEFAULT_OPERATOR_PROMPT: &str = r#"You are the AdOpt operator. You run an advertising campaign workspace on the user's behalf, and every change you make goes through the function tools you were given.

WORKSPACE STATE:
{context}

WHAT YOU CAN DO:
- Create campaigns, open them, and move between the dashboard, create, project and integrations views
- Research a brand from its website URL before creating a campaign
- Generate creative concepts and pick the strongest ones
- Write final ad copy in A/B variants with SEO metadata, then trigger image generation
- Schedule campaigns, write SEO reports, list, export and delete projects

RULES:
1. Call a tool for every action. Never claim an action happened without its tool result.
2. If a tool returns an error, say what failed and offer a way forward.
3. When brand details are missing, ask for them before creating anything.
4. For "do everything" requests run the whole pipeline in order: create, ideate, select, finals, images, schedule, report.
5. When selecting concepts, give a one-line marketing reason for each pick.
6. When listing projects, mention each status and the sensible next step.
7. Schedule times are Unix timestamps in milliseconds. Work them out from the current time below.
8. Keep replies short and concrete: name the project and what changed.

Current time: {now}"#;

/// Build the system instruction for a new chat session.
///
/// `template` may contain `{context}` and `{now}`; a template without the
/// context placeholder gets the context appended.
pub fn system_instruction(template: &str, context: &str, now: DateTime<Utc>) -> String {
    let with_time = template.replace("{now}", &now.to_rfc3339());
    if with_time.contains(CONTEXT_PLACEHOLDER) {
        with_time.replace(CONTEXT_PLACEHOLDER, context)
    } else {
        format!("{}\n\nWORKSPACE STATE:\n{}", with_time.trim_end(), context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_default_prompt_embeds_context() {
        let instruction = system_instruction(
            DEFAULT_OPERATOR_PROMPT,
            "Current View: dashboard\nTotal Projects: 0",
            fixed_now(),
        );
        assert!(instruction.contains("WORKSPACE STATE:\nCurrent View: dashboard\nTotal Projects: 0"));
        assert!(instruction.contains("Current time: 2026-03-02T09:00:00+00:00"));
        assert!(!instruction.contains(CONTEXT_PLACEHOLDER));
    }

    #[test]
    fn test_custom_prompt_without_placeholder() {
        let instruction = system_instruction("Be brief.\n", "Total Projects: 2", fixed_now());
        assert_eq!(instruction, "Be brief.\n\nWORKSPACE STATE:\nTotal Projects: 2");
    }
}
