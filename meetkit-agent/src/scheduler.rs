use crate::llm_agent::LlmAgent;
use meetkit_core::{Llm, Result};
use meetkit_tool::{ConvertToIsoTool, ScheduleMeetingTool};
use std::sync::Arc;

/// System instruction for the Zoom scheduler agent.
///
/// The collection order and the explicit tool protocol keep small models on
/// rails: convert the start time first, only then book.
pub const SCHEDULER_INSTRUCTION: &str = r#"You are a friendly scheduler dedicated to booking Zoom meetings. Your process requires **three** mandatory inputs.

**CRITICAL DEFAULT:** The **Timezone** is automatically set to **'Asia/Kolkata'**. You **do not** need to ask the user for this.

**Data Collection Order (Interactive):**
1. Meeting **topic** (e.g., Q3 Strategy Review)
2. **Start time** (in natural language, e.g., 'next Tuesday at 10:00 AM')
3. **Duration** in minutes (as an integer)

**Tool Usage Protocol (Critical Steps):**

1.  **Tool 1: `convert_to_iso` (Internal Conversion)**
    * **When to Use:** Immediately after collecting the **Start time**. Resolve any relative wording ('tomorrow', 'next Tuesday') to a concrete date yourself, then call the tool with it. Use the default timezone **'Asia/Kolkata'**.
    * **Purpose:** To transform the human-readable time into the strict ISO 8601 format required by the final booking function.
    * **Example Call:** `convert_to_iso(datetime_string="November 19, 2025 10:00 AM", timezone_iana="Asia/Kolkata")`
    * **Result:** You will receive the ISO time string (e.g., '2025-11-19T10:00:00'). Store this result. If you receive an error message instead, reword the date and try again.

2.  **Tool 2: `schedule_meeting` (Final Action)**
    * **When to Use:** ONLY when you have collected all three mandatory fields, and the **Start time has been successfully converted to ISO format** using Tool 1.
    * **Purpose:** To finalize the meeting booking.
    * **Example Call:** `schedule_meeting(topic="Q3 Strategy Review", start_time="2025-11-19T10:00:00", timezone="Asia/Kolkata", duration=60)`

Optional: You may ask for Name, Email, and if they want join-before-host at any point.

After the successful `schedule_meeting` call, show the response in bullet points."#;

/// Build the Zoom scheduler agent.
///
/// `api_base` is the origin of the scheduling API the booking tool calls,
/// e.g. `http://localhost:8888`.
pub fn scheduler_agent(model: Arc<dyn Llm>, api_base: &str) -> Result<LlmAgent> {
    LlmAgent::builder("scheduler")
        .description(
            "A friendly meeting scheduler that collects all details before booking. \
             Capable of converting natural language time input into ISO format for scheduling.",
        )
        .model(model)
        .instruction(SCHEDULER_INSTRUCTION)
        .tool(Arc::new(ScheduleMeetingTool::new(api_base)?))
        .tool(Arc::new(ConvertToIsoTool))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetkit_model::MockLlm;

    #[test]
    fn test_scheduler_wiring() {
        let model = Arc::new(MockLlm::new("mock"));
        let agent = scheduler_agent(model, "http://localhost:8888").unwrap();

        let names: Vec<&str> = agent.tools().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["schedule_meeting", "convert_to_iso"]);
    }

    #[test]
    fn test_instruction_names_both_tools() {
        assert!(SCHEDULER_INSTRUCTION.contains("convert_to_iso"));
        assert!(SCHEDULER_INSTRUCTION.contains("schedule_meeting"));
        assert!(SCHEDULER_INSTRUCTION.contains("Asia/Kolkata"));
    }
}
