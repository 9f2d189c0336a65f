//! Text rendering for the terminal

use rivet_core::{ChatTurn, ControlState, FormChoices, OptionField};

use crate::commands::Tab;

/// Warning line, for backend rejections and local validation failures
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message)
}

/// Confirmation line
pub fn notice(message: &str) -> String {
    format!("✓ {}", message)
}

/// One transcript turn: the user line (if any) then the assistant reply
pub fn turn(turn: &ChatTurn) -> String {
    let mut out = String::new();
    if let Some(user) = &turn.user_message {
        out.push_str("**You**\n");
        out.push_str(user);
        out.push('\n');
    }
    if let Some(assistant) = turn.render_assistant() {
        out.push_str(&assistant);
        out.push('\n');
    }
    out
}

/// Numbered choice list for one form field, default marked
pub fn choice_list(field: OptionField, choices: &FormChoices, current: &str) -> String {
    let mut out = format!("{} ({})\n", field.label(), field.info());
    for (i, choice) in choices.choices(field).iter().enumerate() {
        let marker = if choice == current { " (default)" } else { "" };
        out.push_str(&format!("  {}) {}{}\n", i + 1, choice, marker));
    }
    out
}

/// Every option list, as shown by `/options`
pub fn options_overview(choices: &FormChoices) -> String {
    OptionField::ALL
        .iter()
        .map(|field| choice_list(*field, choices, choices.default_choice(*field)))
        .collect::<Vec<_>>()
        .join("")
}

/// Configuration list for the chat tab
pub fn configuration_list(configs: &[String], selected: Option<&str>) -> String {
    let mut out = String::from("Configurations\n");
    for (i, name) in configs.iter().enumerate() {
        let marker = if Some(name.as_str()) == selected {
            " (selected)"
        } else {
            ""
        };
        out.push_str(&format!("  {}) {}{}\n", i + 1, name, marker));
    }
    out
}

/// Tab header with the controls currently available
pub fn tab_header(tab: Tab, controls: &ControlState) -> String {
    let mut enabled = Vec::new();
    match tab {
        Tab::CreateConfiguration => enabled.push("/create"),
        Tab::StartChatting => {
            if controls.start {
                enabled.push("/start");
            }
            if controls.message_input {
                enabled.push("messages");
            }
            if controls.voice_input {
                enabled.push("/voice");
            }
            if controls.clear {
                enabled.push("/clear");
            }
        }
    }
    let available = if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    };
    format!("== {} == [available: {}]", tab.title(), available)
}

/// Startup banner
pub fn banner(voice_enabled: bool) -> String {
    let mode = if voice_enabled { "text + voice" } else { "text" };
    format!(
        "╔════════════════════════════════════════╗\n\
         ║         Welcome to Rivet-MemGPT        ║\n\
         ╚════════════════════════════════════════╝\n\
         mode: {} | type /help for commands",
        mode
    )
}
