use crate::model::Category;

const INTRO: &str = "Please classify the following software license into one of these categories:";
const EXPLANATION_RULE: &str =
    "Write a 150-character explanation of why you choose this category";

/// The fixed instruction sent as the system message for every classification.
pub fn build_classify_system_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("- **{}**", c))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{INTRO}\n\n{categories}\n\n{EXPLANATION_RULE}\n")
}
