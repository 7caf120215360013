//! Prompt assembly for the two critique flavours
//!
//! Extraction asks the model to revise the insight list from two kinds of
//! evidence: a failed attempt paired with a later success on the same task
//! ([`compare_prompt`]), and a batch of successful exemplars
//! ([`success_prompt`]). Both are pure string builders; the same inputs
//! always produce the same prompt.

use hindsight_core::{InsightStore, Trial};

/// Prompt for the compare flavour: what did the success do differently?
pub fn compare_prompt(
    question: &str,
    failed: &Trial,
    successful: &Trial,
    insights: &InsightStore,
) -> String {
    format!(
        "You will see two attempts at the same task. The first attempt failed \
         and the second succeeded. Study what the successful attempt did \
         differently and revise the insight list accordingly.\n\n\
         Task:\n{question}\n\n\
         Failed attempt:\n{failed}\n\n\
         Successful attempt:\n{successful}\n\n\
         Current insights:\n{insights}\n\n\
         {menu}",
        question = question,
        failed = failed.steps_text(),
        successful = successful.steps_text(),
        insights = insights_section(insights),
        menu = operations_menu(insights),
    )
}

/// Prompt for the success flavour: what do these wins have in common?
pub fn success_prompt(exemplars: &[String], insights: &InsightStore) -> String {
    format!(
        "You will see several tasks that were all solved successfully. \
         Identify what these solutions have in common and revise the insight \
         list accordingly.\n\n\
         Successful attempts:\n{exemplars}\n\n\
         Current insights:\n{insights}\n\n\
         {menu}",
        exemplars = exemplars.join("\n\n"),
        insights = insights_section(insights),
        menu = operations_menu(insights),
    )
}

fn insights_section(insights: &InsightStore) -> String {
    if insights.is_empty() {
        "(none yet)".to_string()
    } else {
        insights.numbered_list()
    }
}

/// Allowed operations, one per line. `ADD` is offered only while the list
/// has room.
fn operations_menu(insights: &InsightStore) -> String {
    let mut menu = String::from(
        "Revise the insights with operations, one per line:\n\
         AGREE <number>: <existing insight this experience supports>\n\
         EDIT <number>: <revised insight text>\n\
         REMOVE <number>: <existing insight to delete>\n",
    );
    if insights.at_capacity() {
        menu.push_str("The insight list is full; do not propose new insights.\n");
    } else {
        menu.push_str("ADD: <new insight>\n");
    }
    menu.push_str("Output only operations, nothing else.");
    menu
}
