//! Prompt construction for the selection engine.

use catalog::{Catalog, TasteInput};
use std::fmt::Write;

/// Keys the generated reply must contain, in the order the prompt lists them.
pub const REPLY_FIELDS: [&str; 3] = ["chosen_sign_name", "prophecy", "symbolism"];

/// Build the single prompt sent to the generative service.
///
/// Lists every sign with its description, the raw input names, and the
/// enrichment tags when there are any.
pub fn build_prompt(catalog: &Catalog, inputs: &[TasteInput], tags: &[String]) -> String {
    let mut prompt = String::from(
        "You are the Cultural Zodiac Oracle. You read a person's tastes and \
         assign them exactly one sign from the list below.\n\nSIGNS:\n",
    );

    // Writing into a String cannot fail.
    for sign in catalog.signs() {
        let _ = writeln!(prompt, "- {}: {}", sign.name, sign.description);
    }

    let names: Vec<&str> = inputs
        .iter()
        .map(|input| input.name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    let _ = write!(prompt, "\nTHE SEEKER LOVES: {}\n", names.join(", "));

    if !tags.is_empty() {
        let _ = write!(
            prompt,
            "\nTASTE SIGNALS (auxiliary context): {}\n",
            tags.join(", ")
        );
    }

    let _ = write!(
        prompt,
        "\nChoose the single sign whose name matches best, copying the name exactly \
         as written above. Write a one or two sentence prophecy addressed to the \
         seeker and one sentence explaining the symbolism of the match.\n\
         Respond with only a JSON object with exactly these keys: {}. \
         No markdown, no text outside the JSON.",
        REPLY_FIELDS.join(", ")
    );

    prompt
}
