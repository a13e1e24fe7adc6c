//! Prompt construction for the advisor call.

use crate::AdviceRequest;

/// System prompt shared by all providers.
pub fn system_prompt() -> String {
    "You are a senior real estate investment advisor. You analyze calculator \
     output and reply with a concise summary of risks, opportunities, and \
     strategic advice.\n\n\
     RESPONSE RULES:\n\
     1. Reply with 3-4 bullet points of plain text.\n\
     2. Say whether the numbers look like a solid financial move.\n\
     3. Consider current market conditions such as interest rates and inflation.\n\
     4. Do NOT use markdown headings or code blocks."
        .to_string()
}

/// User prompt embedding the calculator's JSON payload.
pub fn user_prompt(request: &AdviceRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str("CALCULATION TYPE:\n");
    prompt.push_str(request.kind.as_str());
    prompt.push('\n');

    prompt.push_str("\nDATA:\n");
    prompt.push_str(&request.data.to_string());
    prompt.push('\n');

    prompt.push_str("\nProvide professional insights on whether this looks like a solid financial move.");

    prompt
}

/// Single combined prompt for providers without a system/user split.
pub fn combined_prompt(request: &AdviceRequest) -> String {
    format!("{}\n\n{}", system_prompt(), user_prompt(request))
}
