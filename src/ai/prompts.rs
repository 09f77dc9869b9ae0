//! Prompt construction for the optimisation and review calls.

use super::model::{CompletionRequest, OptimizationTarget};

/// Builds the request asking the generator to rewrite `code`.
#[must_use]
pub fn optimize_request(code: &str, target: &OptimizationTarget, context: &str) -> CompletionRequest {
    let mut prompt = String::from(concat!(
        "You are a competitive programming code assistant. ",
        "Rewrite the user's code in a more idiomatic and concise way.\n"
    ));
    prompt.push_str("Language: ");
    prompt.push_str(target.language());
    prompt.push_str(".\n");
    prompt.push_str("Optimization goal: ");
    prompt.push_str(target.goal());
    prompt.push_str(".\n");
    prompt.push_str(concat!(
        "Strict requirements:\n",
        "- Return ONLY pure source code, no markdown, no triple backticks, ",
        "no natural language comments.\n",
        "- For C++: prefer 'using namespace std;' if it simplifies cout/cin usage.\n",
        "- Remove unused variables, unnecessary includes and dead code.\n",
        "- Keep the same input/output behavior and overall algorithm.\n"
    ));

    if !context.is_empty() {
        prompt.push_str("\nTask description: ");
        prompt.push_str(context);
    }

    CompletionRequest::new(prompt, code)
}

const REVIEW_SYSTEM_PROMPT: &str = concat!(
    "You are a senior C++/Python competitive programming mentor. ",
    "You are given ORIGINAL code and OPTIMIZED code.\n",
    "Task: briefly explain the changes and their effect.\n",
    "Output format:\n",
    "- 3 to 5 bullet-style sentences.\n",
    "- Each sentence must be short and concrete.\n",
    "- Do not repeat the code, only describe what changed and why it is better.\n",
    "- Language of explanation: English."
);

/// Builds the request asking the generator to explain the rewrite.
#[must_use]
pub fn review_request(original: &str, optimized: &str) -> CompletionRequest {
    let user_text = format!("<<ORIGINAL CODE>>\n{original}\n<<OPTIMIZED CODE>>\n{optimized}\n");
    CompletionRequest::new(REVIEW_SYSTEM_PROMPT, user_text)
}
