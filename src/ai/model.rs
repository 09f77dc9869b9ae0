//! Shared domain models for generator calls.

/// Default target language when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "cpp";

/// Default optimisation goal when a request does not name one.
pub const DEFAULT_GOAL: &str = "readability";

/// Language and goal that steer an optimisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationTarget {
    language: String,
    goal: String,
}

impl OptimizationTarget {
    /// Constructs a target from explicit language and goal values.
    #[must_use]
    pub fn new(language: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            goal: goal.into(),
        }
    }

    /// Programming language of the submitted code (e.g. `cpp`).
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Optimisation goal (e.g. `readability`, `performance`).
    #[must_use]
    pub const fn goal(&self) -> &str {
        self.goal.as_str()
    }
}

impl Default for OptimizationTarget {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE, DEFAULT_GOAL)
    }
}

/// One prompt sent to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    system_prompt: String,
    user_text: String,
}

impl CompletionRequest {
    /// Pairs a system instruction with the user message.
    #[must_use]
    pub fn new(system_prompt: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_text: user_text.into(),
        }
    }

    /// Instruction describing how to answer.
    #[must_use]
    pub const fn system_prompt(&self) -> &str {
        self.system_prompt.as_str()
    }

    /// Text the instruction applies to.
    #[must_use]
    pub const fn user_text(&self) -> &str {
        self.user_text.as_str()
    }
}
