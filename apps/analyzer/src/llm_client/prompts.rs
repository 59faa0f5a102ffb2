// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction against filling gaps with invented data.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only report what the document states. \
    If a value is not present, leave it null or use an empty list.";
