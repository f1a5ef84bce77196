// Shared prompt fragments.
// Feature modules define their own prompts.rs and pull cross-cutting pieces from here.

/// Closing instruction that forbids anything outside the JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
JSONオブジェクト以外の文章・説明・前置き・マークダウンのコードブロックは一切含めないでください。";
