//! OpenTelemetry GenAI semantic convention attribute names.
//!
//! Usable as field names in `Span::record` for spans declared with the
//! matching dotted fields.

/// The name of the operation being performed (e.g. "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g. "openai").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

/// The model that actually served the response.
pub const GEN_AI_RESPONSE_MODEL: &str = "gen_ai.response.model";

/// The unique response ID from the provider.
pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";
