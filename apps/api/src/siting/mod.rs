// Siting assessment endpoints: output schemas, prompt construction, handlers.
// All model calls go through the provider module — no direct API calls here.

pub mod handlers;
pub mod prompts;
pub mod schema;
