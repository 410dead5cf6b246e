pub mod prompts;
pub mod themes;
