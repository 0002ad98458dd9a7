// Declare submodules
mod analysis;
mod common;

// Re-export the public prompt API
pub use analysis::{competitor_analysis_prompt, CompetitorContent};
pub use common::{SYSTEM_INSTRUCTION, TASK_INSTRUCTIONS};
