pub mod browse;
pub mod normalize;
pub mod raw;
pub mod types;

pub use browse::{
    filter_by_type, find_prompt, generate_prompt_id, group_by_year, prompts_for_week,
    submissions_for_prompt, week_label, years_descending,
};
pub use normalize::{normalize_prompts, normalize_submissions};
pub use types::{Prompt, PromptStatus, PromptType, SpoilerFlag, Submission, WinnerRank};
