pub mod formatter;

pub use formatter::{
    format_date, format_explain, format_json, format_leaderboard_table, format_leaderboard_tsv,
    format_prompt_archive, format_rules, format_unavailable, format_week_detail,
    should_use_colors, winner_label,
};
