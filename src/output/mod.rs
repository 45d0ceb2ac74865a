pub mod formatter;
pub mod render;

pub use formatter::{
    format_advice_table, format_advice_tsv, format_breakdown, format_factor_table, format_json,
    format_table, format_tsv, should_use_colors, write_output,
};
pub use render::{render, render_ranking, render_row, RenderedRow};
