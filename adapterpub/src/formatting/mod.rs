//! Terminal output formatting.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{format_duration, print_summary_box};
pub use status::{print_error, print_info, print_success, print_warning};
pub use tables::{print_adapter_list, print_outcome_table};
