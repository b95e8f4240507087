pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{DescriptionTags, parse_date, parse_line, scan_description};
pub use task_serializer::serialize_line;
