pub mod labels;
pub mod thread_id;

pub use labels::{LabelResolver, ResolvedLabels};
pub use thread_id::{IdSource, ParsedThreadId};
