pub mod resume;
pub mod section;

pub use resume::{Heading, ResumeDocument, SectionOrder, DEFAULT_SECTION_ORDER};
pub use section::{Category, Record, RecordKind, SectionValue};
