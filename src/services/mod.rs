pub mod code_annotator;
pub mod cover_page;
pub mod path_mapper;
pub mod sanitizer;
pub mod style_resolver;

pub use code_annotator::Annotation;
pub use path_mapper::map_path;
pub use sanitizer::{sanitize, SanitizeReport};
pub use style_resolver::{generate_page_styles, StyleResolver};
