pub mod html_loader;

pub use html_loader::discover_html_files;
