pub mod document;
pub mod export_config;
pub mod html_document;
pub mod loaders;
pub mod outcome;
pub mod page_config;
pub mod qr_config;

pub use document::{DocumentDescriptor, DocumentType};
pub use export_config::{CoverPageConfig, ExportConfig, WaitConditions};
pub use html_document::HtmlDocument;
pub use loaders::discover_html_files;
pub use outcome::{BatchStats, ConversionOutcome};
pub use page_config::{Margin, PageConfig, PdfOptions};
pub use qr_config::{ErrorCorrection, QrColors, QrConfig, QrOptions, QrPosition};
