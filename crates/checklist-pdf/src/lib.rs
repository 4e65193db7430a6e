//! Checklist PDF
//!
//! Deterministic paginated layout for fixed-geometry forms, and a lopdf
//! writer for the resulting pages.
//!
//! Layout is two-phase: [`PageLayout`] turns a stream of titles, field rows,
//! tables and paragraphs into [`Page`] display lists (measuring, wrapping and
//! breaking pages as it goes), then [`write_pdf`] serialises those pages.
//! Nothing in layout touches the PDF backend, so the whole pagination can be
//! tested on display lists alone.

pub mod cursor;
pub mod display;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod wrap;
pub mod writer;

pub use cursor::LayoutCursor;
pub use display::{Align, DrawOp, Page, Painter};
pub use error::PdfError;
pub use geometry::PageGeometry;
pub use layout::{Column, Field, FontSizes, LayoutMetrics, PageLayout, PageNumber, Table, TableRow};
pub use metrics::{FixedWidthMeasure, Font, HelveticaMetrics, TextMeasure};
pub use wrap::wrap_text;
pub use writer::{encode_win_ansi, write_pdf};
