//! OpenTelemetry tracing with file-based export.
//!
//! Spans from `tracing` macros are bridged into OpenTelemetry and written as
//! OTLP/JSON lines to a rotating file in the data directory:
//!
//! ```text
//! tracing → tracing-opentelemetry → TracerProvider → FileSpanExporter → binderbuilder-traces.json
//! ```
//!
//! The file rotates at 10 MB and keeps three numbered backups. API requests
//! carry the trace context of the event that issued them, so a request span
//! appears as a child of its `handle_event` span even though it runs on
//! another task.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: Tracer provider and file exporter
//! - `span_formatter`: OTLP/JSON encoding
//! - `file_writer`: Size-rotated output file

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME};
