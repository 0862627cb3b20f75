//! Pipeline stages for structured form extraction.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the rendering backend or model endpoint can
//! be swapped without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! render ──▶ encode ──▶ llm
//! (pdfium)   (base64)   (tool call)
//! ```
//!
//! 1. [`render`] — rasterise the first page to a PNG on disk; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`encode`] — read the PNG and base64-encode it for the request body
//! 3. [`llm`]    — submit image + schema-shaped tool to the Messages API
//!    with tool use forced, and unwrap the tool call's input; the only
//!    stage with network I/O

pub mod encode;
pub mod llm;
pub mod render;
