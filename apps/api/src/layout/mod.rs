// Paginated resume layout: style resolution, text cleanup, bullet splitting,
// the flow cursor and the section renderer. Pure and CPU-bound; async callers
// run it inside tokio::task::spawn_blocking.

pub mod bullets;
pub mod cursor;
pub mod font_metrics;
pub mod links;
pub mod page;
pub mod sanitize;
pub mod sections;
pub mod style;
pub mod wrap;

// Re-export the public API consumed by the renderer and handlers.
pub use page::LayoutConfig;
pub use sections::layout_resume;
pub use style::resolve_style;
