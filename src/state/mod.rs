/// State management module
///
/// This module holds the in-memory sorting session:
/// - Image queue with its cursor (queue.rs)
/// - Category cards and their buckets (registry.rs)
/// - Elapsed time and images per minute (throughput.rs)
/// - The session controller tying them together (session.rs)
///
/// Nothing here is persisted; a session lives as long as the window.

pub mod queue;
pub mod registry;
pub mod session;
pub mod throughput;
