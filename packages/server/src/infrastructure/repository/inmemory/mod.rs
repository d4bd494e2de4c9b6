//! In-memory repositories. State lives for the lifetime of the process.

mod history;
mod session;

pub use history::InMemoryHistoryRepository;
pub use session::InMemorySessionRepository;
