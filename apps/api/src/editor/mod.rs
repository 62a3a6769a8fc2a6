// Editing sessions: one resume per open editor, mutated through whole-field replacements
// and re-rendered after every change so exports always see the current view.

pub mod expiry;
pub mod handlers;
pub mod save;
pub mod session;

pub use save::{LoggingSaveSink, SaveSink};
pub use expiry::spawn_idle_sweeper;
pub use session::{EditorSession, SeedContent, SessionContext, SessionStore};
