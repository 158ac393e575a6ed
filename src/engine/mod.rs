pub mod chain;
pub mod player;
pub mod progress;
pub mod recorder;
pub mod session;
pub mod validator;

pub use chain::ChainPosition;
pub use player::{Advance, CheckReport, ChainReport, LessonPlayer, PlayerError};
pub use recorder::{AttemptRecorder, ChainSummary};
pub use session::{EditError, LessonSession};
pub use validator::{AnswerState, Outcome, Selection};
