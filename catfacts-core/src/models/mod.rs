pub mod fact;
pub mod intent;
pub mod segment;

pub use fact::FactRecord;
pub use intent::{builtin, FactCommand, IntentCommand};
pub use segment::ResponseSegment;
