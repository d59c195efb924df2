// Dynamic assessment assembly: skill selection, history-aware sampling,
// attempt creation and shown-question history.

pub mod assembler;
pub mod handlers;
pub mod selection;
