pub mod agent;
pub mod forms;
pub mod intake;
pub mod messaging;
pub mod registry;
pub mod validation;
