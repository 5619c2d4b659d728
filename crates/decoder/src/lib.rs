// Module structure for the JSON record decoder.

// Core
pub mod parser;
pub mod event;

// Collaborators
pub mod reader;
pub mod conf;
pub mod runtime;
