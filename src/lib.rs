pub mod commands;
pub mod db;
pub mod frecency;
pub mod interactive;
pub mod matcher;
pub mod outcome;
pub mod pipe;
pub mod pkg;
pub mod runtime;
pub mod shells;
