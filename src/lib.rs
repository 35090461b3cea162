pub mod display;
pub mod error;
pub mod form;
pub mod roster;
pub mod schedule;
pub mod slot;
pub mod student;
pub mod web;
