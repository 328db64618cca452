pub mod calendar_service;
pub mod dispatcher;
pub mod error;
pub mod oncall_service;
pub mod roster_service;
