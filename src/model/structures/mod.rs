pub mod entity;
pub mod event;
pub mod rating_source;
pub mod session_kind;
pub mod status;
