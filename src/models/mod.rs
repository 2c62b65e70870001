pub mod attendance;
pub mod break_type;
pub mod notification;
pub mod session;
