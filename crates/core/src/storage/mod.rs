pub mod lock;
pub mod recommendations;
