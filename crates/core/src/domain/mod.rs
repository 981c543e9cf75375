pub mod deal;
pub mod notice;
