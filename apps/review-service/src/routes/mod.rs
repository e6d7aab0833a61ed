pub mod cards;
pub mod study;
