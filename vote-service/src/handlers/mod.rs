pub mod health;
pub mod vote;
