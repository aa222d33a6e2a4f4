pub mod annotator;
pub mod health;
