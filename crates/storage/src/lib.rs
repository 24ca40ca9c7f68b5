pub mod db;
pub mod dir;
pub mod errors;
pub mod tables;
