pub mod facts;
pub mod seed;
