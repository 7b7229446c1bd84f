pub mod batch;
pub mod generate;
pub mod inspect;
