pub mod certificates;
pub mod generate;
pub mod uploads;
