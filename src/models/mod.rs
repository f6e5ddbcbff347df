pub mod alarm;
pub mod group;
