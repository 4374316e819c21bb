pub mod group_types;
