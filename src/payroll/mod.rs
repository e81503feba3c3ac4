pub mod bundle;
pub mod source;
pub mod table;
