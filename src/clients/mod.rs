pub mod countries;
pub mod mail;
