pub mod admin;
pub mod alumni;
pub mod nomination;
pub mod otp;
pub mod reference;
pub mod sponsorship;
