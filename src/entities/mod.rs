pub mod prelude;

pub mod admins;
pub mod alumni;
pub mod countries;
pub mod courses;
pub mod nominations;
pub mod otp_codes;
pub mod sponsorships;
