pub use super::admins::Entity as Admins;
pub use super::alumni::Entity as Alumni;
pub use super::countries::Entity as Countries;
pub use super::courses::Entity as Courses;
pub use super::nominations::Entity as Nominations;
pub use super::otp_codes::Entity as OtpCodes;
pub use super::sponsorships::Entity as Sponsorships;
