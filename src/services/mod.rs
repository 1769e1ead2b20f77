pub mod alumni_service;
pub mod alumni_service_impl;
pub use alumni_service::{
    AlumniDto, AlumniError, AlumniPage, AlumniProfile, AlumniService, StoredAttachment,
};
pub use alumni_service_impl::SeaOrmAlumniService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AdminInfo, AuthError, AuthService, SeedOutcome};
pub use auth_service_impl::SeaOrmAuthService;

pub mod nomination_service;
pub mod nomination_service_impl;
pub use nomination_service::{
    NominationDto, NominationError, NominationInput, NominationService, NomineeGroup,
};
pub use nomination_service_impl::SeaOrmNominationService;

pub mod otp_service;
pub mod otp_service_impl;
pub use otp_service::{IssuedCode, OtpError, OtpService, Verification};
pub use otp_service_impl::SeaOrmOtpService;

pub mod reference_service;
pub use reference_service::{CountryDto, CourseDto, ReferenceError, ReferenceService};

pub mod scheduler;
pub use scheduler::Scheduler;

pub mod sponsorship_service;
pub mod sponsorship_service_impl;
pub use sponsorship_service::{
    SponsorshipDto, SponsorshipError, SponsorshipInput, SponsorshipService, SponsorshipStats,
};
pub use sponsorship_service_impl::SeaOrmSponsorshipService;
