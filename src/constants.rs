/// Upper bound for a stored payment proof: 5 MiB.
pub const MAX_PAYMENT_PROOF_BYTES: usize = 5 * 1024 * 1024;

pub const PAYMENT_PROOF_CONTENT_TYPE: &str = "application/pdf";

/// Multipart field carrying the payment proof file.
pub const PAYMENT_PROOF_FIELD: &str = "payment_proof";

pub mod otp {

    pub const CODE_DIGITS: usize = 4;

    pub const CODE_SPACE: u32 = 10_000;
}

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub const MAX_PAGE_SIZE: u64 = 1000;

    /// Rows pulled for the admin dashboard overview.
    pub const DASHBOARD_ALUMNI_LIMIT: u64 = 1000;
}

pub mod session {

    pub const ADMIN_ID_KEY: &str = "admin_id";
}
