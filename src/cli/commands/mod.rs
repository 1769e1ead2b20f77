mod admin;
mod maintenance;

pub use admin::cmd_create_admin;
pub use maintenance::{cmd_seed, cmd_sweep_otps};
