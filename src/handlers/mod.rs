pub mod health;
pub mod login;
pub mod otp;
pub mod password_reset;
pub mod register;
mod validation;

pub use health::health_check;
pub use login::login;
pub use otp::{send_otp, verify_otp};
pub use password_reset::reset_password;
pub use register::register;
