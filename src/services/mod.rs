pub mod account;
pub mod auth;
pub mod email;
pub mod mail;
pub mod otp;
pub mod token;

pub use account::AccountService;
pub use email::EmailService;
pub use otp::OtpService;
pub use token::TokenService;
