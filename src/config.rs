use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: SecretBox<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // SMTP設定（オプション - email機能有効時のみ使用）
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<SecretBox<String>>,
    pub smtp_password: Option<SecretBox<String>>,
    #[serde(default)]
    pub smtp_from_address: Option<String>,

    // OTP設定
    /// OTP共有シークレット（環境変数 OTPKEY）
    #[serde(default, rename = "otpkey")]
    pub otp_key: Option<SecretBox<String>>,
    #[serde(default = "default_otp_step_secs")]
    pub otp_step_secs: u64,
    #[serde(default = "default_otp_digits")]
    pub otp_digits: usize,
    /// 前後に許容するステップ数
    #[serde(default = "default_otp_skew")]
    pub otp_skew: u8,

    // JWT設定
    pub jwt_secret: SecretBox<String>,
    #[serde(default = "default_jwt_ttl_secs")]
    pub jwt_ttl_secs: i64,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SMTP_PORT: u16 = 587;

/// OTPKEY 未設定時のフォールバック値
///
/// 既存の発行済みコードとの互換性のため残している。本番では必ず OTPKEY を設定すること。
pub const DEFAULT_OTP_SECRET: &str = "otpsecret";
pub const DEFAULT_OTP_STEP_SECS: u64 = 600;
pub const DEFAULT_OTP_DIGITS: usize = 5;
pub const DEFAULT_OTP_SKEW: u8 = 1;
const DEFAULT_JWT_TTL_SECS: i64 = 86400;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_otp_step_secs() -> u64 {
    DEFAULT_OTP_STEP_SECS
}

fn default_otp_digits() -> usize {
    DEFAULT_OTP_DIGITS
}

fn default_otp_skew() -> u8 {
    DEFAULT_OTP_SKEW
}

fn default_jwt_ttl_secs() -> i64 {
    DEFAULT_JWT_TTL_SECS
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

/// OTP生成・検証パラメータ
///
/// 起動時に一度だけ構築し、以降は読み取り専用で共有する。
#[derive(Debug)]
pub struct OtpSettings {
    secret: SecretBox<String>,
    pub step_secs: u64,
    pub digits: usize,
    pub skew: u8,
}

impl OtpSettings {
    /// パラメータを検証して OtpSettings を作成
    pub fn new(secret: &str, step_secs: u64, digits: usize, skew: u8) -> Result<Self, AppError> {
        if step_secs == 0 {
            return Err(AppError::Internal(anyhow::anyhow!(
                "otp step must be greater than zero"
            )));
        }
        // 10^digits が u32 に収まる範囲
        if !(1..=9).contains(&digits) {
            tracing::error!(digits, "OTP桁数が範囲外");
            return Err(AppError::Internal(anyhow::anyhow!(
                "otp digits must be between 1 and 9"
            )));
        }

        Ok(Self {
            secret: SecretBox::new(Box::new(secret.to_string())),
            step_secs,
            digits,
            skew,
        })
    }

    /// Config から構築（OTPKEY 未設定時は警告を出してデフォルト値を使用）
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let secret = match &config.otp_key {
            Some(key) if !key.expose_secret().is_empty() => key.expose_secret().as_str(),
            _ => {
                tracing::warn!("OTPKEY が未設定のため既定のシークレットを使用します（本番環境では設定必須）");
                DEFAULT_OTP_SECRET
            }
        };

        Self::new(
            secret,
            config.otp_step_secs,
            config.otp_digits,
            config.otp_skew,
        )
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}
