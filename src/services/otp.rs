use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use totp_rs::{Algorithm, TOTP};

use crate::config::OtpSettings;
use crate::error::AppError;
use crate::services::EmailService;

/// 現在時刻（UNIX秒）の取得元
pub trait Clock: Send + Sync {
    fn now_unix_secs(&self) -> u64;
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_else(|e| {
                tracing::error!(error = ?e, "システム時刻取得エラー");
                0
            })
    }
}

/// TOTPの鍵素材を構築
///
/// 共有シークレットとメールアドレスの単純な文字列連結。
/// 発行済みコードとの互換性を保つため、鍵導出の変更はこの関数だけで行うこと。
pub fn derive_key_material(secret: &str, email: &str) -> Vec<u8> {
    let mut material = String::with_capacity(secret.len() + email.len());
    material.push_str(secret);
    material.push_str(email);
    material.into_bytes()
}

/// メールアドレス宛てワンタイムパスワード（TOTP）サービス
///
/// コードは保存せず、(シークレット, メールアドレス, 時間ステップ) から毎回導出する。
///
/// # Security
/// - 検証失敗の理由（期限切れ・不一致・別アドレス）は区別しない
/// - 有効期間内であれば同じコードを何度でも検証できる（使用済み管理なし）
/// - コードはログに出力しない
#[derive(Clone)]
pub struct OtpService {
    settings: Arc<OtpSettings>,
    clock: Arc<dyn Clock>,
}

impl OtpService {
    /// システム時計を使う OtpService を作成
    pub fn new(settings: Arc<OtpSettings>) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: Arc<OtpSettings>, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// 現在の時間ステップのコードを生成
    pub fn generate(&self, email: &str) -> String {
        self.totp_for(email).generate(self.clock.now_unix_secs())
    }

    /// コードを検証
    ///
    /// # Note
    /// 現在のステップに加えて前後 `skew` ステップのコードも受け付ける
    pub fn verify(&self, email: &str, code: &str) -> bool {
        if code.len() != self.settings.digits || !code.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        let now = self.clock.now_unix_secs();
        // check() は now / step - skew を計算するため、最初の skew ステップ内は検証不可
        if now / self.settings.step_secs < u64::from(self.settings.skew) {
            tracing::error!(now, "OTP検証時刻が不正");
            return false;
        }

        self.totp_for(email).check(code, now)
    }

    /// コードを生成してメールで送信
    ///
    /// コードは送信前に確定する。送信失敗時は `MailDispatchFailed` を返し、
    /// 続行するかどうかは呼び出し側が判断する。
    pub async fn issue(
        &self,
        email: &str,
        email_service: &EmailService,
    ) -> Result<String, AppError> {
        let code = self.generate(email);

        email_service.send_otp_email(email, &code).await.map_err(|e| {
            tracing::warn!(email = %email, error = %e, "認証コードメール送信失敗");
            AppError::MailDispatchFailed(e)
        })?;

        tracing::info!(email = %email, "認証コード送信完了");

        Ok(code)
    }

    fn totp_for(&self, email: &str) -> TOTP {
        // new() は6桁未満・128ビット未満の鍵を拒否するため unchecked を使う
        TOTP::new_unchecked(
            Algorithm::SHA1,
            self.settings.digits,
            self.settings.skew,
            self.settings.step_secs,
            derive_key_material(self.settings.secret(), email),
        )
    }
}
