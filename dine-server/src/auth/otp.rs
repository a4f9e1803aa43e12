//! 一次性验证码 (OTP)
//!
//! 员工手机号登录使用 6 位数字验证码。只保存验证码的 SHA-256 摘要，
//! 条目带有效期和尝试次数上限；同一号码在重发间隔内不会重新下发。

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use crate::utils::{AppError, AppResult, ErrorCode};

/// 默认重发间隔
const DEFAULT_RESEND_INTERVAL: Duration = Duration::from_secs(30);

/// 验证码位数
const CODE_DIGITS: u32 = 6;

#[derive(Debug)]
struct OtpEntry {
    code_hash: String,
    issued_at: Instant,
    expires_at: Instant,
    attempts: u32,
}

/// 验证码存储 (进程内，重启即失效)
#[derive(Debug, Clone)]
pub struct OtpStore {
    entries: Arc<DashMap<String, OtpEntry>>,
    ttl: Duration,
    max_attempts: u32,
    resend_interval: Duration,
}

impl OtpStore {
    pub fn new(ttl_secs: u64, max_attempts: u32) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_attempts: max_attempts.max(1),
            resend_interval: DEFAULT_RESEND_INTERVAL,
        }
    }

    /// 覆盖重发间隔 (测试使用)
    pub fn with_resend_interval(mut self, interval: Duration) -> Self {
        self.resend_interval = interval;
        self
    }

    /// 为号码签发新验证码，返回明文 (仅用于下发)
    pub fn issue(&self, phone: &str) -> AppResult<String> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(phone)
            && now.duration_since(entry.issued_at) < self.resend_interval
            && now < entry.expires_at
        {
            return Err(AppError::with_message(
                ErrorCode::TooManyAttempts,
                "Verification code was sent recently, please wait",
            ));
        }

        let code = generate_code()?;
        self.entries.insert(
            phone.to_string(),
            OtpEntry {
                code_hash: hash_code(phone, &code),
                issued_at: now,
                expires_at: now + self.ttl,
                attempts: 0,
            },
        );
        Ok(code)
    }

    /// 校验验证码；成功后条目被消费
    pub fn verify(&self, phone: &str, code: &str) -> AppResult<()> {
        let Some(mut entry) = self.entries.get_mut(phone) else {
            return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
        };

        if Instant::now() >= entry.expires_at {
            drop(entry);
            self.entries.remove(phone);
            return Err(AppError::new(ErrorCode::VerificationCodeExpired));
        }

        if entry.code_hash == hash_code(phone, code.trim()) {
            drop(entry);
            self.entries.remove(phone);
            return Ok(());
        }

        entry.attempts += 1;
        if entry.attempts >= self.max_attempts {
            drop(entry);
            self.entries.remove(phone);
            return Err(AppError::new(ErrorCode::TooManyAttempts));
        }
        Err(AppError::new(ErrorCode::VerificationCodeInvalid)
            .with_detail("remaining_attempts", self.max_attempts - entry.attempts))
    }

    /// 清理过期条目，返回清理数量
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn generate_code() -> AppResult<String> {
    let mut bytes = [0u8; 4];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::internal("Random source unavailable"))?;
    let modulus = 10u32.pow(CODE_DIGITS);
    Ok(format!(
        "{:0width$}",
        u32::from_be_bytes(bytes) % modulus,
        width = CODE_DIGITS as usize
    ))
}

fn hash_code(phone: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}
