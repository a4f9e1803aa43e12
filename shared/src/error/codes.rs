//! Unified error codes for Dine
//!
//! Error codes are shared by dine-server and its clients. They are organized
//! by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Settings errors
//! - 4xxx: Order errors
//! - 5xxx: Bill errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 8xxx: Event errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired or was revoked
    SessionExpired = 1005,
    /// Verification code expired
    VerificationCodeExpired = 1010,
    /// Verification code invalid
    VerificationCodeInvalid = 1011,
    /// Too many verification attempts
    TooManyAttempts = 1012,
    /// Phone number is not registered as staff
    PhoneNotAllowed = 1013,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Settings ====================
    /// Setting key is unknown
    SettingKeyUnknown = 3001,
    /// Setting value is invalid
    SettingValueInvalid = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order line item not found
    OrderItemNotFound = 4006,
    /// Order is empty
    OrderEmpty = 4007,
    /// Order is no longer pending
    OrderNotPending = 4008,
    /// Order status transition is not allowed
    InvalidStateTransition = 4009,

    // ==================== 5xxx: Bill ====================
    /// Bill input does not satisfy preconditions
    BillPreconditionFailed = 5001,
    /// Bill not found
    BillNotFound = 5002,
    /// Bill could not be persisted
    BillPersistenceFailed = 5003,
    /// Table has no pending orders
    NoPendingOrders = 5004,
    /// Invoice rendering failed
    InvoiceRenderFailed = 5005,

    // ==================== 6xxx: Menu ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Dish has invalid price
    DishInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has dishes
    CategoryHasDishes = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Tax configuration not found
    TaxNotFound = 6201,
    /// Tax percentage is invalid
    TaxInvalidPercentage = 6202,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table number already exists
    TableNumberExists = 7002,
    /// Table has orders
    TableHasOrders = 7003,
    /// QR payload could not be resolved
    QrPayloadInvalid = 7004,

    // ==================== 8xxx: Event ====================
    /// Event not found
    EventNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Operation cancelled (server shutting down)
    Cancelled = 9006,
    /// System busy (retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::VerificationCodeInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",
            ErrorCode::PhoneNotAllowed => "Phone number is not registered as staff",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Settings
            ErrorCode::SettingKeyUnknown => "Unknown setting key",
            ErrorCode::SettingValueInvalid => "Invalid setting value",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::OrderNotPending => "Order is no longer pending",
            ErrorCode::InvalidStateTransition => "Order status transition is not allowed",

            // Bill
            ErrorCode::BillPreconditionFailed => "Bill preconditions not met",
            ErrorCode::BillNotFound => "Bill not found",
            ErrorCode::BillPersistenceFailed => "Bill could not be saved",
            ErrorCode::NoPendingOrders => "Table has no pending orders",
            ErrorCode::InvoiceRenderFailed => "Failed to generate bill",

            // Menu
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishInvalidPrice => "Dish has invalid price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasDishes => "Category has associated dishes",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::TaxNotFound => "Tax configuration not found",
            ErrorCode::TaxInvalidPercentage => "Tax percentage is invalid",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::TableHasOrders => "Table has orders",
            ErrorCode::QrPayloadInvalid => "QR payload is not a valid table link",

            // Event
            ErrorCode::EventNotFound => "Event not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::Cancelled => "Operation cancelled",
            ErrorCode::SystemBusy => "System busy, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::SessionExpired,
            1010 => ErrorCode::VerificationCodeExpired,
            1011 => ErrorCode::VerificationCodeInvalid,
            1012 => ErrorCode::TooManyAttempts,
            1013 => ErrorCode::PhoneNotAllowed,

            2001 => ErrorCode::PermissionDenied,
            2003 => ErrorCode::AdminRequired,

            3001 => ErrorCode::SettingKeyUnknown,
            3002 => ErrorCode::SettingValueInvalid,

            4001 => ErrorCode::OrderNotFound,
            4003 => ErrorCode::OrderAlreadyCompleted,
            4006 => ErrorCode::OrderItemNotFound,
            4007 => ErrorCode::OrderEmpty,
            4008 => ErrorCode::OrderNotPending,
            4009 => ErrorCode::InvalidStateTransition,

            5001 => ErrorCode::BillPreconditionFailed,
            5002 => ErrorCode::BillNotFound,
            5003 => ErrorCode::BillPersistenceFailed,
            5004 => ErrorCode::NoPendingOrders,
            5005 => ErrorCode::InvoiceRenderFailed,

            6001 => ErrorCode::DishNotFound,
            6002 => ErrorCode::DishInvalidPrice,
            6101 => ErrorCode::CategoryNotFound,
            6102 => ErrorCode::CategoryHasDishes,
            6103 => ErrorCode::CategoryNameExists,
            6201 => ErrorCode::TaxNotFound,
            6202 => ErrorCode::TaxInvalidPercentage,

            7001 => ErrorCode::TableNotFound,
            7002 => ErrorCode::TableNumberExists,
            7003 => ErrorCode::TableHasOrders,
            7004 => ErrorCode::QrPayloadInvalid,

            8001 => ErrorCode::EventNotFound,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,
            9006 => ErrorCode::Cancelled,
            9404 => ErrorCode::SystemBusy,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OrderNotPending.code(), 4008);
        assert_eq!(ErrorCode::BillPreconditionFailed.code(), 5001);
        assert_eq!(ErrorCode::BillPersistenceFailed.code(), 5003);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::SessionExpired,
            ErrorCode::PhoneNotAllowed,
            ErrorCode::AdminRequired,
            ErrorCode::SettingValueInvalid,
            ErrorCode::InvalidStateTransition,
            ErrorCode::InvoiceRenderFailed,
            ErrorCode::TaxInvalidPercentage,
            ErrorCode::QrPayloadInvalid,
            ErrorCode::EventNotFound,
            ErrorCode::Cancelled,
            ErrorCode::SystemBusy,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotPending).unwrap();
        assert_eq!(json, "4008");

        let code: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(code, ErrorCode::BillPreconditionFailed);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
        assert_eq!(ErrorCode::OrderNotPending.to_string(), "E4008");
    }
}
