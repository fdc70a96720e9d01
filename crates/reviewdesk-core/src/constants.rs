//! Wire-level key names shared by the form engine and the report builder.

/// Suffix of the companion key that stores an employee field's star rating.
pub const EMPLOYEE_RATING_SUFFIX: &str = "_rating";

/// Top-level key carrying the bot-verification token on JSON submissions.
pub const VERIFICATION_TOKEN_KEY: &str = "captchaToken";

/// Keys that may appear inside a submission map but never hold an answer.
pub const TECHNICAL_KEYS: &[&str] = &[
    "cf-turnstile-response",
    "captchaToken",
    "createdAt",
    "updatedAt",
];

/// Lowest and highest star value that counts toward rating statistics.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Minimum lengths enforced by the public form validator.
pub const MIN_NAME_LENGTH: usize = 3;
pub const MIN_TEXTAREA_LENGTH: usize = 10;

/// Ratings at or above this value trigger the external review prompt.
pub const REVIEW_PROMPT_THRESHOLD: u8 = 4;

pub fn is_technical_key(key: &str) -> bool {
    TECHNICAL_KEYS.contains(&key)
}
