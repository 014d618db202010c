//! Password handling for session login.

mod password;

pub use password::{
    MIN_PASSWORD_LEN, PasswordError, check_strength, hash_password, verify_password,
};
