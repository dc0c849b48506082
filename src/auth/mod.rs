pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordService};
pub use token::{Claims, TokenError, TokenService, TOKEN_TTL_DAYS};
