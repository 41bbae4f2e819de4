use serde::{Deserialize, Serialize};

/// Body of `GET /`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: String,
    pub env: String,
}

impl Banner {
    pub const MESSAGE: &'static str = "Student Course Management API is running";

    pub fn new(env: impl Into<String>) -> Self {
        Self { message: Self::MESSAGE.to_string(), env: env.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_carries_fixed_message() {
        let b = Banner::new("development");
        assert_eq!(b.message, "Student Course Management API is running");
        assert_eq!(b.env, "development");
    }
}
