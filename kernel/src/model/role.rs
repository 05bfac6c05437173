use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Associate,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Associate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_case_insensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("associate".parse::<Role>(), Ok(Role::Associate));
        assert!("manager".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
