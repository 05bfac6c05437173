use garde::Validate;
use kernel::model::{
    id::{LocationId, TeamId, UserId},
    role::Role,
    user::{ImportSummary, User},
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, VariantNames)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RoleName {
    Associate,
    Admin,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Associate => Self::Associate,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Associate => Self::Associate,
            RoleName::Admin => Self::Admin,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub role: RoleName,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub employee_code: String,
    pub user_name: String,
    pub email: String,
    pub role: RoleName,
    pub location_id: LocationId,
    pub team_id: Option<TeamId>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            employee_code,
            user_name,
            email,
            role,
            location_id,
            team_id,
        } = value;
        Self {
            user_id,
            employee_code,
            user_name,
            email,
            role: RoleName::from(role),
            location_id,
            team_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryResponse {
    pub new_users_added: usize,
    pub skipped_rows: usize,
    pub messages: Vec<String>,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(value: ImportSummary) -> Self {
        let ImportSummary {
            new_users_added,
            skipped_rows,
            messages,
        } = value;
        Self {
            new_users_added,
            skipped_rows,
            messages,
        }
    }
}
