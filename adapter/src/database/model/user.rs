use kernel::model::{
    id::{LocationId, TeamId, UserId},
    role::Role,
    user::User,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone)]
pub struct UserRow {
    pub user_id: UserId,
    pub employee_code: String,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub location_id: LocationId,
    pub team_id: Option<TeamId>,
}

impl From<&UserRow> for User {
    fn from(value: &UserRow) -> Self {
        let UserRow {
            user_id,
            employee_code,
            user_name,
            email,
            role,
            location_id,
            team_id,
        } = value.clone();
        User {
            user_id,
            employee_code,
            user_name,
            email,
            role,
            location_id,
            team_id,
        }
    }
}

// email は小文字に正規化したものをキーにする
#[derive(Default)]
pub struct UserTable {
    by_id: BTreeMap<UserId, UserRow>,
    by_email: HashMap<String, UserId>,
    teams: HashMap<String, TeamId>,
}

impl UserTable {
    pub fn get(&self, user_id: UserId) -> Option<&UserRow> {
        self.by_id.get(&user_id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&UserRow> {
        self.by_email
            .get(&normalize_email(email))
            .and_then(|id| self.by_id.get(id))
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.by_email.contains_key(&normalize_email(email))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRow> {
        self.by_id.values()
    }

    // チーム名は初出時に ID を払い出す
    pub fn team_id_for(&mut self, team_name: &str) -> TeamId {
        *self
            .teams
            .entry(team_name.trim().to_lowercase())
            .or_insert_with(TeamId::new)
    }

    pub fn insert(&mut self, row: UserRow) {
        self.by_email.insert(normalize_email(&row.email), row.user_id);
        self.by_id.insert(row.user_id, row);
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
