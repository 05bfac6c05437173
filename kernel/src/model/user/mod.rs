use crate::model::{
    id::{LocationId, TeamId, UserId},
    role::Role,
};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub employee_code: String,
    pub user_name: String,
    // 小文字に正規化して保持する
    pub email: String,
    pub role: Role,
    pub location_id: LocationId,
    pub team_id: Option<TeamId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 一括取り込みの結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub new_users_added: usize,
    pub skipped_rows: usize,
    pub messages: Vec<String>,
}

/// 取り込み結果に載せるメッセージの上限（超過分は件数のみ通知する）
pub const MAX_IMPORT_MESSAGES: usize = 5;

impl ImportSummary {
    pub fn record_skip(&mut self, message: String) {
        self.skipped_rows += 1;
        if self.messages.len() < MAX_IMPORT_MESSAGES {
            self.messages.push(message);
        }
    }

    pub fn finish(mut self) -> Self {
        let hidden = self.skipped_rows.saturating_sub(self.messages.len());
        if hidden > 0 {
            self.messages
                .push(format!("... and {hidden} more rows skipped"));
        }
        self
    }
}
