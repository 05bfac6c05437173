use crate::model::role::Role;
use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct CreateUser {
    pub employee_code: String,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub location_name: String,
    pub team_name: Option<String>,
}

/// CSV の1行分。値の検証はリポジトリ側で行う
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    // ヘッダー行を 1 行目とした行番号
    pub line: usize,
    pub employee_code: String,
    pub user_name: String,
    pub email: String,
    pub location_name: String,
    pub role: Option<String>,
    pub team_name: Option<String>,
}

#[derive(Debug, new)]
pub struct ImportUsers {
    pub rows: Vec<ImportRow>,
}
