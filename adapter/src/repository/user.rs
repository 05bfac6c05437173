use crate::database::{
    model::user::{normalize_email, UserRow, UserTable},
    Database,
};
use async_trait::async_trait;
use derive_new::new;
use garde::Validate;
use kernel::{
    model::{
        id::{LocationId, UserId},
        location::Location,
        role::Role,
        user::{
            event::{CreateUser, ImportRow, ImportUsers},
            ImportSummary, User,
        },
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: Database,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self
            .db
            .read_users(|users| users.iter().map(User::from).collect()))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.db.user(user_id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .db
            .read_users(|users| users.find_by_email(email).map(User::from)))
    }

    async fn find_by_location(&self, location_id: LocationId) -> AppResult<Vec<User>> {
        Ok(self.db.read_users(|users| {
            users
                .iter()
                .filter(|u| u.location_id == location_id)
                .map(User::from)
                .collect()
        }))
    }

    async fn find_by_credentials(&self, email: &str, role: Role) -> AppResult<User> {
        self.db
            .read_users(|users| {
                users
                    .find_by_email(email)
                    .filter(|u| u.role == role)
                    .map(User::from)
            })
            .ok_or(AppError::InvalidCredentials)
    }

    async fn create(&self, event: CreateUser) -> AppResult<UserId> {
        let location = self
            .db
            .location_by_name(&event.location_name)
            .ok_or_else(|| AppError::UnknownLocation(event.location_name.clone()))?;
        let user_id = self.db.write_users(|users| {
            insert_user(
                users,
                NewUser {
                    employee_code: &event.employee_code,
                    user_name: &event.user_name,
                    email: &event.email,
                    role: event.role,
                    location: &location,
                    team_name: event.team_name.as_deref(),
                },
            )
        })?;
        tracing::info!(%user_id, location = %location.location_name, "user created");
        Ok(user_id)
    }

    async fn import(&self, event: ImportUsers) -> AppResult<ImportSummary> {
        let locations = self.db.locations();
        let mut summary = ImportSummary::default();

        // 取り込み中は書き込みロックを保持し、途中で他の登録が割り込まないようにする
        self.db.write_users(|users| {
            for row in &event.rows {
                match import_row(users, &locations, row) {
                    Ok(_) => summary.new_users_added += 1,
                    Err(message) => summary.record_skip(format!("Row {}: {message}", row.line)),
                }
            }
        });

        tracing::info!(
            added = summary.new_users_added,
            skipped = summary.skipped_rows,
            "user import finished"
        );
        Ok(summary.finish())
    }
}

struct NewUser<'a> {
    employee_code: &'a str,
    user_name: &'a str,
    email: &'a str,
    role: Role,
    location: &'a Location,
    team_name: Option<&'a str>,
}

#[derive(Validate)]
struct EmailAddress {
    #[garde(email)]
    email: String,
}

fn insert_user(users: &mut UserTable, new_user: NewUser<'_>) -> AppResult<UserId> {
    let email = normalize_email(new_user.email);
    let email = EmailAddress { email };
    if email.validate(&()).is_err() {
        return Err(AppError::UnprocessableEntity(format!(
            "invalid email: {}",
            new_user.email.trim()
        )));
    }
    let EmailAddress { email } = email;
    if users.contains_email(&email) {
        return Err(AppError::DuplicateEmail(email));
    }
    let team_id = new_user
        .team_name
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| users.team_id_for(t));
    let user_id = UserId::new();
    users.insert(UserRow {
        user_id,
        employee_code: new_user.employee_code.trim().to_string(),
        user_name: new_user.user_name.trim().to_string(),
        email,
        role: new_user.role,
        location_id: new_user.location.location_id,
        team_id,
    });
    Ok(user_id)
}

fn import_row(
    users: &mut UserTable,
    locations: &[Location],
    row: &ImportRow,
) -> Result<UserId, String> {
    for (column, value) in [
        ("employee_code", &row.employee_code),
        ("name", &row.user_name),
        ("email", &row.email),
        ("location", &row.location_name),
    ] {
        if value.trim().is_empty() {
            return Err(format!("missing value for {column}"));
        }
    }

    let location = locations
        .iter()
        .find(|l| l.location_name.eq_ignore_ascii_case(row.location_name.trim()))
        .ok_or_else(|| AppError::UnknownLocation(row.location_name.clone()).to_string())?;

    let role = match row.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => Role::default(),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| format!("unknown role: {raw}"))?,
    };

    insert_user(
        users,
        NewUser {
            employee_code: &row.employee_code,
            user_name: &row.user_name,
            email: &row.email,
            role,
            location,
            team_name: row.team_name.as_deref(),
        },
    )
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixture;
    use shared::config::AdmissionPolicy;

    fn repo() -> UserRepositoryImpl {
        UserRepositoryImpl::new(fixture::database(3, 20, AdmissionPolicy::Strict))
    }

    fn row(line: usize, code: &str, email: &str, location: &str) -> ImportRow {
        ImportRow {
            line,
            employee_code: code.into(),
            user_name: format!("Name {code}"),
            email: email.into(),
            location_name: location.into(),
            ..ImportRow::default()
        }
    }

    #[tokio::test]
    async fn emails_are_unique_ignoring_case() -> anyhow::Result<()> {
        let repo = repo();
        let create = |email: &str| {
            CreateUser::new(
                "E1".into(),
                "Asha".into(),
                email.into(),
                Role::Associate,
                "chennai".into(),
                Some("Platform".into()),
            )
        };
        let user_id = repo.create(create("Asha@Example.com")).await?;
        let stored = repo.find_by_id(user_id).await?.unwrap();
        assert_eq!(stored.email, "asha@example.com");
        assert!(stored.team_id.is_some());

        let err = repo.create(create("ASHA@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));
        Ok(())
    }

    #[tokio::test]
    async fn credentials_need_email_and_role() -> anyhow::Result<()> {
        let repo = repo();
        repo.create(CreateUser::new(
            "A1".into(),
            "Admin".into(),
            "admin@example.com".into(),
            Role::Admin,
            "Pune".into(),
            None,
        ))
        .await?;

        let admin = repo.find_by_credentials("ADMIN@example.com", Role::Admin).await?;
        assert!(admin.is_admin());
        assert!(matches!(
            repo.find_by_credentials("admin@example.com", Role::Associate)
                .await
                .unwrap_err(),
            AppError::InvalidCredentials
        ));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_location_is_rejected_on_create() {
        let err = repo()
            .create(CreateUser::new(
                "E9".into(),
                "Ravi".into(),
                "ravi@example.com".into(),
                Role::Associate,
                "Mumbai".into(),
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownLocation(name) if name == "Mumbai"));
    }

    #[tokio::test]
    async fn import_skips_bad_rows_and_keeps_going() -> anyhow::Result<()> {
        let repo = repo();
        let mut rows = vec![
            row(2, "E1", "one@example.com", "Chennai"),
            row(3, "E2", "ONE@example.com", "Chennai"),
            row(4, "E3", "three@example.com", "Mumbai"),
            row(5, "", "four@example.com", "Pune"),
        ];
        rows.push(ImportRow {
            role: Some("admin".into()),
            team_name: Some("Ops".into()),
            ..row(6, "E5", "five@example.com", "pune")
        });

        let summary = repo.import(ImportUsers::new(rows)).await?;
        assert_eq!(summary.new_users_added, 2);
        assert_eq!(summary.skipped_rows, 3);
        assert!(summary.messages[0].starts_with("Row 3:"));
        assert!(summary.messages[0].contains("one@example.com"));
        assert!(summary.messages[1].contains("Mumbai"));
        assert!(summary.messages[2].contains("employee_code"));

        let admin = repo.find_by_email("five@example.com").await?.unwrap();
        assert!(admin.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn import_reports_at_most_five_rows_and_a_notice() -> anyhow::Result<()> {
        let repo = repo();
        let rows = (0..8)
            .map(|i| row(i + 2, &format!("E{i}"), "not-an-email", "Chennai"))
            .collect();
        let summary = repo.import(ImportUsers::new(rows)).await?;
        assert_eq!(summary.skipped_rows, 8);
        assert_eq!(summary.messages.len(), 6);
        assert_eq!(summary.messages[5], "... and 3 more rows skipped");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_emails_are_skipped_on_import() -> anyhow::Result<()> {
        let repo = repo();
        let rows = vec![
            row(2, "E1", "bob@@example.com", "Chennai"),
            row(3, "E2", "x@.", "Chennai"),
            row(4, "E3", "carol@example.com", "Pune"),
        ];
        let summary = repo.import(ImportUsers::new(rows)).await?;
        assert_eq!(summary.new_users_added, 1);
        assert_eq!(summary.skipped_rows, 2);
        assert!(summary.messages[0].starts_with("Row 2:"));
        assert!(summary.messages[0].contains("bob@@example.com"));
        assert!(summary.messages[1].contains("x@."));
        assert!(repo.find_by_email("bob@@example.com").await?.is_none());

        let err = repo
            .create(CreateUser::new(
                "E4".into(),
                "Dev".into(),
                "dev@@example.com".into(),
                Role::Associate,
                "Chennai".into(),
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        Ok(())
    }
}
