use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use kernel::model::user::event::{ImportRow, ImportUsers};
use shared::error::{AppError, AppResult};
use tokio::io::AsyncRead;

const REQUIRED_COLUMNS: [&str; 4] = ["employee_code", "name", "email", "location"];

struct Columns {
    employee_code: usize,
    name: usize,
    email: usize,
    location: usize,
    role: Option<usize>,
    team: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> AppResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let mut required = [0usize; 4];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name).ok_or_else(|| AppError::MissingRequiredColumn(name.into()))?;
        }
        let [employee_code, name, email, location] = required;
        Ok(Self {
            employee_code,
            name,
            email,
            location,
            role: find("role"),
            team: find("team"),
        })
    }
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().to_string()
}

fn optional(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn malformed(err: csv_async::Error) -> AppError {
    AppError::UnprocessableEntity(format!("malformed CSV: {err}"))
}

/// Reads a user roster. Only structural problems fail here; row values are
/// checked when the rows are stored.
pub async fn read_users_csv<R>(reader: R) -> AppResult<ImportUsers>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .create_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers().await.map_err(malformed)?)?;

    let mut rows = Vec::new();
    let mut records = csv_reader.records();
    while let Some(record) = records.next().await {
        let record = record.map_err(malformed)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        rows.push(ImportRow {
            line,
            employee_code: field(&record, columns.employee_code),
            user_name: field(&record, columns.name),
            email: field(&record, columns.email),
            location_name: field(&record, columns.location),
            role: optional(&record, columns.role),
            team_name: optional(&record, columns.team),
        });
    }
    tracing::debug!(rows = rows.len(), "user roster parsed");
    Ok(ImportUsers::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::{database::connect_database_with, repository::user::UserRepositoryImpl};
    use kernel::{
        model::{role::Role, user::event::CreateUser},
        repository::user::UserRepository,
    };
    use shared::config::{LedgerConfig, LocationSeed};

    #[tokio::test]
    async fn headers_are_matched_ignoring_case_and_order() -> anyhow::Result<()> {
        let payload = "Email,NAME,location,employee_code,team\n\
                       asha@example.com, Asha ,Chennai,E1,Platform\n\
                       \n\
                       ravi@example.com,Ravi,Pune,E2,\n";
        let parsed = read_users_csv(payload.as_bytes()).await?;
        assert_eq!(parsed.rows.len(), 2);
        let first = &parsed.rows[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.user_name, "Asha");
        assert_eq!(first.employee_code, "E1");
        assert_eq!(first.team_name.as_deref(), Some("Platform"));
        assert_eq!(first.role, None);
        assert_eq!(parsed.rows[1].team_name, None);
        Ok(())
    }

    #[tokio::test]
    async fn a_missing_required_column_fails_the_import() {
        let payload = "employee_code,name,location\nE1,Asha,Chennai\n";
        let err = read_users_csv(payload.as_bytes()).await.unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredColumn(column) if column == "email"));
    }

    #[tokio::test]
    async fn one_valid_row_and_one_existing_email() -> anyhow::Result<()> {
        let db = connect_database_with(&LedgerConfig {
            locations: vec![LocationSeed {
                name: "Chennai".into(),
                capacity: 10,
            }],
            ..LedgerConfig::default()
        });
        let repo = UserRepositoryImpl::new(db);
        repo.create(CreateUser::new(
            "E0".into(),
            "Existing".into(),
            "taken@example.com".into(),
            Role::Associate,
            "Chennai".into(),
            None,
        ))
        .await?;

        let payload = "employee_code,name,email,location,role\n\
                       E1,Asha,asha@example.com,Chennai,associate\n\
                       E2,Dup,Taken@Example.com,Chennai,associate\n";
        let summary = repo.import(read_users_csv(payload.as_bytes()).await?).await?;
        assert_eq!(summary.new_users_added, 1);
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(summary.messages.len(), 1);
        assert!(summary.messages[0].contains("taken@example.com"));
        Ok(())
    }
}
