use crate::config::{OutputFormat, Task, UserInput};
use misccord::{
    ChannelOverwrite, FlagLabels, PermissionValue, Snowflake, SourceError, TargetKind, UserFlags,
    UserSource, flags_for_user,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;

/// Reads user objects from a file or stdin.
pub struct LocalUsers;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl UserSource for LocalUsers {
    type Handle = UserInput;
    type Error = ReadError;

    fn fetch_user_json(&self, input: &UserInput) -> Result<Value, ReadError> {
        let text = match input {
            UserInput::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
            UserInput::File(path) => std::fs::read_to_string(path)?,
        };
        Ok(serde_json::from_str(&text)?)
    }
}

/// The decoded result of one [`Task`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Report {
    Flags { flags: FlagLabels },
    Permissions {
        kind: TargetKind,
        bits: String,
        permissions: Vec<&'static str>,
    },
    Overwrite {
        kind: TargetKind,
        entries: Vec<Entry>,
    },
    Snowflakes { ids: Vec<SnowflakeReport> },
}

#[derive(Debug, Serialize)]
pub struct Entry {
    pub permission: &'static str,
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct SnowflakeReport {
    pub id: Snowflake,
    pub timestamp_ms: u64,
    pub created_at: String,
    pub worker_id: u64,
    pub process_id: u64,
    pub increment: u64,
}

impl From<Snowflake> for SnowflakeReport {
    fn from(id: Snowflake) -> Self {
        Self {
            id,
            timestamp_ms: id.timestamp_ms(),
            created_at: id.created_at_utc().to_rfc3339(),
            worker_id: id.worker_id(),
            process_id: id.process_id(),
            increment: id.increment(),
        }
    }
}

impl Report {
    pub fn build<S>(task: Task, users: &S) -> anyhow::Result<Self>
    where
        S: UserSource<Handle = UserInput, Error = ReadError>,
    {
        let report = match task {
            Task::Flags(raw) => Self::Flags {
                flags: UserFlags::from_raw(raw).into(),
            },
            Task::User(input) => Self::Flags {
                flags: flags_for_user(users, &input).map_err(|err| match err {
                    SourceError::Fetch(err) => anyhow::Error::new(err).context("failed to read user"),
                    SourceError::Decode(err) => err.into(),
                })?,
            },
            Task::Permissions { mask, kind } => {
                let value = PermissionValue::new(mask, kind)?;
                Self::Permissions {
                    kind,
                    bits: value.bits().to_string(),
                    permissions: value.enabled_permissions(),
                }
            }
            Task::Overwrite { allow, deny, kind } => {
                let overwrite = ChannelOverwrite::new(allow, deny, kind)?;
                Self::Overwrite {
                    kind,
                    entries: overwrite
                        .entries()
                        .into_iter()
                        .map(|(permission, allowed)| Entry {
                            permission,
                            allowed,
                        })
                        .collect(),
                }
            }
            Task::Snowflakes(ids) => Self::Snowflakes {
                ids: ids
                    .into_iter()
                    .map(|raw| Snowflake::from_raw(raw).into())
                    .collect(),
            },
        };
        Ok(report)
    }

    pub fn render(&self, output: OutputFormat) -> anyhow::Result<String> {
        match output {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags { flags } if flags.is_empty() => f.write_str("no flags set"),
            Self::Flags { flags } => f.write_str(&flags.as_slice().join("\n")),
            Self::Permissions {
                kind, permissions, ..
            } if permissions.is_empty() => write!(f, "no permissions set for {kind}"),
            Self::Permissions { permissions, .. } => f.write_str(&permissions.join("\n")),
            Self::Overwrite { entries, .. } if entries.is_empty() => {
                f.write_str("no overrides; everything inherits")
            }
            Self::Overwrite { entries, .. } => {
                for (n, entry) in entries.iter().enumerate() {
                    if n > 0 {
                        f.write_str("\n")?;
                    }
                    let mark = if entry.allowed { "allow" } else { "deny " };
                    write!(f, "{mark} {}", entry.permission)?;
                }
                Ok(())
            }
            Self::Snowflakes { ids } => {
                for (n, report) in ids.iter().enumerate() {
                    if n > 0 {
                        f.write_str("\n\n")?;
                    }
                    write!(
                        f,
                        "{}\n  created    {}\n  timestamp  {}\n  worker     {}\n  process    {}\n  increment  {}",
                        report.id,
                        report.created_at,
                        report.timestamp_ms,
                        report.worker_id,
                        report.process_id,
                        report.increment,
                    )?;
                }
                Ok(())
            }
        }
    }
}
