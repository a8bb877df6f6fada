use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use misccord::{IntoRaw, TargetKind};
use std::path::PathBuf;

/// Command-line arguments for the `misccord` binary.
///
/// Masks and IDs are taken as text and validated in
/// [`CliConfig::try_from`], so a digit string too large for 64 bits is
/// reported the same way the library reports it.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "misccord",
    version,
    about = "Decode user flags, permission masks and snowflake IDs"
)]
pub struct CliArgs {
    /// Output format for decoded values.
    ///
    /// Environment variable: `MISCCORD_OUTPUT`
    #[arg(
        long,
        global = true,
        env = "MISCCORD_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub output: OutputFormat,

    /// Log line format on stderr. Verbosity is set through `RUST_LOG`.
    ///
    /// Environment variable: `MISCCORD_LOG_FORMAT`
    #[arg(
        long,
        global = true,
        env = "MISCCORD_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decode a user flags integer.
    Flags { value: String },

    /// Decode the `flags` and `public_flags` fields of a user object.
    User {
        /// JSON file holding the user object, or `-` for stdin.
        path: String,
    },

    /// Decode a permission mask for a target.
    Permissions {
        mask: String,

        /// One of `text`, `voice`, `role` or `user`.
        #[arg(long, short)]
        kind: String,
    },

    /// Decode a channel overwrite's allow and deny masks.
    Overwrite {
        #[arg(long, default_value = "0")]
        allow: String,

        #[arg(long, default_value = "0")]
        deny: String,

        /// `text` or `voice`.
        #[arg(long, short)]
        kind: String,
    },

    /// Split one or more snowflake IDs into their fields.
    Snowflake {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Stdin,
    File(PathBuf),
}

/// A validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Flags(u64),
    User(UserInput),
    Permissions { mask: u64, kind: TargetKind },
    Overwrite { allow: u64, deny: u64, kind: TargetKind },
    Snowflakes(Vec<u64>),
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub output: OutputFormat,
    pub log_format: LogFormat,
    pub task: Task,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let task = match args.command {
            Command::Flags { value } => Task::Flags(raw("flags value", &value)?),
            Command::User { path } if path == "-" => Task::User(UserInput::Stdin),
            Command::User { path } => Task::User(UserInput::File(PathBuf::from(path))),
            Command::Permissions { mask, kind } => Task::Permissions {
                mask: raw("permission mask", &mask)?,
                kind: target(&kind)?,
            },
            Command::Overwrite { allow, deny, kind } => {
                let kind = target(&kind)?;
                if !kind.is_channel() {
                    bail!("overwrites apply to text or voice channels, not to a {kind}");
                }
                Task::Overwrite {
                    allow: raw("--allow", &allow)?,
                    deny: raw("--deny", &deny)?,
                    kind,
                }
            }
            Command::Snowflake { ids } => Task::Snowflakes(
                ids.iter()
                    .map(|id| raw("snowflake", id))
                    .collect::<anyhow::Result<_>>()?,
            ),
        };

        Ok(Self {
            output: args.output,
            log_format: args.log_format,
            task,
        })
    }
}

fn raw(what: &str, value: &str) -> anyhow::Result<u64> {
    value.into_raw().with_context(|| format!("bad {what}"))
}

fn target(kind: &str) -> anyhow::Result<TargetKind> {
    kind.parse()
        .with_context(|| format!("bad --kind {kind:?}; expected text, voice, role or user"))
}
