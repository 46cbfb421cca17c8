//! Execution of the restored SQL script against the target database.
//!
//! The restore goes through an external database client process rather than
//! a driver connection, so transactional structure inside the dump is honored
//! exactly as `psql` would honor it. The collaborator sits behind the
//! [`SqlRestorer`] trait so tests can substitute an in-process fake.

use std::{io::ErrorKind, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt as _, process::Command};

/// Executes a SQL script against the database identified by a connection URL.
#[async_trait]
pub trait SqlRestorer {
    /// Run `sql` against the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError`] if the script could not be executed to
    /// completion.
    async fn restore(&self, sql: &[u8], database_url: &str) -> Result<(), RestoreError>;
}

/// Restores a dump by piping it to a `psql`-compatible client process.
///
/// The client is invoked as `<program> <database_url>` with the script on
/// stdin; its stdout and stderr are inherited so restore output lands on the
/// operator's terminal.
#[derive(Debug, Clone)]
pub struct PsqlRestorer {
    program: PathBuf,
}

impl PsqlRestorer {
    /// Create a restorer that invokes `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_display(&self) -> String {
        self.program.display().to_string()
    }
}

impl Default for PsqlRestorer {
    fn default() -> Self {
        Self::new("psql")
    }
}

#[async_trait]
impl SqlRestorer for PsqlRestorer {
    #[tracing::instrument(skip(self, sql, database_url), fields(program = %self.program.display(), sql_len = sql.len()))]
    async fn restore(&self, sql: &[u8], database_url: &str) -> Result<(), RestoreError> {
        let mut child = Command::new(&self.program)
            .arg(database_url)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|err| RestoreError::Spawn {
                program: self.program_display(),
                source: err,
            })?;

        let mut stdin = child.stdin.take().expect("stdin is piped");

        // The client may exit before draining stdin (e.g. a bad connection
        // URL); in that case the exit status below is the interesting error,
        // not the broken pipe.
        let write_result = async {
            stdin.write_all(sql).await?;
            stdin.shutdown().await
        }
        .await;
        match write_result {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
            Err(err) => {
                return Err(RestoreError::Stdin {
                    program: self.program_display(),
                    source: err,
                });
            }
        }
        drop(stdin);

        let status = child.wait().await.map_err(|err| RestoreError::Wait {
            program: self.program_display(),
            source: err,
        })?;

        if !status.success() {
            return Err(RestoreError::Failed {
                program: self.program_display(),
                status,
            });
        }

        tracing::debug!("Restore client completed");
        Ok(())
    }
}

/// Errors that can occur while executing the restore client.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// The client process could not be started
    #[error("failed to spawn restore client `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The SQL script could not be streamed to the client
    #[error("failed to stream SQL script to `{program}`")]
    Stdin {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The client process could not be awaited
    #[error("failed to wait for restore client `{program}`")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The client exited with a non-zero status
    #[error("restore client `{program}` exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}
