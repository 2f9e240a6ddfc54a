//! Committing direct statements
//!
//! Runs the statement artifacts of a direct-SQL generation through a
//! [`StatementExecutor`]. Every statement gets its own outcome; one failure
//! does not stop the others.

use lingo_core::StatementExecutor;
use serde::Serialize;

use crate::Artifact;

/// Result of committing one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum CommitStatus {
    Executed,
    /// Target column already existed; the executor was not called
    Skipped,
    Failed(String),
}

/// Outcome of one statement artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub table: String,
    pub column: String,
    pub statement: String,
    pub status: CommitStatus,
}

impl CommitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CommitStatus::Failed(_))
    }
}

/// Execute every statement artifact in order.
///
/// Migration artifacts are ignored.
pub async fn commit(artifacts: &[Artifact], executor: &dyn StatementExecutor) -> Vec<CommitOutcome> {
    let mut outcomes = Vec::new();

    for artifact in artifacts.iter().filter(|a| a.is_statement()) {
        let status = if artifact.skip {
            CommitStatus::Skipped
        } else {
            match executor.execute(&artifact.content).await {
                Ok(()) => {
                    tracing::info!(table = %artifact.table, column = %artifact.column, "column added");
                    CommitStatus::Executed
                }
                Err(e) => {
                    tracing::warn!(
                        table = %artifact.table,
                        column = %artifact.column,
                        error = %e,
                        "statement failed"
                    );
                    CommitStatus::Failed(e.to_string())
                }
            }
        };

        outcomes.push(CommitOutcome {
            table: artifact.table.clone(),
            column: artifact.column.clone(),
            statement: artifact.content.clone(),
            status,
        });
    }

    outcomes
}
