//! Live privilege state of a principal

use grantsync_core::{
	GrantGrammar, GrantRecord, Principal, PrivilegeSet, Scope, ShowGrantsStatement,
};

use crate::backend::GrantBackend;
use crate::error::SnapshotError;

/// Parsed `SHOW GRANTS` report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
	/// The server reported error 1141 for the principal
	Absent,
	/// One record per report line, in report order
	Present(Vec<GrantRecord>),
}

impl Snapshot {
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}

	pub fn records(&self) -> &[GrantRecord] {
		match self {
			Self::Absent => &[],
			Self::Present(records) => records,
		}
	}

	/// Union of the privileges reported on `scope`
	pub fn privileges_on(&self, scope: &Scope) -> PrivilegeSet {
		self.records()
			.iter()
			.filter(|record| &record.scope == scope)
			.flat_map(|record| record.privileges.iter().cloned())
			.collect()
	}

	/// Whether any line reporting `scope` carries the grant option
	pub fn grant_option_on(&self, scope: &Scope) -> bool {
		self.records()
			.iter()
			.any(|record| &record.scope == scope && record.grant_option)
	}

	/// Whether `scope` appears in the report at all
	pub fn reports(&self, scope: &Scope) -> bool {
		self.records().iter().any(|record| &record.scope == scope)
	}
}

/// Issue `SHOW GRANTS FOR <principal>` and parse the report
///
/// A malformed line aborts the whole snapshot.
pub async fn fetch_snapshot(
	backend: &dyn GrantBackend,
	principal: &Principal,
	grammar: &GrantGrammar,
) -> Result<Snapshot, SnapshotError> {
	let sql = ShowGrantsStatement::new(principal.clone()).build();
	tracing::debug!(sql = %sql, "Reading grants");

	let lines = match backend.query_strings(&sql).await {
		Ok(lines) => lines,
		Err(err) if err.is_no_such_grant() => {
			tracing::warn!(principal = %principal, error = %err, "No grants found for principal");
			return Ok(Snapshot::Absent);
		}
		Err(err) => return Err(err.into()),
	};

	let records = grammar.parse_report(&lines)?;
	Ok(Snapshot::Present(records))
}
