//! Grant lifecycle operations
//!
//! [`GrantReconciler`] drives one pass per call: probe the server, resolve the
//! principal, plan, then execute the planned statements one at a time. The
//! first failing statement stops the pass.

use grantsync_core::{
	DesiredGrantSpec, GrantError, GrantGrammar, GrantId, GrantRecord, GrantSpecInput,
	GrantsDeclaration, Principal, PrivilegeSet, Scope, Statement, ValidatedGrants,
	declaration::split_user_host,
};
use grantsync_db::{GrantConnection, Snapshot, SnapshotError};

use crate::engine::{ReconcileContext, plan_converge, plan_create, plan_delete, plan_update};
use crate::error::{ReconcileError, Result};

/// Result of reading a principal's grants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
	/// The principal no longer exists on the server
	Absent,
	Present(Vec<GrantRecord>),
}

/// Privilege state of a single scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeState {
	pub privileges: PrivilegeSet,
	pub grant_option: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
	Revoked,
	/// The server reported that the grants were already gone
	AlreadyAbsent,
}

/// Runs reconciliation passes over a [`GrantConnection`]
#[derive(Debug, Clone)]
pub struct GrantReconciler {
	connection: GrantConnection,
	grammar: GrantGrammar,
}

impl GrantReconciler {
	pub fn new(connection: GrantConnection) -> Self {
		Self {
			connection,
			grammar: GrantGrammar::default(),
		}
	}

	/// Use a different `SHOW GRANTS` report grammar
	pub fn with_grammar(mut self, grammar: GrantGrammar) -> Self {
		self.grammar = grammar;
		self
	}

	pub fn connection(&self) -> &GrantConnection {
		&self.connection
	}

	async fn prepare(
		&self,
		declaration: &GrantsDeclaration,
	) -> Result<(ReconcileContext, Vec<DesiredGrantSpec>)> {
		let capabilities = self.connection.capabilities().await?;
		let ValidatedGrants { principal, specs } = declaration.validate(&capabilities)?;
		Ok((ReconcileContext::new(principal, capabilities), specs))
	}

	async fn resolve_principal(&self, declaration: &GrantsDeclaration) -> Result<Principal> {
		let capabilities = self.connection.capabilities().await?;
		Ok(declaration.principal(&capabilities)?)
	}

	async fn execute(&self, statement: &Statement) -> Result<u64> {
		self.connection
			.execute(statement)
			.await
			.map_err(|source| ReconcileError::Statement {
				statement: statement.to_sql(),
				source,
			})
	}

	async fn execute_all(&self, statements: Vec<Statement>) -> Result<Vec<Statement>> {
		for statement in &statements {
			self.execute(statement).await?;
		}
		Ok(statements)
	}

	async fn snapshot(&self, principal: &Principal) -> Result<Snapshot> {
		Ok(self.connection.snapshot(principal, &self.grammar).await?)
	}

	/// Grant every declared spec; returns the id of the grant block
	pub async fn create(&self, declaration: &GrantsDeclaration) -> Result<GrantId> {
		let (ctx, specs) = self.prepare(declaration).await?;
		let statements = plan_create(&ctx, &specs)?;
		let executed = self.execute_all(statements).await?;

		tracing::info!(
			principal = %ctx.principal,
			statements = executed.len(),
			"Created grants"
		);
		Ok(GrantId::for_principal(&ctx.principal))
	}

	/// Grant a single-scope declaration; returns the scoped id
	pub async fn create_scoped(&self, declaration: &GrantsDeclaration) -> Result<GrantId> {
		let (ctx, specs) = self.prepare(declaration).await?;
		let scope = specs
			.first()
			.map(|spec| spec.scope.clone())
			.ok_or(GrantError::MissingGrantables)?;
		let statements = plan_create(&ctx, &specs)?;
		self.execute_all(statements).await?;

		Ok(GrantId::for_scope(&ctx.principal, &scope))
	}

	/// Current grants of the declared principal
	pub async fn read(&self, declaration: &GrantsDeclaration) -> Result<ReadOutcome> {
		let principal = self.resolve_principal(declaration).await?;
		match self.snapshot(&principal).await? {
			Snapshot::Absent => {
				tracing::warn!(principal = %principal, "Grant not found, principal is absent");
				Ok(ReadOutcome::Absent)
			}
			Snapshot::Present(records) => Ok(ReadOutcome::Present(records)),
		}
	}

	/// Current state of one scope
	///
	/// `None` when the principal is absent; an empty state when the scope is
	/// not reported.
	pub async fn read_scope(
		&self,
		declaration: &GrantsDeclaration,
		scope: &Scope,
	) -> Result<Option<ScopeState>> {
		let principal = self.resolve_principal(declaration).await?;
		let snapshot = self.snapshot(&principal).await?;
		if snapshot.is_absent() {
			tracing::warn!(principal = %principal, "Grant not found, principal is absent");
			return Ok(None);
		}
		Ok(Some(ScopeState {
			privileges: snapshot.privileges_on(scope),
			grant_option: snapshot.grant_option_on(scope),
		}))
	}

	/// Move from the `old` declaration to the `new` one
	///
	/// Returns the statements that were executed.
	pub async fn update(
		&self,
		old: &GrantsDeclaration,
		new: &GrantsDeclaration,
	) -> Result<Vec<Statement>> {
		let (ctx, new_specs) = self.prepare(new).await?;
		let old_specs = old.specs()?;
		let statements = plan_update(&ctx, &old_specs, &new_specs);
		tracing::debug!(
			principal = %ctx.principal,
			statements = statements.len(),
			"Planned grant update"
		);
		self.execute_all(statements).await
	}

	/// Converge the declared scopes against the live report
	pub async fn converge(&self, declaration: &GrantsDeclaration) -> Result<Vec<Statement>> {
		let (ctx, specs) = self.prepare(declaration).await?;
		let snapshot = self.snapshot(&ctx.principal).await?;
		let statements = plan_converge(&ctx, &specs, &snapshot);
		tracing::debug!(
			principal = %ctx.principal,
			statements = statements.len(),
			"Planned grant convergence"
		);
		self.execute_all(statements).await
	}

	/// Revoke every declared spec
	pub async fn delete(&self, declaration: &GrantsDeclaration) -> Result<DeleteOutcome> {
		let (ctx, specs) = self.prepare(declaration).await?;
		for statement in plan_delete(&ctx, &specs) {
			match self.connection.execute(&statement).await {
				Ok(_) => {}
				Err(err) if statement.is_revoke_grant_option() && err.is_no_such_grant() => {
					tracing::warn!(
						sql = %statement,
						error = %err,
						"Grant already revoked, skipping remaining revocations"
					);
					return Ok(DeleteOutcome::AlreadyAbsent);
				}
				Err(source) => {
					return Err(ReconcileError::Statement {
						statement: statement.to_sql(),
						source,
					});
				}
			}
		}
		Ok(DeleteOutcome::Revoked)
	}

	async fn import_records(&self, id: &str) -> Result<(String, String, Vec<GrantRecord>)> {
		let (user, host) = split_user_host(id)?;
		let principal = Principal::user(user.clone(), host.clone());
		match self.snapshot(&principal).await? {
			Snapshot::Absent => Err(ReconcileError::PrincipalNotFound(principal.to_string())),
			Snapshot::Present(records) => Ok((user, host, records)),
		}
	}

	/// Rebuild the grant block of an existing `USER@HOST` account
	pub async fn import(&self, id: &str) -> Result<GrantsDeclaration> {
		let (user, host, records) = self.import_records(id).await?;
		let mut declaration = GrantsDeclaration::for_user(user, host);
		declaration.grants = records.iter().map(GrantSpecInput::from_record).collect();
		Ok(declaration)
	}

	/// Rebuild one single-scope declaration per reported grant
	pub async fn import_scoped(&self, id: &str) -> Result<Vec<(GrantId, GrantsDeclaration)>> {
		let (user, host, records) = self.import_records(id).await?;
		let principal = Principal::user(user.clone(), host.clone());

		Ok(records
			.iter()
			.map(|record| {
				let declaration = GrantsDeclaration::for_user(user.clone(), host.clone())
					.grant(GrantSpecInput::from_record(record));
				(GrantId::for_scope(&principal, &record.scope), declaration)
			})
			.collect())
	}

	/// Check that the principal named by `id` holds no grants any more
	pub async fn verify_destroyed(&self, id: &GrantId) -> Result<()> {
		let principal = id.principal();
		match self.connection.show_grants(&principal).await {
			Ok(lines) if lines.is_empty() => Ok(()),
			Ok(_) => Err(ReconcileError::GrantStillExists(principal.to_string())),
			Err(err) if err.is_no_such_grant() => Ok(()),
			Err(err) => Err(SnapshotError::Server(err).into()),
		}
	}
}
