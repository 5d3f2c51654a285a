//! Reconciliation planning
//!
//! Every function here is pure: it turns desired and current grant state into
//! the ordered list of statements that converges them. Nothing is executed.
//!
//! Within one scope a revoke always precedes the grant. Scopes are handled in
//! the order the caller declared them.

use std::collections::BTreeSet;

use grantsync_core::{
	DesiredGrantSpec, GrantError, GrantStatement, Grantables, Principal, PrivilegeSet,
	RevokeGrantOptionStatement, RevokeStatement, Scope, ServerCapabilities, Statement,
};
use grantsync_db::Snapshot;

/// Placeholder the server reports for "no privileges" on a scope
pub const USAGE: &str = "USAGE";

/// Principal and server capabilities shared by one planning pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileContext {
	pub principal: Principal,
	pub capabilities: ServerCapabilities,
}

impl ReconcileContext {
	pub fn new(principal: Principal, capabilities: ServerCapabilities) -> Self {
		Self {
			principal,
			capabilities,
		}
	}
}

/// Revoke and grant halves of one diff
#[derive(Debug, Default)]
struct Delta {
	revoke: Option<Statement>,
	grant: Option<Statement>,
}

impl Delta {
	fn privileges(
		ctx: &ReconcileContext,
		scope: &Scope,
		current: &PrivilegeSet,
		desired: &PrivilegeSet,
	) -> Self {
		let to_revoke: PrivilegeSet = current.difference(desired).cloned().collect();
		let to_grant: PrivilegeSet = desired.difference(current).cloned().collect();

		Self {
			revoke: (!to_revoke.is_empty()).then(|| {
				RevokeStatement::new(ctx.principal.clone(), Grantables::Privileges(to_revoke))
					.on(scope.clone())
					.into()
			}),
			grant: (!to_grant.is_empty()).then(|| {
				GrantStatement::new(ctx.principal.clone(), Grantables::Privileges(to_grant))
					.on(scope.clone())
					.into()
			}),
		}
	}

	fn roles(
		ctx: &ReconcileContext,
		current: &BTreeSet<String>,
		desired: &BTreeSet<String>,
	) -> Self {
		let to_revoke: BTreeSet<String> = current.difference(desired).cloned().collect();
		let to_grant: BTreeSet<String> = desired.difference(current).cloned().collect();

		Self {
			revoke: (!to_revoke.is_empty()).then(|| {
				RevokeStatement::new(ctx.principal.clone(), Grantables::Roles(to_revoke)).into()
			}),
			grant: (!to_grant.is_empty()).then(|| {
				GrantStatement::new(ctx.principal.clone(), Grantables::Roles(to_grant)).into()
			}),
		}
	}

	fn into_statements(self) -> Vec<Statement> {
		self.revoke.into_iter().chain(self.grant).collect()
	}
}

/// Single-scope diff: at most one REVOKE followed by at most one GRANT
///
/// Privileges in each statement are listed in sorted order.
pub fn diff_scope(
	ctx: &ReconcileContext,
	scope: &Scope,
	current: &PrivilegeSet,
	desired: &PrivilegeSet,
) -> Vec<Statement> {
	Delta::privileges(ctx, scope, current, desired).into_statements()
}

/// Role set diff; role statements carry no scope clause
pub fn diff_roles(
	ctx: &ReconcileContext,
	current: &BTreeSet<String>,
	desired: &BTreeSet<String>,
) -> Vec<Statement> {
	Delta::roles(ctx, current, desired).into_statements()
}

fn diff_pair(
	ctx: &ReconcileContext,
	scope: &Scope,
	old: Option<&DesiredGrantSpec>,
	new: Option<&DesiredGrantSpec>,
) -> Vec<Statement> {
	let privileges = Delta::privileges(
		ctx,
		scope,
		&old.map(DesiredGrantSpec::privileges).unwrap_or_default(),
		&new.map(DesiredGrantSpec::privileges).unwrap_or_default(),
	);
	let roles = Delta::roles(
		ctx,
		&old.map(DesiredGrantSpec::roles).unwrap_or_default(),
		&new.map(DesiredGrantSpec::roles).unwrap_or_default(),
	);

	[privileges.revoke, roles.revoke, privileges.grant, roles.grant]
		.into_iter()
		.flatten()
		.collect()
}

/// Multi-scope diff between two declared states
///
/// Old specs are walked in declared order and paired with the first unpaired
/// new spec on the same scope. An old spec without a partner is diffed
/// against nothing (full revoke). New specs left unpaired are then diffed
/// from nothing (full grant), in declared order.
pub fn plan_update(
	ctx: &ReconcileContext,
	old: &[DesiredGrantSpec],
	new: &[DesiredGrantSpec],
) -> Vec<Statement> {
	let mut paired = vec![false; new.len()];
	let mut statements = Vec::new();

	for old_spec in old {
		let partner = new
			.iter()
			.enumerate()
			.position(|(index, new_spec)| !paired[index] && new_spec.scope == old_spec.scope);
		if let Some(index) = partner {
			paired[index] = true;
		}
		statements.extend(diff_pair(
			ctx,
			&old_spec.scope,
			Some(old_spec),
			partner.map(|index| &new[index]),
		));
	}

	for (new_spec, _) in new.iter().zip(&paired).filter(|(_, paired)| !**paired) {
		statements.extend(diff_pair(ctx, &new_spec.scope, None, Some(new_spec)));
	}

	statements
}

/// Converge the declared scopes against a live snapshot
///
/// Scopes that only appear in the snapshot are left alone. Role grants are
/// not part of the parsed report, so declared roles are always granted; the
/// server treats a repeated role grant as a no-op.
pub fn plan_converge(
	ctx: &ReconcileContext,
	desired: &[DesiredGrantSpec],
	snapshot: &Snapshot,
) -> Vec<Statement> {
	let mut statements = Vec::new();
	for spec in desired {
		match &spec.grantables {
			Grantables::Privileges(wanted) => {
				let mut current = snapshot.privileges_on(&spec.scope);
				if !wanted.contains(USAGE) {
					current.remove(USAGE);
				}
				statements.extend(diff_scope(ctx, &spec.scope, &current, wanted));
			}
			Grantables::Roles(_) => {
				let grant = GrantStatement::new(ctx.principal.clone(), spec.grantables.clone());
				statements.push(grant.into());
			}
		}
	}
	statements
}

/// One GRANT per declared spec
///
/// Every spec is checked before any statement is planned.
pub fn plan_create(
	ctx: &ReconcileContext,
	specs: &[DesiredGrantSpec],
) -> Result<Vec<Statement>, GrantError> {
	if !ctx.capabilities.supports_roles && specs.iter().any(DesiredGrantSpec::is_role_based) {
		return Err(GrantError::RolesUnsupported);
	}
	Ok(specs.iter().map(|spec| create_statement(ctx, spec)).collect())
}

fn create_statement(ctx: &ReconcileContext, spec: &DesiredGrantSpec) -> Statement {
	let mut statement = GrantStatement::new(ctx.principal.clone(), spec.grantables.clone());
	if !spec.is_role_based() {
		statement = statement.on(spec.scope.clone());
	}
	if ctx.capabilities.allows_require_clause() && !spec.tls_option.is_empty() {
		statement = statement.require(spec.tls_option.clone());
	}
	if ctx.capabilities.allows_grant_option_clause()
		&& !ctx.principal.is_role()
		&& !spec.is_role_based()
		&& spec.grant_option
	{
		statement = statement.with_grant_option();
	}
	statement.into()
}

/// Revocation of every declared spec
///
/// For a user principal each privilege spec starts with
/// `REVOKE GRANT OPTION`. When the server answers that one with error 1141
/// the executor ends the whole deletion.
pub fn plan_delete(ctx: &ReconcileContext, specs: &[DesiredGrantSpec]) -> Vec<Statement> {
	let mut statements = Vec::new();
	for spec in specs {
		if !ctx.principal.is_role() && !spec.is_role_based() {
			statements.push(
				RevokeGrantOptionStatement::new(ctx.principal.clone(), spec.scope.clone()).into(),
			);
		}

		let revoke = if spec.is_role_based() {
			RevokeStatement::new(ctx.principal.clone(), spec.grantables.clone())
		} else if spec.grantables.is_empty() {
			RevokeStatement::all(ctx.principal.clone()).on(spec.scope.clone())
		} else {
			RevokeStatement::new(ctx.principal.clone(), spec.grantables.clone())
				.on(spec.scope.clone())
		};
		statements.push(revoke.into());
	}
	statements
}
