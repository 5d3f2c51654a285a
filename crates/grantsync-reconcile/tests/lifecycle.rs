//! Reconciliation passes against a recording backend

use grantsync_core::{GrantError, GrantId, GrantSpecInput, GrantsDeclaration, Principal, Scope};
use grantsync_db::{GrantConnection, ServerError};
use grantsync_reconcile::{DeleteOutcome, GrantReconciler, ReadOutcome, ReconcileError};
use grantsync_test::RecordingBackend;
use grantsync_test::fixtures::{legacy_server, modern_server, test_user};
use rstest::rstest;
use std::sync::Arc;

fn reconciler(backend: &Arc<RecordingBackend>) -> GrantReconciler {
	GrantReconciler::new(GrantConnection::new(backend.clone()))
}

fn jdoe() -> GrantsDeclaration {
	GrantsDeclaration::for_user("jdoe", "%")
}

#[rstest]
#[tokio::test]
async fn test_create_on_legacy_server(legacy_server: Arc<RecordingBackend>) {
	let declaration = jdoe()
		.tls_option("SSL")
		.grant(GrantSpecInput::privileges("app", ["SELECT", "UPDATE"]).with_grant_option())
		.grant(GrantSpecInput::privileges("logs", ["INSERT"]).table("events"));

	let id = reconciler(&legacy_server).create(&declaration).await.unwrap();

	assert_eq!(id.to_string(), "jdoe@%");
	assert_eq!(
		legacy_server.statements(),
		vec![
			"GRANT SELECT, UPDATE ON `app`.* TO 'jdoe'@'%' REQUIRE SSL WITH GRANT OPTION",
			"GRANT INSERT ON `logs`.`events` TO 'jdoe'@'%' REQUIRE SSL",
		]
	);
	assert_eq!(legacy_server.queries(), vec!["SELECT VERSION()"]);
}

#[rstest]
#[tokio::test]
async fn test_create_on_modern_server(modern_server: Arc<RecordingBackend>) {
	let declaration = jdoe()
		.tls_option("SSL")
		.grant(GrantSpecInput::privileges("app", ["SELECT"]).with_grant_option())
		.grant(GrantSpecInput::roles(["reader", "auditor"]));

	reconciler(&modern_server).create(&declaration).await.unwrap();

	assert_eq!(
		modern_server.statements(),
		vec![
			"GRANT SELECT ON `app`.* TO 'jdoe'@'%'",
			"GRANT 'auditor', 'reader' TO 'jdoe'@'%'",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_create_scoped_for_role(modern_server: Arc<RecordingBackend>) {
	let declaration =
		GrantsDeclaration::for_role("reader").grant(GrantSpecInput::privileges("app", ["SELECT"]));

	let id = reconciler(&modern_server)
		.create_scoped(&declaration)
		.await
		.unwrap();

	assert_eq!(id.to_string(), "reader:`app`");
	assert_eq!(
		modern_server.statements(),
		vec!["GRANT SELECT ON `app`.* TO 'reader'"]
	);
}

#[rstest]
#[tokio::test]
async fn test_roles_rejected_before_any_statement(legacy_server: Arc<RecordingBackend>) {
	let declaration = jdoe()
		.grant(GrantSpecInput::privileges("app", ["SELECT"]))
		.grant(GrantSpecInput::roles(["reader"]));

	let err = reconciler(&legacy_server)
		.create(&declaration)
		.await
		.unwrap_err();

	assert!(matches!(err, ReconcileError::Grant(GrantError::RolesUnsupported)));
	assert!(legacy_server.statements().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_role_principal_rejected_on_legacy_server(legacy_server: Arc<RecordingBackend>) {
	let declaration =
		GrantsDeclaration::for_role("reader").grant(GrantSpecInput::privileges("*", ["SELECT"]));

	let err = reconciler(&legacy_server)
		.create(&declaration)
		.await
		.unwrap_err();

	assert!(matches!(err, ReconcileError::Grant(GrantError::RolesUnsupported)));
	assert!(legacy_server.statements().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_failed_statement_stops_the_pass() {
	let backend = Arc::new(RecordingBackend::mysql57().fail_on(
		"GRANT INSERT ON `b`.* TO 'jdoe'@'%' REQUIRE NONE",
		ServerError::new(1044, "Access denied for user"),
	));
	let declaration = jdoe()
		.grant(GrantSpecInput::privileges("a", ["SELECT"]))
		.grant(GrantSpecInput::privileges("b", ["INSERT"]))
		.grant(GrantSpecInput::privileges("c", ["DELETE"]));

	let err = reconciler(&backend).create(&declaration).await.unwrap_err();

	match &err {
		ReconcileError::Statement { statement, source } => {
			assert_eq!(statement, "GRANT INSERT ON `b`.* TO 'jdoe'@'%' REQUIRE NONE");
			assert_eq!(source.code, Some(1044));
		}
		other => panic!("unexpected error: {other}"),
	}
	assert_eq!(err.server_code(), Some(1044));
	assert_eq!(backend.statements().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_read_present_and_absent(modern_server: Arc<RecordingBackend>, test_user: Principal) {
	modern_server.set_grants(
		&test_user,
		&[
			"GRANT USAGE ON *.* TO `jdoe`@`%`",
			"GRANT SELECT, INSERT ON `app`.* TO `jdoe`@`%` WITH GRANT OPTION",
		],
	);
	let reconciler = reconciler(&modern_server);

	let ReadOutcome::Present(records) = reconciler.read(&jdoe()).await.unwrap() else {
		panic!("expected grants to be present");
	};
	assert_eq!(records.len(), 2);
	assert_eq!(records[1].scope, Scope::all_tables("app"));
	assert!(records[1].grant_option);

	modern_server.drop_principal(&test_user);
	assert_eq!(reconciler.read(&jdoe()).await.unwrap(), ReadOutcome::Absent);
}

#[rstest]
#[tokio::test]
async fn test_read_fails_on_malformed_report(
	modern_server: Arc<RecordingBackend>,
	test_user: Principal,
) {
	modern_server.set_grants(&test_user, &["GRANT `reader`@`%` TO `jdoe`@`%`"]);

	let err = reconciler(&modern_server).read(&jdoe()).await.unwrap_err();

	assert!(matches!(err, ReconcileError::Snapshot(_)));
}

#[rstest]
#[tokio::test]
async fn test_read_scope(modern_server: Arc<RecordingBackend>, test_user: Principal) {
	modern_server.set_grants(
		&test_user,
		&["GRANT SELECT (name, id) ON `app`.`users` TO `jdoe`@`%` WITH GRANT OPTION"],
	);
	let reconciler = reconciler(&modern_server);

	let state = reconciler
		.read_scope(&jdoe(), &Scope::new("app", "users"))
		.await
		.unwrap()
		.unwrap();
	assert!(state.privileges.contains("SELECT (id, name)"));
	assert!(state.grant_option);

	let state = reconciler
		.read_scope(&jdoe(), &Scope::all_tables("other"))
		.await
		.unwrap()
		.unwrap();
	assert!(state.privileges.is_empty());
	assert!(!state.grant_option);

	modern_server.drop_principal(&test_user);
	assert_eq!(
		reconciler
			.read_scope(&jdoe(), &Scope::all_tables("app"))
			.await
			.unwrap(),
		None
	);
}

#[rstest]
#[tokio::test]
async fn test_update_executes_minimal_delta(legacy_server: Arc<RecordingBackend>) {
	let old = jdoe()
		.grant(GrantSpecInput::privileges("*", ["USAGE"]))
		.grant(GrantSpecInput::privileges("d1", ["UPDATE", "SELECT"]));
	let new = jdoe()
		.grant(GrantSpecInput::privileges("*", ["USAGE"]))
		.grant(GrantSpecInput::privileges("d1", ["UPDATE", "SELECT", "DELETE"]));

	let executed = reconciler(&legacy_server).update(&old, &new).await.unwrap();

	assert_eq!(executed.len(), 1);
	assert_eq!(
		legacy_server.statements(),
		vec!["GRANT DELETE ON `d1`.* TO 'jdoe'@'%'"]
	);
}

#[rstest]
#[tokio::test]
async fn test_converge_against_live_report(
	legacy_server: Arc<RecordingBackend>,
	test_user: Principal,
) {
	legacy_server.set_grants(
		&test_user,
		&[
			"GRANT USAGE ON *.* TO 'jdoe'@'%'",
			"GRANT SELECT, DROP ON `app`.* TO 'jdoe'@'%'",
			"GRANT ALL PRIVILEGES ON `scratch`.* TO 'jdoe'@'%'",
		],
	);
	let declaration = jdoe().grant(GrantSpecInput::privileges("app", ["SELECT", "INSERT"]));

	reconciler(&legacy_server)
		.converge(&declaration)
		.await
		.unwrap();

	assert_eq!(
		legacy_server.statements(),
		vec![
			"REVOKE DROP ON `app`.* FROM 'jdoe'@'%'",
			"GRANT INSERT ON `app`.* TO 'jdoe'@'%'",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_converge_is_a_no_op_when_in_sync(
	legacy_server: Arc<RecordingBackend>,
	test_user: Principal,
) {
	legacy_server.set_grants(&test_user, &["GRANT SELECT ON `app`.* TO 'jdoe'@'%'"]);
	let declaration = jdoe().grant(GrantSpecInput::privileges("app", ["SELECT"]));

	let executed = reconciler(&legacy_server)
		.converge(&declaration)
		.await
		.unwrap();

	assert!(executed.is_empty());
	assert!(legacy_server.statements().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_delete_revokes_grant_option_then_privileges(legacy_server: Arc<RecordingBackend>) {
	let declaration = jdoe()
		.grant(GrantSpecInput::privileges("a", ["SELECT"]))
		.grant(GrantSpecInput::privileges("b", ["INSERT", "UPDATE"]));

	let outcome = reconciler(&legacy_server)
		.delete(&declaration)
		.await
		.unwrap();

	assert_eq!(outcome, DeleteOutcome::Revoked);
	assert_eq!(
		legacy_server.statements(),
		vec![
			"REVOKE GRANT OPTION ON `a`.* FROM 'jdoe'@'%'",
			"REVOKE SELECT ON `a`.* FROM 'jdoe'@'%'",
			"REVOKE GRANT OPTION ON `b`.* FROM 'jdoe'@'%'",
			"REVOKE INSERT, UPDATE ON `b`.* FROM 'jdoe'@'%'",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_delete_stops_on_no_such_grant() {
	let backend = Arc::new(
		RecordingBackend::mysql57().no_such_grant_on("REVOKE GRANT OPTION ON `a`.* FROM 'jdoe'@'%'"),
	);
	let declaration = jdoe()
		.grant(GrantSpecInput::privileges("a", ["SELECT"]))
		.grant(GrantSpecInput::privileges("b", ["INSERT"]));

	let outcome = reconciler(&backend).delete(&declaration).await.unwrap();

	assert_eq!(outcome, DeleteOutcome::AlreadyAbsent);
	assert_eq!(
		backend.statements(),
		vec!["REVOKE GRANT OPTION ON `a`.* FROM 'jdoe'@'%'"]
	);
}

#[rstest]
#[tokio::test]
async fn test_delete_fails_on_other_errors() {
	let backend = Arc::new(RecordingBackend::mysql57().fail_on(
		"REVOKE SELECT ON `a`.* FROM 'jdoe'@'%'",
		ServerError::new(1141, "There is no such grant defined for user"),
	));
	let declaration = jdoe().grant(GrantSpecInput::privileges("a", ["SELECT"]));

	let err = reconciler(&backend).delete(&declaration).await.unwrap_err();

	assert!(matches!(err, ReconcileError::Statement { .. }));
}

#[rstest]
#[tokio::test]
async fn test_delete_does_not_mistake_access_denied_for_no_such_grant() {
	let backend = Arc::new(RecordingBackend::mysql57().fail_on(
		"REVOKE GRANT OPTION ON `a`.* FROM 'app1141'@'%'",
		ServerError::new(1044, "Access denied for user 'app1141'@'%' to database 'a'"),
	));
	let declaration = GrantsDeclaration::for_user("app1141", "%")
		.grant(GrantSpecInput::privileges("a", ["SELECT"]));

	let err = reconciler(&backend).delete(&declaration).await.unwrap_err();

	assert_eq!(err.server_code(), Some(1044));
	assert_eq!(backend.statements().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_delete_roles_of_role_principal(modern_server: Arc<RecordingBackend>) {
	let declaration =
		GrantsDeclaration::for_role("app_role").grant(GrantSpecInput::roles(["base"]));

	reconciler(&modern_server)
		.delete(&declaration)
		.await
		.unwrap();

	assert_eq!(modern_server.statements(), vec!["REVOKE 'base' FROM 'app_role'"]);
}

#[rstest]
#[tokio::test]
async fn test_import(legacy_server: Arc<RecordingBackend>) {
	legacy_server.set_grants(
		&Principal::user("svc@corp", "10.0.0.%"),
		&[
			"GRANT USAGE ON *.* TO 'svc@corp'@'10.0.0.%'",
			"GRANT SELECT ON `app`.`users` TO 'svc@corp'@'10.0.0.%' WITH GRANT OPTION",
		],
	);

	let declaration = reconciler(&legacy_server)
		.import("svc@corp@10.0.0.%")
		.await
		.unwrap();

	assert_eq!(declaration.user, "svc@corp");
	assert_eq!(declaration.host, "10.0.0.%");
	assert_eq!(declaration.tls_option, "NONE");
	assert_eq!(declaration.grants.len(), 2);
	assert_eq!(declaration.grants[0].database, "*");
	assert_eq!(declaration.grants[1].database, "`app`");
	assert_eq!(declaration.grants[1].table, "users");
	assert!(declaration.grants[1].grant);
}

#[rstest]
#[tokio::test]
async fn test_imported_table_grant_converges_without_statements(
	legacy_server: Arc<RecordingBackend>,
	test_user: Principal,
) {
	legacy_server.set_grants(&test_user, &["GRANT SELECT ON `app`.`users` TO 'jdoe'@'%'"]);
	let reconciler = reconciler(&legacy_server);

	let declaration = reconciler.import("jdoe@%").await.unwrap();
	let executed = reconciler.converge(&declaration).await.unwrap();
	assert!(executed.is_empty());

	reconciler.delete(&declaration).await.unwrap();
	assert_eq!(
		legacy_server.statements(),
		vec![
			"REVOKE GRANT OPTION ON `app`.`users` FROM 'jdoe'@'%'",
			"REVOKE SELECT ON `app`.`users` FROM 'jdoe'@'%'",
		]
	);
}

#[rstest]
#[case("@localhost")]
#[case("nohost")]
#[tokio::test]
async fn test_import_rejects_bad_ids(#[case] id: &str) {
	let backend = Arc::new(RecordingBackend::mysql57());

	let err = reconciler(&backend).import(id).await.unwrap_err();

	assert!(matches!(err, ReconcileError::Grant(GrantError::InvalidImportId(_))));
	assert!(backend.queries().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_import_of_unknown_account_fails(legacy_server: Arc<RecordingBackend>) {
	let err = reconciler(&legacy_server)
		.import("ghost@%")
		.await
		.unwrap_err();

	assert!(matches!(err, ReconcileError::PrincipalNotFound(_)));
}

#[rstest]
#[tokio::test]
async fn test_import_scoped(legacy_server: Arc<RecordingBackend>, test_user: Principal) {
	legacy_server.set_grants(
		&test_user,
		&[
			"GRANT USAGE ON *.* TO 'jdoe'@'%'",
			"GRANT EXECUTE ON PROCEDURE `app`.`refresh` TO 'jdoe'@'%'",
		],
	);

	let imported = reconciler(&legacy_server)
		.import_scoped("jdoe@%")
		.await
		.unwrap();

	let ids: Vec<String> = imported.iter().map(|(id, _)| id.to_string()).collect();
	assert_eq!(ids, vec!["jdoe@%:*", "jdoe@%:PROCEDURE `app`"]);
	assert_eq!(imported[1].1.grants.len(), 1);
	assert_eq!(imported[1].1.grants[0].database, "PROCEDURE `app`");
	assert_eq!(imported[1].1.grants[0].privileges, vec!["EXECUTE"]);
}

#[rstest]
#[tokio::test]
async fn test_verify_destroyed(legacy_server: Arc<RecordingBackend>, test_user: Principal) {
	let id: GrantId = "jdoe@%:`app`".parse().unwrap();
	let reconciler = reconciler(&legacy_server);

	legacy_server.set_grants(&test_user, &["GRANT USAGE ON *.* TO 'jdoe'@'%'"]);
	let err = reconciler.verify_destroyed(&id).await.unwrap_err();
	assert!(matches!(err, ReconcileError::GrantStillExists(p) if p == "'jdoe'@'%'"));

	legacy_server.drop_principal(&test_user);
	reconciler.verify_destroyed(&id).await.unwrap();
}
