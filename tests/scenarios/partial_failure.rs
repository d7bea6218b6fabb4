//! Scenario: one file fails to transpile; the rest of the project still builds.

use tsrig::application::BuildOutcome;

use crate::common::TestEnv;
use crate::support::build;

#[test]
fn scenario_one_bad_file_does_not_stop_the_others() {
    let env = TestEnv::new();
    env.write(
        "tsconfig.json",
        r#"{ "compilerOptions": { "outDir": "out" }, "include": ["src"] }"#,
    )
    .write("src/good.ts", "export const good = true;\n")
    .write("src/bad.ts", "export const = ;\n")
    .write("src/assets/logo.svg", "<svg/>\n");

    let outcome = build(env.project_root.path(), Some(1));

    let BuildOutcome::Built(report) = outcome else {
        panic!("expected a build");
    };
    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert!(env.exists("out/good.js"));
    assert!(!env.exists("out/bad.js"));
    assert!(env.exists("out/assets/logo.svg"));
}
