//! Scenario: a service with path aliases and static data files.
//!
//! ```text
//! src/
//!   server.ts          imports "@/routes/users"
//!   routes/users.ts    requires "@/lib/db"
//!   lib/db.ts
//!   lib/types.d.ts
//!   data/seed.json
//! ```

use tsrig::application::BuildOutcome;

use crate::common::TestEnv;
use crate::support::build;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "outDir": "dist",
    "baseUrl": ".",
    "paths": { "@/*": ["src/*"] }
  },
  "include": ["src/**/*.ts"]
}"#;

fn service() -> TestEnv {
    let env = TestEnv::new();
    env.write("tsconfig.json", TSCONFIG)
        .write("src/server.ts", "import { users } from \"@/routes/users\";\n")
        .write("src/routes/users.ts", "const db = require(\"@/lib/db\");\n")
        .write("src/lib/db.ts", "export const db = {};\n")
        .write("src/lib/types.d.ts", "export type Id = string;\n")
        .write("src/data/seed.json", "[]\n");
    env
}

#[test]
fn scenario_full_build_mirrors_the_source_tree() {
    let env = service();

    let outcome = build(env.project_root.path(), None);

    let BuildOutcome::Built(report) = outcome else {
        panic!("expected a build");
    };
    assert!(report.is_success());
    assert_eq!(report.compiled.len(), 3);
    assert_eq!(report.copied.len(), 1);
    assert!(env.exists("dist/server.js"));
    assert!(env.exists("dist/routes/users.js"));
    assert!(env.exists("dist/lib/db.js"));
    assert!(!env.exists("dist/lib/types.d.js"));
    assert_eq!(env.read("dist/data/seed.json"), "[]\n");
}

#[test]
fn scenario_aliases_become_relative_specifiers() {
    let env = service();

    build(env.project_root.path(), None);

    assert_eq!(
        env.read("dist/routes/users.js"),
        "const db = require(\"../lib/db\");\n"
    );
    assert_eq!(
        env.read("dist/server.js"),
        "import { users } from \"./routes/users\";\n"
    );
}

#[test]
fn scenario_rebuild_removes_outputs_of_deleted_sources() {
    let env = service();
    build(env.project_root.path(), None);
    std::fs::remove_file(env.project_path("src/lib/db.ts")).unwrap();

    build(env.project_root.path(), Some(2));

    assert!(!env.exists("dist/lib/db.js"));
    assert!(env.exists("dist/server.js"));
}
