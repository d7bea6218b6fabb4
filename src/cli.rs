use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tsrig - build, watch and run TypeScript projects
#[derive(Parser, Debug)]
#[command(name = "tsrig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project config (tsconfig.json / jsconfig.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Debug logging; compile errors abort the build
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output NDJSON log records for CI
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Type check and compile the project into the output directory
    Build {
        /// Compile only these files (static files are still copied)
        files: Vec<PathBuf>,

        /// Skip the type check
        #[arg(long)]
        transpile_only: bool,

        /// Output directory (overrides compilerOptions.outDir)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Run the application and restart it on every change
    Dev {
        /// Entry file (defaults to TSRIG_ENTRY, then package.json "main")
        entry: Option<PathBuf>,

        /// Port passed to the application as PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Type check before starting and before every restart
        #[arg(long)]
        type_check: bool,
    },

    /// Run a command or script with the project's loader and environment
    Run {
        /// Executable on PATH or a project file
        command: String,

        /// Arguments passed through verbatim
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_build_defaults() {
        let cli = Cli::try_parse_from(["tsrig", "build"]).unwrap();
        if let Commands::Build {
            files,
            transpile_only,
            out_dir,
        } = cli.command
        {
            assert!(files.is_empty());
            assert!(!transpile_only);
            assert_eq!(out_dir, None);
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_cli_parse_build_options() {
        let cli = Cli::try_parse_from([
            "tsrig",
            "build",
            "src/a.ts",
            "--transpile-only",
            "--out-dir",
            "lib",
        ])
        .unwrap();
        if let Commands::Build {
            files,
            transpile_only,
            out_dir,
        } = cli.command
        {
            assert_eq!(files, vec![PathBuf::from("src/a.ts")]);
            assert!(transpile_only);
            assert_eq!(out_dir, Some(PathBuf::from("lib")));
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_cli_parse_dev() {
        let cli = Cli::try_parse_from(["tsrig", "dev", "src/server.ts", "-p", "4000", "--type-check"])
            .unwrap();
        if let Commands::Dev {
            entry,
            port,
            type_check,
        } = cli.command
        {
            assert_eq!(entry, Some(PathBuf::from("src/server.ts")));
            assert_eq!(port, Some(4000));
            assert!(type_check);
        } else {
            panic!("Expected Dev command");
        }
    }

    #[test]
    fn test_cli_parse_run_passes_args_through() {
        let cli = Cli::try_parse_from(["tsrig", "run", "jest", "--watch", "-t", "auth"]).unwrap();
        if let Commands::Run { command, args } = cli.command {
            assert_eq!(command, "jest");
            assert_eq!(args, vec!["--watch", "-t", "auth"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tsrig",
            "build",
            "--debug",
            "--no-color",
            "-c",
            "tsconfig.build.json",
        ])
        .unwrap();
        assert!(cli.debug);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("tsconfig.build.json")));
    }

    #[test]
    fn test_cli_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["tsrig", "dev", "-p", "http"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tsrig"]).is_err());
    }
}
