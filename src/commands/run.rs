use anyhow::Result;

use tsrig::config::DevConfig;
use tsrig::infrastructure::process::{run_once, EnvOverlay, Launch, RequireHooks};

use super::CommandContext;

pub fn cmd_run(ctx: &CommandContext, command: &str, args: &[String]) -> Result<i32> {
    let config_path = ctx.config_path()?;
    let dev: &DevConfig = &ctx.tool.config.dev;

    let hooks = RequireHooks::new(dev.preload.clone());
    let overlay = EnvOverlay::for_app(
        None,
        config_path.as_deref(),
        &hooks,
        ctx.env.node_options.as_deref(),
    );
    let launch = Launch::new(dev.runtime.clone(), ctx.cwd.clone(), overlay);

    let timer = ctx.logger.timer(format!("running {}...", command));
    match run_once(command, args, &launch) {
        Ok(0) => {
            timer.end(format!("{} finished", command));
            Ok(0)
        }
        Ok(code) => {
            ctx.logger
                .error(format!("script failed: {} exited with code {}", command, code));
            Ok(code)
        }
        Err(err) => {
            ctx.logger.error(format!("script failed: {}", err));
            Ok(1)
        }
    }
}
