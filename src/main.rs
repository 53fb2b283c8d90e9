use std::sync::Arc;

use anyhow::Result;
use devboot::{
    bootstrap::{Bootstrapper, Target},
    cli::Cli,
    config::{Config, Settings},
    logging,
    printer::{print_plan, TerminalConsole},
    process::SystemLauncher,
    session,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config, then let explicit flags win
    let mut cfg = Config::load();
    args.apply(&mut cfg);

    if args.init_config {
        Config::write_default_rc(&cfg.config_path)?;
        println!("Wrote default config to {}", cfg.config_path.display());
        return Ok(());
    }

    let console = TerminalConsole;
    let settings = match Settings::from_config(&cfg) {
        Ok(s) => s,
        Err(e) => {
            let code = session::abort(&e, &console, cfg.get_bool("PAUSE_ON_FAILURE"));
            std::process::exit(code);
        }
    };
    logging::init(&settings.log_level, args.verbose);

    if args.show_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let kind = args.target.unwrap_or(settings.default_target);
    let target = Target::from_settings(kind, &settings);
    let pause = settings.pause_on_failure;
    let boot = Bootstrapper::new(settings, Arc::new(SystemLauncher));

    if args.dry_run {
        match boot.plan(&target) {
            Ok(plan) => {
                print_plan(&plan);
                return Ok(());
            }
            Err(e) => std::process::exit(session::abort(&e, &console, false)),
        }
    }

    let code = match boot.run(&target).await {
        Ok(outcome) => session::conclude(outcome, &console, pause),
        Err(e) => session::abort(&e, &console, pause),
    };
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
