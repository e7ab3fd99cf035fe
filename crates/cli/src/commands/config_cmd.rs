//! `sourcer config`: show the effective configuration.

use sourcer_config::AppConfig;

pub fn run(config: &AppConfig) {
    println!(
        "# {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    println!("# API keys are omitted\n");
    print!("{}", config.redacted_toml());
}
