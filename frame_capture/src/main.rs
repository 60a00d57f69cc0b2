use frame_capture::{config, start_app, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::get_configuration().expect("failed to load config");
    telemetry::init_tracing(&config.log_level);

    start_app(config).await?;

    Ok(())
}
