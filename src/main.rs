use std::sync::Arc;

use otpgate::{
    App, AuthService, Clock, ConfigBuilder, InMemoryLockoutRegistry, InMemoryOtpLedger,
    InMemorySessionRegistry, RandomCodeGenerator, SystemClock,
};

#[tokio::main]
async fn main() {
    otpgate::init_tracing();

    let config = ConfigBuilder::new().from_env().build();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let service = AuthService::new(
        Arc::new(InMemoryOtpLedger::new(clock.clone())),
        Arc::new(InMemoryLockoutRegistry::new(clock.clone())),
        Arc::new(InMemorySessionRegistry::new(clock.clone())),
    )
    .with_policy(config.auth.policy())
    .with_generator(Arc::new(RandomCodeGenerator::new(config.auth.code_length)))
    .with_clock(clock);

    if let Err(error) = App::new(config, service).serve().await {
        tracing::error!(error = %error, "Server exited with error");
        std::process::exit(1);
    }
}
