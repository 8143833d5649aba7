use crate::bot::Bot;
use command_error_router::{config::Config, logging, CrashReporter, ErrorRouter};
use std::{env, sync::Arc};

mod bot;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let config = match Config::parse(args) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    logging::init_logging(config.log_level.as_deref());

    let reporter = CrashReporter::start(&config.reporter).map(Arc::new);
    let router = Arc::new(ErrorRouter::new(reporter));

    tokio::select! {
        result = Bot::run(&config, Arc::clone(&router)) => {
            if let Err(e) = result {
                tracing::error!("{}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    router.shutdown();
}
