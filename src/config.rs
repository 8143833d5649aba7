use crate::{error::Error, reporter::ReporterConfig};
use getopts::Options;
use std::env;

pub struct Config {
    pub token: String,
    pub proxy: Option<String>,
    pub webhook_port: u16,
    pub owner: Option<String>,
    pub prefix: String,
    pub log_level: Option<String>,
    pub reporter: ReporterConfig,
}

impl Config {
    pub fn parse(args: Vec<String>) -> Result<Self, Error> {
        let mut opts = Options::new();

        opts.optopt(
            "t",
            "token",
            "(required) set Telegram Bot HTTP API token",
            "TOKEN",
        );
        opts.optopt(
            "p",
            "proxy",
            "set proxy (supported: http, https, socks5)",
            "PROXY",
        );
        opts.optopt(
            "w",
            "webhook-port",
            "set webhook port (1 ~ 65535) and run bot in webhook mode",
            "WEBHOOK_PORT",
        );
        opts.optopt(
            "s",
            "sentry-dsn",
            "report unexpected command failures to this Sentry DSN (default: $SENTRY_DSN)",
            "DSN",
        );
        opts.optopt(
            "o",
            "owner",
            "username allowed to run owner-only commands",
            "USERNAME",
        );
        opts.optopt("", "prefix", "command prefix shown in replies (default: /)", "PREFIX");
        opts.optopt(
            "l",
            "log-level",
            "error, warn, info, debug or trace (default: $ROUTER_LOG or info)",
            "LEVEL",
        );
        opts.optflag("h", "help", "print this help menu");

        let program = args.first().map(String::as_str).unwrap_or("command-error-router");
        let usage = opts.usage(&format!("Usage: {} [options]", program));

        let matches = opts
            .parse(args.iter().skip(1))
            .map_err(|e| Error::Config(e.to_string()))?;

        if !matches.free.is_empty() {
            let mut free = String::new();

            matches
                .free
                .iter()
                .for_each(|arg| free.push_str(&format!("\"{}\" ", arg)));

            return Err(Error::Config(format!("Unrecognized argument: {}", free)));
        };

        if matches.opt_present("h") {
            return Err(Error::Config(usage));
        }

        let token = matches
            .opt_str("t")
            .ok_or_else(|| Error::Config(String::from("Telegram Bot HTTP API token not set")))?;

        let webhook_port = match matches.opt_str("w") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("Invalid webhook port: {}", port)))?,
            None => 0,
        };

        let dsn = matches
            .opt_str("s")
            .or_else(|| env::var("SENTRY_DSN").ok())
            .filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            token,
            proxy: matches.opt_str("p"),
            webhook_port,
            owner: matches.opt_str("o"),
            prefix: matches.opt_str("prefix").unwrap_or_else(|| String::from("/")),
            log_level: matches.opt_str("l"),
            reporter: ReporterConfig { dsn },
        })
    }
}
