use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use aggate_auth::{
    AuthConfig, Claims, ErrorKind, Permission, SignaturePayload, SignatureVerifier,
    explain_authorization, resolve_action, signature_window_from_env,
};

#[derive(Parser, Debug)]
#[command(name = "aggate", version, about = "Authorization and signature tooling")]
struct Cli {
    /// Human-readable logs instead of JSON.
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an X-Aggregator-Signature header value for a token.
    Sign {
        #[arg(long)]
        token: String,

        /// Unix timestamp to sign (defaults to now).
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Verify an X-Aggregator-Signature header value.
    ///
    /// The window comes from SIGNATURE_MAX_AGE_SECS / SIGNATURE_FUTURE_SKEW_SECS
    /// unless overridden by flags.
    Verify {
        signature: String,

        #[arg(long)]
        max_age: Option<i64>,

        #[arg(long)]
        future_skew: Option<i64>,
    },

    /// Load the gateway auth settings from the environment and report them.
    CheckConfig,

    /// Evaluate a permission decision for a claims document.
    Authorize {
        /// Path to a JSON claims document.
        #[arg(long)]
        claims: PathBuf,

        #[arg(long)]
        method: String,

        /// Comma-separated required permissions, in evaluation order.
        #[arg(long, value_delimiter = ',')]
        require: Vec<String>,

        /// Raw `role`/`type` query value.
        #[arg(long = "override")]
        query_override: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.pretty {
        aggate_observability::tracing::init(aggate_observability::LogFormat::Pretty);
    } else {
        aggate_observability::init();
    }

    match run(cli.cmd) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: Command) -> anyhow::Result<ExitCode> {
    match cmd {
        Command::Sign { token, timestamp } => {
            if token.is_empty() {
                bail!("token must not be empty");
            }
            let ts = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
            println!("{}", SignaturePayload::sign(token, ts).encode());
            Ok(ExitCode::SUCCESS)
        }

        Command::Verify {
            signature,
            max_age,
            future_skew,
        } => {
            let mut window = signature_window_from_env()?;
            if let Some(v) = max_age {
                window.max_age_secs = v;
            }
            if let Some(v) = future_skew {
                window.future_skew_secs = v;
            }
            if window.max_age_secs < 0 || window.future_skew_secs < 0 {
                bail!("window values must be non-negative");
            }
            let verifier = SignatureVerifier::new(window);
            match verifier.verify(&signature) {
                Ok(_) => {
                    println!("ok");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "signature rejected");
                    println!("{}", serde_json::to_string(&ErrorKind::from(e))?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::CheckConfig => {
            let cfg = AuthConfig::from_env()?;
            tracing::info!(
                audience = cfg.token_audience.as_deref(),
                static_secret = cfg.static_secret.is_some(),
                max_age_secs = cfg.signature_window.max_age_secs,
                future_skew_secs = cfg.signature_window.future_skew_secs,
                "auth configuration loaded"
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "token_audience": cfg.token_audience,
                    "static_secret_configured": cfg.static_secret.is_some(),
                    "signature_max_age_secs": cfg.signature_window.max_age_secs,
                    "signature_future_skew_secs": cfg.signature_window.future_skew_secs,
                }))?
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Authorize {
            claims,
            method,
            require,
            query_override,
        } => {
            let raw = fs::read_to_string(&claims)
                .with_context(|| format!("reading claims from {}", claims.display()))?;
            let claims: Claims = serde_json::from_str(&raw).context("parsing claims document")?;

            let required = require
                .iter()
                .map(|name| {
                    Permission::parse(name).with_context(|| format!("unknown permission '{name}'"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let action = match resolve_action(&method) {
                Ok(a) => a,
                Err(e) => {
                    println!("{}", serde_json::to_string(&ErrorKind::from(e))?);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let explanation =
                explain_authorization(&claims, action, &required, query_override.as_deref());
            println!("{}", serde_json::to_string_pretty(&explanation)?);

            Ok(if explanation.decision.allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
