use crate::config::{Environment, LogFormat, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset
pub fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "handyhub=debug,tower_http=debug,info",
        Environment::Staging => "handyhub=debug,handyhub::routes::forms=info,tower_http=info,info",
        Environment::Prod => {
            "handyhub=info,handyhub::routes::forms=warn,handyhub::domain::forms=warn,tower_http=info,warn"
        }
    }
}

pub fn init_logging(settings: &Settings) {
    let env = &settings.env;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json().flatten_event(true))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init(),
    }

    tracing::info!(
        service = "handyhub",
        env = ?env,
        format = ?settings.log_format,
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            let directives = default_filter(&env);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
            assert!(directives.starts_with("handyhub="));
        }
    }

    #[test]
    fn prod_quiets_form_edits() {
        assert!(default_filter(&Environment::Prod).contains("handyhub::routes::forms=warn"));
        assert!(!default_filter(&Environment::Dev).contains("routes::forms"));
    }
}
