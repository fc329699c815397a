use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use harvest_oauth_provider::{Harvest, HarvestCfg, ProviderAdapter, ResourceOwner};
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI tool to inspect the Harvest OAuth2 provider adapter
#[derive(Parser, Debug)]
#[command(
    name = "provider-inspect",
    about = "Inspect endpoints, headers and response handling of the Harvest OAuth2 provider"
)]
struct Args {
    /// Path to the provider configuration file
    #[arg(short, long, global = true, help = "Path to a provider configuration TOML file")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print endpoints, default scopes and request headers
    Endpoints,

    /// Classify a captured provider response
    Check {
        #[arg(short, long, help = "HTTP status code of the response")]
        status: u16,

        #[arg(short, long, default_value = "", help = "HTTP reason phrase of the response")]
        reason: String,

        #[arg(short, long, help = "Path to the JSON response body")]
        body: Option<PathBuf>,
    },

    /// Print fields of a resource-owner response
    Owner {
        #[arg(short, long, help = "Path to the JSON response body")]
        body: PathBuf,

        #[arg(short, long, help = "Field to print, may be repeated")]
        field: Vec<String>,
    },
}

fn load_provider(config: Option<&Path>) -> Result<Harvest> {
    match config {
        Some(path) => {
            let cfg = HarvestCfg::from_file(path).with_context(|| {
                format!("Failed to load provider configuration from {}", path.display())
            })?;
            Ok(Harvest::from_config(&cfg)?)
        }
        None => {
            log::debug!("No configuration given, using provider defaults");
            Ok(Harvest::new())
        }
    }
}

fn read_body(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read response body from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Response body in {} is not valid JSON", path.display()))
}

fn render_endpoints(provider: &Harvest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "provider: {}", provider.name());
    let _ = writeln!(out, "authorization_url: {}", provider.authorization_url());
    let _ = writeln!(out, "token_url: {}", provider.token_url());
    let _ = writeln!(out, "resource_owner_url: {}", provider.resource_owner_url(""));
    let _ = writeln!(out, "default_scopes: {}", provider.default_scopes().join(" "));
    for (name, value) in provider.default_headers().iter() {
        let _ = writeln!(out, "header: {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    out
}

fn render_owner(owner: &ResourceOwner, fields: &[String]) -> String {
    let mut out = String::new();
    if fields.is_empty() {
        match owner.id() {
            Some(id) => {
                let _ = writeln!(out, "id={}", id);
            }
            None => {
                let _ = writeln!(out, "id is not set");
            }
        }
    }
    for field in fields {
        match owner.get(field) {
            Some(value) => {
                let _ = writeln!(out, "{}={}", field, value);
            }
            None => {
                let _ = writeln!(out, "{} is not set", field);
            }
        }
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let provider = load_provider(args.config.as_deref())?;

    match args.command {
        Command::Endpoints => print!("{}", render_endpoints(&provider)),
        Command::Check {
            status,
            reason,
            body,
        } => {
            let body = match body {
                Some(path) => read_body(&path)?,
                None => Value::Object(Default::default()),
            };
            log::debug!("Checking response, status={}, reason={:?}", status, reason);
            provider.check_response(status, &reason, &body)?;
            println!("ok");
        }
        Command::Owner { body, field } => {
            let owner = provider.parse_resource_owner(read_body(&body)?);
            print!("{}", render_owner(&owner, &field));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_args_parsing_endpoints() {
        let args = Args::parse_from(&["provider-inspect", "endpoints"]);

        assert_eq!(args.command, Command::Endpoints);
        assert_eq!(args.config, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_parsing_check() {
        let args = Args::parse_from(&[
            "provider-inspect",
            "--config",
            "/path/to/harvest.toml",
            "check",
            "--status",
            "401",
            "--reason",
            "Unauthorized",
            "--verbose",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("/path/to/harvest.toml")));
        assert!(args.verbose);
        assert_eq!(
            args.command,
            Command::Check {
                status: 401,
                reason: "Unauthorized".to_string(),
                body: None,
            }
        );
    }

    #[test]
    fn test_args_parsing_owner_fields() {
        let args = Args::parse_from(&[
            "provider-inspect",
            "owner",
            "--body",
            "me.json",
            "--field",
            "email",
            "--field",
            "first_name",
        ]);

        assert_eq!(
            args.command,
            Command::Owner {
                body: PathBuf::from("me.json"),
                field: vec!["email".to_string(), "first_name".to_string()],
            }
        );
    }

    #[test]
    fn test_render_endpoints_defaults() {
        let out = render_endpoints(&Harvest::new());

        assert!(out.contains("authorization_url: https://id.getharvest.com/oauth2/authorize\n"));
        assert!(out.contains("token_url: https://id.getharvest.com/api/v1/oauth2/token\n"));
        assert!(out.contains("resource_owner_url: https://api.harvestapp.com/v2/users/me\n"));
        assert!(out.contains("default_scopes: harvest:all\n"));
        assert!(out.contains("header: accept: application/json\n"));
        assert!(out.contains("header: user-agent: MyApp (example@mail.com)\n"));
    }

    #[test]
    fn test_load_provider_from_config() {
        let file = temp_file(
            r#"
            api_url = "https://api.harvestapp.test"
            app_name = "Acme"
            app_contact = "ops@acme.io"
            "#,
        );

        let provider = load_provider(Some(file.path())).unwrap();
        let out = render_endpoints(&provider);

        assert!(out.contains("resource_owner_url: https://api.harvestapp.test/v2/users/me\n"));
        assert!(out.contains("header: user-agent: Acme (ops@acme.io)\n"));
    }

    #[test]
    fn test_load_provider_invalid_config() {
        let file = temp_file("app_name = \"Acme\"");
        assert!(load_provider(Some(file.path())).is_err());
    }

    #[test]
    fn test_read_body_rejects_invalid_json() {
        let file = temp_file("{not json");
        assert!(read_body(file.path()).is_err());
    }

    #[test]
    fn test_check_captured_body() {
        let file = temp_file(r#"{"error": "invalid_grant"}"#);
        let body = read_body(file.path()).unwrap();

        let err = Harvest::new().check_response(200, "OK", &body).unwrap_err();
        assert_eq!(err.message, "invalid_grant");
        assert_eq!(err.code, 200);
    }

    #[test]
    fn test_render_owner() {
        let owner = Harvest::new()
            .parse_resource_owner(serde_json::json!({"id": 7, "email": "x@example.com"}));

        assert_eq!(render_owner(&owner, &[]), "id=7\n");
        assert_eq!(
            render_owner(&owner, &["email".to_string(), "missing".to_string()]),
            "email=\"x@example.com\"\nmissing is not set\n"
        );
    }
}
