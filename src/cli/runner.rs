//! CLI runner - executes commands

use crate::auth::ServiceAccountKey;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::clients::ClientProvider;
use crate::config::{load_config, AppConfig};
use crate::error::{Error, Result};
use crate::klaviyo::{fetch_with_client, ResourceKind};
use crate::pagination::{FetchOutcome, PaginatedFetcher, TruncationPolicy};
use crate::secrets::{AwsSecretsManager, SecretProvider};
use crate::sheets::{handle_event, HandlerEvent, SheetsClient};
use crate::types::JsonValue;
use serde_json::json;
use std::io::Read;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Resources {
                client_id,
                kind,
                strict,
                max_delay,
                max_retries,
            } => {
                let kinds = parse_kinds(kind)?;
                let provider = self.provider(config).await;
                let policy = if *strict {
                    TruncationPolicy::Error
                } else {
                    TruncationPolicy::Stop
                };
                self.resources(&provider, client_id, &kinds, policy, *max_delay, *max_retries)
                    .await
            }
            Commands::SheetColumns {
                sheet_id,
                sheet_name,
                service_account_file,
                delegated_email,
            } => {
                let client = match service_account_file {
                    Some(path) => sheets_client_from_file(&config, path, delegated_email.as_deref())?,
                    None => {
                        self.provider(config)
                            .await
                            .sheets_client(delegated_email.as_deref())
                            .await?
                    }
                };
                let columns = client
                    .get_sheet_columns(sheet_id, sheet_name.as_deref())
                    .await?;
                self.print_columns(&columns);
                Ok(())
            }
            Commands::HandleColumns { event } => {
                let event: HandlerEvent = serde_json::from_str(&read_input(event)?)?;
                let response = handle_event(&event, &config.google, config.http.timeout()).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            Commands::Secret { name } => {
                let provider = self.provider(config).await;
                let secret = provider.secrets().get_secret(name).await?;
                let keys: Vec<&str> = secret.keys().collect();
                match self.cli.format {
                    OutputFormat::Json => println!("{}", json!({ "name": name, "keys": keys })),
                    OutputFormat::Pretty => {
                        println!("Secret '{name}' has {} field(s):", keys.len());
                        for key in keys {
                            println!("- {key}");
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Load the config file if one was given, then apply CLI overrides
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };
        if let Some(region) = &self.cli.region {
            config.secrets.region.clone_from(region);
        }
        Ok(config)
    }

    async fn provider(&self, config: AppConfig) -> ClientProvider<AwsSecretsManager> {
        let secrets = AwsSecretsManager::new(&config.secrets.region).await;
        ClientProvider::new(secrets, config)
    }

    async fn resources<P: SecretProvider>(
        &self,
        provider: &ClientProvider<P>,
        client_id: &str,
        kinds: &[ResourceKind],
        policy: TruncationPolicy,
        max_delay: Option<u64>,
        max_retries: Option<u32>,
    ) -> Result<()> {
        let client = provider
            .klaviyo_client(client_id, max_delay, max_retries)
            .await?;
        let fetcher = PaginatedFetcher::new().policy(policy);

        let mut results = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let outcome = fetch_with_client(&client, kind, &fetcher).await?;
            results.push((kind, outcome));
        }

        match self.cli.format {
            OutputFormat::Json => {
                let body: serde_json::Map<String, JsonValue> = results
                    .iter()
                    .map(|(kind, outcome)| (kind.to_string(), outcome_json(outcome)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            OutputFormat::Pretty => {
                for (kind, outcome) in &results {
                    println!("\nFound {} total {kind}\n", outcome.len());
                }
                for (kind, outcome) in &results {
                    println!("=== {} ===", kind.as_str().to_uppercase());
                    for item in &outcome.items {
                        println!("- {} (ID: {})", item.name, item.id);
                    }
                    println!();
                }
            }
        }
        Ok(())
    }

    fn print_columns(&self, columns: &[JsonValue]) {
        match self.cli.format {
            OutputFormat::Json => println!("{}", JsonValue::from(columns.to_vec())),
            OutputFormat::Pretty => {
                println!("Sheet columns ({}):", columns.len());
                for (i, col) in columns.iter().enumerate() {
                    println!("{:2}. {}", i + 1, cell_text(col));
                }
            }
        }
    }
}

/// Expand the `--kind` argument
fn parse_kinds(kind: &str) -> Result<Vec<ResourceKind>> {
    if kind == "all" {
        return Ok(ResourceKind::ALL.to_vec());
    }
    Ok(vec![kind.parse()?])
}

fn sheets_client_from_file(
    config: &AppConfig,
    path: &Path,
    delegated_email: Option<&str>,
) -> Result<SheetsClient> {
    let key = ServiceAccountKey::from_json(&read_input(path)?)?;
    SheetsClient::new(
        key,
        delegated_email.unwrap_or(&config.google.delegated_email),
        &config.google.sheets_base_url,
        config.http.timeout(),
    )
}

/// Read a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })
}

fn outcome_json(outcome: &FetchOutcome) -> JsonValue {
    json!({
        "pages": outcome.pages,
        "count": outcome.len(),
        "items": outcome.items,
    })
}

/// Cell text without JSON quoting for strings
fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceItem;
    use std::io::Write;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(parse_kinds("all").unwrap(), ResourceKind::ALL.to_vec());
        assert_eq!(parse_kinds("tags").unwrap(), vec![ResourceKind::Tags]);
        assert!(matches!(
            parse_kinds("flows"),
            Err(Error::UnsupportedResource { .. })
        ));
    }

    #[test]
    fn test_outcome_json() {
        let outcome = FetchOutcome {
            items: vec![ResourceItem::new("tag", "t1", "VIP")],
            pages: 1,
        };
        let value = outcome_json(&outcome);
        assert_eq!(value["pages"], 1);
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["id"], "t1");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Email")), "Email");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/no/such/event.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_sheets_client_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({
                "client_email": "bot@test-project.iam.gserviceaccount.com",
                "private_key": include_str!("../../tests/fixtures/test_rsa_key.pem")
            })
        )
        .unwrap();

        let client = sheets_client_from_file(&AppConfig::default(), file.path(), None).unwrap();
        assert_eq!(client.delegated_email(), "automation@futuretilt.com");
    }
}
