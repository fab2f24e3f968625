use dotenv::dotenv;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use vault_backend::classifier::{OpenAiChatBackend, RelevanceClassifier};
use vault_backend::config::Config;
use vault_backend::notes::{NamespacePolicy, NoteStore, RecoveryAction};
use vault_backend::tools::{ToolContext, ToolRegistry};

const USAGE: &str = "usage:\n  vault-backend tools\n  vault-backend run <tool> '<json params>'";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env();
    log::info!("Vault backend v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using vault directory: {:?}", config.vault_dir);

    let policy = if config.writable_categories.is_empty() {
        NamespacePolicy::unrestricted()
    } else {
        log::info!("Writable categories: {}", config.writable_categories.join(", "));
        NamespacePolicy::restricted_to(config.writable_categories.iter().cloned())
    };
    let store = NoteStore::new(config.vault_dir.clone())
        .with_policy(policy)
        .with_inlink_concurrency(config.inlink_max_concurrency);

    match store.recover_interrupted_rename() {
        Ok(Some(recovery)) => {
            let p = &recovery.pending;
            match recovery.action {
                RecoveryAction::Completed(outcome) => log::warn!(
                    "Recovered interrupted rename {} -> {} ({} files updated)",
                    p.old,
                    p.new,
                    outcome.updated.len()
                ),
                RecoveryAction::AlreadyFinished => {
                    log::info!("Cleared finished rename marker {} -> {}", p.old, p.new)
                }
            }
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to recover interrupted rename: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut context = ToolContext::new().with_notes_store(Arc::new(store));
    if config.classifier.api_key.is_none() {
        log::warn!("No classifier API key set; list_relevant_notes requests will likely be rejected");
    }
    match OpenAiChatBackend::new(&config.classifier) {
        Ok(backend) => {
            let classifier = RelevanceClassifier::new(Arc::new(backend), &config.classifier);
            context = context.with_classifier(Arc::new(classifier));
        }
        Err(e) => log::error!("Relevance classifier unavailable: {}", e),
    }

    let registry = ToolRegistry::with_builtins();

    match args.first().map(String::as_str) {
        Some("tools") => match serde_json::to_string_pretty(&registry.definitions()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize tool definitions: {}", e);
                ExitCode::FAILURE
            }
        },
        Some("run") => {
            let Some(name) = args.get(1) else {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            };
            let params: Value = match args.get(2) {
                Some(raw) => match serde_json::from_str(raw) {
                    Ok(v) => v,
                    Err(e) => {
                        eprintln!("Invalid JSON parameters: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
                None => Value::Object(Default::default()),
            };

            let result = registry.execute(name, params, &context).await;
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize result: {}", e),
            }
            if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}
