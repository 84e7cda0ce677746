//! Binary entry point for promptvault.
//!
//! This binary provides the CLI interface for the promptvault prompt store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow match_same_arms for explicit command handling
#![allow(clippy::match_same_arms)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow option_if_let_else for environment variable fallback chains
#![allow(clippy::option_if_let_else)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{CommandFactory, Parser, Subcommand};
use promptvault::config::VaultConfig;
use promptvault::models::{extract_variables, substitute_variables};
use promptvault::{ChatProvider, Embedder, HttpChatClient, HttpEmbedder, PromptStore, PromptSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Promptvault - A personal store for reusable prompt templates.
#[derive(Parser)]
#[command(name = "promptvault")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a prompt.
    New {
        /// Prompt title.
        title: String,

        /// Prompt content with {{variable}} placeholders.
        content: Option<String>,

        /// Tags for the prompt (comma-separated).
        #[arg(short, long)]
        tags: Option<String>,

        /// Path to file containing the content.
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Read content from stdin.
        #[arg(long)]
        from_stdin: bool,
    },

    /// List all prompts, most recently updated first.
    List,

    /// Show a prompt.
    Show {
        /// Prompt id.
        id: i64,
    },

    /// Edit a prompt; every save is kept in its history.
    Edit {
        /// Prompt id.
        id: i64,

        /// New title (unchanged if omitted).
        #[arg(long)]
        title: Option<String>,

        /// New content (unchanged if no content source is given).
        #[arg(long)]
        content: Option<String>,

        /// Replace tags (comma-separated).
        #[arg(short, long)]
        tags: Option<String>,

        /// Path to file containing the new content.
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Read new content from stdin.
        #[arg(long)]
        from_stdin: bool,
    },

    /// Delete a prompt and its history.
    Delete {
        /// Prompt id.
        id: i64,

        /// Skip confirmation.
        #[arg(short, long)]
        force: bool,
    },

    /// Show a prompt's revision history, most recent first.
    History {
        /// Prompt id.
        id: i64,
    },

    /// Restore a revision by saving its content as the newest one.
    Restore {
        /// Prompt id.
        id: i64,

        /// Revision id (see `history`).
        revision: i64,
    },

    /// Search prompts by title or tag, or semantically.
    Search {
        /// The search query.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Rank by embedding similarity instead of title/tag match.
        #[arg(short, long)]
        semantic: bool,
    },

    /// Render a prompt with variable substitution.
    Render {
        /// Prompt id.
        id: i64,

        /// Variable values as KEY=VALUE.
        #[arg(long = "var")]
        variables: Vec<String>,
    },

    /// Generate a prompt template with AI from a requirement.
    Generate {
        /// What the prompt should accomplish.
        requirement: String,
    },

    /// Rewrite a prompt's content with AI.
    Optimize {
        /// Prompt id.
        id: i64,

        /// Custom instructions for this rewrite.
        #[arg(long)]
        instructions: Option<String>,
    },

    /// Export a prompt as JSON.
    Export {
        /// Prompt id.
        id: i64,

        /// Output file path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a prompt from a JSON export.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Prompt exchange format for `export` and `import`.
#[derive(Debug, Serialize, Deserialize)]
struct PromptExport {
    /// Prompt title.
    title: String,
    /// Prompt content.
    content: String,
    /// Tag names.
    #[serde(default)]
    tags: Vec<String>,
    /// Embedding vector, if one was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    embedding: Option<Vec<f32>>,
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = run_command(cli, config);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects debug level.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "promptvault=debug"
    } else {
        "promptvault=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the selected command.
fn run_command(cli: Cli, config: VaultConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Completions must not touch the database
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "promptvault", &mut io::stdout());
        return Ok(());
    }

    let store = PromptStore::new(&config.db_path)?;
    let embedder = build_embedder(&config);
    let chat = build_chat_client(&config);

    match cli.command {
        Commands::New {
            title,
            content,
            tags,
            from_file,
            from_stdin,
        } => {
            let content = read_content(content, from_file, from_stdin)?;
            cmd_new(&store, embedder.as_ref(), title, content, tags)
        },

        Commands::List => cmd_list(&store),

        Commands::Show { id } => cmd_show(&store, id),

        Commands::Edit {
            id,
            title,
            content,
            tags,
            from_file,
            from_stdin,
        } => {
            let content = read_optional_content(content, from_file, from_stdin)?;
            cmd_edit(&store, embedder.as_ref(), id, title, content, tags)
        },

        Commands::Delete { id, force } => cmd_delete(&store, id, force),

        Commands::History { id } => cmd_history(&store, id),

        Commands::Restore { id, revision } => cmd_restore(&store, embedder.as_ref(), id, revision),

        Commands::Search {
            query,
            limit,
            semantic,
        } => cmd_search(&store, embedder.as_ref(), query, limit, semantic),

        Commands::Render { id, variables } => cmd_render(&store, id, variables),

        Commands::Generate { requirement } => cmd_generate(chat.as_ref(), requirement),

        Commands::Optimize { id, instructions } => {
            cmd_optimize(&store, chat.as_ref(), id, instructions)
        },

        Commands::Export { id, output } => cmd_export(&store, id, output),

        Commands::Import { file } => cmd_import(&store, embedder.as_ref(), file),

        Commands::Completions { .. } => Ok(()),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<VaultConfig, Box<dyn std::error::Error>> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return VaultConfig::load_from_file(std::path::Path::new(config_path))
            .map_err(std::convert::Into::into);
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("PROMPTVAULT_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return VaultConfig::load_from_file(std::path::Path::new(&config_path))
                .map_err(std::convert::Into::into);
        }
    }

    // Otherwise, load from default location
    Ok(VaultConfig::load_default())
}

/// Builds an embeddings client when one is configured.
///
/// Requires an API key, either in the config file or in `OPENAI_API_KEY`.
/// Without one, prompts are stored without vectors and semantic search is
/// unavailable.
fn build_embedder(config: &VaultConfig) -> Option<HttpEmbedder> {
    let settings = &config.embedding;
    if settings.api_key.is_none() && std::env::var("OPENAI_API_KEY").is_err() {
        return None;
    }

    let mut embedder = HttpEmbedder::new();
    if let Some(key) = &settings.api_key {
        embedder = embedder.with_api_key(key);
    }
    if let Some(endpoint) = &settings.endpoint {
        embedder = embedder.with_endpoint(endpoint);
    }
    if let Some(model) = &settings.model {
        embedder = embedder.with_model(model);
    }
    if let Some(dimensions) = settings.dimensions {
        embedder = embedder.with_dimensions(dimensions);
    }

    Some(embedder)
}

/// Builds a chat client when one is configured.
///
/// Requires an API key, either in the config file or in `OPENAI_API_KEY`.
/// Without one, the AI authoring commands are unavailable.
fn build_chat_client(config: &VaultConfig) -> Option<HttpChatClient> {
    let settings = &config.chat;
    if settings.api_key.is_none() && std::env::var("OPENAI_API_KEY").is_err() {
        return None;
    }

    let mut chat = HttpChatClient::new();
    if let Some(key) = &settings.api_key {
        chat = chat.with_api_key(key);
    }
    if let Some(endpoint) = &settings.endpoint {
        chat = chat.with_endpoint(endpoint);
    }
    if let Some(model) = &settings.model {
        chat = chat.with_model(model);
    }

    Some(chat)
}

/// Reads content from the first available source.
fn read_optional_content(
    content: Option<String>,
    file: Option<PathBuf>,
    from_stdin: bool,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if let Some(content) = content {
        return Ok(Some(content));
    }
    if let Some(path) = file {
        return Ok(Some(std::fs::read_to_string(path)?));
    }
    if from_stdin {
        return Ok(Some(io::read_to_string(io::stdin())?));
    }
    Ok(None)
}

/// Like [`read_optional_content`], but requires a source.
fn read_content(
    content: Option<String>,
    file: Option<PathBuf>,
    from_stdin: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    read_optional_content(content, file, from_stdin)?
        .ok_or_else(|| "No content provided. Pass CONTENT, --from-file, or --from-stdin".into())
}

/// Splits a comma-separated tag list.
fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Embeds new content, or carries the existing vector forward.
///
/// An embedding failure is not fatal to the save; the prompt is stored
/// without a vector and a warning is logged.
fn embed_or_preserve(
    embedder: Option<&HttpEmbedder>,
    content: &str,
    existing: Option<Vec<f32>>,
) -> Option<Vec<f32>> {
    match embedder {
        Some(embedder) => match embedder.embed(content) {
            Ok(vector) => Some(vector),
            Err(e) => {
                tracing::warn!(error = %e, "Embedding generation failed, saving without a vector");
                None
            },
        },
        None => existing,
    }
}

/// Formats an epoch-second timestamp for display.
fn format_timestamp(timestamp: u64) -> String {
    #[allow(clippy::cast_possible_wrap)]
    let timestamp = timestamp as i64;
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| timestamp.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// Truncates text for single-line display.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let truncated: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{truncated}...")
}

/// New command.
fn cmd_new(
    store: &PromptStore,
    embedder: Option<&HttpEmbedder>,
    title: String,
    content: String,
    tags: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = store.create_prompt(&title, &content)?;

    let tag_list = tags.as_deref().map(parse_tags).unwrap_or_default();
    if !tag_list.is_empty() {
        store.replace_tags(id, &tag_list)?;
    }

    if let Some(vector) = embed_or_preserve(embedder, &content, None) {
        store.set_embedding(id, Some(&vector))?;
    }

    println!("Prompt saved:");
    println!("  ID: {id}");
    println!("  Title: {title}");
    if !tag_list.is_empty() {
        println!("  Tags: {}", tag_list.join(", "));
    }

    Ok(())
}

/// List command.
fn cmd_list(store: &PromptStore) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = store.search_by_title_or_tag("")?;
    print_summaries(store, &summaries)
}

/// Show command.
fn cmd_show(store: &PromptStore, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = store.get_prompt(id)?;
    let tags = store.get_tag_names(id)?;

    println!("Title: {}", prompt.title);
    println!("ID: {}", prompt.id);
    println!("Updated: {}", format_timestamp(prompt.updated_at));
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }
    match &prompt.embedding {
        Some(vector) => println!("Embedding: {} dimensions", vector.len()),
        None => println!("Embedding: none"),
    }

    let variables = extract_variables(&prompt.content);
    if !variables.is_empty() {
        println!();
        println!("Variables:");
        for name in &variables {
            println!("  {{{{{name}}}}}");
        }
    }

    println!();
    println!("Content:");
    println!("--------");
    println!("{}", prompt.content);

    Ok(())
}

/// Edit command.
fn cmd_edit(
    store: &PromptStore,
    embedder: Option<&HttpEmbedder>,
    id: i64,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = store.get_prompt(id)?;

    let new_title = title.unwrap_or_else(|| prompt.title.clone());
    let new_content = content.unwrap_or_else(|| prompt.content.clone());
    let embedding = embed_or_preserve(embedder, &new_content, prompt.embedding.clone());

    store.update_prompt(id, &new_title, &new_content, embedding.as_deref())?;

    if let Some(tags) = tags {
        store.replace_tags(id, &parse_tags(&tags))?;
    }

    println!("Prompt {id} updated.");

    Ok(())
}

/// Delete command.
fn cmd_delete(
    store: &PromptStore,
    id: i64,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Confirm deletion unless --force
    if !force {
        let title = store.get_prompt(id)?.title;
        print!("Delete prompt '{title}' and its history? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = store.delete_prompt(id)?;

    if deleted {
        println!("Prompt {id} deleted.");
    } else {
        println!("Prompt {id} not found.");
    }

    Ok(())
}

/// History command.
fn cmd_history(store: &PromptStore, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    // Existence check so a missing prompt reports an error, not an empty log
    let prompt = store.get_prompt(id)?;
    let revisions = store.list_revisions(id)?;

    println!("History for '{}':", prompt.title);
    println!();
    println!("{:<8} {:<18} CONTENT", "ID", "SAVED");
    println!("{}", "-".repeat(70));

    for revision in &revisions {
        println!(
            "{:<8} {:<18} {}",
            revision.id,
            format_timestamp(revision.saved_at),
            truncate_text(&revision.content, 40)
        );
    }

    println!();
    println!("Total: {} revisions", revisions.len());

    Ok(())
}

/// Restore command.
fn cmd_restore(
    store: &PromptStore,
    embedder: Option<&HttpEmbedder>,
    id: i64,
    revision: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = store.get_prompt(id)?;

    let revisions = store.list_revisions(id)?;
    if !revisions.iter().any(|r| r.id == revision) {
        return Err(format!("Revision {revision} does not belong to prompt {id}").into());
    }

    let content = store.get_revision_content(revision)?;
    let embedding = embed_or_preserve(embedder, &content, prompt.embedding.clone());

    store.update_prompt(id, &prompt.title, &content, embedding.as_deref())?;

    println!("Prompt {id} restored to revision {revision}.");
    println!("The replaced content is still in the history.");

    Ok(())
}

/// Search command.
fn cmd_search(
    store: &PromptStore,
    embedder: Option<&HttpEmbedder>,
    query: String,
    limit: usize,
    semantic: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if semantic {
        let Some(embedder) = embedder else {
            return Err(
                "Semantic search requires an embedding provider. Set [embedding] api_key in \
                 the config file or the OPENAI_API_KEY environment variable."
                    .into(),
            );
        };

        let vector = embedder.embed(&query)?;
        let ids = store.similarity_search(&vector, limit)?;
        let summaries = store.get_prompts_by_ids(&ids)?;
        return print_summaries(store, &summaries);
    }

    let mut summaries = store.search_by_title_or_tag(&query)?;
    summaries.truncate(limit);
    print_summaries(store, &summaries)
}

/// Prints prompt summaries in table format.
fn print_summaries(
    store: &PromptStore,
    summaries: &[PromptSummary],
) -> Result<(), Box<dyn std::error::Error>> {
    if summaries.is_empty() {
        println!("No prompts found.");
        return Ok(());
    }

    println!("{:<6} {:<40} TAGS", "ID", "TITLE");
    println!("{}", "-".repeat(70));

    for summary in summaries {
        let tags = store.get_tag_names(summary.id)?;
        println!(
            "{:<6} {:<40} {}",
            summary.id,
            truncate_text(&summary.title, 38),
            tags.join(", ")
        );
    }

    println!();
    println!("Total: {} prompts", summaries.len());

    Ok(())
}

/// Render command.
fn cmd_render(
    store: &PromptStore,
    id: i64,
    variables: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = store.get_prompt(id)?;

    // Parse provided variables
    let mut values: HashMap<String, String> = HashMap::new();
    for pair in &variables {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("Invalid variable '{pair}', expected KEY=VALUE").into());
        };
        values.insert(key.to_string(), value.to_string());
    }

    // Find missing variables
    let names = extract_variables(&prompt.content);
    let missing: Vec<&String> = names
        .iter()
        .filter(|name| !values.contains_key(name.as_str()))
        .collect();
    if !missing.is_empty() {
        let missing_names: Vec<String> = missing.iter().map(|s| format!("{{{{{s}}}}}")).collect();
        return Err(format!(
            "Missing variables: {}. Provide with --var KEY=VALUE",
            missing_names.join(", ")
        )
        .into());
    }

    println!("{}", substitute_variables(&prompt.content, &values));

    Ok(())
}

/// Generate command.
///
/// Prints the generated template to stdout so it can be piped into
/// `new --from-stdin`.
fn cmd_generate(
    chat: Option<&HttpChatClient>,
    requirement: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(chat) = chat else {
        return Err(
            "AI generation requires a chat provider. Set [chat] api_key in the config file \
             or the OPENAI_API_KEY environment variable."
                .into(),
        );
    };

    let template = chat.generate_template(&requirement)?;
    println!("{template}");

    Ok(())
}

/// Optimize command.
///
/// Prints the rewritten content to stdout so it can be reviewed, then
/// applied with `edit <id> --from-stdin`.
fn cmd_optimize(
    store: &PromptStore,
    chat: Option<&HttpChatClient>,
    id: i64,
    instructions: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(chat) = chat else {
        return Err(
            "AI optimization requires a chat provider. Set [chat] api_key in the config file \
             or the OPENAI_API_KEY environment variable."
                .into(),
        );
    };

    let prompt = store.get_prompt(id)?;
    if prompt.content.trim().is_empty() {
        return Err(format!("Prompt {id} has no content to optimize").into());
    }

    let optimized = chat.optimize_template(&prompt.content, instructions.as_deref())?;
    println!("{optimized}");

    Ok(())
}

/// Export command.
fn cmd_export(
    store: &PromptStore,
    id: i64,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = store.get_prompt(id)?;
    let tags = store.get_tag_names(id)?;

    let export = PromptExport {
        title: prompt.title,
        content: prompt.content,
        tags,
        embedding: prompt.embedding,
    };
    let json = serde_json::to_string_pretty(&export)?;

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(&path, &json)?;
        println!("Exported to: {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

/// Import command.
fn cmd_import(
    store: &PromptStore,
    embedder: Option<&HttpEmbedder>,
    file: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(&file)?;
    let export: PromptExport = serde_json::from_str(&contents)?;

    let id = store.create_prompt(&export.title, &export.content)?;

    if !export.tags.is_empty() {
        store.replace_tags(id, &export.tags)?;
    }

    if let Some(vector) = &export.embedding {
        if let Err(e) = store.set_embedding(id, Some(vector)) {
            tracing::warn!(error = %e, "Skipping imported embedding");
        }
    } else if let Some(vector) = embed_or_preserve(embedder, &export.content, None) {
        store.set_embedding(id, Some(&vector))?;
    }

    println!("Imported prompt:");
    println!("  ID: {id}");
    println!("  Title: {}", export.title);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags("solo"), vec!["solo"]);
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 40), "short");
        assert_eq!(truncate_text("first line\nsecond", 40), "first line");
        let long = "x".repeat(50);
        let truncated = truncate_text(&long, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }

    #[test]
    fn test_export_round_trip() {
        let export = PromptExport {
            title: "T".to_string(),
            content: "Hello {{name}}".to_string(),
            tags: vec!["greeting".to_string()],
            embedding: Some(vec![1.0, 0.0]),
        };
        let json = serde_json::to_string(&export).unwrap();
        let parsed: PromptExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.tags, vec!["greeting"]);
        assert_eq!(parsed.embedding, Some(vec![1.0, 0.0]));
    }

    #[test]
    fn test_import_without_optional_fields() {
        let json = r#"{"title": "T", "content": "c"}"#;
        let parsed: PromptExport = serde_json::from_str(json).unwrap();
        assert!(parsed.tags.is_empty());
        assert!(parsed.embedding.is_none());
    }

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }
}
